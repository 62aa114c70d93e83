//! Combat math: dice, scores and attack resolution

pub mod dice;
pub mod resolution;
pub mod score;

pub use dice::{roll, Roll};
pub use resolution::{attack_roll_size, inflict, resolve_attack, test, AttackKind, AttackOutcome};
pub use score::{damage_dice, score};
