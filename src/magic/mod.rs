//! Spells: the catalogue and the effect resolver

pub mod resolver;
pub mod spells;

pub use resolver::{attempt, cast, resist, spell_targets, CastOutcome, SpellHit, SpellTarget};
pub use spells::{Spell, SpellEffect, SpellInfo, SpellKind, SpellTargeting};
