//! Combatant and party model

pub mod archetypes;
pub mod attributes;
pub mod combatant;
pub mod items;
pub mod party;
pub mod status;

pub use archetypes::{opponent, Archetype};
pub use attributes::{Attribute, AttributeKind, Attributes};
pub use combatant::Combatant;
pub use items::{Item, ItemKind, Skill, WeaponClass};
pub use party::Party;
pub use status::{Duration, StatusKind, StatusSet};
