//! Blood Sword - Turn-Based Tactical Battle Engine

pub mod battle;
pub mod character;
pub mod combat;
pub mod core;
pub mod magic;
