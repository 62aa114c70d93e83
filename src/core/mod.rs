pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{BattleError, Result};
pub use types::{CombatantRef, Point, Side};
