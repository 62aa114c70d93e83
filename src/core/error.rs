use thiserror::Error;

use crate::core::types::{CombatantRef, Point};

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("Illegal action for {actor}: {reason}")]
    IllegalAction { actor: CombatantRef, reason: String },

    #[error("Cannot move there: {0}")]
    Unreachable(Point),

    #[error("Combatant not found: {0}")]
    CombatantNotFound(CombatantRef),

    #[error("No action is pending")]
    NotAwaitingAction,

    #[error("Battle is already over")]
    BattleOver,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl BattleError {
    pub fn illegal(actor: CombatantRef, reason: impl Into<String>) -> Self {
        BattleError::IllegalAction {
            actor,
            reason: reason.into(),
        }
    }

    /// Errors the caller recovers from by re-prompting the action chooser
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BattleError::IllegalAction { .. } | BattleError::Unreachable(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BattleError>;
