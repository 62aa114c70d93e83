//! Engine configuration with documented tunables
//!
//! Rule constants that never change between games live in
//! `battle::constants`. The values here are the knobs a scenario author
//! may reasonably turn, loaded from TOML (see `data/engine.toml`).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{BattleError, Result};

/// Configuration for the battle engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === CASTING ===
    /// Dice rolled by the caster for a spell test (plus current complexity)
    pub cast_dice: u32,

    /// Dice rolled by a target trying to resist a spell
    ///
    /// The target resists if the sum is at or below its psychic ability.
    /// Three dice make resistance possible but unreliable for typical
    /// psychic scores of 6-8.
    pub resistance_dice: u32,

    /// Whether opponents with spellcasting cast spells on their own turn
    ///
    /// When disabled, enemy casters fall straight through to movement.
    pub enemy_spellcasting: bool,

    // === PENALTIES AND DURATIONS ===
    /// Fighting prowess lost by a player character attacking without a weapon
    pub unarmed_penalty: i32,

    /// Turns skipped by a combatant knocked out with a quarterstaff
    pub knockout_rounds: u32,

    /// Rounds the Nighthowl terror lasts
    pub nighthowl_rounds: u32,

    /// Rounds Eye of the Tiger lasts
    pub eye_of_the_tiger_rounds: u32,

    /// Rounds a pillar of salt blocks its tile
    pub pillar_of_salt_rounds: u32,

    // === SAFETY ===
    /// Hard cap on rounds for battles without a round limit
    ///
    /// Guards against two sides that can never reach each other.
    pub max_rounds: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cast_dice: 2,
            resistance_dice: 3,
            enemy_spellcasting: true,

            unarmed_penalty: 2,
            knockout_rounds: 1,
            nighthowl_rounds: 4,
            eye_of_the_tiger_rounds: 5,
            pillar_of_salt_rounds: 5,

            max_rounds: 100,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text; missing keys fall back to defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.cast_dice == 0 || self.resistance_dice == 0 {
            return Err(BattleError::InvalidConfig(
                "cast_dice and resistance_dice must be at least 1".into(),
            ));
        }

        if self.unarmed_penalty < 0 {
            return Err(BattleError::InvalidConfig(format!(
                "unarmed_penalty ({}) must not be negative",
                self.unarmed_penalty
            )));
        }

        if self.max_rounds == 0 {
            return Err(BattleError::InvalidConfig("max_rounds must be positive".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str("resistance_dice = 2\n").unwrap();
        assert_eq!(config.resistance_dice, 2);
        assert_eq!(config.cast_dice, 2);
        assert!(config.enemy_spellcasting);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = EngineConfig::from_toml_str("cast_dice = 0\n");
        assert!(matches!(result, Err(BattleError::InvalidConfig(_))));

        let result = EngineConfig::from_toml_str("max_rounds = \"lots\"\n");
        assert!(matches!(result, Err(BattleError::TomlError(_))));
    }

    #[test]
    fn test_load_shipped_config() {
        let config = EngineConfig::load("data/engine.toml").expect("shipped config should load");
        assert_eq!(config, EngineConfig::default());
    }
}
