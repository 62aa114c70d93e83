//! Battle definitions: opposition, deployment, conditions and results

use serde::{Deserialize, Serialize};

use crate::battle::battle_map::BattleMap;
use crate::character::party::Party;
use crate::core::types::Point;

/// Battle-wide rules that change how a fight plays out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleCondition {
    AmbushPlayer,               // Players get a free opening round
    AmbushNpc,                  // Opponents get a free opening round
    CannotFlee,                 // No fleeing, no Immediate Deliverance
    SurvivorsCarryOver(usize),  // Up to N surviving opponents go on to the next battle
    Entangled,                  // Players cannot move or flee in round 1
}

/// How a battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BattleResult {
    /// Explicit user exit; neither a win nor a loss
    #[default]
    None,
    Victory,
    Defeat,
    Flee,
    /// Every surviving opponent is enthralled
    Enthralled,
    /// Round limit reached with both sides standing
    Determine,
}

impl BattleResult {
    pub fn is_decisive(&self) -> bool {
        matches!(self, BattleResult::Victory | BattleResult::Defeat)
    }
}

/// Everything about a battle except the player party
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battle {
    pub map: BattleMap,
    pub opponents: Party,
    #[serde(default)]
    pub conditions: Vec<BattleCondition>,
    /// `None` means fight to the finish (capped by the engine's safety limit)
    #[serde(default)]
    pub round_limit: Option<u32>,
    /// Opponents at or below this endurance count as beaten
    #[serde(default)]
    pub endurance_limit: Option<i32>,
    /// Start tile per player index; members without one sit the battle out
    #[serde(default)]
    pub player_start: Vec<Point>,
    #[serde(default)]
    pub opponent_start: Vec<Point>,
}

impl Battle {
    pub fn new(map: BattleMap, opponents: Party) -> Self {
        Self {
            map,
            opponents,
            conditions: Vec::new(),
            round_limit: None,
            endurance_limit: None,
            player_start: Vec::new(),
            opponent_start: Vec::new(),
        }
    }

    pub fn with_condition(mut self, condition: BattleCondition) -> Self {
        if !self.conditions.contains(&condition) {
            self.conditions.push(condition);
        }
        self
    }

    pub fn with_round_limit(mut self, rounds: u32) -> Self {
        self.round_limit = Some(rounds);
        self
    }

    pub fn with_endurance_limit(mut self, endurance: i32) -> Self {
        self.endurance_limit = Some(endurance);
        self
    }

    pub fn with_player_start(mut self, points: Vec<Point>) -> Self {
        self.player_start = points;
        self
    }

    pub fn with_opponent_start(mut self, points: Vec<Point>) -> Self {
        self.opponent_start = points;
        self
    }

    pub fn has(&self, condition: BattleCondition) -> bool {
        self.conditions.contains(&condition)
    }

    /// How many surviving opponents carry over, if any
    pub fn survivor_limit(&self) -> Option<usize> {
        self.conditions.iter().find_map(|c| match c {
            BattleCondition::SurvivorsCarryOver(limit) => Some(*limit),
            _ => None,
        })
    }
}
