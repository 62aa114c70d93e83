//! Battle events for presentation layers
//!
//! The engine never renders anything. It pushes events into a log and
//! forwards each one to an `EventSink` the caller supplies.

use serde::{Deserialize, Serialize};

use crate::battle::conditions::BattleResult;
use crate::character::status::StatusKind;
use crate::combat::resolution::AttackKind;
use crate::core::types::{CombatantRef, Point};
use crate::magic::spells::SpellKind;

/// A single event with the round it happened in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleEvent {
    pub round: u32,
    pub event_type: BattleEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEventType {
    BattleStarted,
    RoundAdvanced { round: u32 },
    TurnStarted { actor: CombatantRef },
    TurnSkipped { actor: CombatantRef },
    CombatantMoved { actor: CombatantRef, from: Point, to: Point },
    AttackResolved {
        attacker: CombatantRef,
        defender: CombatantRef,
        kind: AttackKind,
        /// Attack roll and the score it had to meet
        roll: i32,
        target: i32,
        hit: bool,
        damage: i32,
    },
    SpellResolved {
        caster: CombatantRef,
        spell: SpellKind,
        target: Option<CombatantRef>,
        succeeded: bool,
        resisted: bool,
    },
    SpellCalledToMind { caster: CombatantRef, spell: SpellKind },
    StatusApplied { target: CombatantRef, status: StatusKind },
    StatusExpired { target: CombatantRef, status: StatusKind },
    CombatantDefeated { who: CombatantRef },
    CombatantFled { who: CombatantRef },
    BattleEnded { result: BattleResult },
}

/// Receives events as they happen
pub trait EventSink {
    fn on_event(&mut self, event: &BattleEvent);
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&mut self, _event: &BattleEvent) {}
}

/// Ordered record of events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleEventLog {
    pub events: Vec<BattleEvent>,
}

impl BattleEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event_type: BattleEventType, description: String, round: u32) {
        self.events.push(BattleEvent {
            round,
            event_type,
            description,
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleEvent> + '_ {
        self.events.iter()
    }
}

impl EventSink for BattleEventLog {
    fn on_event(&mut self, event: &BattleEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_collects_from_sink() {
        let mut log = BattleEventLog::new();
        log.push(BattleEventType::RoundAdvanced { round: 1 }, "Round 1".into(), 1);

        let mut copy = BattleEventLog::new();
        for event in log.iter() {
            copy.on_event(event);
        }
        assert_eq!(copy.len(), 1);
        assert_eq!(copy.events[0].round, 1);
    }
}
