//! Action choosers for battle turns
//!
//! Architecture: one trait, swappable implementations
//! - `ActionChooser` is what the engine calls whenever a combatant must act
//! - `AiChooser` is the deterministic fixed-priority AI
//! - Human front ends implement `ActionChooser` over their own input

mod tactics;

pub use tactics::{approach, choose_spell, AiChooser};

use crate::battle::actions::{Action, LegalActions};
use crate::battle::battlefield::Battlefield;
use crate::core::config::EngineConfig;
use crate::core::types::CombatantRef;

/// Picks one action for the combatant whose turn it is
pub trait ActionChooser {
    /// Choose from `legal`; an illegal choice is rejected and asked again
    fn choose(
        &mut self,
        field: &Battlefield,
        config: &EngineConfig,
        actor: CombatantRef,
        legal: &LegalActions,
    ) -> Action;

    /// Called after a rejected choice so interactive choosers can explain it
    fn rejected(&mut self, _actor: CombatantRef, _action: &Action, _reason: &str) {}
}

/// Replays a fixed list of actions, then passes
///
/// Used by scripted scenarios and tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChooser {
    actions: std::collections::VecDeque<Action>,
}

impl ScriptedChooser {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }
}

impl ActionChooser for ScriptedChooser {
    fn choose(
        &mut self,
        _field: &Battlefield,
        _config: &EngineConfig,
        _actor: CombatantRef,
        _legal: &LegalActions,
    ) -> Action {
        self.actions.pop_front().unwrap_or(Action::Pass)
    }
}
