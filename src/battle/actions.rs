//! Actions a combatant may take on its turn, and the legal set for a turn

use serde::{Deserialize, Serialize};

use crate::battle::battlefield::Battlefield;
use crate::battle::pathfinding::{is_available, reachable};
use crate::battle::targeting::{fight_targets, ranged_targets};
use crate::core::error::{BattleError, Result};
use crate::core::types::{CombatantRef, Point, Side};
use crate::magic::resolver::SpellTarget;
use crate::magic::spells::{SpellKind, SpellTargeting};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Move { to: Point },
    Fight { target: CombatantRef },
    Knockout { target: CombatantRef },
    Shoot { target: CombatantRef },
    Cast { spell: SpellKind, target: SpellTarget },
    CallToMind { spell: SpellKind },
    Defend,
    Flee,
    Pass,
    /// Leave the battle altogether (user exit)
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Move,
    Fight,
    Knockout,
    Shoot,
    Cast,
    CallToMind,
    Defend,
    Flee,
    Pass,
    Exit,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Move { .. } => ActionKind::Move,
            Action::Fight { .. } => ActionKind::Fight,
            Action::Knockout { .. } => ActionKind::Knockout,
            Action::Shoot { .. } => ActionKind::Shoot,
            Action::Cast { .. } => ActionKind::Cast,
            Action::CallToMind { .. } => ActionKind::CallToMind,
            Action::Defend => ActionKind::Defend,
            Action::Flee => ActionKind::Flee,
            Action::Pass => ActionKind::Pass,
            Action::Exit => ActionKind::Exit,
        }
    }
}

/// Turn-level restrictions from battle conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnRules {
    pub flee_banned: bool,
    /// Players may neither move nor flee this round
    pub entangled: bool,
}

/// Everything the actor may legally do this turn
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LegalActions {
    pub moves: Vec<Point>,
    pub fight: Vec<CombatantRef>,
    pub knockout: Vec<CombatantRef>,
    pub shoot: Vec<CombatantRef>,
    pub cast: Vec<SpellKind>,
    pub call_to_mind: Vec<SpellKind>,
    pub can_flee: bool,
    pub can_exit: bool,
}

impl LegalActions {
    /// Action kinds with at least one legal option, in menu order
    pub fn kinds(&self) -> Vec<ActionKind> {
        let mut kinds = Vec::new();
        if !self.moves.is_empty() {
            kinds.push(ActionKind::Move);
        }
        if !self.fight.is_empty() {
            kinds.push(ActionKind::Fight);
        }
        if !self.knockout.is_empty() {
            kinds.push(ActionKind::Knockout);
        }
        if !self.shoot.is_empty() {
            kinds.push(ActionKind::Shoot);
        }
        if !self.cast.is_empty() {
            kinds.push(ActionKind::Cast);
        }
        if !self.call_to_mind.is_empty() {
            kinds.push(ActionKind::CallToMind);
        }
        kinds.push(ActionKind::Defend);
        if self.can_flee {
            kinds.push(ActionKind::Flee);
        }
        kinds.push(ActionKind::Pass);
        if self.can_exit {
            kinds.push(ActionKind::Exit);
        }
        kinds
    }

    /// Reject an action outside this set
    ///
    /// A move to a valid but out-of-reach tile is `Unreachable`; everything
    /// else not on offer is `IllegalAction`. Spell targets are checked by
    /// the resolver.
    pub fn check(&self, actor: CombatantRef, action: &Action) -> Result<()> {
        let allowed = match action {
            Action::Move { to } => {
                if self.moves.is_empty() {
                    false
                } else if !self.moves.contains(to) {
                    return Err(BattleError::Unreachable(*to));
                } else {
                    true
                }
            }
            Action::Fight { target } => self.fight.contains(target),
            Action::Knockout { target } => self.knockout.contains(target),
            Action::Shoot { target } => self.shoot.contains(target),
            Action::Cast { spell, .. } => self.cast.contains(spell),
            Action::CallToMind { spell } => self.call_to_mind.contains(spell),
            Action::Defend | Action::Pass => true,
            Action::Flee => self.can_flee,
            Action::Exit => self.can_exit,
        };

        if allowed {
            Ok(())
        } else {
            Err(BattleError::illegal(actor, format!("{:?} is not allowed now", action)))
        }
    }
}

/// Work out the legal actions for `actor`
pub fn legal_actions(field: &Battlefield, actor: CombatantRef, rules: TurnRules) -> Result<LegalActions> {
    let combatant = field.get(actor)?;
    let Some(position) = field.position(actor) else {
        return Ok(LegalActions::default());
    };

    let is_player = actor.side == Side::Player;
    let held_in_place = is_player && rules.entangled;
    let mut legal = LegalActions::default();

    if !held_in_place && is_available(&field.map, position, actor.side) {
        legal.moves = reachable(&field.map, position, actor.side, combatant.moves);
    }

    legal.fight = fight_targets(field, actor);
    if combatant.can_knockout() {
        legal.knockout = legal.fight.clone();
    }
    if combatant.can_shoot() {
        legal.shoot = ranged_targets(field, actor);
    }

    if combatant.is_caster() {
        let has_adjacent = !legal.fight.is_empty();
        let has_hostiles = !field.hostiles(actor).is_empty();
        legal.cast = combatant
            .called_to_mind()
            .map(|s| s.kind)
            .filter(|kind| match kind.info().targeting {
                SpellTargeting::Single | SpellTargeting::AllOpponents => has_hostiles,
                SpellTargeting::SingleAdjacent => has_adjacent,
                SpellTargeting::CasterChoice => true,
                SpellTargeting::None => !(rules.flee_banned || held_in_place),
            })
            .collect();
        legal.call_to_mind = combatant.spells_to_call().map(|s| s.kind).collect();
    }

    legal.can_flee =
        is_player && !rules.flee_banned && !held_in_place && field.map.is_exit(position);
    legal.can_exit = is_player;

    Ok(legal)
}
