//! Fixed-priority battle AI
//!
//! Priority: fight an adjacent hostile, shoot, cast a spell held in mind,
//! close in on the nearest hostile, call a spell to mind, defend. The first
//! option with a legal choice wins; there is no scoring.

use tracing::debug;

use crate::battle::actions::{Action, LegalActions};
use crate::battle::ai::ActionChooser;
use crate::battle::battlefield::Battlefield;
use crate::battle::pathfinding::{count, find_path};
use crate::battle::targeting::move_targets;
use crate::core::config::EngineConfig;
use crate::core::types::{CombatantRef, Point, Side};
use crate::magic::resolver::SpellTarget;
use crate::magic::spells::{SpellKind, SpellTargeting};

/// The deterministic AI used for opponents
#[derive(Debug, Clone, Copy, Default)]
pub struct AiChooser;

impl AiChooser {
    pub fn new() -> Self {
        Self
    }

    pub fn decide(
        &self,
        field: &Battlefield,
        config: &EngineConfig,
        actor: CombatantRef,
        legal: &LegalActions,
    ) -> Action {
        if let Some(target) = legal.fight.first() {
            return Action::Fight { target: *target };
        }

        if let Some(target) = legal.shoot.first() {
            return Action::Shoot { target: *target };
        }

        let may_cast = actor.side == Side::Player || config.enemy_spellcasting;
        if may_cast {
            if let Some((spell, target)) = choose_spell(field, actor, legal) {
                return Action::Cast { spell, target };
            }
        }

        if let Some(to) = approach(field, actor, legal) {
            return Action::Move { to };
        }

        if may_cast {
            let spell = legal
                .call_to_mind
                .iter()
                .find(|s| s.is_offensive())
                .or(legal.call_to_mind.first());
            if let Some(spell) = spell {
                return Action::CallToMind { spell: *spell };
            }
        }

        Action::Defend
    }
}

impl ActionChooser for AiChooser {
    fn choose(
        &mut self,
        field: &Battlefield,
        config: &EngineConfig,
        actor: CombatantRef,
        legal: &LegalActions,
    ) -> Action {
        let action = self.decide(field, config, actor, legal);
        debug!(%actor, ?action, "AI decision");
        action
    }
}

/// First offensive spell in mind with a sensible target
pub fn choose_spell(
    field: &Battlefield,
    actor: CombatantRef,
    legal: &LegalActions,
) -> Option<(SpellKind, SpellTarget)> {
    let nearest = move_targets(field, actor).first().map(|(r, _)| *r);

    legal
        .cast
        .iter()
        .filter(|s| s.is_offensive())
        .find_map(|spell| match spell.info().targeting {
            SpellTargeting::Single => nearest.map(|t| (*spell, SpellTarget::Combatant(t))),
            SpellTargeting::SingleAdjacent => legal
                .fight
                .first()
                .map(|t| (*spell, SpellTarget::Combatant(*t))),
            SpellTargeting::AllOpponents => nearest.map(|_| (*spell, SpellTarget::None)),
            SpellTargeting::CasterChoice | SpellTargeting::None => None,
        })
}

/// Where to move to close in on the nearest hostile, if anywhere
///
/// Hostiles are ranked by unrestricted path length (occupants ignored),
/// then by reference. The real path is searched with occupants in place;
/// since the target's own tile is occupied that search usually fails and
/// its closest reached node becomes the goal instead. The move is clipped
/// to the walkable prefix and the mover's allowance.
pub fn approach(field: &Battlefield, actor: CombatantRef, legal: &LegalActions) -> Option<Point> {
    if legal.moves.is_empty() {
        return None;
    }
    let origin = field.position(actor)?;
    let allowance = field.get(actor).ok()?.moves as usize;
    let mover = actor.side;
    let map = &field.map;

    let (_, _, goal) = move_targets(field, actor)
        .into_iter()
        .filter_map(|(r, p)| {
            let estimate = find_path(map, origin, p, mover, true);
            (!estimate.is_empty()).then(|| (estimate.steps(), r, p))
        })
        .min_by_key(|(steps, r, _)| (*steps, *r))?;

    let mut path = find_path(map, origin, goal, mover, false);
    if path.is_empty() {
        path = find_path(map, origin, path.closest, mover, false);
    }

    let steps = count(map, &path, mover).saturating_sub(1).min(allowance);
    if steps == 0 {
        return None;
    }

    let to = path.points[steps];
    legal.moves.contains(&to).then_some(to)
}
