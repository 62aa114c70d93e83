//! Legal target enumeration
//!
//! All lists are sorted by distance, then by `CombatantRef`, so the AI and
//! any menu built from them see the same order every time.

use crate::battle::battlefield::Battlefield;
use crate::core::types::{CombatantRef, Point};

/// Hostile combatants with their positions, nearest first (Manhattan)
fn hostiles_by_distance(field: &Battlefield, actor: CombatantRef) -> Vec<(CombatantRef, Point)> {
    let Some(origin) = field.position(actor) else {
        return Vec::new();
    };

    let mut targets: Vec<_> = field
        .hostiles(actor)
        .into_iter()
        .filter_map(|r| field.position(r).map(|p| (r, p)))
        .collect();
    targets.sort_by_key(|(r, p)| (origin.manhattan(p), *r));
    targets
}

/// Hostiles standing next to the actor (Chebyshev distance 1)
pub fn fight_targets(field: &Battlefield, actor: CombatantRef) -> Vec<CombatantRef> {
    let Some(origin) = field.position(actor) else {
        return Vec::new();
    };

    let mut targets: Vec<_> = origin
        .neighbors8()
        .into_iter()
        .filter_map(|p| field.map.occupant(p).combatant())
        .filter(|r| field.is_hostile(actor, *r) && field.is_in_battle(*r))
        .collect();
    targets.sort();
    targets
}

/// Hostiles that are not adjacent; ranged attacks need no line of sight
pub fn ranged_targets(field: &Battlefield, actor: CombatantRef) -> Vec<CombatantRef> {
    let Some(origin) = field.position(actor) else {
        return Vec::new();
    };

    hostiles_by_distance(field, actor)
        .into_iter()
        .filter(|(_, p)| !origin.is_adjacent(p))
        .map(|(r, _)| r)
        .collect()
}

/// Every hostile position, as candidate destinations to close in on
pub fn move_targets(field: &Battlefield, actor: CombatantRef) -> Vec<(CombatantRef, Point)> {
    hostiles_by_distance(field, actor)
}
