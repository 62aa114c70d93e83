//! The mutable state of one battle: the map and both parties
//!
//! Every lookup by `CombatantRef` goes through here so an out-of-range
//! reference surfaces as `CombatantNotFound` instead of a panic.

use serde::{Deserialize, Serialize};

use crate::battle::battle_map::BattleMap;
use crate::character::combatant::Combatant;
use crate::character::party::Party;
use crate::core::error::{BattleError, Result};
use crate::core::types::{CombatantRef, Point, Side};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battlefield {
    pub map: BattleMap,
    pub players: Party,
    pub opponents: Party,
}

impl Battlefield {
    pub fn new(map: BattleMap, players: Party, opponents: Party) -> Self {
        Self {
            map,
            players,
            opponents,
        }
    }

    pub fn party(&self, side: Side) -> &Party {
        match side {
            Side::Player => &self.players,
            Side::Opponent => &self.opponents,
        }
    }

    pub fn party_mut(&mut self, side: Side) -> &mut Party {
        match side {
            Side::Player => &mut self.players,
            Side::Opponent => &mut self.opponents,
        }
    }

    pub fn get(&self, who: CombatantRef) -> Result<&Combatant> {
        self.party(who.side)
            .get(who.index)
            .ok_or(BattleError::CombatantNotFound(who))
    }

    pub fn get_mut(&mut self, who: CombatantRef) -> Result<&mut Combatant> {
        self.party_mut(who.side)
            .get_mut(who.index)
            .ok_or(BattleError::CombatantNotFound(who))
    }

    pub fn position(&self, who: CombatantRef) -> Option<Point> {
        self.map.find_combatant(who)
    }

    /// Alive and standing on the map
    pub fn is_in_battle(&self, who: CombatantRef) -> bool {
        self.get(who).is_ok_and(|c| c.is_alive()) && self.position(who).is_some()
    }

    /// Every combatant reference, players first
    pub fn refs(&self) -> impl Iterator<Item = CombatantRef> + '_ {
        let players = (0..self.players.len()).map(CombatantRef::player);
        let opponents = (0..self.opponents.len()).map(CombatantRef::opponent);
        players.chain(opponents)
    }

    /// Combatants currently alive and on the map
    pub fn in_battle(&self) -> Vec<CombatantRef> {
        self.refs().filter(|r| self.is_in_battle(*r)).collect()
    }

    /// Which side a combatant fights for; enthralled opponents fight for the players
    pub fn allegiance(&self, who: CombatantRef) -> Side {
        match self.get(who) {
            Ok(c) if who.side == Side::Opponent && c.is_enthralled() => Side::Player,
            _ => who.side,
        }
    }

    pub fn is_hostile(&self, a: CombatantRef, b: CombatantRef) -> bool {
        self.allegiance(a) != self.allegiance(b)
    }

    /// In-battle combatants hostile to `who`
    pub fn hostiles(&self, who: CombatantRef) -> Vec<CombatantRef> {
        self.in_battle()
            .into_iter()
            .filter(|r| self.is_hostile(who, *r))
            .collect()
    }

    /// In-battle combatants on the same side as `who`, including itself
    pub fn allies(&self, who: CombatantRef) -> Vec<CombatantRef> {
        self.in_battle()
            .into_iter()
            .filter(|r| !self.is_hostile(who, *r))
            .collect()
    }

    /// Put a combatant on the map, lifting it from any previous tile
    pub fn deploy(&mut self, who: CombatantRef, point: Point) -> Result<()> {
        self.get(who)?;
        self.map.remove_combatant(who);
        self.map.put_combatant(point, who);
        Ok(())
    }

    pub fn remove(&mut self, who: CombatantRef) -> Option<Point> {
        self.map.remove_combatant(who)
    }

    /// Subtract endurance; the fallen leave the map. Returns whether `who` survived.
    pub fn wound(&mut self, who: CombatantRef, amount: i32) -> Result<bool> {
        let survived = self.get_mut(who)?.gain_endurance(-amount, true);
        if !survived {
            self.remove(who);
        }
        Ok(survived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::archetypes::{opponent, Archetype};
    use crate::character::status::{Duration, StatusKind};

    fn field() -> Battlefield {
        let players = Party::new(vec![Archetype::Warrior.create()]);
        let opponents = Party::new(vec![
            opponent("Orc", 6, 5, 5, 6, 0, (1, 0)),
            opponent("Troll", 8, 4, 4, 15, 2, (2, 0)),
        ]);
        let mut field = Battlefield::new(BattleMap::new(5, 5), players, opponents);
        for (r, p) in [
            (CombatantRef::player(0), Point::new(0, 0)),
            (CombatantRef::opponent(0), Point::new(1, 0)),
            (CombatantRef::opponent(1), Point::new(4, 4)),
        ] {
            field.deploy(r, p).unwrap();
        }
        field
    }

    #[test]
    fn test_lookup_out_of_range() {
        let field = field();
        assert!(matches!(
            field.get(CombatantRef::opponent(9)),
            Err(BattleError::CombatantNotFound(_))
        ));
        assert!(!field.is_in_battle(CombatantRef::opponent(9)));
    }

    #[test]
    fn test_wound_removes_the_fallen() {
        let mut field = field();
        assert!(!field.wound(CombatantRef::opponent(0), 10).unwrap());
        assert_eq!(field.position(CombatantRef::opponent(0)), None);
        assert_eq!(field.in_battle().len(), 2);
    }

    #[test]
    fn test_enthralled_switch_allegiance() {
        let mut field = field();
        let warrior = CombatantRef::player(0);
        assert_eq!(field.hostiles(warrior).len(), 2);

        field
            .get_mut(CombatantRef::opponent(1))
            .unwrap()
            .status
            .apply(StatusKind::Enthralled, Duration::Unlimited);

        assert_eq!(field.hostiles(warrior), vec![CombatantRef::opponent(0)]);
        assert!(field.is_hostile(CombatantRef::opponent(1), CombatantRef::opponent(0)));
        assert_eq!(field.allies(warrior).len(), 2);
    }
}
