//! Attack tests and damage resolution
//!
//! Tests roll under a score: the attacker succeeds if the dice sum is at or
//! below the relevant score. Resolution here is pure; the engine applies the
//! outcome to the combatants and the map.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::constants::{
    ATTACK_DICE, DEFENDING_EXTRA_DIE, DODGING_MODIFIER, HASTE_MODIFIER, KNOCKOUT_EXTRA_DIE,
    RANGED_DAMAGE_DICE,
};
use crate::character::attributes::AttributeKind;
use crate::character::combatant::Combatant;
use crate::character::items::{Skill, WeaponClass};
use crate::character::status::StatusKind;
use crate::combat::dice::{roll, Roll};
use crate::combat::score::{damage_dice, score};
use crate::core::config::EngineConfig;

/// How an attack is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    Fight,    // Melee with the damage dice attribute
    Knockout, // Quarterstaff blow, harder to land, stuns on damage
    Shoot,    // Bow, always one damage die
}

impl AttackKind {
    pub fn weapon(&self) -> WeaponClass {
        match self {
            AttackKind::Fight | AttackKind::Knockout => WeaponClass::Melee,
            AttackKind::Shoot => WeaponClass::Ranged,
        }
    }
}

/// Result of an attack test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub kind: AttackKind,
    pub roll: Roll,
    /// Score the roll had to meet
    pub target: i32,
    pub hit: bool,
    pub damage_roll: Option<Roll>,
    /// Endurance lost after armour
    pub damage: i32,
    pub knocked_out: bool,
}

/// Roll `count` dice plus `modifier`; success if the sum is at or under `score`
pub fn test<R: Rng + ?Sized>(rng: &mut R, count: u32, modifier: i32, score: i32) -> (Roll, bool) {
    let result = roll(rng, count, modifier);
    let success = result.sum <= score;
    (result, success)
}

/// Roll damage and subtract armour unless it is ignored; never negative
pub fn inflict<R: Rng + ?Sized>(
    rng: &mut R,
    dice: u32,
    bonus: i32,
    armour: i32,
    ignore_armour: bool,
) -> (Roll, i32) {
    let result = roll(rng, dice, bonus);
    let armour = if ignore_armour { 0 } else { armour.max(0) };
    let damage = (result.sum - armour).max(0);
    (result, damage)
}

/// Dice and modifier for an attack roll by `attacker` against `defender`
pub fn attack_roll_size(attacker: &Combatant, defender: &Combatant, kind: AttackKind) -> (u32, i32) {
    let mut dice = ATTACK_DICE;
    let mut modifier = 0;

    if defender.status.has(StatusKind::Defending) {
        dice += DEFENDING_EXTRA_DIE;
    }
    if kind == AttackKind::Knockout {
        dice += KNOCKOUT_EXTRA_DIE;
    }
    if defender.has_skill(Skill::Dodging) {
        modifier += DODGING_MODIFIER;
    }
    if attacker.status.has(StatusKind::Haste) {
        modifier += HASTE_MODIFIER;
    }

    (dice, modifier)
}

/// Resolve one attack without mutating either side
pub fn resolve_attack<R: Rng + ?Sized>(
    rng: &mut R,
    attacker: &Combatant,
    defender: &Combatant,
    kind: AttackKind,
    config: &EngineConfig,
) -> AttackOutcome {
    let weapon = Some(kind.weapon());
    let target = score(attacker, AttributeKind::FightingProwess, true, weapon, config);
    let (dice, modifier) = attack_roll_size(attacker, defender, kind);
    let (attack, hit) = test(rng, dice, modifier, target);

    if !hit {
        return AttackOutcome {
            kind,
            roll: attack,
            target,
            hit,
            damage_roll: None,
            damage: 0,
            knocked_out: false,
        };
    }

    let (mut count, bonus) = damage_dice(attacker, weapon);
    if kind == AttackKind::Shoot {
        count = RANGED_DAMAGE_DICE;
    }
    let armour = score(defender, AttributeKind::Armour, true, None, config);
    let (damage_roll, damage) = inflict(rng, count, bonus, armour, false);

    AttackOutcome {
        kind,
        roll: attack,
        target,
        hit,
        damage_roll: Some(damage_roll),
        damage,
        knocked_out: kind == AttackKind::Knockout && damage > 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::archetypes::{opponent, Archetype};
    use crate::character::status::Duration;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_roll_size_modifiers() {
        let attacker = Archetype::Warrior.create();
        let mut defender = opponent("Barbarian", 7, 6, 5, 12, 1, (1, 0));
        assert_eq!(attack_roll_size(&attacker, &defender, AttackKind::Fight), (2, 0));
        assert_eq!(attack_roll_size(&attacker, &defender, AttackKind::Knockout), (3, 0));

        defender.status.apply(StatusKind::Defending, Duration::Rounds(1));
        defender.skills.push(Skill::Dodging);
        assert_eq!(attack_roll_size(&attacker, &defender, AttackKind::Fight), (3, 1));
    }

    #[test]
    fn test_hasted_attacker_shifts_roll() {
        let mut attacker = Archetype::Warrior.create();
        let defender = opponent("Barbarian", 7, 6, 5, 12, 1, (1, 0));

        attacker.status.apply(StatusKind::Haste, Duration::Rounds(2));
        assert_eq!(attack_roll_size(&attacker, &defender, AttackKind::Fight), (2, 1));
        assert_eq!(attack_roll_size(&defender, &attacker, AttackKind::Fight), (2, 0));

        let config = EngineConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        for _ in 0..100 {
            let outcome = resolve_attack(&mut rng, &attacker, &defender, AttackKind::Fight, &config);
            assert_eq!(outcome.roll.modifier, 1);
            assert_eq!(outcome.hit, outcome.roll.sum <= outcome.target);
        }
    }

    #[test]
    fn test_hit_iff_roll_at_or_under_score() {
        let warrior = Archetype::Warrior.create();
        let barbarian = opponent("Barbarian", 7, 6, 5, 12, 1, (1, 0));
        let config = EngineConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..200 {
            let outcome = resolve_attack(&mut rng, &warrior, &barbarian, AttackKind::Fight, &config);
            assert_eq!(outcome.target, 8);
            assert_eq!(outcome.hit, outcome.roll.sum <= 8);
            match &outcome.damage_roll {
                Some(dmg) => assert_eq!(outcome.damage, (dmg.sum - 1).max(0)),
                None => assert_eq!(outcome.damage, 0),
            }
        }
    }

    #[test]
    fn test_shoot_rolls_one_damage_die() {
        let mut archer = Archetype::Trickster.create();
        archer.attributes.damage.value = 3;
        let target = opponent("Goblin", 5, 5, 5, 6, 0, (1, 0));
        let config = EngineConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for _ in 0..100 {
            let outcome = resolve_attack(&mut rng, &archer, &target, AttackKind::Shoot, &config);
            if let Some(dmg) = outcome.damage_roll {
                assert_eq!(dmg.count(), 1);
            }
        }
    }

    #[test]
    fn test_knockout_flag_requires_damage() {
        let sage = Archetype::Sage.create();
        let golem = opponent("Golem", 5, 5, 5, 20, 50, (1, 0));
        let config = EngineConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        for _ in 0..100 {
            let outcome = resolve_attack(&mut rng, &sage, &golem, AttackKind::Knockout, &config);
            assert_eq!(outcome.damage, 0);
            assert!(!outcome.knocked_out);
        }
    }

    #[test]
    fn test_inflict_clamps() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let (_, damage) = inflict(&mut rng, 1, 0, 10, false);
        assert_eq!(damage, 0);
        let (r, damage) = inflict(&mut rng, 1, 0, 10, true);
        assert_eq!(damage, r.sum);
    }
}
