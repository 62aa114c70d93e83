//! Ready-made player classes and a generic opponent builder

use serde::{Deserialize, Serialize};

use crate::character::attributes::Attributes;
use crate::character::combatant::Combatant;
use crate::character::items::{Item, Skill};
use crate::core::types::Side;
use crate::magic::spells::SpellKind;

/// The four player character classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Warrior,   // Best fighter, heaviest armour
    Trickster, // Archer and dodger
    Sage,      // Quarterstaff knockouts, healing, ESP
    Enchanter, // Spellcaster
}

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::Warrior,
        Archetype::Trickster,
        Archetype::Sage,
        Archetype::Enchanter,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Warrior => "Warrior",
            Archetype::Trickster => "Trickster",
            Archetype::Sage => "Sage",
            Archetype::Enchanter => "Enchanter",
        }
    }

    /// Build a first-rank character of this class
    pub fn create(&self) -> Combatant {
        let combatant = match self {
            Archetype::Warrior => Combatant::new(self.name(), Side::Player, Attributes::new(8, 6, 6, 12))
                .with_damage(1, 1)
                .with_item(Item::sword())
                .with_item(Item::armour("Ringmail", 2)),
            Archetype::Trickster => Combatant::new(self.name(), Side::Player, Attributes::new(7, 8, 7, 10))
                .with_skill(Skill::Archery)
                .with_skill(Skill::Dodging)
                .with_item(Item::sword())
                .with_item(Item::bow())
                .with_item(Item::quiver(6))
                .with_item(Item::armour("Leather jerkin", 1)),
            Archetype::Sage => Combatant::new(self.name(), Side::Player, Attributes::new(7, 7, 7, 10))
                .with_skill(Skill::Quarterstaff)
                .with_skill(Skill::Healing)
                .with_skill(Skill::Esp)
                .with_skill(Skill::Archery)
                .with_item(Item::quarterstaff())
                .with_item(Item::bow())
                .with_item(Item::quiver(6))
                .with_item(Item::armour("Ringmail", 2)),
            Archetype::Enchanter => SpellKind::ALL.iter().fold(
                Combatant::new(self.name(), Side::Player, Attributes::new(7, 7, 8, 10))
                    .with_skill(Skill::Spellcasting)
                    .with_item(Item::sword()),
                |c, kind| c.with_spell(*kind),
            ),
        };

        Combatant {
            archetype: Some(*self),
            ..combatant
        }
    }
}

/// A plain opponent with the given attributes, armour and damage dice
pub fn opponent(
    name: impl Into<String>,
    fighting_prowess: i32,
    awareness: i32,
    psychic_ability: i32,
    endurance: i32,
    armour: i32,
    damage: (i32, i32),
) -> Combatant {
    Combatant::new(
        name,
        Side::Opponent,
        Attributes::new(fighting_prowess, awareness, psychic_ability, endurance),
    )
    .with_armour(armour)
    .with_damage(damage.0, damage.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::items::WeaponClass;

    #[test]
    fn test_archetypes_are_armed_players() {
        for archetype in Archetype::ALL {
            let c = archetype.create();
            assert_eq!(c.side, Side::Player);
            assert_eq!(c.archetype, Some(archetype));
            assert!(c.has_weapon(WeaponClass::Melee), "{}", archetype.name());
            assert!(c.is_alive());
        }
    }

    #[test]
    fn test_class_features() {
        assert!(Archetype::Trickster.create().can_shoot());
        assert!(Archetype::Sage.create().can_knockout());
        let enchanter = Archetype::Enchanter.create();
        assert!(enchanter.is_caster());
        assert_eq!(enchanter.spells.len(), SpellKind::ALL.len());
    }

    #[test]
    fn test_opponent_builder() {
        let barbarian = opponent("Barbarian", 7, 6, 5, 12, 1, (1, 2));
        assert_eq!(barbarian.side, Side::Opponent);
        assert_eq!(barbarian.attributes.armour.value, 1);
        assert_eq!(barbarian.attributes.damage.modifier, 2);
        assert_eq!(barbarian.endurance, 12);
    }
}
