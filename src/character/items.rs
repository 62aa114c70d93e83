//! Skills and equipment that feed combat modifiers

use serde::{Deserialize, Serialize};

use crate::character::attributes::AttributeKind;

/// Skills a combatant may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Skill {
    Archery,
    Dodging,
    Quarterstaff,
    Healing,
    Esp,
    ParanormalSight,
    Levitation,
    Spellcasting,
    Exorcism,
}

/// Which weapon an attack is made with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponClass {
    Melee,
    Ranged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Sword,
    Quarterstaff,
    Bow,
    Quiver { arrows: u32 },
    Armour { rating: i32 },
    Trinket,
}

impl ItemKind {
    pub fn weapon_class(&self) -> Option<WeaponClass> {
        match self {
            ItemKind::Sword | ItemKind::Quarterstaff => Some(WeaponClass::Melee),
            ItemKind::Bow => Some(WeaponClass::Ranged),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeModifier {
    pub attribute: AttributeKind,
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub modifiers: Vec<AttributeModifier>,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: Vec::new(),
        }
    }

    pub fn sword() -> Self {
        Self::new("Sword", ItemKind::Sword)
    }

    pub fn quarterstaff() -> Self {
        Self::new("Quarterstaff", ItemKind::Quarterstaff)
    }

    pub fn bow() -> Self {
        Self::new("Bow", ItemKind::Bow)
    }

    pub fn quiver(arrows: u32) -> Self {
        Self::new("Quiver", ItemKind::Quiver { arrows })
    }

    pub fn armour(name: impl Into<String>, rating: i32) -> Self {
        Self::new(name, ItemKind::Armour { rating })
    }

    pub fn with_modifier(mut self, attribute: AttributeKind, amount: i32) -> Self {
        self.modifiers.push(AttributeModifier { attribute, amount });
        self
    }

    /// Bonus this item grants to an attribute when attacking with `weapon`
    ///
    /// Weapon modifiers only count while that weapon is in use; all other
    /// items apply all the time.
    pub fn modifier_for(&self, attribute: AttributeKind, weapon: Option<WeaponClass>) -> i32 {
        if let Some(class) = self.kind.weapon_class() {
            if weapon != Some(class) {
                return 0;
            }
        }

        let mut total: i32 = self
            .modifiers
            .iter()
            .filter(|m| m.attribute == attribute)
            .map(|m| m.amount)
            .sum();

        if let (ItemKind::Armour { rating }, AttributeKind::Armour) = (self.kind, attribute) {
            total += rating;
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_modifier_only_when_used() {
        let blade = Item::sword().with_modifier(AttributeKind::FightingProwess, 1);
        assert_eq!(blade.modifier_for(AttributeKind::FightingProwess, Some(WeaponClass::Melee)), 1);
        assert_eq!(blade.modifier_for(AttributeKind::FightingProwess, Some(WeaponClass::Ranged)), 0);
        assert_eq!(blade.modifier_for(AttributeKind::FightingProwess, None), 0);
    }

    #[test]
    fn test_armour_rating_counts() {
        let mail = Item::armour("Chainmail", 3).with_modifier(AttributeKind::Awareness, -1);
        assert_eq!(mail.modifier_for(AttributeKind::Armour, None), 3);
        assert_eq!(mail.modifier_for(AttributeKind::Awareness, Some(WeaponClass::Melee)), -1);
    }
}
