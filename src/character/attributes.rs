//! Core attributes: a base value plus a situational modifier each

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeKind {
    FightingProwess,
    Awareness,
    PsychicAbility,
    Endurance,
    Armour,
    /// Value is the number of damage dice, modifier the flat bonus
    Damage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attribute {
    pub value: i32,
    pub modifier: i32,
}

impl Attribute {
    pub fn new(value: i32) -> Self {
        Self { value, modifier: 0 }
    }

    pub fn with_modifier(value: i32, modifier: i32) -> Self {
        Self { value, modifier }
    }

    pub fn total(&self) -> i32 {
        self.value + self.modifier
    }
}

/// The full attribute sheet of a combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub fighting_prowess: Attribute,
    pub awareness: Attribute,
    pub psychic_ability: Attribute,
    /// Value is maximum endurance; current endurance lives on the combatant
    pub endurance: Attribute,
    pub armour: Attribute,
    pub damage: Attribute,
}

impl Attributes {
    pub fn new(fighting_prowess: i32, awareness: i32, psychic_ability: i32, endurance: i32) -> Self {
        Self {
            fighting_prowess: Attribute::new(fighting_prowess),
            awareness: Attribute::new(awareness),
            psychic_ability: Attribute::new(psychic_ability),
            endurance: Attribute::new(endurance),
            armour: Attribute::new(0),
            damage: Attribute::new(1),
        }
    }

    pub fn get(&self, kind: AttributeKind) -> &Attribute {
        match kind {
            AttributeKind::FightingProwess => &self.fighting_prowess,
            AttributeKind::Awareness => &self.awareness,
            AttributeKind::PsychicAbility => &self.psychic_ability,
            AttributeKind::Endurance => &self.endurance,
            AttributeKind::Armour => &self.armour,
            AttributeKind::Damage => &self.damage,
        }
    }

    pub fn get_mut(&mut self, kind: AttributeKind) -> &mut Attribute {
        match kind {
            AttributeKind::FightingProwess => &mut self.fighting_prowess,
            AttributeKind::Awareness => &mut self.awareness,
            AttributeKind::PsychicAbility => &mut self.psychic_ability,
            AttributeKind::Endurance => &mut self.endurance,
            AttributeKind::Armour => &mut self.armour,
            AttributeKind::Damage => &mut self.damage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_modify() {
        let mut attrs = Attributes::new(8, 6, 7, 12);
        assert_eq!(attrs.get(AttributeKind::FightingProwess).total(), 8);

        attrs.get_mut(AttributeKind::FightingProwess).modifier = -2;
        assert_eq!(attrs.get(AttributeKind::FightingProwess).total(), 6);
        assert_eq!(attrs.get(AttributeKind::Damage).value, 1);
    }
}
