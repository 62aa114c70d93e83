//! A single combatant: attributes, health, skills, spellbook and kit

use serde::{Deserialize, Serialize};

use crate::battle::constants::DEFAULT_MOVES;
use crate::character::archetypes::Archetype;
use crate::character::attributes::{Attribute, AttributeKind, Attributes};
use crate::character::items::{Item, ItemKind, Skill, WeaponClass};
use crate::character::status::{StatusKind, StatusSet};
use crate::core::types::Side;
use crate::magic::spells::{Spell, SpellKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub side: Side,
    #[serde(default)]
    pub archetype: Option<Archetype>,
    pub attributes: Attributes,
    /// Current endurance; the maximum is `attributes.endurance`
    pub endurance: i32,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub spells: Vec<Spell>,
    #[serde(default)]
    pub status: StatusSet,
    #[serde(default)]
    pub items: Vec<Item>,
    /// Tiles moved per Move action
    pub moves: u32,
}

impl Combatant {
    pub fn new(name: impl Into<String>, side: Side, attributes: Attributes) -> Self {
        let endurance = attributes.endurance.value;
        Self {
            name: name.into(),
            side,
            archetype: None,
            attributes,
            endurance,
            skills: Vec::new(),
            spells: Vec::new(),
            status: StatusSet::new(),
            items: Vec::new(),
            moves: DEFAULT_MOVES,
        }
    }

    // === BUILDERS ===

    pub fn with_skill(mut self, skill: Skill) -> Self {
        if !self.skills.contains(&skill) {
            self.skills.push(skill);
        }
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_spell(mut self, kind: SpellKind) -> Self {
        if self.spell(kind).is_none() {
            self.spells.push(Spell::new(kind));
        }
        self
    }

    pub fn with_armour(mut self, armour: i32) -> Self {
        self.attributes.armour = Attribute::new(armour);
        self
    }

    pub fn with_damage(mut self, dice: i32, bonus: i32) -> Self {
        self.attributes.damage = Attribute::with_modifier(dice, bonus);
        self
    }

    pub fn with_moves(mut self, moves: u32) -> Self {
        self.moves = moves;
        self
    }

    // === HEALTH ===

    pub fn is_alive(&self) -> bool {
        self.endurance > 0
    }

    pub fn max_endurance(&self) -> i32 {
        self.attributes.endurance.value
    }

    /// Adjust endurance by `delta`; returns whether the combatant survived
    ///
    /// With `clamp_to_max` healing cannot push endurance past the maximum.
    /// Endurance never drops below zero.
    pub fn gain_endurance(&mut self, delta: i32, clamp_to_max: bool) -> bool {
        let mut endurance = self.endurance.saturating_add(delta);
        if clamp_to_max {
            endurance = endurance.min(self.max_endurance());
        }
        self.endurance = endurance.max(0);
        self.is_alive()
    }

    /// Alive, conscious and not paralysed
    pub fn can_act(&self) -> bool {
        self.is_alive() && !self.status.is_incapacitated()
    }

    pub fn is_enthralled(&self) -> bool {
        self.status.has(StatusKind::Enthralled)
    }

    pub fn is_fleeing(&self) -> bool {
        self.status.has(StatusKind::Fleeing)
    }

    // === SKILLS AND EQUIPMENT ===

    pub fn has_skill(&self, skill: Skill) -> bool {
        self.skills.contains(&skill)
    }

    pub fn has_weapon(&self, class: WeaponClass) -> bool {
        self.items
            .iter()
            .any(|item| item.kind.weapon_class() == Some(class))
    }

    pub fn has_item(&self, kind: ItemKind) -> bool {
        self.items.iter().any(|item| item.kind == kind)
    }

    /// Arrows left across all quivers
    pub fn arrows(&self) -> u32 {
        self.items
            .iter()
            .map(|item| match item.kind {
                ItemKind::Quiver { arrows } => arrows,
                _ => 0,
            })
            .sum()
    }

    /// Take one arrow from the first non-empty quiver
    pub fn use_arrow(&mut self) -> bool {
        for item in self.items.iter_mut() {
            if let ItemKind::Quiver { arrows } = &mut item.kind {
                if *arrows > 0 {
                    *arrows -= 1;
                    return true;
                }
            }
        }
        false
    }

    /// Archery skill, a bow and at least one arrow
    pub fn can_shoot(&self) -> bool {
        self.has_skill(Skill::Archery) && self.has_weapon(WeaponClass::Ranged) && self.arrows() > 0
    }

    pub fn can_knockout(&self) -> bool {
        self.has_skill(Skill::Quarterstaff) && self.has_item(ItemKind::Quarterstaff)
    }

    /// Sum of item modifiers for an attribute given the weapon in use
    pub fn item_modifier(&self, attribute: AttributeKind, weapon: Option<WeaponClass>) -> i32 {
        self.items
            .iter()
            .map(|item| item.modifier_for(attribute, weapon))
            .sum()
    }

    // === SPELLS ===

    pub fn is_caster(&self) -> bool {
        self.has_skill(Skill::Spellcasting) && !self.spells.is_empty()
    }

    pub fn spell(&self, kind: SpellKind) -> Option<&Spell> {
        self.spells.iter().find(|s| s.kind == kind)
    }

    pub fn spell_mut(&mut self, kind: SpellKind) -> Option<&mut Spell> {
        self.spells.iter_mut().find(|s| s.kind == kind)
    }

    /// Memorise a known battle spell; false if unknown or basic
    pub fn call_to_mind(&mut self, kind: SpellKind) -> bool {
        match self.spell_mut(kind) {
            Some(spell) if !kind.is_basic() => {
                spell.called_to_mind = true;
                true
            }
            _ => false,
        }
    }

    /// Battle spells currently held in mind
    pub fn called_to_mind(&self) -> impl Iterator<Item = &Spell> + '_ {
        self.spells
            .iter()
            .filter(|s| s.called_to_mind && s.kind.is_battle_spell())
    }

    /// Known battle spells not yet in mind
    pub fn spells_to_call(&self) -> impl Iterator<Item = &Spell> + '_ {
        self.spells
            .iter()
            .filter(|s| !s.called_to_mind && s.kind.is_battle_spell())
    }

    /// Basic spells are only usable away from battle
    pub fn can_cast_outside_battle(&self, kind: SpellKind) -> bool {
        self.has_skill(Skill::Spellcasting)
            && self.spell(kind).is_some_and(|s| s.kind.is_basic() || s.called_to_mind)
    }

    pub fn reset_spells(&mut self) {
        for spell in self.spells.iter_mut() {
            spell.reset();
        }
    }

    /// Clear everything a battle leaves behind
    pub fn reset_after_battle(&mut self) {
        self.reset_spells();
        self.status.clear_battle_statuses();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::status::Duration;

    fn fighter() -> Combatant {
        Combatant::new("Fighter", Side::Player, Attributes::new(8, 6, 6, 10))
    }

    #[test]
    fn test_gain_endurance_clamps_and_reports_survival() {
        let mut c = fighter();
        assert!(c.gain_endurance(5, true));
        assert_eq!(c.endurance, 10);

        assert!(c.gain_endurance(5, false));
        assert_eq!(c.endurance, 15);

        assert!(!c.gain_endurance(-20, true));
        assert_eq!(c.endurance, 0);
        assert!(!c.is_alive());
    }

    #[test]
    fn test_zero_delta_keeps_state() {
        let mut c = fighter();
        c.endurance = 1;
        assert!(c.gain_endurance(0, true));
        assert!(c.is_alive());

        c.endurance = 0;
        assert!(!c.gain_endurance(0, true));
    }

    #[test]
    fn test_arrows_deplete() {
        let mut c = fighter()
            .with_skill(Skill::Archery)
            .with_item(Item::bow())
            .with_item(Item::quiver(1));
        assert!(c.can_shoot());
        assert!(c.use_arrow());
        assert_eq!(c.arrows(), 0);
        assert!(!c.can_shoot());
        assert!(!c.use_arrow());
    }

    #[test]
    fn test_call_to_mind_rules() {
        let mut c = fighter()
            .with_skill(Skill::Spellcasting)
            .with_spell(SpellKind::WhiteFire)
            .with_spell(SpellKind::Prediction);

        assert!(c.call_to_mind(SpellKind::WhiteFire));
        assert!(!c.call_to_mind(SpellKind::Prediction));
        assert!(!c.call_to_mind(SpellKind::NemesisBolt));
        assert_eq!(c.called_to_mind().count(), 1);
        assert!(c.can_cast_outside_battle(SpellKind::Prediction));
    }

    #[test]
    fn test_reset_after_battle() {
        let mut c = fighter()
            .with_skill(Skill::Spellcasting)
            .with_spell(SpellKind::SheetLightning);
        if let Some(spell) = c.spell_mut(SpellKind::SheetLightning) {
            spell.fail();
        }
        c.status.apply(StatusKind::Defending, Duration::Rounds(1));
        c.status.apply(StatusKind::Enthralled, Duration::Unlimited);

        c.reset_after_battle();
        assert_eq!(c.spell(SpellKind::SheetLightning).map(|s| s.current_complexity), Some(3));
        assert!(!c.status.has(StatusKind::Defending));
        assert!(c.is_enthralled());
    }
}
