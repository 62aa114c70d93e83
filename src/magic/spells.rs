//! Spell catalogue and per-caster spell state
//!
//! The catalogue is a static match table: every variant's complexity,
//! targeting, resistance and effect are fixed here and nowhere else.

use serde::{Deserialize, Serialize};

use crate::character::status::StatusKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpellKind {
    VolcanoSpray,
    Nighthowl,
    WhiteFire,
    Swordthrust,
    EyeOfTheTiger,
    ImmediateDeliverance,
    MistsOfDeath,
    VampireSpell,
    PillarOfSalt,
    SheetLightning,
    GhastlyTouch,
    NemesisBolt,
    ServileEnthralment,
    SummonFaltyn,
    Prediction,
    DetectEnchantment,
}

/// Who a spell is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellTargeting {
    /// One opponent anywhere on the map
    Single,
    /// One opponent next to the caster
    SingleAdjacent,
    AllOpponents,
    /// Caster picks: boost self or boost the whole party
    CasterChoice,
    /// No target (party-wide or non-battle)
    None,
}

/// What a spell does once cast (and not resisted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellEffect {
    Damage {
        dice: u32,
        bonus: i32,
        ignore_armour: bool,
        /// Dice still dealt when the target resists (0 = nothing)
        resisted_dice: u32,
    },
    /// Damage ignoring armour; the caster regains half of it
    Drain { dice: u32 },
    Status(StatusKind),
    /// Target is slain and its tile turns into a temporary obstacle
    Petrify,
    Boost,
    Escape,
    NonCombat,
}

/// Static description of a spell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpellInfo {
    pub name: &'static str,
    pub complexity: i32,
    pub targeting: SpellTargeting,
    pub resisted: bool,
    pub effect: SpellEffect,
    /// Basic spells need no calling to mind and only work outside battle
    pub basic: bool,
}

const fn damage(dice: u32, bonus: i32) -> SpellEffect {
    SpellEffect::Damage {
        dice,
        bonus,
        ignore_armour: false,
        resisted_dice: 0,
    }
}

impl SpellKind {
    pub const ALL: [SpellKind; 16] = [
        SpellKind::VolcanoSpray,
        SpellKind::Nighthowl,
        SpellKind::WhiteFire,
        SpellKind::Swordthrust,
        SpellKind::EyeOfTheTiger,
        SpellKind::ImmediateDeliverance,
        SpellKind::MistsOfDeath,
        SpellKind::VampireSpell,
        SpellKind::PillarOfSalt,
        SpellKind::SheetLightning,
        SpellKind::GhastlyTouch,
        SpellKind::NemesisBolt,
        SpellKind::ServileEnthralment,
        SpellKind::SummonFaltyn,
        SpellKind::Prediction,
        SpellKind::DetectEnchantment,
    ];

    pub fn info(&self) -> SpellInfo {
        use SpellTargeting::*;

        let (name, complexity, targeting, resisted, effect) = match self {
            SpellKind::VolcanoSpray => ("Volcano Spray", 1, AllOpponents, false, damage(1, 0)),
            SpellKind::Nighthowl => (
                "Nighthowl",
                1,
                Single,
                true,
                SpellEffect::Status(StatusKind::Nighthowl),
            ),
            SpellKind::WhiteFire => ("White Fire", 1, Single, false, damage(2, 2)),
            SpellKind::Swordthrust => ("Swordthrust", 1, Single, false, damage(3, 3)),
            SpellKind::EyeOfTheTiger => ("Eye of the Tiger", 1, CasterChoice, false, SpellEffect::Boost),
            SpellKind::ImmediateDeliverance => {
                ("Immediate Deliverance", 1, None, false, SpellEffect::Escape)
            }
            SpellKind::MistsOfDeath => (
                "Mists of Death",
                2,
                AllOpponents,
                true,
                SpellEffect::Damage {
                    dice: 2,
                    bonus: 0,
                    ignore_armour: true,
                    resisted_dice: 0,
                },
            ),
            SpellKind::VampireSpell => ("The Vampire Spell", 2, Single, true, SpellEffect::Drain { dice: 4 }),
            SpellKind::PillarOfSalt => ("Pillar of Salt", 3, Single, true, SpellEffect::Petrify),
            SpellKind::SheetLightning => ("Sheet Lightning", 3, AllOpponents, false, damage(2, 2)),
            SpellKind::GhastlyTouch => (
                "Ghastly Touch",
                3,
                SingleAdjacent,
                true,
                SpellEffect::Damage {
                    dice: 7,
                    bonus: 0,
                    ignore_armour: true,
                    resisted_dice: 2,
                },
            ),
            SpellKind::NemesisBolt => ("Nemesis Bolt", 5, Single, false, damage(7, 7)),
            SpellKind::ServileEnthralment => (
                "Servile Enthralment",
                4,
                Single,
                true,
                SpellEffect::Status(StatusKind::Enthralled),
            ),
            SpellKind::SummonFaltyn => ("Summon Faltyn", 3, None, false, SpellEffect::NonCombat),
            SpellKind::Prediction => ("Prediction", 3, None, false, SpellEffect::NonCombat),
            SpellKind::DetectEnchantment => ("Detect Enchantment", 2, None, false, SpellEffect::NonCombat),
        };

        SpellInfo {
            name,
            complexity,
            targeting,
            resisted,
            effect,
            basic: effect == SpellEffect::NonCombat,
        }
    }

    pub fn name(&self) -> &'static str {
        self.info().name
    }

    pub fn is_basic(&self) -> bool {
        self.info().basic
    }

    /// Can this spell be cast during a battle?
    pub fn is_battle_spell(&self) -> bool {
        !self.is_basic()
    }

    /// Does the spell harm its targets? Used by the AI to pick spells.
    pub fn is_offensive(&self) -> bool {
        matches!(
            self.info().effect,
            SpellEffect::Damage { .. }
                | SpellEffect::Drain { .. }
                | SpellEffect::Petrify
                | SpellEffect::Status(_)
        )
    }
}

/// A spell known by a caster, with its casting state for this battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub kind: SpellKind,
    pub complexity: i32,
    pub current_complexity: i32,
    pub called_to_mind: bool,
}

impl Spell {
    pub fn new(kind: SpellKind) -> Self {
        let complexity = kind.info().complexity;
        Self {
            kind,
            complexity,
            current_complexity: complexity,
            called_to_mind: false,
        }
    }

    /// Ready to cast now, in or out of battle
    pub fn is_ready(&self) -> bool {
        self.called_to_mind || self.kind.is_basic()
    }

    /// A failed attempt eases the next one by one point
    pub fn fail(&mut self) {
        self.current_complexity = (self.current_complexity - 1).max(0);
    }

    /// A successful cast spends the spell and restores its complexity
    pub fn succeed(&mut self) {
        self.current_complexity = self.complexity;
        if !self.kind.is_basic() {
            self.called_to_mind = false;
        }
    }

    /// End-of-battle reset
    pub fn reset(&mut self) {
        self.current_complexity = self.complexity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_complete() {
        assert_eq!(SpellKind::ALL.len(), 16);
        let basic: Vec<_> = SpellKind::ALL.iter().filter(|s| s.is_basic()).collect();
        assert_eq!(basic.len(), 3);
        for kind in SpellKind::ALL {
            assert!(kind.info().complexity > 0, "{:?}", kind);
        }
    }

    #[test]
    fn test_fail_decrements_and_success_resets() {
        let mut spell = Spell::new(SpellKind::SheetLightning);
        spell.called_to_mind = true;

        spell.fail();
        assert_eq!(spell.current_complexity, 2);
        assert!(spell.called_to_mind);

        spell.succeed();
        assert_eq!(spell.current_complexity, 3);
        assert!(!spell.called_to_mind);
    }

    #[test]
    fn test_complexity_floors_at_zero() {
        let mut spell = Spell::new(SpellKind::WhiteFire);
        spell.fail();
        spell.fail();
        assert_eq!(spell.current_complexity, 0);
        spell.reset();
        assert_eq!(spell.current_complexity, 1);
    }

    #[test]
    fn test_basic_spells_always_ready() {
        let mut spell = Spell::new(SpellKind::Prediction);
        assert!(spell.is_ready());
        spell.succeed();
        assert!(spell.is_ready());
        assert!(!Spell::new(SpellKind::NemesisBolt).is_ready());
    }
}
