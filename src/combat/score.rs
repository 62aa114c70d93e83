//! Effective attribute scores
//!
//! A score is the attribute's base value plus its modifier, plus any item
//! bonuses, plus situational adjustments from statuses and equipment.

use crate::character::attributes::AttributeKind;
use crate::character::combatant::Combatant;
use crate::character::items::WeaponClass;
use crate::core::config::EngineConfig;
use crate::core::types::Side;

/// Effective score of `attribute` for `combatant`
///
/// `weapon` is the weapon class the combatant is using, if any. A player
/// character attacking in battle without a weapon of that class loses
/// `config.unarmed_penalty` fighting prowess. Armour is clamped at zero
/// here since that is the only place it gets used.
pub fn score(
    combatant: &Combatant,
    attribute: AttributeKind,
    in_battle: bool,
    weapon: Option<WeaponClass>,
    config: &EngineConfig,
) -> i32 {
    let base = combatant.attributes.get(attribute).total();
    let items = combatant.item_modifier(attribute, weapon);

    let situational = match attribute {
        AttributeKind::FightingProwess => {
            let mut modifier = combatant.status.fighting_prowess_modifier();
            if in_battle && combatant.side == Side::Player {
                if let Some(class) = weapon {
                    if !combatant.has_weapon(class) {
                        modifier -= config.unarmed_penalty;
                    }
                }
            }
            modifier
        }
        _ => 0,
    };

    let total = base + items + situational;
    match attribute {
        AttributeKind::Armour => total.max(0),
        _ => total,
    }
}

/// Damage dice and flat bonus for an attack with `weapon`
pub fn damage_dice(combatant: &Combatant, weapon: Option<WeaponClass>) -> (u32, i32) {
    let damage = &combatant.attributes.damage;
    let dice = damage.value.max(0) as u32;
    let bonus = damage.modifier
        + combatant.item_modifier(AttributeKind::Damage, weapon)
        + combatant.status.damage_modifier();
    (dice, bonus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::attributes::Attributes;
    use crate::character::items::Item;
    use crate::character::status::{Duration, StatusKind};

    fn player() -> Combatant {
        Combatant::new("Hero", Side::Player, Attributes::new(8, 7, 6, 10))
    }

    #[test]
    fn test_unarmed_penalty_only_for_players_in_battle() {
        let config = EngineConfig::default();
        let hero = player();
        let fpr = AttributeKind::FightingProwess;

        assert_eq!(score(&hero, fpr, true, Some(WeaponClass::Melee), &config), 6);
        assert_eq!(score(&hero, fpr, false, Some(WeaponClass::Melee), &config), 8);

        let armed = player().with_item(Item::sword());
        assert_eq!(score(&armed, fpr, true, Some(WeaponClass::Melee), &config), 8);

        let mut beast = player();
        beast.side = Side::Opponent;
        assert_eq!(score(&beast, fpr, true, Some(WeaponClass::Melee), &config), 8);
    }

    #[test]
    fn test_status_and_item_modifiers() {
        let config = EngineConfig::default();
        let mut hero = player()
            .with_item(Item::sword().with_modifier(AttributeKind::FightingProwess, 1));
        hero.status.apply(StatusKind::TigerEye, Duration::Rounds(2));

        let fpr = score(&hero, AttributeKind::FightingProwess, true, Some(WeaponClass::Melee), &config);
        assert_eq!(fpr, 11);
        assert_eq!(damage_dice(&hero, Some(WeaponClass::Melee)), (1, 2));
    }

    #[test]
    fn test_armour_never_negative() {
        let config = EngineConfig::default();
        let mut hero = player();
        hero.attributes.armour.modifier = -3;
        assert_eq!(score(&hero, AttributeKind::Armour, true, None, &config), 0);
    }
}
