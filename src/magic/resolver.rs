//! Spell resolution
//!
//! Casting is a psychic ability test: `cast_dice` dice plus the spell's
//! current complexity must come in at or under the caster's psychic score.
//! A failure eases the next attempt; a success spends the spell. After a
//! successful cast each resisted spell gives every target its own
//! resistance roll before the effect lands.
//!
//! Battle conditions (such as a ban on fleeing) are checked by the engine
//! before anything reaches this module.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::battle::battlefield::Battlefield;
use crate::character::attributes::AttributeKind;
use crate::character::combatant::Combatant;
use crate::character::status::{Duration, StatusKind};
use crate::combat::dice::Roll;
use crate::combat::resolution::{inflict, test};
use crate::combat::score::score;
use crate::core::config::EngineConfig;
use crate::core::error::{BattleError, Result};
use crate::core::types::CombatantRef;
use crate::magic::spells::{SpellEffect, SpellKind, SpellTargeting};

/// What the caster aimed the spell at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellTarget {
    None,
    Combatant(CombatantRef),
    /// Eye of the Tiger on the caster alone
    Caster,
    /// Eye of the Tiger on the caster's whole side
    Party,
}

/// Effect of a spell on one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellHit {
    pub target: CombatantRef,
    pub resisted: bool,
    pub damage: i32,
    pub status: Option<StatusKind>,
    pub slain: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastOutcome {
    pub caster: CombatantRef,
    pub spell: SpellKind,
    pub roll: Roll,
    /// Psychic score the roll had to meet
    pub target: i32,
    pub succeeded: bool,
    pub hits: Vec<SpellHit>,
    /// Combatants whisked off the field
    pub escaped: Vec<CombatantRef>,
    pub healed: i32,
}

/// The casting test alone; updates the spell's complexity and mind state
///
/// Returns `None` if the caster does not know the spell.
pub fn attempt<R: Rng + ?Sized>(
    rng: &mut R,
    caster: &mut Combatant,
    kind: SpellKind,
    config: &EngineConfig,
) -> Option<(Roll, i32, bool)> {
    let psychic = score(caster, AttributeKind::PsychicAbility, true, None, config);
    let spell = caster.spell_mut(kind)?;
    let (roll, success) = test(rng, config.cast_dice, spell.current_complexity, psychic);

    if success {
        spell.succeed();
    } else {
        spell.fail();
    }

    Some((roll, psychic, success))
}

/// Resistance roll by a spell's target
pub fn resist<R: Rng + ?Sized>(
    rng: &mut R,
    target: &Combatant,
    config: &EngineConfig,
) -> (Roll, bool) {
    let psychic = score(target, AttributeKind::PsychicAbility, true, None, config);
    test(rng, config.resistance_dice, 0, psychic)
}

/// Targets a spell would affect, or an error if the aim is illegal
pub fn spell_targets(
    field: &Battlefield,
    caster: CombatantRef,
    kind: SpellKind,
    target: SpellTarget,
) -> Result<Vec<CombatantRef>> {
    let info = kind.info();

    match (info.targeting, target) {
        (SpellTargeting::Single, SpellTarget::Combatant(t))
        | (SpellTargeting::SingleAdjacent, SpellTarget::Combatant(t)) => {
            if !field.is_in_battle(t) || !field.is_hostile(caster, t) {
                return Err(BattleError::illegal(caster, format!("{} is not a valid target", t)));
            }
            if info.targeting == SpellTargeting::SingleAdjacent {
                let adjacent = match (field.position(caster), field.position(t)) {
                    (Some(a), Some(b)) => a.is_adjacent(&b),
                    _ => false,
                };
                if !adjacent {
                    return Err(BattleError::illegal(caster, format!("{} must be adjacent", info.name)));
                }
            }
            Ok(vec![t])
        }
        (SpellTargeting::AllOpponents, _) => Ok(field.hostiles(caster)),
        (SpellTargeting::CasterChoice, SpellTarget::Caster) => Ok(vec![caster]),
        (SpellTargeting::CasterChoice, SpellTarget::Party) => Ok(field.allies(caster)),
        (SpellTargeting::None, _) => Ok(Vec::new()),
        _ => Err(BattleError::illegal(
            caster,
            format!("{} needs a different target", info.name),
        )),
    }
}

/// Cast a spell in battle and apply its effects
///
/// Illegal casts (unknown spell, not in mind, basic spell, bad target)
/// return an error and leave the battlefield untouched. A failed casting
/// roll is a normal outcome.
pub fn cast<R: Rng + ?Sized>(
    rng: &mut R,
    field: &mut Battlefield,
    caster: CombatantRef,
    kind: SpellKind,
    target: SpellTarget,
    config: &EngineConfig,
) -> Result<CastOutcome> {
    let info = kind.info();
    if info.basic {
        return Err(BattleError::illegal(caster, format!("{} cannot be cast in battle", info.name)));
    }
    match field.get(caster)?.spell(kind) {
        Some(spell) if spell.called_to_mind => {}
        Some(_) => {
            return Err(BattleError::illegal(caster, format!("{} is not called to mind", info.name)))
        }
        None => return Err(BattleError::illegal(caster, format!("does not know {}", info.name))),
    }

    let targets = spell_targets(field, caster, kind, target)?;

    let (roll, psychic, succeeded) = attempt(rng, field.get_mut(caster)?, kind, config)
        .ok_or(BattleError::CombatantNotFound(caster))?;

    debug!(%caster, spell = info.name, roll = roll.sum, psychic, succeeded, "Spell cast");

    let mut outcome = CastOutcome {
        caster,
        spell: kind,
        roll,
        target: psychic,
        succeeded,
        hits: Vec::new(),
        escaped: Vec::new(),
        healed: 0,
    };

    if !succeeded {
        return Ok(outcome);
    }

    if info.effect == SpellEffect::Escape {
        let escapees: Vec<_> = field
            .allies(caster)
            .into_iter()
            .filter(|r| r.side == caster.side)
            .collect();
        for who in escapees {
            field.get_mut(who)?.status.apply(StatusKind::Fleeing, Duration::Unlimited);
            field.remove(who);
            outcome.escaped.push(who);
        }
        return Ok(outcome);
    }

    for t in targets {
        let hit = apply_effect(rng, field, caster, t, kind, target, config, &mut outcome.healed)?;
        outcome.hits.push(hit);
    }

    Ok(outcome)
}

#[allow(clippy::too_many_arguments)]
fn apply_effect<R: Rng + ?Sized>(
    rng: &mut R,
    field: &mut Battlefield,
    caster: CombatantRef,
    target: CombatantRef,
    kind: SpellKind,
    aim: SpellTarget,
    config: &EngineConfig,
    healed: &mut i32,
) -> Result<SpellHit> {
    let info = kind.info();
    let resisted = info.resisted && resist(rng, field.get(target)?, config).1;

    let mut hit = SpellHit {
        target,
        resisted,
        damage: 0,
        status: None,
        slain: false,
    };

    match info.effect {
        SpellEffect::Damage {
            dice,
            bonus,
            ignore_armour,
            resisted_dice,
        } => {
            let (dice, bonus) = match (resisted, resisted_dice) {
                (false, _) => (dice, bonus),
                (true, 0) => return Ok(hit),
                (true, reduced) => (reduced, 0),
            };
            let armour = score(field.get(target)?, AttributeKind::Armour, true, None, config);
            let (_, damage) = inflict(rng, dice, bonus, armour, ignore_armour);
            hit.damage = damage;
            hit.slain = !field.wound(target, damage)?;
        }
        SpellEffect::Drain { dice } => {
            if resisted {
                return Ok(hit);
            }
            let (_, damage) = inflict(rng, dice, 0, 0, true);
            hit.damage = damage;
            hit.slain = !field.wound(target, damage)?;
            let vampire = field.get_mut(caster)?;
            let before = vampire.endurance;
            vampire.gain_endurance(damage / 2, true);
            *healed += vampire.endurance - before;
        }
        SpellEffect::Status(status) => {
            if resisted {
                return Ok(hit);
            }
            let duration = match status {
                StatusKind::Nighthowl => Duration::Rounds(config.nighthowl_rounds),
                StatusKind::Enthralled => Duration::Unlimited,
                _ => Duration::Rounds(1),
            };
            field.get_mut(target)?.status.apply(status, duration);
            hit.status = Some(status);
        }
        SpellEffect::Petrify => {
            if resisted {
                return Ok(hit);
            }
            let victim = field.get_mut(target)?;
            let remaining = victim.endurance;
            victim.gain_endurance(-remaining, true);
            if let Some(point) = field.remove(target) {
                field.map.put_obstacle(point, config.pillar_of_salt_rounds);
            }
            hit.damage = remaining;
            hit.slain = true;
        }
        SpellEffect::Boost => {
            let status = match aim {
                SpellTarget::Caster => StatusKind::TigerEye,
                _ => StatusKind::PartyTigerEye,
            };
            field
                .get_mut(target)?
                .status
                .apply(status, Duration::Rounds(config.eye_of_the_tiger_rounds));
            hit.status = Some(status);
        }
        SpellEffect::Escape | SpellEffect::NonCombat => {}
    }

    Ok(hit)
}
