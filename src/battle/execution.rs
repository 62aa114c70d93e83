//! Battle round state machine
//!
//! Each round: build turn order -> turn start (skip or cool down) -> await
//! action -> turn end -> ... -> round end (map cool down) -> next round.
//! `step` advances one transition; `run` drives the loop to the end.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::battle::actions::{legal_actions, Action, LegalActions, TurnRules};
use crate::battle::ai::{ActionChooser, AiChooser};
use crate::battle::battlefield::Battlefield;
use crate::battle::conditions::{Battle, BattleCondition, BattleResult};
use crate::battle::constants::MAX_REJECTED_CHOICES;
use crate::battle::events::{BattleEventLog, BattleEventType, EventSink};
use crate::battle::pathfinding::{count, find_path};
use crate::character::attributes::AttributeKind;
use crate::character::combatant::Combatant;
use crate::character::party::Party;
use crate::character::status::{Duration, StatusKind};
use crate::combat::resolution::{resolve_attack, AttackKind};
use crate::combat::score::score;
use crate::core::config::EngineConfig;
use crate::core::error::{BattleError, Result};
use crate::core::types::{CombatantRef, Point, Side};
use crate::magic::resolver::{self, SpellTarget};
use crate::magic::spells::SpellKind;

/// Battle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    RoundStart,  // Check limits, build turn order
    TurnStart,   // Next combatant: skip, cool down
    AwaitAction, // Waiting for the chooser
    TurnEnd,     // Check for a result, advance cursor
    RoundEnd,    // Age temporary obstacles
    BattleEnd,   // Result is final
}

/// What a single `step` produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue,
    AwaitingAction {
        actor: CombatantRef,
        legal: LegalActions,
    },
    Ended(BattleResult),
}

/// Final summary handed back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    pub result: BattleResult,
    pub rounds: u32,
    /// Living opponents carried over into a following battle
    pub survivors: Vec<Combatant>,
}

/// Complete battle state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleEngine {
    // Core state
    field: Battlefield,
    conditions: Vec<BattleCondition>,
    round_limit: Option<u32>,
    endurance_limit: Option<i32>,
    survivor_limit: Option<usize>,
    config: EngineConfig,
    rng: ChaCha8Rng,

    // Progress
    phase: BattlePhase,
    round: u32,
    last_round: u32,
    turn_order: Vec<CombatantRef>,
    cursor: usize,
    result: Option<BattleResult>,

    // Log
    log: BattleEventLog,
}

impl BattleEngine {
    /// Set up a battle and deploy both sides on their start tiles
    pub fn new(players: Party, battle: Battle, config: EngineConfig, rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;

        let round = if battle.has(BattleCondition::AmbushPlayer) || battle.has(BattleCondition::AmbushNpc) {
            0
        } else {
            1
        };

        let survivor_limit = battle.survivor_limit();
        let mut engine = Self {
            field: Battlefield::new(battle.map, players, battle.opponents),
            conditions: battle.conditions,
            round_limit: battle.round_limit,
            endurance_limit: battle.endurance_limit,
            survivor_limit,
            config,
            rng,
            phase: BattlePhase::RoundStart,
            round,
            last_round: round,
            turn_order: Vec::new(),
            cursor: 0,
            result: None,
            log: BattleEventLog::new(),
        };

        engine.deploy(Side::Player, &battle.player_start)?;
        engine.deploy(Side::Opponent, &battle.opponent_start)?;

        info!(
            players = engine.field.players.len(),
            opponents = engine.field.opponents.len(),
            conditions = ?engine.conditions,
            "Battle started"
        );
        engine.emit(BattleEventType::BattleStarted, "Battle started".to_string());

        Ok(engine)
    }

    /// Default config with a ChaCha generator seeded from `seed`
    pub fn seeded(players: Party, battle: Battle, seed: u64) -> Result<Self> {
        Self::new(players, battle, EngineConfig::default(), ChaCha8Rng::seed_from_u64(seed))
    }

    fn deploy(&mut self, side: Side, starts: &[Point]) -> Result<()> {
        let members = self.field.party(side).len();
        for (index, point) in starts.iter().enumerate().take(members) {
            let who = CombatantRef::new(side, index);
            if !self.field.get(who)?.is_alive() {
                continue;
            }
            let tile_free = self.field.map.tile(*point).is_some_and(|t| t.occupant.is_empty());
            if !tile_free {
                return Err(BattleError::InvalidConfig(format!(
                    "start tile {} for {} is off the map or taken",
                    point, who
                )));
            }
            self.field.deploy(who, *point)?;
        }
        Ok(())
    }

    // === ACCESSORS ===

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn result(&self) -> Option<BattleResult> {
        self.result
    }

    pub fn is_over(&self) -> bool {
        self.phase == BattlePhase::BattleEnd
    }

    pub fn field(&self) -> &Battlefield {
        &self.field
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn events(&self) -> &BattleEventLog {
        &self.log
    }

    pub fn turn_order(&self) -> &[CombatantRef] {
        &self.turn_order
    }

    pub fn has(&self, condition: BattleCondition) -> bool {
        self.conditions.contains(&condition)
    }

    /// Whose action is pending, if any
    pub fn current_actor(&self) -> Option<CombatantRef> {
        match self.phase {
            BattlePhase::AwaitAction => self.turn_order.get(self.cursor).copied(),
            _ => None,
        }
    }

    /// Hand the battlefield back, typically to commit the player party
    pub fn into_field(self) -> Battlefield {
        self.field
    }

    /// Entanglement holds the party through round 1 only; an ambush round 0 is free
    pub fn turn_rules(&self) -> TurnRules {
        TurnRules {
            flee_banned: self.has(BattleCondition::CannotFlee),
            entangled: self.has(BattleCondition::Entangled) && self.round == 1,
        }
    }

    pub fn legal_actions(&self, actor: CombatantRef) -> Result<LegalActions> {
        legal_actions(&self.field, actor, self.turn_rules())
    }

    // === STATE MACHINE ===

    /// Advance one transition
    pub fn step(&mut self) -> Result<Step> {
        let outcome = match self.phase {
            BattlePhase::RoundStart => {
                self.start_round();
                Ok(Step::Continue)
            }
            BattlePhase::TurnStart => self.start_turn().map(|_| Step::Continue),
            BattlePhase::AwaitAction => match self.turn_order.get(self.cursor).copied() {
                Some(actor) => self
                    .legal_actions(actor)
                    .map(|legal| Step::AwaitingAction { actor, legal }),
                None => Err(BattleError::NotAwaitingAction),
            },
            BattlePhase::TurnEnd => {
                self.end_turn();
                Ok(Step::Continue)
            }
            BattlePhase::RoundEnd => {
                self.end_round();
                Ok(Step::Continue)
            }
            BattlePhase::BattleEnd => Ok(Step::Ended(self.result.unwrap_or_default())),
        };

        outcome.map_err(|e| self.fail(e))
    }

    fn start_round(&mut self) {
        let limit = self.round_limit.unwrap_or(self.config.max_rounds);
        if self.round > limit {
            self.finish(BattleResult::Determine);
            return;
        }
        if let Some(result) = self.check_result() {
            self.finish(result);
            return;
        }

        let ambushers = match self.round {
            0 if self.has(BattleCondition::AmbushPlayer) => Some(Side::Player),
            0 if self.has(BattleCondition::AmbushNpc) => Some(Side::Opponent),
            _ => None,
        };

        self.turn_order = self.build_turn_order(ambushers);
        self.cursor = 0;
        self.last_round = self.round;

        debug!(round = self.round, order = ?self.turn_order, "Round started");
        self.emit(
            BattleEventType::RoundAdvanced { round: self.round },
            format!("Round {}", self.round),
        );
        self.phase = BattlePhase::TurnStart;
    }

    /// In-battle combatants by descending awareness, ties by side then index
    fn build_turn_order(&self, only: Option<Side>) -> Vec<CombatantRef> {
        let mut ranked: Vec<(i32, CombatantRef)> = self
            .field
            .in_battle()
            .into_iter()
            .filter(|r| only.map_or(true, |side| r.side == side))
            .filter_map(|r| {
                let c = self.field.get(r).ok()?;
                Some((score(c, AttributeKind::Awareness, true, None, &self.config), r))
            })
            .collect();

        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        ranked.into_iter().map(|(_, r)| r).collect()
    }

    fn start_turn(&mut self) -> Result<()> {
        let Some(actor) = self.turn_order.get(self.cursor).copied() else {
            self.phase = BattlePhase::RoundEnd;
            return Ok(());
        };

        // Fell or fled earlier this round
        if !self.field.is_in_battle(actor) {
            self.cursor += 1;
            return Ok(());
        }

        let combatant = self.field.get_mut(actor)?;
        let incapacitated = !combatant.can_act();
        let expired = combatant.status.cool_down();
        let name = combatant.name.clone();

        self.emit(BattleEventType::TurnStarted { actor }, format!("{}'s turn", name));
        for status in expired {
            self.emit(
                BattleEventType::StatusExpired { target: actor, status },
                format!("{} is no longer {:?}", name, status),
            );
        }

        if incapacitated {
            debug!(%actor, "Turn skipped");
            self.emit(BattleEventType::TurnSkipped { actor }, format!("{} cannot act", name));
            self.phase = BattlePhase::TurnEnd;
        } else {
            self.phase = BattlePhase::AwaitAction;
        }
        Ok(())
    }

    fn end_turn(&mut self) {
        self.cursor += 1;
        match self.check_result() {
            Some(result) => self.finish(result),
            None => self.phase = BattlePhase::TurnStart,
        }
    }

    fn end_round(&mut self) {
        self.field.map.cool_down();
        self.round += 1;
        self.phase = BattlePhase::RoundStart;
    }

    /// Decide whether the battle is over
    ///
    /// Order: flee, defeat, victory, enthralment, endurance limit.
    fn check_result(&self) -> Option<BattleResult> {
        let in_battle = self.field.in_battle();

        if !in_battle.iter().any(|r| r.side == Side::Player) {
            let fled = self
                .field
                .players
                .members
                .iter()
                .any(|m| m.is_alive() && m.is_fleeing());
            return Some(if fled {
                BattleResult::Flee
            } else {
                BattleResult::Defeat
            });
        }

        let opponents: Vec<&Combatant> = in_battle
            .iter()
            .filter(|r| r.side == Side::Opponent)
            .filter_map(|r| self.field.get(*r).ok())
            .collect();

        if opponents.is_empty() {
            return Some(BattleResult::Victory);
        }
        if opponents.iter().all(|c| c.is_enthralled()) {
            return Some(BattleResult::Enthralled);
        }
        if let Some(limit) = self.endurance_limit {
            let beaten = opponents
                .iter()
                .filter(|c| !c.is_enthralled())
                .all(|c| c.endurance <= limit);
            if beaten {
                return Some(BattleResult::Victory);
            }
        }

        None
    }

    fn finish(&mut self, result: BattleResult) {
        if self.phase == BattlePhase::BattleEnd {
            return;
        }
        self.result = Some(result);
        self.phase = BattlePhase::BattleEnd;
        self.field.players.reset_after_battle();
        self.field.opponents.reset_after_battle();

        info!(?result, rounds = self.last_round, "Battle ended");
        self.emit(
            BattleEventType::BattleEnded { result },
            format!("Battle ended: {:?}", result),
        );
    }

    /// Data errors end the battle with no result
    fn fail(&mut self, err: BattleError) -> BattleError {
        if !err.is_recoverable() {
            error!(%err, "Battle aborted");
            self.finish(BattleResult::None);
        }
        err
    }

    // === ACTIONS ===

    /// Resolve the pending action
    ///
    /// Illegal or unreachable choices return an error and change nothing;
    /// the caller asks again.
    pub fn submit(&mut self, action: Action) -> Result<()> {
        if self.phase == BattlePhase::BattleEnd {
            return Err(BattleError::BattleOver);
        }
        let actor = self.current_actor().ok_or(BattleError::NotAwaitingAction)?;

        let legal = self.legal_actions(actor).map_err(|e| self.fail(e))?;
        if let Err(err) = legal.check(actor, &action) {
            warn!(%actor, ?action, %err, "Rejected action");
            return Err(err);
        }

        match self.perform(actor, action) {
            Ok(()) => {}
            Err(err) if err.is_recoverable() => {
                warn!(%actor, ?action, %err, "Rejected action");
                return Err(err);
            }
            Err(err) => return Err(self.fail(err)),
        }

        if self.phase == BattlePhase::AwaitAction {
            self.phase = BattlePhase::TurnEnd;
        }
        Ok(())
    }

    fn perform(&mut self, actor: CombatantRef, action: Action) -> Result<()> {
        debug!(%actor, ?action, round = self.round, "Resolving action");

        match action {
            Action::Move { to } => self.move_to(actor, to),
            Action::Fight { target } => self.attack(actor, target, AttackKind::Fight),
            Action::Knockout { target } => self.attack(actor, target, AttackKind::Knockout),
            Action::Shoot { target } => {
                self.field.get_mut(actor)?.use_arrow();
                self.attack(actor, target, AttackKind::Shoot)
            }
            Action::Cast { spell, target } => self.cast(actor, spell, target),
            Action::CallToMind { spell } => {
                self.field.get_mut(actor)?.call_to_mind(spell);
                let name = self.name(actor);
                self.emit(
                    BattleEventType::SpellCalledToMind { caster: actor, spell },
                    format!("{} calls {} to mind", name, spell.name()),
                );
                Ok(())
            }
            Action::Defend => {
                self.apply_status(actor, StatusKind::Defending, Duration::Rounds(1))
            }
            Action::Flee => {
                // The party leaves together once one member reaches an exit
                let party: Vec<CombatantRef> = self
                    .field
                    .in_battle()
                    .into_iter()
                    .filter(|r| r.side == Side::Player)
                    .collect();
                for who in party {
                    self.field
                        .get_mut(who)?
                        .status
                        .apply(StatusKind::Fleeing, Duration::Unlimited);
                    self.field.remove(who);
                    let name = self.name(who);
                    self.emit(BattleEventType::CombatantFled { who }, format!("{} flees", name));
                }
                Ok(())
            }
            Action::Pass => Ok(()),
            Action::Exit => {
                info!(%actor, "Battle exited");
                self.finish(BattleResult::None);
                Ok(())
            }
        }
    }

    fn move_to(&mut self, actor: CombatantRef, to: Point) -> Result<()> {
        let from = self
            .field
            .position(actor)
            .ok_or(BattleError::CombatantNotFound(actor))?;
        let allowance = self.field.get(actor)?.moves as usize;

        let path = find_path(&self.field.map, from, to, actor.side, false);
        if path.is_empty() {
            return Err(BattleError::Unreachable(to));
        }
        let steps = count(&self.field.map, &path, actor.side)
            .saturating_sub(1)
            .min(allowance);
        if steps == 0 {
            return Err(BattleError::Unreachable(to));
        }

        let destination = path.points[steps];
        self.field.map.relocate(from, destination);

        let name = self.name(actor);
        self.emit(
            BattleEventType::CombatantMoved {
                actor,
                from,
                to: destination,
            },
            format!("{} moves to {}", name, destination),
        );
        Ok(())
    }

    fn attack(&mut self, attacker: CombatantRef, defender: CombatantRef, kind: AttackKind) -> Result<()> {
        let outcome = resolve_attack(
            &mut self.rng,
            self.field.get(attacker)?,
            self.field.get(defender)?,
            kind,
            &self.config,
        );

        debug!(
            %attacker,
            %defender,
            roll = outcome.roll.sum,
            target = outcome.target,
            hit = outcome.hit,
            damage = outcome.damage,
            "Attack resolved"
        );
        let description = format!(
            "{} {} {} ({} vs {}), {} damage",
            self.name(attacker),
            if outcome.hit { "hits" } else { "misses" },
            self.name(defender),
            outcome.roll.sum,
            outcome.target,
            outcome.damage
        );
        self.emit(
            BattleEventType::AttackResolved {
                attacker,
                defender,
                kind,
                roll: outcome.roll.sum,
                target: outcome.target,
                hit: outcome.hit,
                damage: outcome.damage,
            },
            description,
        );

        if outcome.hit && outcome.damage > 0 {
            if !self.field.wound(defender, outcome.damage)? {
                self.defeated(defender);
            } else if outcome.knocked_out {
                let rounds = self.config.knockout_rounds;
                self.apply_status(defender, StatusKind::KnockedOut, Duration::Rounds(rounds))?;
            }
        }
        Ok(())
    }

    fn cast(&mut self, caster: CombatantRef, spell: SpellKind, target: SpellTarget) -> Result<()> {
        let outcome = resolver::cast(&mut self.rng, &mut self.field, caster, spell, target, &self.config)?;
        let name = self.name(caster);

        if outcome.hits.is_empty() {
            self.emit(
                BattleEventType::SpellResolved {
                    caster,
                    spell,
                    target: None,
                    succeeded: outcome.succeeded,
                    resisted: false,
                },
                format!(
                    "{} {} {}",
                    name,
                    if outcome.succeeded { "casts" } else { "fails to cast" },
                    spell.name()
                ),
            );
        }

        for hit in &outcome.hits {
            self.emit(
                BattleEventType::SpellResolved {
                    caster,
                    spell,
                    target: Some(hit.target),
                    succeeded: outcome.succeeded,
                    resisted: hit.resisted,
                },
                format!(
                    "{} casts {} at {}{}",
                    name,
                    spell.name(),
                    self.name(hit.target),
                    if hit.resisted { ", resisted" } else { "" }
                ),
            );
            if let Some(status) = hit.status {
                self.emit(
                    BattleEventType::StatusApplied {
                        target: hit.target,
                        status,
                    },
                    format!("{} is {:?}", self.name(hit.target), status),
                );
            }
            if hit.slain {
                self.defeated(hit.target);
            }
        }

        for who in &outcome.escaped {
            self.emit(
                BattleEventType::CombatantFled { who: *who },
                format!("{} escapes", self.name(*who)),
            );
        }
        Ok(())
    }

    fn apply_status(&mut self, target: CombatantRef, status: StatusKind, duration: Duration) -> Result<()> {
        self.field.get_mut(target)?.status.apply(status, duration);
        let name = self.name(target);
        self.emit(
            BattleEventType::StatusApplied { target, status },
            format!("{} is {:?}", name, status),
        );
        Ok(())
    }

    fn defeated(&mut self, who: CombatantRef) {
        debug!(%who, "Combatant defeated");
        let name = self.name(who);
        self.emit(BattleEventType::CombatantDefeated { who }, format!("{} is slain", name));
    }

    fn name(&self, who: CombatantRef) -> String {
        self.field
            .get(who)
            .map(|c| c.name.clone())
            .unwrap_or_else(|_| who.to_string())
    }

    fn emit(&mut self, event_type: BattleEventType, description: String) {
        self.log.push(event_type, description, self.round);
    }

    // === DRIVING ===

    /// Explicit user exit: the battle ends with no result
    pub fn abort(&mut self) -> BattleReport {
        if !self.is_over() {
            info!(round = self.round, "Battle aborted by user");
            self.finish(BattleResult::None);
        }
        self.report()
    }

    /// Summary of the battle so far; the result is `None` until it ends
    pub fn report(&self) -> BattleReport {
        let survivors = self
            .survivor_limit
            .map(|limit| {
                self.field
                    .opponents
                    .living()
                    .map(|(_, c)| c.clone())
                    .take(limit)
                    .collect()
            })
            .unwrap_or_default();

        BattleReport {
            result: self.result.unwrap_or_default(),
            rounds: self.last_round,
            survivors,
        }
    }

    /// Run to completion
    ///
    /// `chooser` acts for the player party; opponents, enthralled or not,
    /// are driven by the built-in AI. Every event is forwarded to `sink`.
    pub fn run(&mut self, chooser: &mut dyn ActionChooser, sink: &mut dyn EventSink) -> Result<BattleReport> {
        let mut ai = AiChooser::new();
        let mut forwarded = 0;

        loop {
            let step = self.step();
            self.forward(&mut forwarded, sink);

            match step? {
                Step::Continue => {}
                Step::Ended(_) => break,
                Step::AwaitingAction { actor, legal } => {
                    let mut rejected = 0;
                    loop {
                        let action = match actor.side {
                            Side::Player => chooser.choose(&self.field, &self.config, actor, &legal),
                            Side::Opponent => ai.choose(&self.field, &self.config, actor, &legal),
                        };

                        match self.submit(action) {
                            Ok(()) => break,
                            Err(err) if err.is_recoverable() && rejected < MAX_REJECTED_CHOICES => {
                                if actor.side == Side::Player {
                                    chooser.rejected(actor, &action, &err.to_string());
                                }
                                rejected += 1;
                            }
                            Err(err) if err.is_recoverable() => {
                                warn!(%actor, "Too many rejected choices, passing turn");
                                self.submit(Action::Pass)?;
                                break;
                            }
                            Err(err) => {
                                self.forward(&mut forwarded, sink);
                                return Err(err);
                            }
                        }
                    }
                    self.forward(&mut forwarded, sink);
                }
            }
        }

        Ok(self.report())
    }

    fn forward(&self, forwarded: &mut usize, sink: &mut dyn EventSink) {
        for event in self.log.events.iter().skip(*forwarded) {
            sink.on_event(event);
        }
        *forwarded = self.log.len();
    }
}
