//! The duel engine: tick scheduler, command surface and observation surface.
//!
//! # Tick
//!
//! Every call to [`Engine::tick`] while running and not paused:
//!
//! 1. advances `current_tick` by exactly one quantum;
//! 2. updates `pc`, then `npc`: elapsed time, phase change, telegraph reveal,
//!    impact resolution (edge-triggered on entering the impact phase);
//! 3. publishes one state snapshot.
//!
//! While paused, stopped, not yet running, or after a death, a tick is inert.
//!
//! # Lifecycle
//!
//! `Created → Armed (start) → Running (first successful execution) → Stopped
//! (stop)`. Simulated time only moves once somebody acts.
//!
//! # Determinism
//!
//! There is no randomness and no wall-clock input. The same catalog, config
//! and command sequence always produce the same events, log and history.
//!
//! # Example
//!
//! ```
//! use riposte_core::action::DefensePrediction;
//! use riposte_core::actor::ActorId;
//! use riposte_core::config::EngineConfig;
//! use riposte_core::engine::Engine;
//! use riposte_core::skill::SkillCatalog;
//!
//! let catalog = SkillCatalog::bundled(100).unwrap();
//! let mut engine = Engine::new(EngineConfig::default(), catalog).unwrap();
//! engine.start();
//!
//! engine
//!     .execute_skill(ActorId::Pc, &"thrust".into(), DefensePrediction::default())
//!     .unwrap();
//! for _ in 0..10 {
//!     engine.tick();
//! }
//!
//! assert_eq!(engine.current_tick(), 1000);
//! assert_eq!(engine.history().len(), 1);
//! assert_eq!(engine.actor(ActorId::Npc).resources().hp.current, 6.0);
//! ```

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionFlags, DefensePrediction, Phase};
use crate::actor::{ActorId, ActorState};
use crate::config::EngineConfig;
use crate::error::{CommandError, EngineError};
use crate::event::{CombatEvent, DeathCause, EventBus, SubscriptionId};
use crate::history::{ActionHistory, HistoryEntry};
use crate::log::CombatLog;
use crate::pause::{PauseReason, PauseState, PredictionWindow};
use crate::resolver::{DefenseOutcome, ExhaustionDrain, ImpactReport, ImpactResolver};
use crate::rules::{
    FEINT_FATIGUE_SURCHARGE, FEINT_FOCUS_SURCHARGE, FEINT_STAMINA_MULTIPLIER,
    FEINT_WINDUP_PENALTY_MS,
};
use crate::skill::{ResourceCost, Skill, SkillCatalog, SkillId};
use crate::snapshot::{ActorSnapshot, EngineSnapshot};

/// An engine shared between a driver thread and command callers.
pub type SharedEngine = Arc<Mutex<Engine>>;

// =============================================================================
// Lifecycle and Outcomes
// =============================================================================

/// Engine lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Built, not yet started.
    Created,
    /// Started; waiting for the first execution to start the timer.
    Armed,
    /// Timer running.
    Running,
    /// Stopped; history discarded.
    Stopped,
}

/// What a call to [`Engine::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Time advanced by one quantum.
    Advanced,
    /// The timer is not running (not started, waiting for a first action, or
    /// stopped).
    Idle,
    /// Frozen by the pause controller.
    Paused,
    /// A fighter has died.
    Ended,
}

/// Result of an accepted execute or feint command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// The action was created.
    Started,
    /// The cost killed the fighter; no action was created.
    Exhausted,
}

// =============================================================================
// Engine
// =============================================================================

/// Owned duel engine instance.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    catalog: Arc<SkillCatalog>,
    actors: [ActorState; 2],
    pause: PauseState,
    current_tick: u64,
    lifecycle: Lifecycle,
    ended: bool,
    history: ActionHistory,
    log: CombatLog,
    events: EventBus,
    resolver: ImpactResolver,
}

impl Engine {
    /// Builds an engine from a config and a validated catalog.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] for an invalid config and
    /// [`EngineError::QuantumMismatch`] if the catalog was validated for a
    /// different tick quantum.
    pub fn new(
        config: EngineConfig,
        catalog: impl Into<Arc<SkillCatalog>>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let catalog = catalog.into();
        if catalog.quantum_ms() != config.tick_interval_ms {
            return Err(EngineError::QuantumMismatch {
                catalog: catalog.quantum_ms(),
                engine: config.tick_interval_ms,
            });
        }

        let actors = [
            ActorState::new(ActorId::Pc, &config.pc),
            ActorState::new(ActorId::Npc, &config.npc),
        ];
        let mut log = CombatLog::new(config.log_capacity);
        log.push(0, format!("Combat engine initialized with {} skills", catalog.len()));

        Ok(Self {
            config,
            catalog,
            actors,
            pause: PauseState::new(),
            current_tick: 0,
            lifecycle: Lifecycle::Created,
            ended: false,
            history: ActionHistory::new(),
            log,
            events: EventBus::new(),
            resolver: ImpactResolver::new(),
        })
    }

    /// Wraps the engine for use with a [`crate::driver::RealtimeDriver`].
    #[must_use]
    pub fn into_shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Arms the engine. The timer starts on the first successful execution.
    pub fn start(&mut self) {
        if matches!(self.lifecycle, Lifecycle::Armed | Lifecycle::Running) {
            return;
        }
        self.lifecycle = Lifecycle::Armed;
        self.record("Combat started");
        tracing::info!(tick = self.current_tick, "combat armed");
    }

    /// Halts the timer and discards the action history.
    pub fn stop(&mut self) {
        self.lifecycle = Lifecycle::Stopped;
        self.history.clear();
        self.record("Combat stopped");
        tracing::info!(tick = self.current_tick, "combat stopped");
    }

    // -------------------------------------------------------------------------
    // Tick Scheduler
    // -------------------------------------------------------------------------

    /// Advances simulated time by one quantum.
    pub fn tick(&mut self) -> TickOutcome {
        if self.ended {
            return TickOutcome::Ended;
        }
        if self.lifecycle != Lifecycle::Running {
            return TickOutcome::Idle;
        }
        if self.pause.is_paused() {
            return TickOutcome::Paused;
        }

        self.current_tick += self.config.tick_interval_ms;
        tracing::trace!(tick = self.current_tick, "tick");

        for id in ActorId::ALL {
            if self.ended {
                break;
            }
            self.update_actor(id);
        }

        self.emit_state();
        TickOutcome::Advanced
    }

    fn update_actor(&mut self, id: ActorId) {
        let quantum = self.config.tick_interval_ms;
        let actor = &mut self.actors[id.index()];
        let Some(action) = actor.action.as_mut() else {
            return;
        };
        let step = action.advance(quantum);
        let skill = Arc::clone(action.skill());

        let Some(to) = step.to else {
            if let Some(done) = actor.action.take() {
                let entry = HistoryEntry::completed(id, &done, self.current_tick);
                self.history.push(entry);
            }
            let line = format!("{} completed {}", self.actors[id.index()].name(), skill.name);
            self.record(line);
            tracing::debug!(tick = self.current_tick, actor = %id, skill = %skill.id, "action completed");
            return;
        };

        if step.changed() {
            let line = format!(
                "{} {}: {} -> {}",
                self.actors[id.index()].name(),
                skill.name,
                step.from,
                to
            );
            self.record(line);
            tracing::debug!(
                tick = self.current_tick,
                actor = %id,
                skill = %skill.id,
                from = %step.from,
                to = %to,
                "phase changed"
            );
            self.emit(CombatEvent::PhaseChanged {
                tick: self.current_tick,
                actor: id,
                skill: skill.id.clone(),
                from: step.from,
                to,
            });
        }

        self.reveal_telegraphs(id);

        if step.entered_impact() {
            self.resolve_impact(id);
        }
    }

    // -------------------------------------------------------------------------
    // Telegraphs and Pauses
    // -------------------------------------------------------------------------

    fn reveal_telegraphs(&mut self, id: ActorId) {
        let Some(action) = self.actors[id.index()].action.as_mut() else {
            return;
        };
        let revealed = action.reveal_due();
        if revealed.is_empty() {
            return;
        }
        let skill = action.skill().id.clone();
        let estimated_impact_tick = action.estimated_impact_tick();

        for telegraph in revealed {
            tracing::debug!(
                tick = self.current_tick,
                actor = %id,
                skill = %skill,
                stage = telegraph.stage,
                "telegraph revealed"
            );
            self.emit(CombatEvent::TelegraphRevealed {
                tick: self.current_tick,
                actor: id,
                skill: skill.clone(),
                telegraph: telegraph.clone(),
            });

            if !telegraph.pause {
                self.record(format!("Telegraph revealed: {}", telegraph.description));
                continue;
            }

            let window = PredictionWindow {
                revealed_by: id,
                stage: telegraph.stage,
                body_part: telegraph.body_part.clone(),
                estimated_impact_tick,
                possible_attacks: self.attacks_matching(telegraph.stage, &telegraph.body_part),
            };
            let responder = &self.actors[id.opponent().index()];
            let available = self
                .catalog
                .ids()
                .filter(|skill| responder.is_permitted(skill))
                .cloned()
                .collect();
            self.pause.pause_for_telegraph(window, available);
            self.record(format!("Auto-pause: {}", telegraph.description));
            tracing::info!(tick = self.current_tick, actor = %id, skill = %skill, "auto-pause on telegraph");
            self.emit_pause();
        }
    }

    /// Catalog attacks showing `body_part` at `stage`.
    fn attacks_matching(&self, stage: u32, body_part: &str) -> Vec<SkillId> {
        self.catalog
            .skills()
            .filter(|skill| skill.is_attack())
            .filter(|skill| {
                skill
                    .telegraphs
                    .iter()
                    .any(|t| t.stage == stage && t.body_part == body_part)
            })
            .map(|skill| skill.id.clone())
            .collect()
    }

    /// Flips the pause flag unconditionally.
    pub fn toggle_pause(&mut self) {
        if self.pause.toggle() {
            self.record("Combat paused");
            tracing::info!(tick = self.current_tick, "paused");
        } else {
            self.record("Combat resumed");
            tracing::info!(tick = self.current_tick, "resumed");
        }
        self.emit_pause();
        self.emit_state();
    }

    /// Pauses with an explicit reason, replacing any current pause.
    pub fn pause_for(&mut self, reason: PauseReason) {
        self.pause.pause(reason);
        self.record(format!("Combat paused ({reason:?})"));
        tracing::info!(tick = self.current_tick, ?reason, "paused");
        self.emit_pause();
        self.emit_state();
    }

    // -------------------------------------------------------------------------
    // Impact and Death
    // -------------------------------------------------------------------------

    fn resolve_impact(&mut self, attacker: ActorId) {
        let tick = self.current_tick;
        let [pc, npc] = &mut self.actors;
        let (att, def) = match attacker {
            ActorId::Pc => (&*pc, npc),
            ActorId::Npc => (&*npc, pc),
        };
        let Some(report) = self.resolver.resolve(att, def, tick) else {
            return;
        };
        let attacker_name = att.name().to_string();
        let defender_name = def.name().to_string();

        self.log_impact(&report, &attacker_name, &defender_name);
        self.emit(CombatEvent::ImpactResolved {
            tick,
            hit: report.hit(),
            report: report.clone(),
        });

        if self.actors[report.defender.index()].resources().is_depleted() {
            self.kill(report.defender, DeathCause::Impact);
        }
    }

    fn log_impact(&mut self, report: &ImpactReport, attacker: &str, defender: &str) {
        self.record(format!("{attacker} {} Impact!", report.skill));
        match &report.defense {
            DefenseOutcome::Undefended => {}
            DefenseOutcome::Inactive { defense, phase } => {
                let phase = phase.map_or_else(|| "finished".to_string(), |p| p.to_string());
                self.record(format!("{defender} {defense} not active: currently in {phase}"));
            }
            DefenseOutcome::Mismatched { defense, miss } => {
                self.record(format!("{defender} {defense} mismatch: {miss}"));
                tracing::info!(tick = self.current_tick, actor = %report.defender, %miss, "defense prediction missed");
            }
            DefenseOutcome::Blocked { defense } => {
                self.record(format!("{defender} blocked the attack with {defense}!"));
            }
        }
        if report.parry_surcharge > 0.0 {
            self.record(format!("{defender} parry cost: {:.1} stamina", report.parry_surcharge));
        }
        if let Some(bonus) = report.counter_bonus_ms {
            self.record(format!("{defender} gains a {bonus}ms counter bonus"));
        }
        if !report.defense.is_blocked() {
            self.record(format!("{attacker} CLEAN HIT on {defender}!"));
        }
        self.record(format!(
            "{defender} takes {:.1} damage ({:.1} HP left)",
            report.damage, report.defender_hp
        ));
        tracing::info!(
            tick = self.current_tick,
            actor = %report.attacker,
            skill = %report.skill,
            damage = report.damage,
            blocked = report.defense.is_blocked(),
            "impact resolved"
        );
    }

    /// Death routine: discard the action, publish, force a terminal pause.
    fn kill(&mut self, id: ActorId, cause: DeathCause) {
        let actor = &mut self.actors[id.index()];
        actor.defeat();
        let line = format!("{} died: {cause}", actor.name());
        self.record(line);
        tracing::info!(tick = self.current_tick, actor = %id, %cause, "fighter died");
        self.emit(CombatEvent::FighterDied {
            tick: self.current_tick,
            actor: id,
            cause,
        });
        self.pause.pause(PauseReason::Manual);
        self.emit_pause();
        self.ended = true;
        self.record("Combat ended");
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Starts `skill` for `actor`.
    ///
    /// Costs are paid first. If the exhaustion drain kills the fighter, no
    /// action is created and [`ExecuteOutcome::Exhausted`] is returned. A
    /// pending counter bonus is consumed by an attack and forfeited by
    /// anything else.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] and leaves state untouched if the engine is
    /// not started, the encounter is over, the actor is defeated or busy, or
    /// the skill is unknown or not permitted.
    pub fn execute_skill(
        &mut self,
        actor: ActorId,
        skill_id: &SkillId,
        prediction: DefensePrediction,
    ) -> Result<ExecuteOutcome, CommandError> {
        let skill = self.validate_execute(actor, skill_id).map_err(|e| self.reject(e))?;

        let index = actor.index();
        self.actors[index].resources_mut().pay(&skill.costs);
        let line = format!(
            "{} spent: {} stam, {} MP, {} focus, {} fatigue",
            self.actors[index].name(),
            skill.costs.stamina,
            skill.costs.mp,
            skill.costs.focus,
            skill.costs.daily_fatigue
        );
        self.record(line);
        if self.drain_exhaustion(actor) {
            return Ok(ExecuteOutcome::Exhausted);
        }

        let pending = self.actors[index].counter_bonus.take();
        let modifier = match pending {
            Some(bonus) if skill.is_attack() => {
                self.record(format!("{} uses a {bonus}ms counter bonus", self.actors[index].name()));
                -i64::try_from(bonus).unwrap_or(i64::MAX)
            }
            Some(bonus) => {
                self.record(format!("{} forfeits a {bonus}ms counter bonus", self.actors[index].name()));
                0
            }
            None => 0,
        };

        self.begin_action(actor, skill, modifier, prediction);
        Ok(ExecuteOutcome::Started)
    }

    fn validate_execute(
        &self,
        actor: ActorId,
        skill_id: &SkillId,
    ) -> Result<Arc<Skill>, CommandError> {
        self.check_ready(actor)?;
        let skill = self.permitted_skill(actor, skill_id)?;
        if !self.actors[actor.index()].is_idle() {
            return Err(CommandError::ActorBusy(actor));
        }
        Ok(skill)
    }

    /// Replaces `actor`'s attack in wind-up with another attack on a
    /// different line, during a telegraph pause.
    ///
    /// Charges 1.4× the original attack's stamina plus 3 focus and 3 daily
    /// fatigue; the new attack's own costs are not charged. The new action
    /// winds up 100ms slower. A pending counter bonus is forfeited.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] and leaves state untouched if the feint
    /// preconditions are not met.
    pub fn execute_feint(
        &mut self,
        actor: ActorId,
        skill_id: &SkillId,
    ) -> Result<ExecuteOutcome, CommandError> {
        let (original, skill) = self.validate_feint(actor, skill_id).map_err(|e| self.reject(e))?;

        let index = actor.index();
        let charge = ResourceCost::new(
            original.costs.stamina * FEINT_STAMINA_MULTIPLIER,
            0.0,
            FEINT_FOCUS_SURCHARGE,
            FEINT_FATIGUE_SURCHARGE,
        );
        self.actors[index].resources_mut().pay(&charge);
        let line = format!(
            "{} feints {} into {} ({:.1} stam, {} focus, {} fatigue)",
            self.actors[index].name(),
            original.name,
            skill.name,
            charge.stamina,
            charge.focus,
            charge.daily_fatigue
        );
        self.record(line);
        tracing::info!(tick = self.current_tick, actor = %actor, skill = %skill.id, from = %original.id, "feint");

        self.actors[index].action = None;
        if self.drain_exhaustion(actor) {
            return Ok(ExecuteOutcome::Exhausted);
        }
        if let Some(bonus) = self.actors[index].counter_bonus.take() {
            self.record(format!("{} forfeits a {bonus}ms counter bonus", self.actors[index].name()));
        }

        let penalty = i64::try_from(FEINT_WINDUP_PENALTY_MS).unwrap_or(i64::MAX);
        self.begin_action(actor, skill, penalty, DefensePrediction::default());
        Ok(ExecuteOutcome::Started)
    }

    fn validate_feint(
        &self,
        actor: ActorId,
        skill_id: &SkillId,
    ) -> Result<(Arc<Skill>, Arc<Skill>), CommandError> {
        self.check_ready(actor)?;
        let skill = self.permitted_skill(actor, skill_id)?;

        let unavailable = |reason| CommandError::FeintNotAvailable { actor, reason };
        let current = self.actors[actor.index()]
            .action()
            .ok_or_else(|| unavailable("no action in progress"))?;
        let original = Arc::clone(current.skill());
        let Some(original_line) = original.line() else {
            return Err(unavailable("current action is not an attack"));
        };
        if current.phase() != Phase::WindUp || !current.flags().contains(ActionFlags::CAN_FEINT) {
            return Err(unavailable("current action cannot be feinted now"));
        }
        if !self.pause.is_telegraph_pause() {
            return Err(unavailable("feints require a telegraph pause"));
        }

        let Some(line) = skill.line() else {
            return Err(CommandError::FeintRequiresAttack(skill.id.clone()));
        };
        if line == original_line {
            return Err(CommandError::FeintSameLine {
                skill: skill.id.clone(),
                line: line.clone(),
            });
        }
        Ok((original, skill))
    }

    /// Discards `actor`'s action if it is in a cancellable wind-up.
    /// Nothing is refunded and nothing is recorded in history.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NothingToCancel`] or
    /// [`CommandError::CancelNotAllowed`], among the readiness errors.
    pub fn cancel_action(&mut self, actor: ActorId) -> Result<(), CommandError> {
        let skill = self.validate_cancel(actor).map_err(|e| self.reject(e))?;
        let index = actor.index();
        self.actors[index].action = None;
        self.record(format!("{} cancels {}", self.actors[index].name(), skill.name));
        tracing::info!(tick = self.current_tick, actor = %actor, skill = %skill.id, "action cancelled");
        self.emit_state();
        Ok(())
    }

    fn validate_cancel(&self, actor: ActorId) -> Result<Arc<Skill>, CommandError> {
        self.check_ready(actor)?;
        let action = self.actors[actor.index()]
            .action()
            .ok_or(CommandError::NothingToCancel(actor))?;
        if action.phase() != Phase::WindUp || !action.flags().contains(ActionFlags::CAN_CANCEL) {
            return Err(CommandError::CancelNotAllowed {
                actor,
                skill: action.skill().id.clone(),
            });
        }
        Ok(Arc::clone(action.skill()))
    }

    fn check_ready(&self, actor: ActorId) -> Result<(), CommandError> {
        if matches!(self.lifecycle, Lifecycle::Created | Lifecycle::Stopped) {
            return Err(CommandError::NotStarted);
        }
        if self.actors[actor.index()].is_defeated() {
            return Err(CommandError::ActorDefeated(actor));
        }
        if self.ended {
            return Err(CommandError::EncounterOver);
        }
        Ok(())
    }

    fn permitted_skill(&self, actor: ActorId, skill_id: &SkillId) -> Result<Arc<Skill>, CommandError> {
        let skill = self
            .catalog
            .get(skill_id)
            .ok_or_else(|| CommandError::UnknownSkill(skill_id.clone()))?;
        if !self.actors[actor.index()].is_permitted(skill_id) {
            return Err(CommandError::SkillNotPermitted {
                actor,
                skill: skill_id.clone(),
            });
        }
        Ok(Arc::clone(skill))
    }

    /// Logs and traces a rejected command, handing it back to the caller.
    fn reject(&mut self, error: CommandError) -> CommandError {
        self.record(format!("Rejected: {error}"));
        tracing::warn!(tick = self.current_tick, %error, "command rejected");
        error
    }

    /// Applies the exhaustion drain. Returns `true` if it killed the actor.
    fn drain_exhaustion(&mut self, id: ActorId) -> bool {
        let actor = &mut self.actors[id.index()];
        let drain = ExhaustionDrain::of(actor.resources());
        let drained = drain.apply(actor.resources_mut());
        if drained > 0.0 {
            let line = format!(
                "{} HP drained: -{drained:.1} (exhaustion penalty)",
                actor.name()
            );
            self.record(line);
            tracing::info!(tick = self.current_tick, actor = %id, drained, "exhaustion drain");
        }
        if self.actors[id.index()].resources().is_depleted() {
            self.kill(id, DeathCause::Exhaustion);
            self.emit_state();
            return true;
        }
        false
    }

    /// Creates the action, reveals offset-0 telegraphs and starts the timer
    /// on the first execution.
    fn begin_action(
        &mut self,
        id: ActorId,
        skill: Arc<Skill>,
        modifier_ms: i64,
        prediction: DefensePrediction,
    ) {
        let index = id.index();
        let line = format!("{} begins {}", self.actors[index].name(), skill.name);
        tracing::info!(tick = self.current_tick, actor = %id, skill = %skill.id, modifier_ms, "action started");
        self.actors[index].action = Some(Action::new(
            skill,
            self.current_tick,
            modifier_ms,
            prediction,
            self.config.tick_interval_ms,
        ));
        self.record(line);

        self.reveal_telegraphs(id);

        if self.lifecycle == Lifecycle::Armed {
            self.lifecycle = Lifecycle::Running;
            self.record("Combat timer started");
            tracing::info!(tick = self.current_tick, "combat timer started");
        }
        self.emit_state();
    }

    // -------------------------------------------------------------------------
    // Observation
    // -------------------------------------------------------------------------

    /// Registers an event subscriber.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&CombatEvent) + Send + 'static,
    {
        self.events.subscribe(handler)
    }

    /// Removes an event subscriber.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Global simulated time.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Tick quantum.
    #[must_use]
    pub const fn tick_interval_ms(&self) -> u64 {
        self.config.tick_interval_ms
    }

    /// Lifecycle stage.
    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Returns `true` once a fighter has died.
    #[must_use]
    pub const fn is_ended(&self) -> bool {
        self.ended
    }

    /// Returns `true` while paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    /// Pause controller state.
    #[must_use]
    pub const fn pause_state(&self) -> &PauseState {
        &self.pause
    }

    /// One actor's state.
    #[must_use]
    pub const fn actor(&self, id: ActorId) -> &ActorState {
        &self.actors[id.index()]
    }

    #[cfg(test)]
    pub(crate) fn actor_mut(&mut self, id: ActorId) -> &mut ActorState {
        &mut self.actors[id.index()]
    }

    /// Completed actions.
    #[must_use]
    pub const fn history(&self) -> &ActionHistory {
        &self.history
    }

    /// Completed actions followed by in-progress ones (`pc` first).
    #[must_use]
    pub fn timeline(&self) -> Vec<HistoryEntry> {
        let mut entries = self.history.entries().to_vec();
        for actor in &self.actors {
            if let Some(action) = actor.action() {
                entries.push(HistoryEntry::in_progress(actor.id(), action, self.current_tick));
            }
        }
        entries
    }

    /// Combat log.
    #[must_use]
    pub const fn log(&self) -> &CombatLog {
        &self.log
    }

    /// The skill catalog.
    #[must_use]
    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    /// Engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Serializable view of the current state.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            tick: self.current_tick,
            lifecycle: self.lifecycle,
            ended: self.ended,
            pc: ActorSnapshot::from(&self.actors[0]),
            npc: ActorSnapshot::from(&self.actors[1]),
            pause: self.pause.clone(),
            log: self.log.to_vec(),
        }
    }

    // -------------------------------------------------------------------------
    // Emission
    // -------------------------------------------------------------------------

    fn record(&mut self, message: impl AsRef<str>) {
        self.log.push(self.current_tick, message);
    }

    fn emit(&mut self, event: CombatEvent) {
        self.events.emit(&event);
    }

    fn emit_pause(&mut self) {
        if self.events.is_empty() {
            return;
        }
        let event = CombatEvent::PauseChanged {
            tick: self.current_tick,
            pause: self.pause.clone(),
        };
        self.emit(event);
    }

    fn emit_state(&mut self) {
        if self.events.is_empty() {
            return;
        }
        let event = CombatEvent::StateUpdate(Box::new(self.snapshot()));
        self.emit(event);
    }
}
