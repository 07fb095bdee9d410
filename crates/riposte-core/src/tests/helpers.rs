//! Test helper functions for building engines, catalogs and recording events.
//!
//! This module provides factory functions and setup utilities that make
//! writing scenario tests more ergonomic and consistent.

use std::sync::{Arc, Mutex};

use crate::action::DefensePrediction;
use crate::actor::ActorId;
use crate::config::EngineConfig;
use crate::engine::{Engine, ExecuteOutcome, TickOutcome};
use crate::event::CombatEvent;
use crate::skill::{
    AttackLine, DamageReduction, DefenseType, ResourceCost, Skill, SkillCatalog, Telegraph,
};

// =============================================================================
// Engine Setup
// =============================================================================

/// Builds a started engine over the bundled catalog at the given quantum.
pub fn bundled_engine(quantum_ms: u64) -> Engine {
    let config = EngineConfig::default().with_tick_interval(quantum_ms);
    let catalog = SkillCatalog::bundled(quantum_ms).unwrap();
    let mut engine = Engine::new(config, catalog).unwrap();
    engine.start();
    engine
}

/// Builds a started engine over custom skills at the given quantum.
pub fn engine_with(skills: Vec<Skill>, quantum_ms: u64) -> Engine {
    let config = EngineConfig::default().with_tick_interval(quantum_ms);
    let catalog = SkillCatalog::new(skills, quantum_ms).unwrap();
    let mut engine = Engine::new(config, catalog).unwrap();
    engine.start();
    engine
}

/// Executes a skill with no predictions, panicking on rejection.
pub fn execute(engine: &mut Engine, actor: ActorId, skill: &str) -> ExecuteOutcome {
    engine
        .execute_skill(actor, &skill.into(), DefensePrediction::default())
        .unwrap()
}

/// Executes a skill with predictions, panicking on rejection.
pub fn execute_predicting(
    engine: &mut Engine,
    actor: ActorId,
    skill: &str,
    prediction: DefensePrediction,
) -> ExecuteOutcome {
    engine
        .execute_skill(actor, &skill.into(), prediction)
        .unwrap()
}

/// Ticks `n` times, returning the outcomes.
pub fn run_ticks(engine: &mut Engine, n: usize) -> Vec<TickOutcome> {
    (0..n).map(|_| engine.tick()).collect()
}

/// Ticks until both actors are idle or `limit` ticks have run.
pub fn run_until_idle(engine: &mut Engine, limit: usize) {
    for _ in 0..limit {
        if ActorId::ALL.iter().all(|id| engine.actor(*id).is_idle()) {
            return;
        }
        engine.tick();
    }
}

// =============================================================================
// Skills
// =============================================================================

/// An attack with a stamina cost and no telegraphs.
pub fn attack(id: &str, line: &str, wind_up: u64, committed: u64, damage: f64) -> Skill {
    Skill::attack(id, AttackLine::new(line), wind_up, committed, 200, damage)
        .with_costs(ResourceCost::new(4.0, 0.0, 0.0, 0.0))
}

/// A defense with the given reduction and no prediction requirements.
pub fn guard(id: &str, wind_up: u64, active: u64, flat: f64, percent: f64) -> Skill {
    let mut skill = Skill::defense(id, DefenseType::Retreat, wind_up, active, 200);
    skill.as_defense_mut().unwrap().reduction = DamageReduction::new(flat, percent);
    skill
}

/// A line-predicting parry that fully blocks and grants a counter bonus.
pub fn line_parry(bonus_ms: u64) -> Skill {
    let mut skill = Skill::defense("line_parry", DefenseType::Parry, 100, 500, 100);
    let profile = skill.as_defense_mut().unwrap();
    profile.reduction = DamageReduction::new(0.0, 1.0);
    profile.requires_line = true;
    profile.counter_speed_bonus_ms = Some(bonus_ms);
    skill
}

/// An attack whose stage-2 telegraph forces a pause.
pub fn telegraphed_attack(id: &str, line: &str) -> Skill {
    Skill::attack(id, AttackLine::new(line), 600, 300, 400, 5.0)
        .with_costs(ResourceCost::new(6.0, 0.0, 1.0, 1.0))
        .with_telegraph(Telegraph::new(1, 0, "foot", false))
        .with_telegraph(Telegraph::new(2, 200, "shoulders", true))
        .with_telegraph(Telegraph::new(3, 400, "weapon", false))
}

// =============================================================================
// Event Recording
// =============================================================================

/// Collects every event an engine publishes.
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<CombatEvent>>>,
}

impl EventRecorder {
    /// Subscribes a new recorder to `engine`.
    pub fn attach(engine: &mut Engine) -> Self {
        let recorder = Self::default();
        let sink = Arc::clone(&recorder.events);
        engine.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
        recorder
    }

    /// All recorded events, in order.
    pub fn events(&self) -> Vec<CombatEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Recorded events other than state updates.
    pub fn discrete(&self) -> Vec<CombatEvent> {
        self.events()
            .into_iter()
            .filter(|e| !matches!(e, CombatEvent::StateUpdate(_)))
            .collect()
    }

    /// Number of events of a kind.
    pub fn count(&self, kind: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind() == kind)
            .count()
    }

    /// Ticks and reports of every impact, in order.
    pub fn impacts(&self) -> Vec<(u64, crate::resolver::ImpactReport)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                CombatEvent::ImpactResolved { tick, report, .. } => Some((tick, report)),
                _ => None,
            })
            .collect()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}
