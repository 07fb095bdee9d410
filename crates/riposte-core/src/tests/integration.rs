//! End-to-end duel scenarios driven through the public command surface.

use crate::action::{DefensePrediction, Phase};
use crate::actor::{ActorId, CounterBonus};
use crate::config::EngineConfig;
use crate::engine::{Engine, ExecuteOutcome, Lifecycle, TickOutcome};
use crate::error::{CatalogError, CommandError};
use crate::event::{CombatEvent, DeathCause};
use crate::history::EntryStatus;
use crate::pause::PauseReason;
use crate::resolver::DefenseOutcome;
use crate::skill::{AttackLine, ResourceCost, Skill, SkillCatalog, SkillId};

use super::helpers::{
    attack, bundled_engine, engine_with, execute, execute_predicting, guard, line_parry,
    run_ticks, run_until_idle, telegraphed_attack, EventRecorder,
};

// =============================================================================
// Catalog Loading
// =============================================================================

#[test]
fn catalog_with_inconsistent_impact_cannot_build_an_engine() {
    let mut skill = attack("broken", "high", 300, 200, 5.0);
    skill.as_attack_mut().unwrap().impact_tick = 600;
    let err = SkillCatalog::new(vec![skill, attack("fine", "low", 300, 200, 5.0)], 100)
        .unwrap_err();
    assert!(matches!(err, CatalogError::ImpactMismatch { .. }));
}

// =============================================================================
// Impact Timing
// =============================================================================

#[test]
fn impact_fires_once_at_predicted_tick() {
    let mut engine = engine_with(vec![attack("strike", "high", 300, 200, 5.0)], 100);
    let recorder = EventRecorder::attach(&mut engine);

    execute(&mut engine, ActorId::Pc, "strike");
    run_ticks(&mut engine, 12);

    let impacts = recorder.impacts();
    assert_eq!(impacts.len(), 1);
    assert_eq!(impacts[0].0, 500);
    assert_eq!(impacts[0].1.defense, DefenseOutcome::Undefended);
    assert_eq!(engine.actor(ActorId::Npc).resources().hp.current, 5.0);
}

#[test]
fn phase_change_events_fire_only_on_change() {
    let mut engine = engine_with(vec![attack("strike", "high", 300, 200, 1.0)], 100);
    let recorder = EventRecorder::attach(&mut engine);

    execute(&mut engine, ActorId::Pc, "strike");
    run_until_idle(&mut engine, 20);

    let changes: Vec<(u64, Phase)> = recorder
        .events()
        .into_iter()
        .filter_map(|e| match e {
            CombatEvent::PhaseChanged { tick, to, .. } => Some((tick, to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            (300, Phase::Committed),
            (500, Phase::Impact),
            (600, Phase::Recovery),
        ]
    );
}

#[test]
fn one_state_update_per_tick() {
    let mut engine = engine_with(vec![attack("strike", "high", 300, 200, 1.0)], 100);
    execute(&mut engine, ActorId::Pc, "strike");
    let recorder = EventRecorder::attach(&mut engine);

    run_ticks(&mut engine, 4);
    assert_eq!(recorder.count("state_update"), 4);
}

// =============================================================================
// Telegraphs
// =============================================================================

#[test]
fn telegraph_reveal_is_monotonic_and_idempotent() {
    let skill = attack("strike", "high", 600, 300, 1.0)
        .with_telegraph(crate::skill::Telegraph::new(1, 0, "foot", false))
        .with_telegraph(crate::skill::Telegraph::new(2, 200, "weapon", false));
    let mut engine = engine_with(vec![skill], 100);
    let recorder = EventRecorder::attach(&mut engine);

    execute(&mut engine, ActorId::Pc, "strike");
    let stage_count = |stage: u32| {
        recorder
            .events()
            .iter()
            .filter(|e| matches!(e, CombatEvent::TelegraphRevealed { telegraph, .. } if telegraph.stage == stage))
            .count()
    };
    // Offset-0 telegraph is revealed on creation, before any tick.
    assert_eq!(stage_count(1), 1);
    assert_eq!(stage_count(2), 0);

    run_ticks(&mut engine, 2);
    assert_eq!(stage_count(2), 1);

    run_ticks(&mut engine, 6);
    assert_eq!(stage_count(1), 1);
    assert_eq!(stage_count(2), 1);
    assert_eq!(
        engine.actor(ActorId::Pc).action().unwrap().revealed().len(),
        2
    );
}

#[test]
fn pause_worthy_telegraph_pauses_with_prediction_window() {
    let mut engine = bundled_engine(100);
    let recorder = EventRecorder::attach(&mut engine);

    execute(&mut engine, ActorId::Npc, "side_slash");
    let outcomes = run_ticks(&mut engine, 4);
    assert_eq!(
        outcomes,
        vec![
            TickOutcome::Advanced,
            TickOutcome::Advanced,
            TickOutcome::Paused,
            TickOutcome::Paused
        ]
    );
    assert_eq!(engine.current_tick(), 200);
    assert_eq!(recorder.count("pause_changed"), 1);

    let pause = engine.pause_state();
    assert_eq!(pause.reason(), Some(PauseReason::NewTelegraph));
    let window = pause.prediction().unwrap();
    assert_eq!(window.revealed_by, ActorId::Npc);
    assert_eq!(window.stage, 2);
    assert_eq!(window.body_part, "shoulders");
    assert_eq!(window.estimated_impact_tick, Some(900));
    let possible: Vec<&str> = window.possible_attacks.iter().map(SkillId::as_str).collect();
    assert_eq!(
        possible,
        vec!["diagonal_slash", "overhead_strike", "side_slash", "upward_strike"]
    );
    assert_eq!(pause.available_actions().len(), 9);
    assert!(engine.log().contains("Auto-pause: Shoulders turn"));
}

// =============================================================================
// Defense Windows and Damage
// =============================================================================

/// Starts a guard (wind-up 300, active 200, flat 1, 50%) for npc and an
/// attack for pc landing at `impact`, both at tick 0, on a 50ms tick.
fn guarded_impact(impact: u64) -> crate::resolver::ImpactReport {
    let mut engine = engine_with(
        vec![
            attack("strike", "high", impact - 50, 50, 5.0),
            guard("guard", 300, 200, 1.0, 0.5),
        ],
        50,
    );
    let recorder = EventRecorder::attach(&mut engine);
    execute(&mut engine, ActorId::Pc, "strike");
    execute(&mut engine, ActorId::Npc, "guard");
    run_until_idle(&mut engine, 100);

    let impacts = recorder.impacts();
    assert_eq!(impacts.len(), 1);
    assert_eq!(impacts[0].0, impact);
    impacts[0].1.clone()
}

#[test]
fn impact_inside_active_window_is_mitigated() {
    let report = guarded_impact(400);
    assert!(report.defense.is_blocked());
    // max(0, 5 * (1 - 0.5) - 1) = 1.5, IEEE f64, no rounding
    assert_eq!(report.damage, 1.5);
    assert_eq!(report.defender_hp, 8.5);
}

#[test]
fn impact_after_active_window_lands_clean() {
    let report = guarded_impact(550);
    assert!(matches!(
        report.defense,
        DefenseOutcome::Inactive {
            phase: Some(Phase::Recovery),
            ..
        }
    ));
    assert_eq!(report.damage, 5.0);
}

#[test]
fn impact_before_active_window_lands_clean() {
    let report = guarded_impact(250);
    assert!(matches!(
        report.defense,
        DefenseOutcome::Inactive {
            phase: Some(Phase::WindUp),
            ..
        }
    ));
    assert_eq!(report.damage, 5.0);
}

#[test]
fn defense_window_is_measured_from_its_own_start() {
    let mut engine = engine_with(
        vec![
            attack("strike", "high", 550, 50, 5.0),
            guard("guard", 300, 200, 0.0, 1.0),
        ],
        50,
    );
    let recorder = EventRecorder::attach(&mut engine);
    execute(&mut engine, ActorId::Pc, "strike");
    run_ticks(&mut engine, 4);
    // Guard starts at 200: active over [500, 700); impact at 600.
    execute(&mut engine, ActorId::Npc, "guard");
    run_until_idle(&mut engine, 100);

    let impacts = recorder.impacts();
    assert_eq!(impacts[0].0, 600);
    assert!(impacts[0].1.defense.is_blocked());
    assert_eq!(engine.actor(ActorId::Npc).resources().hp.current, 10.0);
}

#[test]
fn timed_parry_blocks_and_pays_surcharge() {
    let mut engine = bundled_engine(100);
    execute(&mut engine, ActorId::Npc, "side_slash");
    run_ticks(&mut engine, 2);
    assert!(engine.is_paused());
    engine.toggle_pause();
    run_ticks(&mut engine, 3);
    assert_eq!(engine.current_tick(), 500);

    execute_predicting(
        &mut engine,
        ActorId::Pc,
        "parry",
        DefensePrediction::line("horizontal"),
    );
    run_until_idle(&mut engine, 40);

    let pc = engine.actor(ActorId::Pc);
    assert_eq!(pc.resources().hp.current, 10.0);
    // 20 - 3 (parry) - 0.25 * 6 (side slash stamina)
    assert_eq!(pc.resources().stamina.current, 15.5);
    assert_eq!(pc.counter_bonus(), CounterBonus::Pending(200));
    assert!(engine.log().contains("blocked the attack with parry"));
}

#[test]
fn early_parry_misses_the_impact() {
    let mut engine = bundled_engine(100);
    execute(&mut engine, ActorId::Npc, "side_slash");
    run_ticks(&mut engine, 2);
    execute_predicting(
        &mut engine,
        ActorId::Pc,
        "parry",
        DefensePrediction::line("horizontal"),
    );
    engine.toggle_pause();
    run_until_idle(&mut engine, 40);

    let pc = engine.actor(ActorId::Pc);
    assert_eq!(pc.resources().hp.current, 5.0);
    assert_eq!(pc.counter_bonus(), CounterBonus::None);
    assert!(engine.log().contains("CLEAN HIT"));
}

#[test]
fn wrong_prediction_is_logged_and_lands_unmitigated() {
    let mut engine = engine_with(
        vec![attack("strike", "high", 300, 200, 5.0), line_parry(200)],
        100,
    );
    execute_predicting(
        &mut engine,
        ActorId::Pc,
        "line_parry",
        DefensePrediction::line("low"),
    );
    execute(&mut engine, ActorId::Npc, "strike");
    run_until_idle(&mut engine, 20);

    assert_eq!(engine.actor(ActorId::Pc).resources().hp.current, 5.0);
    assert!(engine.log().contains("mismatch: predicted line low, attack came high"));
}

// =============================================================================
// Counter Bonus
// =============================================================================

fn earn_counter_bonus() -> Engine {
    let mut engine = engine_with(
        vec![
            attack("strike", "high", 300, 200, 5.0),
            line_parry(200),
            guard("guard", 100, 100, 0.0, 0.0),
        ],
        100,
    );
    execute_predicting(
        &mut engine,
        ActorId::Pc,
        "line_parry",
        DefensePrediction::line("high"),
    );
    execute(&mut engine, ActorId::Npc, "strike");
    run_until_idle(&mut engine, 20);
    engine
}

#[test]
fn matched_parry_grants_counter_bonus() {
    let engine = earn_counter_bonus();
    let pc = engine.actor(ActorId::Pc);
    assert_eq!(pc.resources().hp.current, 10.0);
    assert_eq!(pc.counter_bonus(), CounterBonus::Pending(200));
    // 25% of the strike's 4 stamina
    assert_eq!(pc.resources().stamina.current, 19.0);
}

#[test]
fn counter_bonus_speeds_up_next_attack() {
    let mut engine = earn_counter_bonus();
    let start = engine.current_tick();
    let recorder = EventRecorder::attach(&mut engine);

    execute(&mut engine, ActorId::Pc, "strike");
    assert_eq!(engine.actor(ActorId::Pc).counter_bonus(), CounterBonus::None);
    let action = engine.actor(ActorId::Pc).action().unwrap();
    assert_eq!(action.wind_up_modifier_ms(), -200);

    run_until_idle(&mut engine, 20);
    assert_eq!(recorder.impacts()[0].0, start + 300);

    let entry = engine.history().entries().last().unwrap();
    assert_eq!(entry.wind_up_modifier_ms, -200);
    assert_eq!(entry.boundaries.wind_up_end, start + 100);
    assert_eq!(entry.boundaries.impact_tick, Some(start + 300));
}

#[test]
fn counter_bonus_is_forfeited_by_non_attack() {
    let mut engine = earn_counter_bonus();
    execute(&mut engine, ActorId::Pc, "guard");
    let pc = engine.actor(ActorId::Pc);
    assert_eq!(pc.counter_bonus(), CounterBonus::None);
    assert_eq!(pc.action().unwrap().wind_up_modifier_ms(), 0);
    assert!(engine.log().contains("forfeits a 200ms counter bonus"));
}

// =============================================================================
// Exhaustion
// =============================================================================

fn haymaker() -> Skill {
    Skill::attack("haymaker", AttackLine::new("high"), 300, 200, 200, 9.0)
        .with_costs(ResourceCost::new(26.0, 0.0, 0.0, 0.0))
}

#[test]
fn overspending_stamina_drains_hp() {
    let mut engine = engine_with(vec![haymaker()], 100);
    assert_eq!(execute(&mut engine, ActorId::Pc, "haymaker"), ExecuteOutcome::Started);

    let pc = engine.actor(ActorId::Pc);
    assert_eq!(pc.resources().stamina.current, -6.0);
    assert_eq!(pc.resources().hp.current, 7.0);
    assert!(pc.action().is_some());
    assert!(engine.log().contains("HP drained: -3.0"));
}

#[test]
fn exhaustion_death_creates_no_action() {
    let mut engine = engine_with(vec![haymaker()], 100);
    let recorder = EventRecorder::attach(&mut engine);
    engine.actor_mut(ActorId::Pc).resources_mut().hp.current = 3.0;

    assert_eq!(execute(&mut engine, ActorId::Pc, "haymaker"), ExecuteOutcome::Exhausted);

    let pc = engine.actor(ActorId::Pc);
    assert!(pc.action().is_none());
    assert!(pc.is_defeated());
    assert_eq!(pc.resources().hp.current, 0.0);
    assert!(engine.is_ended());
    assert_eq!(engine.pause_state().reason(), Some(PauseReason::Manual));
    assert_eq!(engine.lifecycle(), Lifecycle::Armed);

    let deaths: Vec<_> = recorder
        .events()
        .into_iter()
        .filter_map(|e| match e {
            CombatEvent::FighterDied { actor, cause, .. } => Some((actor, cause)),
            _ => None,
        })
        .collect();
    assert_eq!(deaths, vec![(ActorId::Pc, DeathCause::Exhaustion)]);
}

// =============================================================================
// Feints
// =============================================================================

fn feint_engine() -> Engine {
    let mut engine = engine_with(
        vec![
            telegraphed_attack("slash", "horizontal"),
            telegraphed_attack("hook", "horizontal"),
            telegraphed_attack("chop", "high"),
            guard("guard", 100, 100, 0.0, 0.0),
        ],
        100,
    );
    execute(&mut engine, ActorId::Pc, "slash");
    run_ticks(&mut engine, 2);
    assert!(engine.pause_state().is_telegraph_pause());
    engine
}

#[test]
fn feint_to_same_line_changes_nothing() {
    let mut engine = feint_engine();
    let before = *engine.actor(ActorId::Pc).resources();

    let err = engine
        .execute_feint(ActorId::Pc, &"hook".into())
        .unwrap_err();
    assert_eq!(
        err,
        CommandError::FeintSameLine {
            skill: "hook".into(),
            line: AttackLine::new("horizontal"),
        }
    );

    let pc = engine.actor(ActorId::Pc);
    let action = pc.action().unwrap();
    assert_eq!(action.skill().id.as_str(), "slash");
    assert_eq!(action.elapsed_ms(), 200);
    assert_eq!(*pc.resources(), before);
    assert!(engine
        .log()
        .contains("Rejected: feint to hook rejected: same line horizontal"));
}

#[test]
fn feint_replaces_attack_with_penalty_and_surcharge() {
    let mut engine = feint_engine();
    let recorder = EventRecorder::attach(&mut engine);

    let outcome = engine.execute_feint(ActorId::Pc, &"chop".into()).unwrap();
    assert_eq!(outcome, ExecuteOutcome::Started);

    let pc = engine.actor(ActorId::Pc);
    let action = pc.action().unwrap();
    assert_eq!(action.skill().id.as_str(), "chop");
    assert_eq!(action.start_tick(), 200);
    assert_eq!(action.elapsed_ms(), 0);
    assert_eq!(action.wind_up_modifier_ms(), 100);
    // 20 - 6 (slash) - 1.4 * 6
    assert!((pc.resources().stamina.current - 5.6).abs() < 1e-9);
    assert_eq!(pc.resources().focus.current, 16.0);
    assert_eq!(pc.resources().daily_fatigue.current, 96.0);

    // Resume through every telegraph pause until the chop lands.
    for _ in 0..40 {
        if engine.is_paused() {
            engine.toggle_pause();
        }
        engine.tick();
        if !recorder.impacts().is_empty() {
            break;
        }
    }
    // 200 + 600 + 300 + 100
    assert_eq!(recorder.impacts()[0].0, 1200);
}

#[test]
fn feint_requires_telegraph_pause() {
    let mut engine = feint_engine();
    engine.toggle_pause();
    assert_eq!(engine.pause_state().reason(), None);
    let err = engine.execute_feint(ActorId::Pc, &"chop".into()).unwrap_err();
    assert!(matches!(err, CommandError::FeintNotAvailable { .. }));

    // A manual pause is not a telegraph pause.
    engine.toggle_pause();
    assert_eq!(engine.pause_state().reason(), Some(PauseReason::Manual));
    let err = engine.execute_feint(ActorId::Pc, &"chop".into()).unwrap_err();
    assert!(matches!(err, CommandError::FeintNotAvailable { .. }));
    assert_eq!(engine.actor(ActorId::Pc).action().unwrap().skill().id.as_str(), "slash");
}

#[test]
fn feint_requires_attack_target() {
    let mut engine = feint_engine();
    let err = engine
        .execute_feint(ActorId::Pc, &"guard".into())
        .unwrap_err();
    assert_eq!(err, CommandError::FeintRequiresAttack("guard".into()));
}

#[test]
fn feint_forfeits_counter_bonus() {
    let mut engine = feint_engine();
    engine.actor_mut(ActorId::Pc).counter_bonus.grant(200);
    engine.execute_feint(ActorId::Pc, &"chop".into()).unwrap();
    assert_eq!(engine.actor(ActorId::Pc).counter_bonus(), CounterBonus::None);
    assert_eq!(
        engine.actor(ActorId::Pc).action().unwrap().wind_up_modifier_ms(),
        100
    );
}

#[test]
fn feint_exhaustion_kills_without_new_action() {
    let mut engine = feint_engine();
    let recorder = EventRecorder::attach(&mut engine);
    {
        let resources = engine.actor_mut(ActorId::Pc).resources_mut();
        resources.hp.current = 0.5;
        resources.focus.current = 0.0;
    }

    assert_eq!(
        engine.execute_feint(ActorId::Pc, &"chop".into()),
        Ok(ExecuteOutcome::Exhausted)
    );

    let pc = engine.actor(ActorId::Pc);
    assert!(pc.action().is_none());
    assert!(pc.is_defeated());
    assert!(engine.is_ended());
    assert_eq!(recorder.count("fighter_died"), 1);
    assert!(engine.log().contains("died: exhaustion"));
}

// =============================================================================
// History
// =============================================================================

#[test]
fn completed_action_appears_once_in_history() {
    let mut engine = engine_with(vec![attack("strike", "high", 300, 200, 1.0)], 100);
    execute(&mut engine, ActorId::Pc, "strike");
    run_ticks(&mut engine, 7);

    assert!(engine.actor(ActorId::Pc).action().is_none());
    assert_eq!(engine.history().len(), 1);

    let entry = &engine.history().entries()[0];
    assert_eq!(entry.actor, ActorId::Pc);
    assert_eq!(entry.skill.as_str(), "strike");
    assert_eq!(entry.start_tick, 0);
    assert_eq!(entry.end_tick, 700);
    assert_eq!(entry.boundaries.wind_up_end, 300);
    assert_eq!(entry.boundaries.committed_end, Some(500));
    assert_eq!(entry.boundaries.impact_tick, Some(500));
    assert_eq!(entry.boundaries.recovery_end, 700);
    assert_eq!(entry.status, EntryStatus::Completed);

    run_ticks(&mut engine, 5);
    assert_eq!(engine.history().len(), 1);
}

// =============================================================================
// Pause
// =============================================================================

#[test]
fn paused_ticks_mutate_nothing() {
    let mut engine = engine_with(
        vec![
            attack("strike", "high", 300, 200, 1.0),
            guard("guard", 300, 200, 0.0, 0.0),
        ],
        100,
    );
    execute(&mut engine, ActorId::Pc, "strike");
    execute(&mut engine, ActorId::Npc, "guard");
    run_ticks(&mut engine, 2);
    engine.toggle_pause();

    let before = engine.snapshot();
    let outcomes = run_ticks(&mut engine, 25);
    assert!(outcomes.iter().all(|o| *o == TickOutcome::Paused));

    let after = engine.snapshot();
    assert_eq!(after.tick, 200);
    assert_eq!(after.pc, before.pc);
    assert_eq!(after.npc, before.npc);

    engine.toggle_pause();
    engine.tick();
    assert_eq!(engine.current_tick(), 300);
}

// =============================================================================
// Death
// =============================================================================

#[test]
fn same_tick_impacts_resolve_pc_first() {
    let mut engine = engine_with(vec![attack("kill", "high", 300, 200, 10.0)], 100);
    let recorder = EventRecorder::attach(&mut engine);
    execute(&mut engine, ActorId::Pc, "kill");
    execute(&mut engine, ActorId::Npc, "kill");
    run_ticks(&mut engine, 10);

    assert_eq!(recorder.impacts().len(), 1);
    assert_eq!(engine.actor(ActorId::Pc).resources().hp.current, 10.0);
    assert!(engine.actor(ActorId::Npc).is_defeated());
    assert!(engine.actor(ActorId::Npc).action().is_none());
    assert_eq!(engine.current_tick(), 500);
}

#[test]
fn death_ends_the_encounter() {
    let mut engine = engine_with(vec![attack("kill", "high", 300, 200, 10.0)], 100);
    execute(&mut engine, ActorId::Pc, "kill");
    run_ticks(&mut engine, 5);
    assert!(engine.is_ended());
    assert!(engine.log().contains("died: impact"));
    assert_eq!(engine.pause_state().reason(), Some(PauseReason::Manual));

    engine.toggle_pause();
    assert!(!engine.is_paused());
    assert_eq!(engine.tick(), TickOutcome::Ended);
    assert_eq!(engine.current_tick(), 500);

    assert_eq!(
        engine.execute_skill(ActorId::Npc, &"kill".into(), DefensePrediction::default()),
        Err(CommandError::ActorDefeated(ActorId::Npc))
    );
    assert_eq!(
        engine.execute_skill(ActorId::Pc, &"kill".into(), DefensePrediction::default()),
        Err(CommandError::EncounterOver)
    );
}

#[test]
fn death_publishes_the_forced_pause() {
    let mut engine = engine_with(vec![attack("kill", "high", 300, 200, 10.0)], 100);
    let recorder = EventRecorder::attach(&mut engine);
    execute(&mut engine, ActorId::Pc, "kill");
    run_ticks(&mut engine, 5);
    assert!(engine.is_ended());

    let discrete = recorder.discrete();
    let died_at = discrete
        .iter()
        .position(|e| matches!(e, CombatEvent::FighterDied { .. }))
        .unwrap();
    let pause = discrete[died_at..].iter().find_map(|e| match e {
        CombatEvent::PauseChanged { pause, .. } => Some(pause.clone()),
        _ => None,
    });
    let pause = pause.unwrap();
    assert!(pause.is_paused());
    assert_eq!(pause.reason(), Some(PauseReason::Manual));
}

// =============================================================================
// Log
// =============================================================================

#[test]
fn combat_log_is_bounded() {
    let config = EngineConfig {
        log_capacity: 10,
        ..EngineConfig::default()
    };
    let catalog = SkillCatalog::new(vec![attack("tap", "high", 100, 100, 0.0)], 100).unwrap();
    let mut engine = Engine::new(config, catalog).unwrap();
    engine.start();
    for _ in 0..5 {
        execute(&mut engine, ActorId::Pc, "tap");
        run_until_idle(&mut engine, 10);
    }
    assert_eq!(engine.log().len(), 10);
    assert!(engine.log().lines().all(|line| line.starts_with('[')));
}
