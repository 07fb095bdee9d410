//! Error taxonomy for the duel engine.
//!
//! - [`CatalogError`]: malformed static skill data, fatal to loading.
//! - [`ConfigError`]: malformed engine configuration.
//! - [`EngineError`]: the engine refused to be built.
//! - [`CommandError`]: a routine, rejected command. These never mutate state.
//!
//! Deaths are not errors; they are normal outcomes of the state machine.

#![allow(missing_docs)]

use thiserror::Error;

use crate::actor::ActorId;
use crate::skill::{AttackLine, SkillId};

/// A skill catalog failed validation.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("skill {skill}: impact tick {impact} must equal wind-up {wind_up} + committed {committed}")]
    ImpactMismatch {
        skill: SkillId,
        impact: u64,
        wind_up: u64,
        committed: u64,
    },

    #[error("skill {skill}: impact tick must be positive")]
    ImpactNotPositive { skill: SkillId },

    #[error("skill {skill}: impact tick {impact} is not a multiple of the {quantum}ms tick")]
    ImpactNotAligned {
        skill: SkillId,
        impact: u64,
        quantum: u64,
    },

    #[error("skill {skill}: telegraph stage {stage} trigger {trigger}ms is not a multiple of the {quantum}ms tick")]
    TelegraphNotAligned {
        skill: SkillId,
        stage: u32,
        trigger: u64,
        quantum: u64,
    },

    #[error("skill {skill}: telegraph stage {stage} does not follow stage {previous}")]
    TelegraphStageOrder {
        skill: SkillId,
        stage: u32,
        previous: u32,
    },

    #[error("skill {skill}: counter bonus {bonus}ms is not a multiple of the {quantum}ms tick")]
    CounterBonusNotAligned {
        skill: SkillId,
        bonus: u64,
        quantum: u64,
    },

    #[error("skill {skill}: invalid damage reduction (flat {flat}, percent {percent})")]
    InvalidReduction {
        skill: SkillId,
        flat: f64,
        percent: f64,
    },

    #[error("skill {skill}: phase durations overflow")]
    DurationOverflow { skill: SkillId },

    #[error("duplicate skill id: {0}")]
    DuplicateSkill(SkillId),

    #[error("tick quantum must be positive")]
    ZeroQuantum,

    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The engine configuration is unusable.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tick interval must be positive")]
    ZeroTickInterval,

    #[error("tick interval {tick}ms must divide the {penalty}ms feint penalty")]
    FeintPenaltyNotAligned { tick: u64, penalty: u64 },

    #[error("combat log capacity must be positive")]
    ZeroLogCapacity,

    #[error("fighter {0} must start with positive HP")]
    NonPositiveHp(String),
}

/// The engine could not be constructed.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("catalog validated for a {catalog}ms tick but the engine ticks every {engine}ms")]
    QuantumMismatch { catalog: u64, engine: u64 },
}

/// A command was rejected; no state changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown actor: {0}")]
    UnknownActor(String),

    #[error("unknown skill: {0}")]
    UnknownSkill(SkillId),

    #[error("{actor} is not permitted to use {skill}")]
    SkillNotPermitted { actor: ActorId, skill: SkillId },

    #[error("{0} already has an action in progress")]
    ActorBusy(ActorId),

    #[error("{0} is defeated")]
    ActorDefeated(ActorId),

    #[error("combat has not been started")]
    NotStarted,

    #[error("the encounter is over")]
    EncounterOver,

    #[error("{actor} cannot feint: {reason}")]
    FeintNotAvailable { actor: ActorId, reason: &'static str },

    #[error("feint to {skill} rejected: same line {line}")]
    FeintSameLine { skill: SkillId, line: AttackLine },

    #[error("feint target {0} is not an attack")]
    FeintRequiresAttack(SkillId),

    #[error("{0} has no action to cancel")]
    NothingToCancel(ActorId),

    #[error("{actor} cannot cancel {skill} in its current phase")]
    CancelNotAllowed { actor: ActorId, skill: SkillId },
}
