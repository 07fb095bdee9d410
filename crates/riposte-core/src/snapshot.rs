//! Serializable point-in-time views of the engine.
//!
//! Snapshots copy just what an observer needs. Skills are referenced by id.

use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionFlags, DefensePrediction, Phase};
use crate::actor::{ActorId, ActorState, CounterBonus, ResourcePools};
use crate::engine::Lifecycle;
use crate::pause::PauseState;
use crate::skill::SkillId;

/// View of an in-progress action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSnapshot {
    /// Skill in use.
    pub skill: SkillId,
    /// Current phase.
    pub phase: Phase,
    /// Absolute start tick.
    pub start_tick: u64,
    /// Elapsed time.
    pub elapsed_ms: u64,
    /// Revealed telegraph stages.
    pub revealed_stages: Vec<u32>,
    /// Cancel/feint eligibility.
    pub flags: ActionFlags,
    /// Effective wind-up modifier.
    pub wind_up_modifier_ms: i64,
    /// Defense predictions.
    pub prediction: DefensePrediction,
}

impl From<&Action> for ActionSnapshot {
    fn from(action: &Action) -> Self {
        Self {
            skill: action.skill().id.clone(),
            phase: action.phase(),
            start_tick: action.start_tick(),
            elapsed_ms: action.elapsed_ms(),
            revealed_stages: action.revealed().iter().copied().collect(),
            flags: action.flags(),
            wind_up_modifier_ms: action.wind_up_modifier_ms(),
            prediction: action.prediction().clone(),
        }
    }
}

/// View of one combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    /// Identity.
    pub id: ActorId,
    /// Display name.
    pub name: String,
    /// Resource pools.
    pub resources: ResourcePools,
    /// Pending counter bonus.
    pub counter_bonus: CounterBonus,
    /// In-progress action.
    pub action: Option<ActionSnapshot>,
    /// Whether the actor has died.
    pub defeated: bool,
}

impl From<&ActorState> for ActorSnapshot {
    fn from(actor: &ActorState) -> Self {
        Self {
            id: actor.id(),
            name: actor.name().to_string(),
            resources: *actor.resources(),
            counter_bonus: actor.counter_bonus(),
            action: actor.action().map(ActionSnapshot::from),
            defeated: actor.is_defeated(),
        }
    }
}

/// Full engine state as published in state-update events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Global simulated time.
    pub tick: u64,
    /// Lifecycle stage.
    pub lifecycle: Lifecycle,
    /// Whether a death has ended the encounter.
    pub ended: bool,
    /// Player character.
    pub pc: ActorSnapshot,
    /// Opponent.
    pub npc: ActorSnapshot,
    /// Pause controller state.
    pub pause: PauseState,
    /// Combat log lines, oldest first.
    pub log: Vec<String>,
}

impl EngineSnapshot {
    /// Snapshot of one actor.
    #[must_use]
    pub const fn actor(&self, id: ActorId) -> &ActorSnapshot {
        match id {
            ActorId::Pc => &self.pc,
            ActorId::Npc => &self.npc,
        }
    }
}
