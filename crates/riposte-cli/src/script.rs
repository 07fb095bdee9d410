//! Command scripts: a fixed schedule of commands replayed against an engine.
//!
//! ```json
//! {
//!   "ticks": 60,
//!   "auto_resume": true,
//!   "steps": [
//!     { "at": 0, "op": "execute", "actor": "npc", "skill": "side_slash" },
//!     { "at": 5, "op": "execute", "actor": "pc", "skill": "parry",
//!       "prediction": { "line": "horizontal" } }
//!   ]
//! }
//! ```
//!
//! Step `at` counts loop iterations, not milliseconds: a step runs before the
//! tick of iteration `at`. With `auto_resume`, telegraph pauses are lifted
//! before every tick so the script runs unattended.

use riposte_core::action::DefensePrediction;
use riposte_core::actor::ActorId;
use riposte_core::engine::{Engine, TickOutcome};
use riposte_core::error::CommandError;
use riposte_core::skill::SkillId;
use serde::Deserialize;

/// A scripted command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    Execute {
        actor: ActorId,
        skill: SkillId,
        #[serde(default)]
        prediction: DefensePrediction,
    },
    Feint {
        actor: ActorId,
        skill: SkillId,
    },
    Cancel {
        actor: ActorId,
    },
    TogglePause,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Step {
    pub at: u32,
    #[serde(flatten)]
    pub op: Op,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Script {
    pub ticks: u32,
    #[serde(default = "default_auto_resume")]
    pub auto_resume: bool,
    #[serde(default)]
    pub steps: Vec<Step>,
}

const fn default_auto_resume() -> bool {
    true
}

impl Op {
    fn apply(&self, engine: &mut Engine) -> Result<(), CommandError> {
        match self {
            Self::Execute {
                actor,
                skill,
                prediction,
            } => engine
                .execute_skill(*actor, skill, prediction.clone())
                .map(drop),
            Self::Feint { actor, skill } => engine.execute_feint(*actor, skill).map(drop),
            Self::Cancel { actor } => engine.cancel_action(*actor),
            Self::TogglePause => {
                engine.toggle_pause();
                Ok(())
            }
        }
    }
}

/// Counters from one replay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub rejected: usize,
    pub ticks: u32,
}

impl Script {
    /// Replays the script. Rejected commands are counted and skipped.
    pub fn replay(&self, engine: &mut Engine) -> ReplaySummary {
        let mut summary = ReplaySummary::default();
        for iteration in 0..self.ticks {
            for step in self.steps.iter().filter(|s| s.at == iteration) {
                match step.op.apply(engine) {
                    Ok(()) => summary.applied += 1,
                    Err(error) => {
                        tracing::debug!(step = step.at, %error, "scripted command rejected");
                        summary.rejected += 1;
                    }
                }
            }
            if self.auto_resume && engine.pause_state().is_telegraph_pause() {
                engine.toggle_pause();
            }
            summary.ticks += 1;
            if engine.tick() == TickOutcome::Ended {
                break;
            }
        }
        summary
    }
}
