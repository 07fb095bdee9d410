//! Pause controller.
//!
//! A binary paused flag with a reason tag. While paused, the engine's tick is
//! a no-op; resuming does not compensate for skipped time.
//!
//! A telegraph-triggered pause also carries an advisory [`PredictionWindow`]
//! for whoever has to respond. Resolution never reads it.

use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::skill::SkillId;

/// Why simulated time is frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseReason {
    /// Toggled by a caller, or forced by a death.
    Manual,
    /// A pause-worthy telegraph was revealed.
    NewTelegraph,
    /// A caller-driven decision window is about to close.
    OptionExpiring,
}

/// Advisory information attached to a telegraph-triggered pause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionWindow {
    /// Actor whose telegraph caused the pause.
    pub revealed_by: ActorId,
    /// Revealed stage.
    pub stage: u32,
    /// Revealed body part.
    pub body_part: String,
    /// Absolute tick at which the revealing action will land, if an attack.
    pub estimated_impact_tick: Option<u64>,
    /// Catalog attacks showing the same tell at the same stage.
    pub possible_attacks: Vec<SkillId>,
}

/// Pause flag, reason and advisory data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseState {
    paused: bool,
    reason: Option<PauseReason>,
    available_actions: Vec<SkillId>,
    prediction: Option<PredictionWindow>,
}

impl PauseState {
    /// Creates an unpaused state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while simulated time is frozen.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Why the engine is paused.
    #[must_use]
    pub const fn reason(&self) -> Option<PauseReason> {
        self.reason
    }

    /// Skills the responding side may use during a telegraph pause.
    #[must_use]
    pub fn available_actions(&self) -> &[SkillId] {
        &self.available_actions
    }

    /// Advisory prediction window of a telegraph pause.
    #[must_use]
    pub const fn prediction(&self) -> Option<&PredictionWindow> {
        self.prediction.as_ref()
    }

    /// Flips the paused flag. Pausing sets reason `Manual`; resuming clears
    /// everything. Returns the new paused flag.
    pub fn toggle(&mut self) -> bool {
        if self.paused {
            *self = Self::default();
        } else {
            self.pause(PauseReason::Manual);
        }
        self.paused
    }

    /// Pauses with a reason, dropping any advisory data.
    pub fn pause(&mut self, reason: PauseReason) {
        self.paused = true;
        self.reason = Some(reason);
        self.available_actions.clear();
        self.prediction = None;
    }

    /// Pauses for a newly revealed telegraph.
    pub fn pause_for_telegraph(
        &mut self,
        prediction: PredictionWindow,
        available_actions: Vec<SkillId>,
    ) {
        self.paused = true;
        self.reason = Some(PauseReason::NewTelegraph);
        self.available_actions = available_actions;
        self.prediction = Some(prediction);
    }

    /// Returns `true` if paused because of a telegraph.
    #[must_use]
    pub fn is_telegraph_pause(&self) -> bool {
        self.paused && self.reason == Some(PauseReason::NewTelegraph)
    }
}
