//! The in-progress action of one actor and its phase state machine.
//!
//! An action advances in whole tick quanta. Its phase is a pure function of
//! the owning skill's timing table, the elapsed time and the wind-up
//! modifier:
//!
//! | kind             | phases                                           |
//! |------------------|--------------------------------------------------|
//! | attack           | `wind_up → committed → impact → recovery`        |
//! | defense, special | `wind_up → active → recovery`                    |
//!
//! The impact phase lasts exactly one tick. The catalog guarantees that every
//! impact tick is a multiple of the quantum, and modifiers are clamped here so
//! the modified impact tick is never earlier than the first tick.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use riposte_core::action::{Action, Phase};
//! use riposte_core::skill::{AttackLine, Skill};
//!
//! let skill = Arc::new(Skill::attack("thrust", AttackLine::new("center"), 200, 100, 100, 4.0));
//! let mut action = Action::new(skill, 0, 0, Default::default(), 100);
//!
//! let phases: Vec<_> = (0..4).map(|_| action.advance(100).to).collect();
//! assert_eq!(
//!     phases,
//!     vec![Some(Phase::WindUp), Some(Phase::Committed), Some(Phase::Impact), None]
//! );
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::skill::{AttackLine, Skill, SkillId, SkillKind, Telegraph};

// =============================================================================
// Phase
// =============================================================================

/// Phase of an in-progress action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Preparing; the only phase that may permit cancel or feint.
    WindUp,
    /// Attack locked in, moving toward impact.
    Committed,
    /// The single tick on which an attack lands.
    Impact,
    /// Defense or special effect window.
    Active,
    /// Returning to guard.
    Recovery,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WindUp => write!(f, "wind_up"),
            Self::Committed => write!(f, "committed"),
            Self::Impact => write!(f, "impact"),
            Self::Active => write!(f, "active"),
            Self::Recovery => write!(f, "recovery"),
        }
    }
}

bitflags! {
    /// Cancel/feint eligibility mirrored from the current phase.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ActionFlags: u8 {
        /// The action may be cancelled.
        const CAN_CANCEL = 1 << 0;
        /// The action may be feinted into another attack.
        const CAN_FEINT = 1 << 1;
    }
}

impl ActionFlags {
    /// Flags granted by a skill while it is in `phase`.
    #[must_use]
    pub fn for_phase(skill: &Skill, phase: Phase) -> Self {
        if phase != Phase::WindUp {
            return Self::empty();
        }
        let wind_up = skill.wind_up();
        let mut flags = Self::empty();
        flags.set(Self::CAN_CANCEL, wind_up.can_cancel);
        flags.set(Self::CAN_FEINT, wind_up.can_feint);
        flags
    }
}

// =============================================================================
// Predictions
// =============================================================================

/// Predictions a defender commits to when starting a defense.
///
/// Only the predictions a defense requires are consulted; the rest are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefensePrediction {
    /// Predicted attack line.
    pub line: Option<AttackLine>,
    /// Predicted opposing skill.
    pub attack: Option<SkillId>,
}

impl DefensePrediction {
    /// A line prediction.
    #[must_use]
    pub fn line(line: &str) -> Self {
        Self {
            line: Some(AttackLine::new(line)),
            attack: None,
        }
    }

    /// A specific-skill prediction.
    #[must_use]
    pub fn attack(skill: &str) -> Self {
        Self {
            line: None,
            attack: Some(SkillId::new(skill)),
        }
    }
}

// =============================================================================
// Phase Math
// =============================================================================

/// Applies a signed modifier to a boundary, saturating at zero.
fn shifted(boundary: u64, modifier_ms: i64) -> u64 {
    boundary.saturating_add_signed(modifier_ms)
}

/// Clamps a requested wind-up modifier so an attack's impact tick stays at or
/// after the first tick. Non-attacks are returned unchanged.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn clamp_modifier(skill: &Skill, requested_ms: i64, quantum_ms: u64) -> i64 {
    match skill.impact_tick() {
        Some(impact) => requested_ms.max((quantum_ms as i64).saturating_sub(impact as i64)),
        None => requested_ms,
    }
}

/// Phase of `skill` at `elapsed_ms`, or `None` once the action is complete.
///
/// # Example
///
/// ```
/// use riposte_core::action::{phase_at, Phase};
/// use riposte_core::skill::{DefenseType, Skill};
///
/// let parry = Skill::defense("parry", DefenseType::Parry, 300, 200, 300);
/// assert_eq!(phase_at(&parry, 0, 299), Some(Phase::WindUp));
/// assert_eq!(phase_at(&parry, 0, 300), Some(Phase::Active));
/// assert_eq!(phase_at(&parry, 0, 500), Some(Phase::Recovery));
/// assert_eq!(phase_at(&parry, 0, 800), None);
/// ```
#[must_use]
pub fn phase_at(skill: &Skill, modifier_ms: i64, elapsed_ms: u64) -> Option<Phase> {
    let wind_up_end = shifted(skill.wind_up().duration_ms, modifier_ms);
    let e = elapsed_ms;
    match &skill.kind {
        SkillKind::Attack(attack) => {
            let impact = shifted(attack.impact_tick, modifier_ms);
            if e < wind_up_end {
                Some(Phase::WindUp)
            } else if e < impact {
                Some(Phase::Committed)
            } else if e == impact {
                Some(Phase::Impact)
            } else if e < impact.saturating_add(attack.recovery_ms) {
                Some(Phase::Recovery)
            } else {
                None
            }
        }
        SkillKind::Defense(_) | SkillKind::Special(_) => {
            let (active_ms, recovery_ms) = match &skill.kind {
                SkillKind::Defense(d) => (d.active_ms, d.recovery_ms),
                SkillKind::Special(s) => (s.active_ms, s.recovery_ms),
                SkillKind::Attack(_) => (0, 0),
            };
            let active_end = wind_up_end.saturating_add(active_ms);
            if e < wind_up_end {
                Some(Phase::WindUp)
            } else if e < active_end {
                Some(Phase::Active)
            } else if e < active_end.saturating_add(recovery_ms) {
                Some(Phase::Recovery)
            } else {
                None
            }
        }
    }
}

/// Absolute phase boundary timestamps of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseBoundaries {
    /// End of wind-up.
    pub wind_up_end: u64,
    /// End of the committed phase (attacks).
    pub committed_end: Option<u64>,
    /// Impact instant (attacks).
    pub impact_tick: Option<u64>,
    /// End of the active window (defenses and specials).
    pub active_end: Option<u64>,
    /// End of recovery; the action completes here.
    pub recovery_end: u64,
}

impl PhaseBoundaries {
    /// Computes boundaries for `skill` started at `start_tick`.
    #[must_use]
    pub fn compute(skill: &Skill, start_tick: u64, modifier_ms: i64) -> Self {
        let wind_up_end =
            start_tick.saturating_add(shifted(skill.wind_up().duration_ms, modifier_ms));
        match &skill.kind {
            SkillKind::Attack(attack) => {
                let impact =
                    start_tick.saturating_add(shifted(attack.impact_tick, modifier_ms));
                Self {
                    wind_up_end,
                    committed_end: Some(impact),
                    impact_tick: Some(impact),
                    active_end: None,
                    recovery_end: impact.saturating_add(attack.recovery_ms),
                }
            }
            SkillKind::Defense(d) => Self::windowed(wind_up_end, d.active_ms, d.recovery_ms),
            SkillKind::Special(s) => Self::windowed(wind_up_end, s.active_ms, s.recovery_ms),
        }
    }

    const fn windowed(wind_up_end: u64, active_ms: u64, recovery_ms: u64) -> Self {
        let active_end = wind_up_end.saturating_add(active_ms);
        Self {
            wind_up_end,
            committed_end: None,
            impact_tick: None,
            active_end: Some(active_end),
            recovery_end: active_end.saturating_add(recovery_ms),
        }
    }
}

// =============================================================================
// Action
// =============================================================================

/// Result of advancing an action by one quantum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseStep {
    /// Phase before the advance.
    pub from: Phase,
    /// Phase after the advance, or `None` if the action completed.
    pub to: Option<Phase>,
}

impl PhaseStep {
    /// Returns `true` if this step entered the impact phase.
    #[must_use]
    pub fn entered_impact(&self) -> bool {
        self.to == Some(Phase::Impact) && self.from != Phase::Impact
    }

    /// Returns `true` if the phase label changed without completing.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.to.is_some_and(|to| to != self.from)
    }
}

/// An actor's single in-progress action.
#[derive(Debug, Clone)]
pub struct Action {
    skill: Arc<Skill>,
    start_tick: u64,
    elapsed_ms: u64,
    phase: Phase,
    flags: ActionFlags,
    revealed: BTreeSet<u32>,
    wind_up_modifier_ms: i64,
    prediction: DefensePrediction,
}

impl Action {
    /// Creates an action at elapsed 0.
    ///
    /// `requested_modifier_ms` is clamped with [`clamp_modifier`].
    #[must_use]
    pub fn new(
        skill: Arc<Skill>,
        start_tick: u64,
        requested_modifier_ms: i64,
        prediction: DefensePrediction,
        quantum_ms: u64,
    ) -> Self {
        let modifier = clamp_modifier(&skill, requested_modifier_ms, quantum_ms);
        let phase = phase_at(&skill, modifier, 0).unwrap_or(Phase::WindUp);
        let flags = ActionFlags::for_phase(&skill, phase);
        Self {
            skill,
            start_tick,
            elapsed_ms: 0,
            phase,
            flags,
            revealed: BTreeSet::new(),
            wind_up_modifier_ms: modifier,
            prediction,
        }
    }

    /// Advances elapsed time by one quantum and refreshes phase and flags.
    pub fn advance(&mut self, quantum_ms: u64) -> PhaseStep {
        let from = self.phase;
        self.elapsed_ms += quantum_ms;
        let to = phase_at(&self.skill, self.wind_up_modifier_ms, self.elapsed_ms);
        if let Some(phase) = to {
            self.phase = phase;
            self.flags = ActionFlags::for_phase(&self.skill, phase);
        }
        PhaseStep { from, to }
    }

    /// Marks every telegraph whose trigger has been reached and returns the
    /// newly revealed ones, in skill order.
    ///
    /// Reveal is keyed by stage, so calling this again reveals nothing new.
    pub fn reveal_due(&mut self) -> Vec<Telegraph> {
        let due: Vec<Telegraph> = self
            .skill
            .telegraphs
            .iter()
            .filter(|t| self.elapsed_ms >= t.trigger_ms && !self.revealed.contains(&t.stage))
            .cloned()
            .collect();
        self.revealed.extend(due.iter().map(|t| t.stage));
        due
    }

    /// The skill in use.
    #[must_use]
    pub fn skill(&self) -> &Arc<Skill> {
        &self.skill
    }

    /// Absolute tick at which the action started.
    #[must_use]
    pub const fn start_tick(&self) -> u64 {
        self.start_tick
    }

    /// Elapsed time since start.
    #[must_use]
    pub const fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Current cancel/feint eligibility.
    #[must_use]
    pub const fn flags(&self) -> ActionFlags {
        self.flags
    }

    /// Stages revealed so far.
    #[must_use]
    pub const fn revealed(&self) -> &BTreeSet<u32> {
        &self.revealed
    }

    /// Effective wind-up modifier after clamping.
    #[must_use]
    pub const fn wind_up_modifier_ms(&self) -> i64 {
        self.wind_up_modifier_ms
    }

    /// Defense predictions supplied at creation.
    #[must_use]
    pub const fn prediction(&self) -> &DefensePrediction {
        &self.prediction
    }

    /// Absolute phase boundaries.
    #[must_use]
    pub fn boundaries(&self) -> PhaseBoundaries {
        PhaseBoundaries::compute(&self.skill, self.start_tick, self.wind_up_modifier_ms)
    }

    /// Absolute tick of the impact, for attacks.
    #[must_use]
    pub fn estimated_impact_tick(&self) -> Option<u64> {
        self.boundaries().impact_tick
    }

    /// Elapsed-time window in which a defense is active, for defenses.
    #[must_use]
    pub fn active_window(&self) -> Option<Range<u64>> {
        let defense = self.skill.as_defense()?;
        let start = shifted(defense.wind_up.duration_ms, self.wind_up_modifier_ms);
        Some(start..start.saturating_add(defense.active_ms))
    }

    /// Phase this action is in at an absolute tick, from its own start time.
    #[must_use]
    pub fn phase_at_tick(&self, tick: u64) -> Option<Phase> {
        phase_at(
            &self.skill,
            self.wind_up_modifier_ms,
            tick.saturating_sub(self.start_tick),
        )
    }
}
