//! Skill definitions consumed by the duel engine.
//!
//! A skill is immutable data: phase timings, resource costs, telegraph stages
//! and the kind-specific properties of an attack, a defense or a special
//! action. Skills are produced by an external loader and accepted by the
//! engine only through a validated [`SkillCatalog`].
//!
//! # Timing
//!
//! Every timing field is an integer number of milliseconds. Elapsed time in
//! the engine advances in whole tick quanta, so phase boundaries compare
//! exactly (`elapsed == impact_tick`) without floating-point drift.
//!
//! # Example
//!
//! ```
//! use riposte_core::skill::{AttackLine, Skill, SkillKind};
//!
//! let slash = Skill::attack("slash", AttackLine::new("horizontal"), 600, 300, 400, 5.0);
//! assert!(slash.is_attack());
//! assert_eq!(slash.impact_tick(), Some(900));
//! ```

mod catalog;

pub use catalog::{SkillCatalog, BUNDLED_SKILLS_JSON};

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Identifiers
// =============================================================================

/// Unique identifier of a skill in the catalog.
///
/// # Example
///
/// ```
/// use riposte_core::skill::SkillId;
///
/// let id = SkillId::new("parry");
/// assert_eq!(id.as_str(), "parry");
/// assert_eq!(id, SkillId::from("parry"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(String);

impl SkillId {
    /// Creates a new `SkillId` from a string.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Returns the skill ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SkillId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SkillId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Direction/category tag of an attack.
///
/// Lines are matched against a defender's line prediction and decide whether
/// a feint is legal (the replacement attack must use a different line).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttackLine(String);

impl AttackLine {
    /// Creates a new attack line tag.
    #[must_use]
    pub fn new(line: &str) -> Self {
        Self(line.to_string())
    }

    /// Returns the line tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttackLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AttackLine {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// =============================================================================
// Costs and Telegraphs
// =============================================================================

/// Resource cost vector paid when a skill starts.
///
/// HP is never a direct cost; it is only drained by exhaustion when one of
/// these pools goes negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceCost {
    /// Stamina cost (also the base for parry and feint surcharges).
    pub stamina: f64,
    /// Magic point cost.
    #[serde(default)]
    pub mp: f64,
    /// Focus cost.
    #[serde(default)]
    pub focus: f64,
    /// Daily fatigue cost.
    #[serde(default)]
    pub daily_fatigue: f64,
}

impl ResourceCost {
    /// Creates a cost vector.
    #[must_use]
    pub const fn new(stamina: f64, mp: f64, focus: f64, daily_fatigue: f64) -> Self {
        Self {
            stamina,
            mp,
            focus,
            daily_fatigue,
        }
    }
}

/// A staged, time-gated tell about an in-progress action.
///
/// Telegraphs of a skill are revealed independently and cumulatively once the
/// action's elapsed time reaches `trigger_ms`. Identity is the `stage` number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telegraph {
    /// Stage number, strictly increasing within a skill.
    pub stage: u32,
    /// Offset from action start at which the tell becomes visible.
    pub trigger_ms: u64,
    /// Body part showing the tell (foot, shoulders, weapon, stance, ...).
    pub body_part: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Whether revealing this telegraph forces a pause.
    #[serde(default)]
    pub pause: bool,
}

impl Telegraph {
    /// Creates a telegraph stage.
    #[must_use]
    pub fn new(stage: u32, trigger_ms: u64, body_part: &str, pause: bool) -> Self {
        Self {
            stage,
            trigger_ms,
            body_part: body_part.to_string(),
            description: format!("{body_part} moves"),
            pause,
        }
    }

    /// Sets the description (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

// =============================================================================
// Phase Profiles
// =============================================================================

/// Wind-up phase timing and the eligibility flags it grants.
///
/// Only the wind-up phase may permit cancel or feint; every later phase
/// forces both off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindUpPhase {
    /// Wind-up duration.
    pub duration_ms: u64,
    /// Whether the action may be cancelled while winding up.
    #[serde(default)]
    pub can_cancel: bool,
    /// Whether the action may be feinted while winding up.
    #[serde(default)]
    pub can_feint: bool,
}

impl WindUpPhase {
    /// Creates a wind-up phase.
    #[must_use]
    pub const fn new(duration_ms: u64, can_cancel: bool, can_feint: bool) -> Self {
        Self {
            duration_ms,
            can_cancel,
            can_feint,
        }
    }
}

/// Attack-specific data: `windUp → committed → impact → recovery`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackProfile {
    /// Wind-up phase.
    pub wind_up: WindUpPhase,
    /// Committed phase duration.
    pub committed_ms: u64,
    /// Elapsed time of the impact; must equal wind-up + committed.
    pub impact_tick: u64,
    /// Recovery duration after the impact.
    pub recovery_ms: u64,
    /// Base damage before mitigation.
    pub damage: f64,
    /// Attack line.
    pub line: AttackLine,
}

/// Which named defense a defense skill is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseType {
    /// Parry: pays a stamina surcharge proportional to the blocked attack.
    Parry,
    /// Deflection of a predicted attack.
    Deflection,
    /// Stepping out of reach.
    Retreat,
    /// Last-moment emergency guard.
    Emergency,
}

impl fmt::Display for DefenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parry => write!(f, "parry"),
            Self::Deflection => write!(f, "deflection"),
            Self::Retreat => write!(f, "retreat"),
            Self::Emergency => write!(f, "emergency"),
        }
    }
}

/// Flat and proportional damage reduction of a defense.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageReduction {
    /// Subtracted after the percent reduction.
    #[serde(default)]
    pub flat: f64,
    /// Fraction of damage removed, in `[0, 1]`.
    #[serde(default)]
    pub percent: f64,
}

impl DamageReduction {
    /// Creates a damage reduction.
    #[must_use]
    pub const fn new(flat: f64, percent: f64) -> Self {
        Self { flat, percent }
    }

    /// Applies the reduction: `max(0, damage * (1 - percent) - flat)`.
    ///
    /// # Example
    ///
    /// ```
    /// use riposte_core::skill::DamageReduction;
    ///
    /// let reduction = DamageReduction::new(1.0, 0.5);
    /// assert_eq!(reduction.apply(5.0), 1.5);
    /// assert_eq!(reduction.apply(1.0), 0.0);
    /// ```
    #[must_use]
    pub fn apply(&self, damage: f64) -> f64 {
        (damage * (1.0 - self.percent) - self.flat).max(0.0)
    }
}

/// Defense-specific data: `windUp → active → recovery`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseProfile {
    /// Wind-up phase.
    pub wind_up: WindUpPhase,
    /// Length of the active window (may be 0).
    #[serde(default)]
    pub active_ms: u64,
    /// Recovery duration.
    pub recovery_ms: u64,
    /// Named defense type.
    pub defense_type: DefenseType,
    /// Damage mitigation on a matched block.
    #[serde(default)]
    pub reduction: DamageReduction,
    /// Whether a line prediction is required to match.
    #[serde(default)]
    pub requires_line: bool,
    /// Whether a specific opposing-skill prediction is required to match.
    #[serde(default)]
    pub requires_attack_id: bool,
    /// Wind-up speed-up granted to the defender after a matched block.
    #[serde(default)]
    pub counter_speed_bonus_ms: Option<u64>,
}

/// Special-action data: `windUp → active → recovery`, never blocks or hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialProfile {
    /// Wind-up phase.
    pub wind_up: WindUpPhase,
    /// Active duration.
    #[serde(default)]
    pub active_ms: u64,
    /// Recovery duration.
    pub recovery_ms: u64,
}

/// Kind-specific part of a skill.
///
/// Each variant carries all of its fields; there is no optional-field
/// guessing at use sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkillKind {
    /// An attack with a single impact tick.
    Attack(AttackProfile),
    /// A defense with an active window.
    Defense(DefenseProfile),
    /// A special action with neither impact nor defense.
    Special(SpecialProfile),
}

// =============================================================================
// Skill
// =============================================================================

/// An immutable, validated skill definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    /// Catalog identifier.
    pub id: SkillId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Resource costs paid on execution.
    pub costs: ResourceCost,
    /// Ordered telegraph stages.
    #[serde(default)]
    pub telegraphs: Vec<Telegraph>,
    /// Kind-specific properties.
    pub kind: SkillKind,
}

impl Skill {
    /// Creates an attack skill with `impact_tick = wind_up + committed`.
    ///
    /// The attack may be cancelled and feinted during wind-up and has no
    /// costs or telegraphs; use the builder methods to add them.
    #[must_use]
    pub fn attack(
        id: &str,
        line: AttackLine,
        wind_up_ms: u64,
        committed_ms: u64,
        recovery_ms: u64,
        damage: f64,
    ) -> Self {
        Self {
            id: SkillId::new(id),
            name: id.to_string(),
            description: String::new(),
            costs: ResourceCost::default(),
            telegraphs: Vec::new(),
            kind: SkillKind::Attack(AttackProfile {
                wind_up: WindUpPhase::new(wind_up_ms, true, true),
                committed_ms,
                impact_tick: wind_up_ms + committed_ms,
                recovery_ms,
                damage,
                line,
            }),
        }
    }

    /// Creates a defense skill with no reduction, requirements or bonus.
    #[must_use]
    pub fn defense(
        id: &str,
        defense_type: DefenseType,
        wind_up_ms: u64,
        active_ms: u64,
        recovery_ms: u64,
    ) -> Self {
        Self {
            id: SkillId::new(id),
            name: id.to_string(),
            description: String::new(),
            costs: ResourceCost::default(),
            telegraphs: Vec::new(),
            kind: SkillKind::Defense(DefenseProfile {
                wind_up: WindUpPhase::new(wind_up_ms, true, false),
                active_ms,
                recovery_ms,
                defense_type,
                reduction: DamageReduction::default(),
                requires_line: false,
                requires_attack_id: false,
                counter_speed_bonus_ms: None,
            }),
        }
    }

    /// Creates a special skill.
    #[must_use]
    pub fn special(id: &str, wind_up_ms: u64, active_ms: u64, recovery_ms: u64) -> Self {
        Self {
            id: SkillId::new(id),
            name: id.to_string(),
            description: String::new(),
            costs: ResourceCost::default(),
            telegraphs: Vec::new(),
            kind: SkillKind::Special(SpecialProfile {
                wind_up: WindUpPhase::new(wind_up_ms, true, false),
                active_ms,
                recovery_ms,
            }),
        }
    }

    /// Sets the cost vector (builder pattern).
    #[must_use]
    pub fn with_costs(mut self, costs: ResourceCost) -> Self {
        self.costs = costs;
        self
    }

    /// Appends a telegraph stage (builder pattern).
    #[must_use]
    pub fn with_telegraph(mut self, telegraph: Telegraph) -> Self {
        self.telegraphs.push(telegraph);
        self
    }

    /// Sets the display name (builder pattern).
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Returns the attack profile, if this is an attack.
    #[must_use]
    pub const fn as_attack(&self) -> Option<&AttackProfile> {
        match &self.kind {
            SkillKind::Attack(profile) => Some(profile),
            _ => None,
        }
    }

    /// Returns a mutable attack profile, if this is an attack.
    #[must_use]
    pub fn as_attack_mut(&mut self) -> Option<&mut AttackProfile> {
        match &mut self.kind {
            SkillKind::Attack(profile) => Some(profile),
            _ => None,
        }
    }

    /// Returns the defense profile, if this is a defense.
    #[must_use]
    pub const fn as_defense(&self) -> Option<&DefenseProfile> {
        match &self.kind {
            SkillKind::Defense(profile) => Some(profile),
            _ => None,
        }
    }

    /// Returns a mutable defense profile, if this is a defense.
    #[must_use]
    pub fn as_defense_mut(&mut self) -> Option<&mut DefenseProfile> {
        match &mut self.kind {
            SkillKind::Defense(profile) => Some(profile),
            _ => None,
        }
    }

    /// Returns `true` if this is an attack.
    #[must_use]
    pub const fn is_attack(&self) -> bool {
        matches!(self.kind, SkillKind::Attack(_))
    }

    /// Returns `true` if this is a defense.
    #[must_use]
    pub const fn is_defense(&self) -> bool {
        matches!(self.kind, SkillKind::Defense(_))
    }

    /// Returns the wind-up phase of any kind.
    #[must_use]
    pub const fn wind_up(&self) -> WindUpPhase {
        match &self.kind {
            SkillKind::Attack(p) => p.wind_up,
            SkillKind::Defense(p) => p.wind_up,
            SkillKind::Special(p) => p.wind_up,
        }
    }

    /// Returns the impact tick of an attack.
    #[must_use]
    pub const fn impact_tick(&self) -> Option<u64> {
        match &self.kind {
            SkillKind::Attack(p) => Some(p.impact_tick),
            _ => None,
        }
    }

    /// Returns the attack line of an attack.
    #[must_use]
    pub const fn line(&self) -> Option<&AttackLine> {
        match &self.kind {
            SkillKind::Attack(p) => Some(&p.line),
            _ => None,
        }
    }

    /// Total unmodified duration from start to the end of recovery,
    /// saturating at `u64::MAX`.
    #[must_use]
    pub const fn total_duration(&self) -> u64 {
        match &self.kind {
            SkillKind::Attack(p) => p.impact_tick.saturating_add(p.recovery_ms),
            SkillKind::Defense(p) => p
                .wind_up
                .duration_ms
                .saturating_add(p.active_ms)
                .saturating_add(p.recovery_ms),
            SkillKind::Special(p) => p
                .wind_up
                .duration_ms
                .saturating_add(p.active_ms)
                .saturating_add(p.recovery_ms),
        }
    }

    /// Every phase boundary summed without overflow, or `None`.
    #[must_use]
    pub fn checked_total_duration(&self) -> Option<u64> {
        match &self.kind {
            SkillKind::Attack(p) => p
                .wind_up
                .duration_ms
                .checked_add(p.committed_ms)?
                .max(p.impact_tick)
                .checked_add(p.recovery_ms),
            SkillKind::Defense(p) => p
                .wind_up
                .duration_ms
                .checked_add(p.active_ms)?
                .checked_add(p.recovery_ms),
            SkillKind::Special(p) => p
                .wind_up
                .duration_ms
                .checked_add(p.active_ms)?
                .checked_add(p.recovery_ms),
        }
    }
}
