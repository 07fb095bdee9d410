//! Combatant state: identity, resource pools, counter bonus and the single
//! in-progress action.
//!
//! Exactly two actors exist in a duel, [`ActorId::Pc`] and [`ActorId::Npc`].
//! The engine treats them symmetrically; the only asymmetry is the fixed
//! update order (`Pc` before `Npc`) inside a tick.
//!
//! # Example
//!
//! ```
//! use riposte_core::actor::{ActorId, ActorState};
//! use riposte_core::config::FighterConfig;
//!
//! let actor = ActorState::new(ActorId::Npc, &FighterConfig::new("Bandit"));
//! assert_eq!(actor.resources().hp.current, 10.0);
//! assert_eq!(actor.resources().daily_fatigue.max, 100.0);
//! assert!(actor.is_idle());
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::config::{Attributes, FighterConfig};
use crate::error::CommandError;
use crate::skill::{ResourceCost, SkillId};

// =============================================================================
// Actor Identity
// =============================================================================

/// One of the two combatants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorId {
    /// The player character, updated first every tick.
    Pc,
    /// The opponent, updated second every tick.
    Npc,
}

impl ActorId {
    /// Both actors in update order.
    pub const ALL: [Self; 2] = [Self::Pc, Self::Npc];

    /// Index into per-actor arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Pc => 0,
            Self::Npc => 1,
        }
    }

    /// The other combatant.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Pc => Self::Npc,
            Self::Npc => Self::Pc,
        }
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pc => write!(f, "pc"),
            Self::Npc => write!(f, "npc"),
        }
    }
}

impl FromStr for ActorId {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pc" => Ok(Self::Pc),
            "npc" => Ok(Self::Npc),
            other => Err(CommandError::UnknownActor(other.to_string())),
        }
    }
}

// =============================================================================
// Resources
// =============================================================================

/// A single resource pool. `current` may go negative (exhaustion).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    /// Current level.
    pub current: f64,
    /// Starting level and maximum.
    pub max: f64,
}

impl Pool {
    /// Creates a full pool.
    #[must_use]
    pub const fn full(max: f64) -> Self {
        Self { current: max, max }
    }

    /// How far below zero the pool is, or 0 if it is not negative.
    #[must_use]
    pub fn deficit(&self) -> f64 {
        if self.current < 0.0 {
            -self.current
        } else {
            0.0
        }
    }
}

/// The five independently tracked pools of a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourcePools {
    /// Hit points; the actor dies at or below 0.
    pub hp: Pool,
    /// Stamina.
    pub stamina: Pool,
    /// Magic points.
    pub mp: Pool,
    /// Focus.
    pub focus: Pool,
    /// Daily fatigue.
    pub daily_fatigue: Pool,
}

impl ResourcePools {
    /// Derives full pools from attributes.
    ///
    /// HP = constitution, stamina = 2 × constitution, MP = 2 × magic,
    /// focus = willpower, daily fatigue = 5 × willpower.
    #[must_use]
    pub fn from_attributes(attributes: &Attributes) -> Self {
        Self {
            hp: Pool::full(attributes.constitution),
            stamina: Pool::full(attributes.constitution * 2.0),
            mp: Pool::full(attributes.magic * 2.0),
            focus: Pool::full(attributes.willpower),
            daily_fatigue: Pool::full(attributes.willpower * 5.0),
        }
    }

    /// Deducts a cost vector unconditionally. HP is never a direct cost.
    pub fn pay(&mut self, cost: &ResourceCost) {
        self.stamina.current -= cost.stamina;
        self.mp.current -= cost.mp;
        self.focus.current -= cost.focus;
        self.daily_fatigue.current -= cost.daily_fatigue;
    }

    /// Returns `true` once HP is at or below zero.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.hp.current <= 0.0
    }
}

// =============================================================================
// Counter Bonus
// =============================================================================

/// Wind-up speed-up earned by a matched defense.
///
/// Two transitions only: [`CounterBonus::grant`] (impact resolution) and
/// [`CounterBonus::take`] (the owner's next execution, which either consumes
/// it as a wind-up modifier or forfeits it).
///
/// # Example
///
/// ```
/// use riposte_core::actor::CounterBonus;
///
/// let mut bonus = CounterBonus::None;
/// bonus.grant(200);
/// bonus.grant(300);
/// assert_eq!(bonus.take(), Some(300));
/// assert_eq!(bonus.take(), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterBonus {
    /// No bonus stored.
    #[default]
    None,
    /// A bonus of this many milliseconds awaits the next execution.
    Pending(u64),
}

impl CounterBonus {
    /// Stores a bonus, overwriting any unused one.
    pub fn grant(&mut self, ms: u64) {
        *self = Self::Pending(ms);
    }

    /// Clears the bonus, returning it if one was pending.
    pub fn take(&mut self) -> Option<u64> {
        match std::mem::take(self) {
            Self::None => None,
            Self::Pending(ms) => Some(ms),
        }
    }

    /// Returns `true` if a bonus is pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

// =============================================================================
// Actor State
// =============================================================================

/// Mutable state of one combatant.
#[derive(Debug, Clone)]
pub struct ActorState {
    id: ActorId,
    name: String,
    resources: ResourcePools,
    /// `None` permits every catalog skill.
    allowed_skills: Option<BTreeSet<SkillId>>,
    pub(crate) counter_bonus: CounterBonus,
    pub(crate) action: Option<Action>,
    defeated: bool,
}

impl ActorState {
    /// Creates an actor with full pools derived from its config.
    #[must_use]
    pub fn new(id: ActorId, config: &FighterConfig) -> Self {
        Self {
            id,
            name: config.name.clone(),
            resources: ResourcePools::from_attributes(&config.attributes),
            allowed_skills: config
                .allowed_skills
                .as_ref()
                .map(|skills| skills.iter().cloned().collect()),
            counter_bonus: CounterBonus::None,
            action: None,
            defeated: false,
        }
    }

    /// Actor identity.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current resource pools.
    #[must_use]
    pub const fn resources(&self) -> &ResourcePools {
        &self.resources
    }

    /// Mutable resource pools.
    pub fn resources_mut(&mut self) -> &mut ResourcePools {
        &mut self.resources
    }

    /// The in-progress action, if any.
    #[must_use]
    pub const fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    /// Pending counter bonus.
    #[must_use]
    pub const fn counter_bonus(&self) -> CounterBonus {
        self.counter_bonus
    }

    /// Returns `true` if the actor has no action in progress.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.action.is_none()
    }

    /// Returns `true` once the actor has died.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.defeated
    }

    /// Returns `true` if the actor may use this skill.
    #[must_use]
    pub fn is_permitted(&self, skill: &SkillId) -> bool {
        self.allowed_skills
            .as_ref()
            .map_or(true, |allowed| allowed.contains(skill))
    }

    /// Marks the actor dead and discards its action.
    pub(crate) fn defeat(&mut self) {
        self.action = None;
        self.defeated = true;
    }
}
