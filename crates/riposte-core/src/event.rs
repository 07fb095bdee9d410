//! Discrete engine events and the subscriber registry.
//!
//! Subscribers are called synchronously, in subscription order, from inside
//! the engine call that produced the event. A subscriber must not call back
//! into the engine.
//!
//! # Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use riposte_core::event::{CombatEvent, EventBus};
//! use riposte_core::pause::PauseState;
//!
//! let seen = Arc::new(Mutex::new(0));
//! let counter = Arc::clone(&seen);
//!
//! let mut bus = EventBus::new();
//! let id = bus.subscribe(move |_event| *counter.lock().unwrap() += 1);
//!
//! bus.emit(&CombatEvent::PauseChanged { tick: 0, pause: PauseState::new() });
//! assert!(bus.unsubscribe(id));
//! bus.emit(&CombatEvent::PauseChanged { tick: 0, pause: PauseState::new() });
//!
//! assert_eq!(*seen.lock().unwrap(), 1);
//! ```

use std::fmt;

use serde::Serialize;

use crate::action::Phase;
use crate::actor::ActorId;
use crate::pause::PauseState;
use crate::resolver::ImpactReport;
use crate::skill::{SkillId, Telegraph};
use crate::snapshot::EngineSnapshot;

/// Why a fighter died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// HP drained by negative pools when paying for an action.
    Exhaustion,
    /// HP reduced by an attack impact.
    Impact,
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhaustion => write!(f, "exhaustion"),
            Self::Impact => write!(f, "impact"),
        }
    }
}

/// An event published to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatEvent {
    /// Full state at the end of a tick or after a command.
    StateUpdate(Box<EngineSnapshot>),
    /// The pause state changed.
    PauseChanged {
        /// Tick at which it changed.
        tick: u64,
        /// New pause state.
        pause: PauseState,
    },
    /// A telegraph stage became visible.
    TelegraphRevealed {
        /// Tick of the reveal.
        tick: u64,
        /// Acting actor.
        actor: ActorId,
        /// Skill being telegraphed.
        skill: SkillId,
        /// The revealed stage.
        telegraph: Telegraph,
    },
    /// An action moved to a new phase.
    PhaseChanged {
        /// Tick of the change.
        tick: u64,
        /// Acting actor.
        actor: ActorId,
        /// Skill in use.
        skill: SkillId,
        /// Previous phase.
        from: Phase,
        /// New phase.
        to: Phase,
    },
    /// An attack landed.
    ImpactResolved {
        /// Tick of the impact.
        tick: u64,
        /// Whether any damage was dealt.
        hit: bool,
        /// Resolution details.
        report: ImpactReport,
    },
    /// A fighter died; the encounter is over.
    FighterDied {
        /// Tick of death.
        tick: u64,
        /// The dead fighter.
        actor: ActorId,
        /// Cause of death.
        cause: DeathCause,
    },
}

impl CombatEvent {
    /// Short name of the event type.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StateUpdate(_) => "state_update",
            Self::PauseChanged { .. } => "pause_changed",
            Self::TelegraphRevealed { .. } => "telegraph_revealed",
            Self::PhaseChanged { .. } => "phase_changed",
            Self::ImpactResolved { .. } => "impact_resolved",
            Self::FighterDied { .. } => "fighter_died",
        }
    }
}

/// Token returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Raw token value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

type Handler = Box<dyn FnMut(&CombatEvent) + Send>;

/// Ordered registry of event subscribers.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Handler)>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("next_id", &self.next_id)
            .field("subscribers", &format!("[{} subscribers]", self.subscribers.len()))
            .finish()
    }
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber and returns its token.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&CombatEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Removes a subscriber. Returns `false` if the token was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Delivers an event to every subscriber in subscription order.
    pub fn emit(&mut self, event: &CombatEvent) {
        for (_, handler) in &mut self.subscribers {
            handler(event);
        }
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns `true` if nobody is listening.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
