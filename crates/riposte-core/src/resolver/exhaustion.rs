//! Exhaustion: HP drained by negative resource pools.

use serde::Serialize;

use crate::actor::ResourcePools;
use crate::rules::{
    FATIGUE_DRAIN_DIVISOR, FOCUS_DRAIN_DIVISOR, MP_DRAIN_DIVISOR, STAMINA_DRAIN_DIVISOR,
};

/// Per-pool HP drain computed from the current deficits.
///
/// The drain is recomputed from the full deficit on every execution, so a
/// fighter that stays exhausted keeps bleeding HP each time it acts.
///
/// # Example
///
/// ```
/// use riposte_core::actor::ResourcePools;
/// use riposte_core::config::Attributes;
/// use riposte_core::resolver::ExhaustionDrain;
/// use riposte_core::skill::ResourceCost;
///
/// let mut pools = ResourcePools::from_attributes(&Attributes::default());
/// pools.pay(&ResourceCost::new(26.0, 0.0, 0.0, 0.0));
///
/// let drain = ExhaustionDrain::of(&pools);
/// assert_eq!(drain.total(), 3.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ExhaustionDrain {
    /// Stamina deficit / 2.
    pub stamina: f64,
    /// MP deficit / 1.
    pub mp: f64,
    /// Focus deficit / 2.
    pub focus: f64,
    /// Daily fatigue deficit / 5.
    pub daily_fatigue: f64,
}

impl ExhaustionDrain {
    /// Computes the drain for the given pools.
    #[must_use]
    pub fn of(pools: &ResourcePools) -> Self {
        Self {
            stamina: pools.stamina.deficit() / STAMINA_DRAIN_DIVISOR,
            mp: pools.mp.deficit() / MP_DRAIN_DIVISOR,
            focus: pools.focus.deficit() / FOCUS_DRAIN_DIVISOR,
            daily_fatigue: pools.daily_fatigue.deficit() / FATIGUE_DRAIN_DIVISOR,
        }
    }

    /// Sum of all pool drains.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.stamina + self.mp + self.focus + self.daily_fatigue
    }

    /// Subtracts the total from HP. Returns the amount drained.
    pub fn apply(&self, pools: &mut ResourcePools) -> f64 {
        let total = self.total();
        pools.hp.current -= total;
        total
    }
}
