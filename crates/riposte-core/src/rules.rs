//! Fixed combat rule constants.
//!
//! These values are part of the rules of the duel rather than per-skill data,
//! so they live here instead of in the catalog.

/// Feint stamina charge as a multiple of the original attack's stamina cost.
pub const FEINT_STAMINA_MULTIPLIER: f64 = 1.4;

/// Flat focus charged by a feint.
pub const FEINT_FOCUS_SURCHARGE: f64 = 3.0;

/// Flat daily fatigue charged by a feint.
pub const FEINT_FATIGUE_SURCHARGE: f64 = 3.0;

/// Wind-up slowdown applied to the replacement attack of a feint.
///
/// The engine tick must divide this value.
pub const FEINT_WINDUP_PENALTY_MS: u64 = 100;

/// Parry stamina surcharge as a fraction of the attacker's stamina cost.
pub const PARRY_STAMINA_SURCHARGE: f64 = 0.25;

/// Stamina deficit per point of HP drained.
pub const STAMINA_DRAIN_DIVISOR: f64 = 2.0;

/// MP deficit per point of HP drained.
pub const MP_DRAIN_DIVISOR: f64 = 1.0;

/// Focus deficit per point of HP drained.
pub const FOCUS_DRAIN_DIVISOR: f64 = 2.0;

/// Daily fatigue deficit per point of HP drained.
pub const FATIGUE_DRAIN_DIVISOR: f64 = 5.0;
