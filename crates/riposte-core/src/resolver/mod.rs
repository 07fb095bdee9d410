//! Resolvers that turn timing collisions and resource deficits into state
//! changes.
//!
//! Resolvers mutate actor state and return a report describing what they
//! did. They never touch the pause controller, the event bus or the combat
//! log; the engine turns reports into events, log lines and death checks.
//!
//! # Available Resolvers
//!
//! - [`ImpactResolver`]: attack impact against the opposing defense
//! - [`ExhaustionDrain`]: HP drain from negative resource pools

mod exhaustion;
mod impact;

pub use exhaustion::ExhaustionDrain;
pub use impact::{DefenseOutcome, ImpactReport, ImpactResolver, PredictionMiss};
