//! # Riposte Core
//!
//! Deterministic, tick-driven resolver for a two-combatant duel.
//!
//! Each combatant runs at most one skill at a time. Skills unfold through
//! timed phases; the engine advances both combatants in lockstep at a fixed
//! quantum, reveals telegraphs, resolves attack impacts against defense
//! windows, applies costs, exhaustion and damage, and publishes events, a
//! bounded combat log and a replayable action history.
//!
//! ## Architecture
//!
//! - **Skills**: validated, immutable data ([`skill::SkillCatalog`])
//! - **Actors**: resource pools, counter bonus, one [`action::Action`]
//! - **Resolvers**: impact and exhaustion ([`resolver`])
//! - **Engine**: tick scheduler and command surface ([`engine::Engine`])
//! - **Observation**: events, snapshots, history, combat log
//!
//! ## Usage
//!
//! ```
//! use riposte_core::action::DefensePrediction;
//! use riposte_core::actor::ActorId;
//! use riposte_core::config::EngineConfig;
//! use riposte_core::engine::Engine;
//! use riposte_core::skill::SkillCatalog;
//!
//! let catalog = SkillCatalog::bundled(100).unwrap();
//! let mut engine = Engine::new(EngineConfig::default(), catalog).unwrap();
//! engine.start();
//!
//! engine
//!     .execute_skill(ActorId::Npc, &"retreat".into(), DefensePrediction::default())
//!     .unwrap();
//! while !engine.actor(ActorId::Npc).is_idle() {
//!     engine.tick();
//! }
//! assert_eq!(engine.history().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod action;
pub mod actor;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod event;
pub mod history;
pub mod log;
pub mod pause;
pub mod resolver;
pub mod rules;
pub mod skill;
pub mod snapshot;

pub use engine::{Engine, ExecuteOutcome, Lifecycle, SharedEngine, TickOutcome};
pub use error::{CatalogError, CommandError, ConfigError, EngineError};

#[cfg(test)]
mod tests;
