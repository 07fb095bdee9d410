//! Test module for determinism and scenario tests.
//!
//! - `determinism.rs`: identical inputs produce identical event streams, logs
//!   and histories; timing properties hold for arbitrary aligned skills
//! - `integration.rs`: end-to-end duels through the public command surface
//! - `helpers.rs`: engine/skill factories and an event recorder

mod helpers;
mod integration;

// Re-export for convenience
pub use helpers::*;
