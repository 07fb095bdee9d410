//! Engine and fighter configuration.
//!
//! Configuration is plain serde data with defaults for every field, so a
//! JSON file only needs to name what it changes:
//!
//! ```
//! use riposte_core::config::EngineConfig;
//!
//! let config: EngineConfig = serde_json::from_str(r#"{ "tick_interval_ms": 50 }"#).unwrap();
//! assert_eq!(config.tick_interval_ms, 50);
//! assert_eq!(config.log_capacity, 100);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rules::FEINT_WINDUP_PENALTY_MS;
use crate::skill::SkillId;

/// Attributes from which a fighter's starting pools are derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    /// HP and stamina.
    pub constitution: f64,
    /// Magic points.
    pub magic: f64,
    /// Focus and daily fatigue.
    pub willpower: f64,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            constitution: 10.0,
            magic: 10.0,
            willpower: 20.0,
        }
    }
}

/// Per-combatant configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FighterConfig {
    /// Display name used in the combat log.
    pub name: String,
    /// Attribute block.
    pub attributes: Attributes,
    /// Skills the fighter may use; `None` permits the whole catalog.
    pub allowed_skills: Option<Vec<SkillId>>,
}

impl FighterConfig {
    /// Creates a fighter with default attributes and every skill permitted.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Attributes::default(),
            allowed_skills: None,
        }
    }

    /// Sets the attribute block (builder pattern).
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Restricts the permitted skills (builder pattern).
    #[must_use]
    pub fn with_allowed_skills(mut self, skills: &[&str]) -> Self {
        self.allowed_skills = Some(skills.iter().map(|s| SkillId::new(s)).collect());
        self
    }
}

impl Default for FighterConfig {
    fn default() -> Self {
        Self::new("Fighter")
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed simulated time quantum per tick.
    pub tick_interval_ms: u64,
    /// Maximum number of combat log lines retained.
    pub log_capacity: usize,
    /// Player character.
    pub pc: FighterConfig,
    /// Opponent.
    pub npc: FighterConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            log_capacity: 100,
            pc: FighterConfig::new("Player"),
            npc: FighterConfig::new("Opponent"),
        }
    }
}

impl EngineConfig {
    /// Sets the tick quantum (builder pattern).
    #[must_use]
    pub const fn with_tick_interval(mut self, tick_interval_ms: u64) -> Self {
        self.tick_interval_ms = tick_interval_ms;
        self
    }

    /// Checks the configuration for values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if FEINT_WINDUP_PENALTY_MS % self.tick_interval_ms != 0 {
            return Err(ConfigError::FeintPenaltyNotAligned {
                tick: self.tick_interval_ms,
                penalty: FEINT_WINDUP_PENALTY_MS,
            });
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::ZeroLogCapacity);
        }
        for fighter in [&self.pc, &self.npc] {
            if fighter.attributes.constitution <= 0.0 {
                return Err(ConfigError::NonPositiveHp(fighter.name.clone()));
            }
        }
        Ok(())
    }
}
