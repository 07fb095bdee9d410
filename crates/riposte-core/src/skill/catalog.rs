//! Validated, read-only skill catalog.
//!
//! The catalog is the only way skills enter the engine. Validation runs once,
//! at load time, against the tick quantum the engine will run with. A single
//! invalid entry rejects the whole catalog; values are never coerced.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::CatalogError;

use super::{Skill, SkillId, SkillKind};

/// The reference catalog shipped with the crate: five attacks, four defenses.
pub const BUNDLED_SKILLS_JSON: &str = include_str!("../../data/skills.json");

/// Immutable mapping from skill id to validated skill definition.
///
/// Skills are stored behind `Arc` so actions can hold their skill without
/// copying it; the catalog itself can be shared freely without locking.
///
/// # Example
///
/// ```
/// use riposte_core::skill::{AttackLine, Skill, SkillCatalog};
///
/// let skills = vec![Skill::attack("thrust", AttackLine::new("center"), 500, 200, 300, 4.0)];
/// let catalog = SkillCatalog::new(skills, 100).unwrap();
/// assert!(catalog.get(&"thrust".into()).is_some());
///
/// // 50 + 25 = 75 is not a multiple of 100
/// let skills = vec![Skill::attack("jab", AttackLine::new("center"), 50, 25, 100, 1.0)];
/// assert!(SkillCatalog::new(skills, 100).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SkillCatalog {
    /// Skills keyed by id, iterated in id order.
    skills: BTreeMap<SkillId, Arc<Skill>>,
    /// Tick quantum the catalog was validated against.
    quantum_ms: u64,
}

impl SkillCatalog {
    /// Validates and accepts a set of skills for the given tick quantum.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] found; no partial catalog is built.
    pub fn new(
        skills: impl IntoIterator<Item = Skill>,
        quantum_ms: u64,
    ) -> Result<Self, CatalogError> {
        if quantum_ms == 0 {
            return Err(CatalogError::ZeroQuantum);
        }

        let mut map = BTreeMap::new();
        for skill in skills {
            validate_skill(&skill, quantum_ms)?;
            if map.contains_key(&skill.id) {
                return Err(CatalogError::DuplicateSkill(skill.id));
            }
            map.insert(skill.id.clone(), Arc::new(skill));
        }

        tracing::debug!(skills = map.len(), quantum_ms, "skill catalog loaded");

        Ok(Self {
            skills: map,
            quantum_ms,
        })
    }

    /// Parses a JSON array of skills and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON, or any validation
    /// error from [`SkillCatalog::new`].
    pub fn from_json_str(json: &str, quantum_ms: u64) -> Result<Self, CatalogError> {
        let skills: Vec<Skill> = serde_json::from_str(json)?;
        Self::new(skills, quantum_ms)
    }

    /// Loads [`BUNDLED_SKILLS_JSON`] for the given tick quantum.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the quantum does not divide the bundled
    /// timings.
    pub fn bundled(quantum_ms: u64) -> Result<Self, CatalogError> {
        Self::from_json_str(BUNDLED_SKILLS_JSON, quantum_ms)
    }

    /// Looks up a skill by id.
    #[must_use]
    pub fn get(&self, id: &SkillId) -> Option<&Arc<Skill>> {
        self.skills.get(id)
    }

    /// Returns `true` if the catalog contains the id.
    #[must_use]
    pub fn contains(&self, id: &SkillId) -> bool {
        self.skills.contains_key(id)
    }

    /// Iterates over skill ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &SkillId> {
        self.skills.keys()
    }

    /// Iterates over skills in id order.
    pub fn skills(&self) -> impl Iterator<Item = &Arc<Skill>> {
        self.skills.values()
    }

    /// The tick quantum this catalog was validated against.
    #[must_use]
    pub const fn quantum_ms(&self) -> u64 {
        self.quantum_ms
    }

    /// Number of skills.
    #[must_use]
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Returns `true` if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

fn validate_skill(skill: &Skill, quantum: u64) -> Result<(), CatalogError> {
    // Phase math adds durations to the current tick and casts them to i64.
    let fits = skill
        .checked_total_duration()
        .is_some_and(|total| i64::try_from(total).is_ok());
    if !fits {
        return Err(CatalogError::DurationOverflow {
            skill: skill.id.clone(),
        });
    }
    match &skill.kind {
        SkillKind::Attack(attack) => {
            let wind_up = attack.wind_up.duration_ms;
            let expected = wind_up.checked_add(attack.committed_ms).ok_or_else(|| {
                CatalogError::DurationOverflow {
                    skill: skill.id.clone(),
                }
            })?;
            if attack.impact_tick != expected {
                return Err(CatalogError::ImpactMismatch {
                    skill: skill.id.clone(),
                    impact: attack.impact_tick,
                    wind_up,
                    committed: attack.committed_ms,
                });
            }
            if attack.impact_tick == 0 {
                return Err(CatalogError::ImpactNotPositive {
                    skill: skill.id.clone(),
                });
            }
            if attack.impact_tick % quantum != 0 {
                return Err(CatalogError::ImpactNotAligned {
                    skill: skill.id.clone(),
                    impact: attack.impact_tick,
                    quantum,
                });
            }
        }
        SkillKind::Defense(defense) => {
            let reduction = defense.reduction;
            if !(0.0..=1.0).contains(&reduction.percent) || reduction.flat < 0.0 {
                return Err(CatalogError::InvalidReduction {
                    skill: skill.id.clone(),
                    flat: reduction.flat,
                    percent: reduction.percent,
                });
            }
            if let Some(bonus) = defense.counter_speed_bonus_ms {
                if bonus % quantum != 0 {
                    return Err(CatalogError::CounterBonusNotAligned {
                        skill: skill.id.clone(),
                        bonus,
                        quantum,
                    });
                }
            }
        }
        SkillKind::Special(_) => {}
    }

    let mut previous: Option<u32> = None;
    for telegraph in &skill.telegraphs {
        if let Some(prev) = previous {
            if telegraph.stage <= prev {
                return Err(CatalogError::TelegraphStageOrder {
                    skill: skill.id.clone(),
                    stage: telegraph.stage,
                    previous: prev,
                });
            }
        }
        if telegraph.trigger_ms % quantum != 0 {
            return Err(CatalogError::TelegraphNotAligned {
                skill: skill.id.clone(),
                stage: telegraph.stage,
                trigger: telegraph.trigger_ms,
                quantum,
            });
        }
        previous = Some(telegraph.stage);
    }

    Ok(())
}
