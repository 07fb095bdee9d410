//! Impact resolver: an attack landing against the opposing defense.
//!
//! # Resolution
//!
//! 1. Find the defender's defense action, if any.
//! 2. Check the impact instant against the defense's own active window,
//!    measured from the defense's start tick. The defender's phase label is
//!    not consulted, so update order within a tick cannot skew the result.
//! 3. Check required predictions. A missing or wrong prediction is a
//!    mismatch and the attack lands unmitigated.
//! 4. On a match, apply the defense's damage reduction and grant its counter
//!    bonus. A parry inside its window pays a stamina surcharge whether or
//!    not it matched.
//! 5. Subtract the damage from the defender's HP.
//!
//! The death check belongs to the engine.

use std::fmt;

use serde::Serialize;

use crate::action::{Action, Phase};
use crate::actor::{ActorId, ActorState};
use crate::rules::PARRY_STAMINA_SURCHARGE;
use crate::skill::{AttackLine, AttackProfile, DefenseProfile, DefenseType, SkillId};

/// Why a defense inside its window failed to match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "miss", rename_all = "snake_case")]
pub enum PredictionMiss {
    /// The defense requires a line prediction and none was given.
    MissingLine,
    /// The predicted line differs from the attack's line.
    WrongLine {
        /// What the defender predicted.
        predicted: AttackLine,
        /// The attack's actual line.
        actual: AttackLine,
    },
    /// The defense requires a skill prediction and none was given.
    MissingAttack,
    /// The predicted skill differs from the attack.
    WrongAttack {
        /// What the defender predicted.
        predicted: SkillId,
        /// The actual attack.
        actual: SkillId,
    },
}

impl fmt::Display for PredictionMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLine => write!(f, "no line predicted"),
            Self::WrongLine { predicted, actual } => {
                write!(f, "predicted line {predicted}, attack came {actual}")
            }
            Self::MissingAttack => write!(f, "no attack predicted"),
            Self::WrongAttack { predicted, actual } => {
                write!(f, "predicted {predicted}, attack was {actual}")
            }
        }
    }
}

/// What the defender's action did against the impact.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DefenseOutcome {
    /// No defense action in progress.
    Undefended,
    /// A defense was in progress but not active at the impact instant.
    Inactive {
        /// The defense skill.
        defense: SkillId,
        /// The defense's phase at the impact instant.
        phase: Option<Phase>,
    },
    /// Active, but a required prediction did not match.
    Mismatched {
        /// The defense skill.
        defense: SkillId,
        /// What went wrong.
        miss: PredictionMiss,
    },
    /// Active and matched; damage was mitigated.
    Blocked {
        /// The defense skill.
        defense: SkillId,
    },
}

impl DefenseOutcome {
    /// Returns `true` if the defense mitigated the attack.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

/// Everything the resolver changed for one impact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactReport {
    /// Attacking actor.
    pub attacker: ActorId,
    /// Defending actor.
    pub defender: ActorId,
    /// Attack skill.
    pub skill: SkillId,
    /// Damage before mitigation.
    pub base_damage: f64,
    /// Damage applied to the defender's HP.
    pub damage: f64,
    /// How the defense fared.
    pub defense: DefenseOutcome,
    /// Stamina the defender paid for parrying.
    pub parry_surcharge: f64,
    /// Counter bonus granted to the defender.
    pub counter_bonus_ms: Option<u64>,
    /// Defender HP after the impact.
    pub defender_hp: f64,
}

impl ImpactReport {
    /// Returns `true` if any damage landed.
    #[must_use]
    pub fn hit(&self) -> bool {
        self.damage > 0.0
    }
}

/// Resolver for attack impacts.
///
/// # Example
///
/// ```
/// use riposte_core::resolver::ImpactResolver;
///
/// let resolver = ImpactResolver::new();
/// # let _ = resolver;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ImpactResolver;

impl ImpactResolver {
    /// Creates a new impact resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolves the attacker's impact at absolute `tick` against `defender`.
    ///
    /// Returns `None` if the attacker has no attack in progress.
    pub fn resolve(
        &self,
        attacker: &ActorState,
        defender: &mut ActorState,
        tick: u64,
    ) -> Option<ImpactReport> {
        let action = attacker.action()?;
        let skill = action.skill();
        let attack = skill.as_attack()?;

        let defense = Self::assess(attack, &skill.id, defender.action(), tick);

        let mut damage = attack.damage;
        let mut parry_surcharge = 0.0;
        let mut counter_bonus_ms = None;

        if let Some((profile, outcome)) = &defense {
            let in_window = matches!(
                outcome,
                DefenseOutcome::Blocked { .. } | DefenseOutcome::Mismatched { .. }
            );
            if in_window && profile.defense_type == DefenseType::Parry {
                parry_surcharge = skill.costs.stamina * PARRY_STAMINA_SURCHARGE;
                defender.resources_mut().stamina.current -= parry_surcharge;
            }
            if outcome.is_blocked() {
                damage = profile.reduction.apply(attack.damage);
                if let Some(bonus) = profile.counter_speed_bonus_ms {
                    defender.counter_bonus.grant(bonus);
                    counter_bonus_ms = Some(bonus);
                }
            }
        }

        defender.resources_mut().hp.current -= damage;

        Some(ImpactReport {
            attacker: attacker.id(),
            defender: defender.id(),
            skill: skill.id.clone(),
            base_damage: attack.damage,
            damage,
            defense: defense.map_or(DefenseOutcome::Undefended, |(_, outcome)| outcome),
            parry_surcharge,
            counter_bonus_ms,
            defender_hp: defender.resources().hp.current,
        })
    }

    /// Classifies the defender's action at the impact instant.
    fn assess(
        attack: &AttackProfile,
        attack_id: &SkillId,
        defense_action: Option<&Action>,
        tick: u64,
    ) -> Option<(DefenseProfile, DefenseOutcome)> {
        let action = defense_action?;
        let profile = action.skill().as_defense()?.clone();
        let defense = action.skill().id.clone();

        let elapsed = tick.saturating_sub(action.start_tick());
        let active = action
            .active_window()
            .is_some_and(|window| window.contains(&elapsed));
        if !active {
            let phase = action.phase_at_tick(tick);
            return Some((profile, DefenseOutcome::Inactive { defense, phase }));
        }

        let outcome = match Self::check_prediction(&profile, action, attack, attack_id) {
            Ok(()) => DefenseOutcome::Blocked { defense },
            Err(miss) => DefenseOutcome::Mismatched { defense, miss },
        };
        Some((profile, outcome))
    }

    fn check_prediction(
        profile: &DefenseProfile,
        action: &Action,
        attack: &AttackProfile,
        attack_id: &SkillId,
    ) -> Result<(), PredictionMiss> {
        let prediction = action.prediction();
        if profile.requires_line {
            match &prediction.line {
                None => return Err(PredictionMiss::MissingLine),
                Some(line) if *line != attack.line => {
                    return Err(PredictionMiss::WrongLine {
                        predicted: line.clone(),
                        actual: attack.line.clone(),
                    })
                }
                Some(_) => {}
            }
        }
        if profile.requires_attack_id {
            match &prediction.attack {
                None => return Err(PredictionMiss::MissingAttack),
                Some(predicted) if predicted != attack_id => {
                    return Err(PredictionMiss::WrongAttack {
                        predicted: predicted.clone(),
                        actual: attack_id.clone(),
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
