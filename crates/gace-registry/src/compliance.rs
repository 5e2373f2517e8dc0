//! Environment contract checking.
//!
//! [`check_env`] drives an environment through a short seeded episode and
//! verifies the capability contract every registered constructor must
//! honour: reproducible resets, observations inside the declared
//! observation space, finite rewards, and rejection of actions outside the
//! declared action space.

use std::fmt;

use gace_core::{BoxSpace, EnvError, Environment};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Steps taken by [`check_env`].
pub const CHECK_STEPS: usize = 8;

/// Seed used by [`check_env`] for resets and action sampling.
pub const CHECK_SEED: u64 = 0x6ace;

/// A broken promise of the environment contract.
#[derive(Clone, Debug, PartialEq)]
pub enum ContractViolation {
    /// The action space has no dimensions.
    EmptyActionSpace,
    /// An action dimension is unbounded, so it cannot be sampled.
    UnboundedAction {
        /// Name of the unbounded dimension.
        name: String,
    },
    /// `reset()` failed.
    Reset(EnvError),
    /// `step()` failed on an in-space action.
    Step(EnvError),
    /// Two resets with the same seed produced different observations.
    ResetNotReproducible,
    /// An observation has the wrong number of elements.
    ObservationShape {
        /// Where the observation came from (`"reset"` or `"step"`).
        phase: &'static str,
        /// Length declared by the observation space.
        expected: usize,
        /// Length actually produced.
        actual: usize,
    },
    /// An observation element is NaN or outside its dimension's bounds.
    ObservationOutOfBounds {
        /// Where the observation came from (`"reset"` or `"step"`).
        phase: &'static str,
        /// Name of the offending dimension.
        name: String,
        /// The offending value.
        value: f32,
    },
    /// `step()` returned a NaN or infinite reward.
    NonFiniteReward {
        /// The offending reward.
        reward: f64,
    },
    /// `step()` accepted an action outside the action space.
    InvalidActionAccepted {
        /// Which kind of invalid action was accepted.
        case: &'static str,
    },
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyActionSpace => write!(f, "action space has no dimensions"),
            Self::UnboundedAction { name } => {
                write!(f, "action dimension '{name}' is unbounded")
            }
            Self::Reset(e) => write!(f, "reset failed: {e}"),
            Self::Step(e) => write!(f, "step failed: {e}"),
            Self::ResetNotReproducible => {
                write!(f, "resets with the same seed produced different observations")
            }
            Self::ObservationShape {
                phase,
                expected,
                actual,
            } => write!(
                f,
                "{phase} observation has {actual} elements, space declares {expected}"
            ),
            Self::ObservationOutOfBounds { phase, name, value } => {
                write!(f, "{phase} observation '{name}' = {value} is outside its bounds")
            }
            Self::NonFiniteReward { reward } => write!(f, "reward {reward} is not finite"),
            Self::InvalidActionAccepted { case } => {
                write!(f, "step accepted an invalid action ({case})")
            }
        }
    }
}

impl std::error::Error for ContractViolation {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Reset(e) | Self::Step(e) => Some(e),
            _ => None,
        }
    }
}

/// Check that `env` honours the environment contract.
///
/// Resets twice with [`CHECK_SEED`], then takes [`CHECK_STEPS`] steps with
/// actions sampled from the action space (resetting whenever an episode
/// ends), and finally feeds malformed actions that must be rejected. The
/// environment is left in an arbitrary mid-episode state.
pub fn check_env(env: &mut dyn Environment) -> Result<(), ContractViolation> {
    let action_space = env.action_space().clone();
    let obs_space = env.observation_space().clone();

    if action_space.is_empty() {
        return Err(ContractViolation::EmptyActionSpace);
    }
    if let Some(d) = action_space.dims().iter().find(|d| !d.is_bounded()) {
        return Err(ContractViolation::UnboundedAction {
            name: d.name.clone(),
        });
    }

    let first = env
        .reset(Some(CHECK_SEED))
        .map_err(ContractViolation::Reset)?;
    check_observation(&obs_space, &first, "reset")?;
    let second = env
        .reset(Some(CHECK_SEED))
        .map_err(ContractViolation::Reset)?;
    if first != second {
        return Err(ContractViolation::ResetNotReproducible);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(CHECK_SEED);
    for _ in 0..CHECK_STEPS {
        let action = action_space.sample(&mut rng);
        let t = env.step(&action).map_err(ContractViolation::Step)?;
        check_observation(&obs_space, &t.observation, "step")?;
        if !t.reward.is_finite() {
            return Err(ContractViolation::NonFiniteReward { reward: t.reward });
        }
        if t.done() {
            let obs = env.reset(None).map_err(ContractViolation::Reset)?;
            check_observation(&obs_space, &obs, "reset")?;
        }
    }

    let mut too_long = action_space.sample(&mut rng);
    too_long.push(0.0);
    expect_rejected(env, &too_long, "wrong length")?;

    let mut nan = action_space.sample(&mut rng);
    nan[0] = f32::NAN;
    expect_rejected(env, &nan, "NaN element")?;

    let mut out_of_bounds = action_space.sample(&mut rng);
    out_of_bounds[0] = action_space.dims()[0].high.next_up();
    expect_rejected(env, &out_of_bounds, "out of bounds")?;

    Ok(())
}

fn check_observation(
    space: &BoxSpace,
    obs: &[f32],
    phase: &'static str,
) -> Result<(), ContractViolation> {
    if obs.len() != space.len() {
        return Err(ContractViolation::ObservationShape {
            phase,
            expected: space.len(),
            actual: obs.len(),
        });
    }
    for (&value, d) in obs.iter().zip(space.dims()) {
        if value.is_nan() || value < d.low || value > d.high {
            return Err(ContractViolation::ObservationOutOfBounds {
                phase,
                name: d.name.clone(),
                value,
            });
        }
    }
    Ok(())
}

fn expect_rejected(
    env: &mut dyn Environment,
    action: &[f32],
    case: &'static str,
) -> Result<(), ContractViolation> {
    match env.step(action) {
        Err(EnvError::InvalidAction { .. }) => Ok(()),
        Err(other) => Err(ContractViolation::Step(other)),
        Ok(_) => Err(ContractViolation::InvalidActionAccepted { case }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gace_core::{
        Dimension, DimensionKind, ParameterKind, TaskId, Technology, Topology, Transition,
        Variant,
    };
    use gace_test_utils::MockEnv;

    fn task() -> TaskId {
        TaskId::new(Topology::Op1, Technology::Xh035, Variant::Geometrical)
    }

    #[test]
    fn mock_env_passes() {
        let mut env = MockEnv::new(task());
        check_env(&mut env).unwrap();
    }

    /// Accepts anything and reports a NaN reward.
    struct Sloppy {
        space: BoxSpace,
    }

    impl Sloppy {
        fn new() -> Self {
            Self {
                space: BoxSpace::new(vec![Dimension::new(
                    "W",
                    DimensionKind::Parameter(ParameterKind::Width),
                    -1.0,
                    1.0,
                )])
                .unwrap(),
            }
        }
    }

    impl Environment for Sloppy {
        fn task_id(&self) -> TaskId {
            task()
        }
        fn observation_space(&self) -> &BoxSpace {
            &self.space
        }
        fn action_space(&self) -> &BoxSpace {
            &self.space
        }
        fn reset(&mut self, _seed: Option<u64>) -> Result<Vec<f32>, EnvError> {
            Ok(vec![0.0])
        }
        fn step(&mut self, _action: &[f32]) -> Result<Transition, EnvError> {
            Ok(Transition {
                observation: vec![0.0],
                reward: f64::NAN,
                terminal: false,
                truncated: false,
                info: Default::default(),
            })
        }
    }

    #[test]
    fn nan_reward_is_reported() {
        let mut env = Sloppy::new();
        assert!(matches!(
            check_env(&mut env),
            Err(ContractViolation::NonFiniteReward { .. })
        ));
    }

    /// Validates actions against a space whose upper bound absorbs `+ 1.0`.
    struct Wide {
        action: BoxSpace,
        observation: BoxSpace,
    }

    impl Wide {
        fn new() -> Self {
            let dim = |low, high| {
                BoxSpace::new(vec![Dimension::new(
                    "M",
                    DimensionKind::Parameter(ParameterKind::Multiplicity),
                    low,
                    high,
                )])
                .unwrap()
            };
            Self {
                action: dim(0.0, 1e9),
                observation: dim(0.0, 1.0),
            }
        }
    }

    impl Environment for Wide {
        fn task_id(&self) -> TaskId {
            task()
        }
        fn observation_space(&self) -> &BoxSpace {
            &self.observation
        }
        fn action_space(&self) -> &BoxSpace {
            &self.action
        }
        fn reset(&mut self, _seed: Option<u64>) -> Result<Vec<f32>, EnvError> {
            Ok(vec![0.0])
        }
        fn step(&mut self, action: &[f32]) -> Result<Transition, EnvError> {
            if !self.action.contains(action) {
                return Err(EnvError::InvalidAction {
                    reason: "outside the action space".into(),
                });
            }
            Ok(Transition {
                observation: vec![0.0],
                reward: 0.0,
                terminal: false,
                truncated: false,
                info: Default::default(),
            })
        }
    }

    #[test]
    fn large_action_bounds_are_exceeded_correctly() {
        assert_eq!(1e9f32 + 1.0, 1e9f32);
        let mut env = Wide::new();
        check_env(&mut env).unwrap();
    }

    #[test]
    fn violation_display_names_the_problem() {
        let v = ContractViolation::ObservationShape {
            phase: "reset",
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            v.to_string(),
            "reset observation has 2 elements, space declares 3"
        );
    }
}
