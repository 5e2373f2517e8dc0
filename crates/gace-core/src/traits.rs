//! The environment capability contract and constructor signature.

use indexmap::IndexMap;

use crate::config::Overrides;
use crate::error::{BoxError, EnvError};
use crate::id::TaskId;
use crate::space::BoxSpace;

/// Auxiliary information returned alongside each transition.
///
/// Holds named scalar diagnostics (simulated performance values, number of
/// met targets, ...). Keys are environment-specific.
pub type StepInfo = IndexMap<String, f64>;

/// Result of one [`Environment::step()`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Observation after applying the action.
    pub observation: Vec<f32>,
    /// Scalar reward for the action.
    pub reward: f64,
    /// The episode reached a terminal state (e.g. all targets met).
    pub terminal: bool,
    /// The episode was cut off by a step limit without reaching a
    /// terminal state.
    pub truncated: bool,
    /// Auxiliary diagnostics.
    pub info: StepInfo,
}

impl Transition {
    /// Whether the episode is over for either reason.
    pub fn done(&self) -> bool {
        self.terminal || self.truncated
    }
}

/// A simulation-backed design task with reset/step semantics.
///
/// Every constructor registered in a catalog returns a fully initialised
/// implementation of this trait. Implementations are `Send` so callers may
/// move them to worker threads; they are not required to be `Sync`.
pub trait Environment: Send {
    /// The task this environment implements.
    fn task_id(&self) -> TaskId;

    /// Shape and bounds of observations.
    fn observation_space(&self) -> &BoxSpace;

    /// Shape and bounds of actions, including the parameter each action
    /// dimension controls.
    fn action_space(&self) -> &BoxSpace;

    /// Start a new episode and return the initial observation.
    ///
    /// `seed` re-seeds the environment's random number generator; `None`
    /// continues the current stream.
    fn reset(&mut self, seed: Option<u64>) -> Result<Vec<f32>, EnvError>;

    /// Apply one action.
    ///
    /// Fails with [`EnvError::NotReset`] before the first reset and with
    /// [`EnvError::InvalidAction`] if `action` lies outside
    /// [`action_space()`](Environment::action_space).
    fn step(&mut self, action: &[f32]) -> Result<Transition, EnvError>;
}

/// Signature of a plain environment constructor function.
///
/// Registries also accept closures with the same signature.
pub type ConstructorFn = fn(&Overrides) -> Result<Box<dyn Environment>, BoxError>;
