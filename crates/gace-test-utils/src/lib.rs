//! Test utilities and mock environments for GACE development.
//!
//! Provides a minimal [`MockEnv`] implementing [`Environment`], plus
//! constructor fixtures for exercising registries without a simulator:
//!
//! - [`mock_constructor`] — always builds a [`MockEnv`].
//! - [`failing_constructor`] — always fails with [`BackendUnavailable`].
//! - [`CountingConstructor`] — builds mocks and counts invocations.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gace_core::{
    BoxError, BoxSpace, Dimension, DimensionKind, EnvError, Environment, Overrides,
    ParameterKind, StepInfo, TaskId, Transition,
};

/// Environment with a two-dimensional geometrical action space.
///
/// The observation echoes the last action. Reward is the negative squared
/// norm of the action; the episode terminates after `episode_len` steps.
pub struct MockEnv {
    id: TaskId,
    obs_space: BoxSpace,
    action_space: BoxSpace,
    episode_len: usize,
    steps: Option<usize>,
    /// Value of the `marker` override at construction, echoed in step info.
    pub marker: Option<i64>,
    last: Vec<f32>,
}

impl MockEnv {
    pub fn new(id: TaskId) -> Self {
        let param = |name: &str, kind| {
            Dimension::new(name, DimensionKind::Parameter(kind), -1.0, 1.0)
        };
        Self {
            id,
            obs_space: BoxSpace::new(vec![
                param("W", ParameterKind::Width),
                param("L", ParameterKind::Length),
            ])
            .expect("static bounds"),
            action_space: BoxSpace::new(vec![
                param("W", ParameterKind::Width),
                param("L", ParameterKind::Length),
            ])
            .expect("static bounds"),
            episode_len: 5,
            steps: None,
            marker: None,
            last: vec![0.0; 2],
        }
    }

    /// Steps taken in the current episode, `None` before the first reset.
    pub fn steps(&self) -> Option<usize> {
        self.steps
    }
}

impl Environment for MockEnv {
    fn task_id(&self) -> TaskId {
        self.id
    }

    fn observation_space(&self) -> &BoxSpace {
        &self.obs_space
    }

    fn action_space(&self) -> &BoxSpace {
        &self.action_space
    }

    fn reset(&mut self, _seed: Option<u64>) -> Result<Vec<f32>, EnvError> {
        self.steps = Some(0);
        self.last = vec![0.0; 2];
        Ok(self.last.clone())
    }

    fn step(&mut self, action: &[f32]) -> Result<Transition, EnvError> {
        let steps = self.steps.as_mut().ok_or(EnvError::NotReset)?;
        if !self.action_space.contains(action) {
            return Err(EnvError::InvalidAction {
                reason: format!("{action:?} outside [-1, 1]^2"),
            });
        }
        *steps += 1;
        self.last = action.to_vec();
        let mut info = StepInfo::new();
        info.insert("steps".into(), *steps as f64);
        if let Some(marker) = self.marker {
            info.insert("marker".into(), marker as f64);
        }
        Ok(Transition {
            observation: self.last.clone(),
            reward: -action.iter().map(|&a| f64::from(a * a)).sum::<f64>(),
            terminal: *steps >= self.episode_len,
            truncated: false,
            info,
        })
    }
}

/// A constructor closure that always builds a [`MockEnv`] for `id`.
///
/// An integer `marker` override is copied onto the mock so tests can
/// observe that overrides reached the constructor.
pub fn mock_constructor(
    id: TaskId,
) -> impl Fn(&Overrides) -> Result<Box<dyn Environment>, BoxError> + Send + Sync + 'static {
    move |overrides: &Overrides| -> Result<Box<dyn Environment>, BoxError> {
        let mut env = MockEnv::new(id);
        env.marker = overrides.get("marker").and_then(|v| v.as_int());
        Ok(Box::new(env))
    }
}

/// Error returned by [`failing_constructor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendUnavailable {
    pub reason: String,
}

impl fmt::Display for BackendUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "simulator backend unavailable: {}", self.reason)
    }
}

impl std::error::Error for BackendUnavailable {}

/// A constructor closure that always fails with [`BackendUnavailable`].
pub fn failing_constructor(
    reason: impl Into<String>,
) -> impl Fn(&Overrides) -> Result<Box<dyn Environment>, BoxError> + Send + Sync + 'static {
    let reason = reason.into();
    move |_: &Overrides| -> Result<Box<dyn Environment>, BoxError> {
        Err(Box::new(BackendUnavailable {
            reason: reason.clone(),
        }))
    }
}

/// Builds [`MockEnv`]s and counts how often it was invoked.
///
/// Cloning shares the counter, so a clone can be registered while the
/// original is kept for assertions.
#[derive(Clone)]
pub struct CountingConstructor {
    id: TaskId,
    calls: Arc<AtomicUsize>,
}

impl CountingConstructor {
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// How many environments have been constructed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// A constructor closure sharing this counter.
    pub fn constructor(
        &self,
    ) -> impl Fn(&Overrides) -> Result<Box<dyn Environment>, BoxError> + Send + Sync + 'static
    {
        let id = self.id;
        let calls = Arc::clone(&self.calls);
        move |_: &Overrides| -> Result<Box<dyn Environment>, BoxError> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(MockEnv::new(id)))
        }
    }
}
