//! Environment configuration, validation, and error types.
//!
//! [`EnvConfig`] is parsed from the caller's [`Overrides`] by
//! [`from_overrides()`](EnvConfig::from_overrides), which only checks
//! option names and value types. [`validate()`](EnvConfig::validate) then
//! checks ranges and target names against the circuit being built.

use std::error::Error;
use std::fmt;

use gace_core::{OverrideValue, Overrides, SpaceError, TaskId};
use indexmap::IndexMap;

use crate::backend::{BackendError, BACKENDS};
use crate::circuit::CircuitTemplate;

/// Option names understood by [`EnvConfig::from_overrides`].
pub const OPTIONS: &[&str] = &[
    "max_steps",
    "seed",
    "target",
    "random_start",
    "reltol",
    "backend",
];

// ── EnvConfig ──────────────────────────────────────────────────────

/// Typed configuration of a circuit environment.
#[derive(Clone, Debug, PartialEq)]
pub struct EnvConfig {
    /// Steps per episode before truncation. Default: 50.
    pub max_steps: u32,
    /// Seed for the episode RNG when `reset()` is called without one.
    /// Default: 0.
    pub seed: u64,
    /// Target overrides by metric name (SI units). Metrics not listed keep
    /// the circuit's default target.
    pub targets: IndexMap<String, f64>,
    /// Start episodes from a random design instead of the nominal one.
    /// Default: false.
    pub random_start: bool,
    /// Relative tolerance under which a target counts as met. Default: 0.01.
    pub reltol: f64,
    /// Simulator backend name. Default: `"surrogate"`.
    pub backend: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            max_steps: 50,
            seed: 0,
            targets: IndexMap::new(),
            random_start: false,
            reltol: 0.01,
            backend: "surrogate".to_string(),
        }
    }
}

impl EnvConfig {
    /// Parse `overrides` on top of the defaults.
    ///
    /// Fails on unknown option names and on values of the wrong type.
    /// Ranges are checked separately by [`validate()`](EnvConfig::validate).
    pub fn from_overrides(overrides: &Overrides) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for (key, value) in overrides.iter() {
            match key {
                "max_steps" => {
                    let n = expect(key, value, "int", value.as_int())?;
                    config.max_steps = u32::try_from(n).map_err(|_| ConfigError::OutOfRange {
                        key: key.to_string(),
                        reason: format!("{n} is not a step count"),
                    })?;
                }
                "seed" => {
                    let n = expect(key, value, "int", value.as_int())?;
                    config.seed = u64::try_from(n).map_err(|_| ConfigError::OutOfRange {
                        key: key.to_string(),
                        reason: format!("seed must be non-negative, got {n}"),
                    })?;
                }
                "target" => {
                    let map = expect(key, value, "map", value.as_map())?;
                    for (metric, v) in map {
                        let t = expect(&format!("target.{metric}"), v, "float", v.as_float())?;
                        config.targets.insert(metric.clone(), t);
                    }
                }
                "random_start" => {
                    config.random_start = expect(key, value, "bool", value.as_bool())?;
                }
                "reltol" => config.reltol = expect(key, value, "float", value.as_float())?,
                "backend" => {
                    config.backend = expect(key, value, "string", value.as_str())?.to_string();
                }
                _ => {
                    return Err(ConfigError::UnknownOption {
                        key: key.to_string(),
                    })
                }
            }
        }
        Ok(config)
    }

    /// Check the configuration against `circuit`.
    pub fn validate(&self, circuit: &CircuitTemplate) -> Result<(), ConfigError> {
        // 1. At least one step per episode.
        if self.max_steps == 0 {
            return Err(ConfigError::OutOfRange {
                key: "max_steps".into(),
                reason: "must be at least 1".into(),
            });
        }
        // 2. reltol in (0, 1).
        if !(self.reltol > 0.0 && self.reltol < 1.0) {
            return Err(ConfigError::OutOfRange {
                key: "reltol".into(),
                reason: format!("{} is not in (0, 1)", self.reltol),
            });
        }
        // 3. Targets name metrics of this circuit and are finite.
        for (name, &value) in &self.targets {
            if circuit.metric_index(name).is_none() {
                return Err(ConfigError::UnknownMetric {
                    name: name.clone(),
                    available: circuit.metrics.iter().map(|m| m.name).collect(),
                });
            }
            if !value.is_finite() {
                return Err(ConfigError::OutOfRange {
                    key: format!("target.{name}"),
                    reason: format!("{value} is not finite"),
                });
            }
        }
        // 4. Backend exists.
        if !BACKENDS.contains(&self.backend.as_str()) {
            return Err(ConfigError::Backend(BackendError::Unknown {
                name: self.backend.clone(),
            }));
        }
        Ok(())
    }

    /// Effective targets for `circuit`, in metric order.
    pub fn resolve_targets(&self, circuit: &CircuitTemplate) -> Vec<f64> {
        circuit
            .metrics
            .iter()
            .map(|m| self.targets.get(m.name).copied().unwrap_or(m.target))
            .collect()
    }
}

fn expect<T>(
    key: &str,
    value: &OverrideValue,
    expected: &'static str,
    parsed: Option<T>,
) -> Result<T, ConfigError> {
    parsed.ok_or_else(|| ConfigError::WrongType {
        key: key.to_string(),
        expected,
        found: value.type_name(),
    })
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors that make a circuit environment impossible to construct.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// An override names no known option.
    UnknownOption {
        /// The unrecognised key.
        key: String,
    },
    /// An override value has the wrong type.
    WrongType {
        /// The option key.
        key: String,
        /// Expected value type.
        expected: &'static str,
        /// Type actually supplied.
        found: &'static str,
    },
    /// An option value is outside its valid range.
    OutOfRange {
        /// The option key.
        key: String,
        /// What is wrong with the value.
        reason: String,
    },
    /// A target names a metric the circuit does not report.
    UnknownMetric {
        /// The unknown metric name.
        name: String,
        /// Metrics the circuit does report.
        available: Vec<&'static str>,
    },
    /// The topology cannot be driven with the requested variant.
    UnsupportedVariant {
        /// The requested task.
        id: TaskId,
    },
    /// The simulator backend cannot be opened.
    Backend(BackendError),
    /// A derived action or observation space is malformed.
    Space(SpaceError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOption { key } => write!(
                f,
                "unknown option '{key}' (known: {})",
                OPTIONS.join(", ")
            ),
            Self::WrongType {
                key,
                expected,
                found,
            } => write!(f, "option '{key}' expects {expected}, got {found}"),
            Self::OutOfRange { key, reason } => write!(f, "option '{key}': {reason}"),
            Self::UnknownMetric { name, available } => write!(
                f,
                "unknown target metric '{name}' (available: {})",
                available.join(", ")
            ),
            Self::UnsupportedVariant { id } => write!(
                f,
                "{} does not support {} actions",
                id.topology, id.variant
            ),
            Self::Backend(e) => write!(f, "backend: {e}"),
            Self::Space(e) => write!(f, "space: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Backend(e) => Some(e),
            Self::Space(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BackendError> for ConfigError {
    fn from(e: BackendError) -> Self {
        Self::Backend(e)
    }
}
