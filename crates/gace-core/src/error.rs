//! Error types for the GACE registry and environments.
//!
//! Organised by subsystem: registration (catalog population), resolution
//! (identifier lookup and construction) and environment execution.

use std::error::Error;
use std::fmt;

use crate::id::TaskId;

/// Boxed, thread-safe error used for constructor failures.
///
/// Constructors may fail for any reason (bad configuration, missing
/// technology data, unavailable simulator), so the registry wraps the
/// cause without knowing its concrete type.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

// ── Registration ───────────────────────────────────────────────────

/// An identifier was registered twice.
///
/// Raised during catalog population. This is a configuration bug and is
/// expected to abort start-up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateIdentifierError {
    /// The identifier that was already present.
    pub id: TaskId,
}

impl fmt::Display for DuplicateIdentifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "environment '{}' is already registered", self.id)
    }
}

impl Error for DuplicateIdentifierError {}

// ── Resolution ─────────────────────────────────────────────────────

/// No environment is registered under the requested identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownEnvironmentError {
    /// The identifier exactly as the caller supplied it.
    pub requested: String,
    /// Registered identifiers offered as alternatives.
    ///
    /// Restricted to the requested topology when that topology has
    /// registered entries, otherwise the full registered set.
    pub candidates: Vec<TaskId>,
}

impl fmt::Display for UnknownEnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown environment '{}'", self.requested)?;
        if self.candidates.is_empty() {
            return write!(f, "; no environments are registered");
        }
        write!(f, "; registered: ")?;
        for (i, id) in self.candidates.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

impl Error for UnknownEnvironmentError {}

/// A registered constructor failed to produce an environment.
#[derive(Debug)]
pub struct ConstructionError {
    /// The identifier whose constructor failed.
    pub id: TaskId,
    /// The underlying failure, preserved for diagnosis.
    pub source: BoxError,
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to construct '{}': {}", self.id, self.source)
    }
}

impl Error for ConstructionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Errors from `Resolver::create`.
#[derive(Debug)]
pub enum ResolveError {
    /// The identifier matched no catalog entry.
    Unknown(UnknownEnvironmentError),
    /// The constructor for a matched entry failed.
    Construction(ConstructionError),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(e) => write!(f, "{e}"),
            Self::Construction(e) => write!(f, "{e}"),
        }
    }
}

impl Error for ResolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unknown(e) => Some(e),
            Self::Construction(e) => Some(e),
        }
    }
}

impl From<UnknownEnvironmentError> for ResolveError {
    fn from(e: UnknownEnvironmentError) -> Self {
        Self::Unknown(e)
    }
}

impl From<ConstructionError> for ResolveError {
    fn from(e: ConstructionError) -> Self {
        Self::Construction(e)
    }
}

// ── Environment execution ──────────────────────────────────────────

/// Errors from `Environment::reset()` and `Environment::step()`.
#[derive(Clone, Debug, PartialEq)]
pub enum EnvError {
    /// `step()` was called before the first `reset()`.
    NotReset,
    /// The action does not belong to the declared action space.
    InvalidAction {
        /// What is wrong with the action.
        reason: String,
    },
    /// The simulator backend failed to evaluate the design.
    Simulation {
        /// Backend-provided description of the failure.
        reason: String,
    },
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReset => write!(f, "environment must be reset before stepping"),
            Self::InvalidAction { reason } => write!(f, "invalid action: {reason}"),
            Self::Simulation { reason } => write!(f, "simulation failed: {reason}"),
        }
    }
}

impl Error for EnvError {}
