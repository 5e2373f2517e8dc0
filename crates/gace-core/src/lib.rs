//! Core types and traits for GACE circuit design environments.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by the registry and the concrete environments: task
//! identifiers, space descriptors, configuration overrides, error types
//! and the [`Environment`] trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod id;
pub mod space;
pub mod traits;

pub use config::{OverrideValue, Overrides};
pub use error::{
    BoxError, ConstructionError, DuplicateIdentifierError, EnvError, ResolveError,
    UnknownEnvironmentError,
};
pub use id::{ParseTaskIdError, TaskId, Technology, Topology, Variant};
pub use space::{BoxSpace, Dimension, DimensionKind, ParameterKind, SpaceError};
pub use traits::{ConstructorFn, Environment, StepInfo, Transition};
