//! Analog circuit sizing environments.
//!
//! Each built-in task pairs a circuit [`template`](circuit::template)
//! (OP1 to OP6 amplifiers, a NAND4 gate, an ST1 Schmitt trigger) with a
//! technology ([`TechnologyData`]), an action encoding
//! ([`ActionSchema`]) and a [`Simulator`] backend. [`register_builtins`]
//! adds all of them to a [`Catalog`](gace_registry::Catalog).
//!
//! ```ignore
//! let mut catalog = Catalog::new();
//! gace_envs::register_builtins(&mut catalog)?;
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod action;
pub mod backend;
pub mod catalog;
pub mod circuit;
pub mod config;
pub mod device;
pub mod env;
pub mod technology;

pub use action::{ActionSchema, ParamRange, Scale};
pub use backend::{
    open_backend, BackendError, Performance, SimulationError, Simulator, SurrogateSimulator,
};
pub use catalog::{constructor, register_builtins, BUILTIN_TASKS};
pub use circuit::{template, Architecture, CircuitKind, CircuitTemplate, Goal, Metric};
pub use config::{ConfigError, EnvConfig};
pub use device::{OperatingPoint, Sizing};
pub use env::CircuitEnv;
pub use technology::{Polarity, TechnologyData};
