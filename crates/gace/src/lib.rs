//! GACE: a registry of analog circuit sizing environments for
//! reinforcement learning.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all GACE sub-crates. For most users, adding `gace` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use gace::prelude::*;
//!
//! let resolver = gace::standard_resolver();
//! let mut env = resolver
//!     .create("op2-xh035-v0", &Overrides::new().with("max_steps", 10))
//!     .unwrap();
//!
//! let obs = env.reset(Some(42)).unwrap();
//! assert_eq!(obs.len(), env.observation_space().len());
//!
//! let action = vec![0.0; env.action_space().len()];
//! let t = env.step(&action).unwrap();
//! assert!(t.reward.is_finite());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `gace-core` | Identifiers, spaces, overrides, errors, the `Environment` trait |
//! | [`registry`] | `gace-registry` | `Catalog`, `Resolver`, `check_env` |
//! | [`envs`] | `gace-envs` | Circuit templates, simulator backends, `CircuitEnv` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and identifiers (`gace-core`).
pub use gace_core as types;

/// Environment catalog, resolver, and contract checker (`gace-registry`).
pub use gace_registry as registry;

/// Built-in circuit sizing environments (`gace-envs`).
pub use gace_envs as envs;

use gace_registry::{Catalog, Resolver};

/// A fresh catalog holding every built-in environment.
pub fn standard_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    gace_envs::register_builtins(&mut catalog).expect("built-in identifiers are unique");
    catalog
}

/// A resolver over [`standard_catalog()`].
pub fn standard_resolver() -> Resolver {
    Resolver::new(standard_catalog())
}

/// Common imports for typical GACE usage.
///
/// ```rust
/// use gace::prelude::*;
/// ```
pub mod prelude {
    // Identifiers
    pub use gace_core::{TaskId, Technology, Topology, Variant};

    // Environment contract
    pub use gace_core::{BoxSpace, Environment, Transition};

    // Configuration
    pub use gace_core::{OverrideValue, Overrides};

    // Errors
    pub use gace_core::{EnvError, ResolveError};

    // Registry
    pub use gace_registry::{check_env, Catalog, Resolver};

    // Built-in environments
    pub use gace_envs::{register_builtins, CircuitEnv, BUILTIN_TASKS};
}
