//! Environment catalog and resolver for GACE circuit design tasks.
//!
//! - [`Catalog`]: write-once mapping from [`TaskId`](gace_core::TaskId) to
//!   environment constructors, enumerable in registration order.
//! - [`Resolver`]: exact-match lookup plus construction, with explicit
//!   [`ResolveError`](gace_core::ResolveError)s on misses and constructor
//!   failures.
//! - [`check_env`]: verifies that an environment honours the reset/step
//!   contract.
//!
//! The registry knows nothing about circuits. Concrete environments are
//! registered by their own crates.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod compliance;
pub mod resolver;

pub use catalog::{Catalog, CatalogEntry, Constructor, Identifiers};
pub use compliance::{check_env, ContractViolation};
pub use resolver::Resolver;
