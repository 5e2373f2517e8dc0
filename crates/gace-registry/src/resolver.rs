//! Identifier resolution and environment construction.
//!
//! [`Resolver`] wraps a frozen [`Catalog`] and turns identifiers into
//! ready environments. It holds no mutable state: every
//! [`create()`](Resolver::create) call is independent and hands back a
//! freshly constructed, caller-owned environment.
//!
//! Lookup is exact. An identifier either names a registered entry
//! byte-for-byte or the call fails with
//! [`UnknownEnvironmentError`]; there is no fallback to a similar task.

use std::sync::Arc;

use gace_core::{
    ConstructionError, Environment, Overrides, ResolveError, TaskId, Topology,
    UnknownEnvironmentError,
};

use crate::catalog::{Catalog, Identifiers};

// Compile-time assertion: a resolver can be shared across threads.
const _: () = {
    #[allow(dead_code)]
    fn assert_send_sync<T: Send + Sync>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send_sync::<Resolver>();
        assert_send_sync::<Catalog>();
    }
};

/// Turns task identifiers into environments.
///
/// Cheap to clone; clones share the same immutable catalog.
///
/// # Example
///
/// ```ignore
/// let resolver = Resolver::new(catalog);
/// let mut env = resolver.create("op2-xh035-v0", &Overrides::new())?;
/// let obs = env.reset(Some(42))?;
/// ```
#[derive(Clone, Debug)]
pub struct Resolver {
    catalog: Arc<Catalog>,
}

impl Resolver {
    /// Freeze `catalog` and build a resolver over it.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Build a resolver over an already shared catalog.
    pub fn from_shared(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// The catalog this resolver reads from.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// All resolvable identifiers, in registration order.
    pub fn list_identifiers(&self) -> Identifiers<'_> {
        self.catalog.list_identifiers()
    }

    /// Resolve `identifier` and construct the environment.
    ///
    /// `overrides` are passed to the constructor untouched; validating
    /// them is the concrete environment's job.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Unknown`] if `identifier` matches no registered
    ///   entry. The error lists the registered identifiers of the same
    ///   topology, or every registered identifier if the topology has none.
    /// - [`ResolveError::Construction`] if the constructor fails; the
    ///   original failure is kept as the error source.
    pub fn create(
        &self,
        identifier: &str,
        overrides: &Overrides,
    ) -> Result<Box<dyn Environment>, ResolveError> {
        match identifier.parse::<TaskId>() {
            Ok(id) if self.catalog.contains(&id) => self.create_task(id, overrides),
            _ => Err(self.unknown(identifier).into()),
        }
    }

    /// Like [`create()`](Resolver::create) for an already typed identifier.
    pub fn create_task(
        &self,
        id: TaskId,
        overrides: &Overrides,
    ) -> Result<Box<dyn Environment>, ResolveError> {
        let Some(entry) = self.catalog.get(&id) else {
            return Err(self.unknown(&id.to_string()).into());
        };
        match entry.construct(overrides) {
            Ok(env) => {
                tracing::debug!(%id, overrides = overrides.len(), "environment created");
                Ok(env)
            }
            Err(source) => {
                tracing::warn!(%id, error = %source, "environment construction failed");
                Err(ConstructionError { id, source }.into())
            }
        }
    }

    /// Build the diagnostic for a miss.
    fn unknown(&self, requested: &str) -> UnknownEnvironmentError {
        let same_topology: Vec<TaskId> = requested
            .split('-')
            .next()
            .and_then(|prefix| prefix.parse::<Topology>().ok())
            .map(|topology| self.catalog.identifiers_for(topology).collect())
            .unwrap_or_default();
        let candidates = if same_topology.is_empty() {
            self.catalog.list_identifiers().collect()
        } else {
            same_topology
        };
        tracing::warn!(requested, candidates = candidates.len(), "unknown environment");
        UnknownEnvironmentError {
            requested: requested.to_string(),
            candidates,
        }
    }
}
