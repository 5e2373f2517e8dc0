//! The identifier catalog: [`TaskId`] → environment constructor.
//!
//! A [`Catalog`] is populated through `&mut self` during start-up and then
//! frozen behind an `Arc` by the [`Resolver`](crate::Resolver). Because
//! registration needs exclusive access, no reader can observe a partially
//! populated catalog.

use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

use gace_core::{BoxError, DuplicateIdentifierError, Environment, Overrides, TaskId, Topology};
use indexmap::IndexMap;

/// A shared, thread-safe environment constructor.
pub type Constructor =
    Arc<dyn Fn(&Overrides) -> Result<Box<dyn Environment>, BoxError> + Send + Sync>;

/// One registered task and its constructor.
#[derive(Clone)]
pub struct CatalogEntry {
    id: TaskId,
    constructor: Constructor,
}

impl CatalogEntry {
    /// The registered identifier.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Invoke the constructor.
    pub fn construct(&self, overrides: &Overrides) -> Result<Box<dyn Environment>, BoxError> {
        (self.constructor)(overrides)
    }
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("id", &self.id.to_string())
            .finish_non_exhaustive()
    }
}

/// Write-once, read-many mapping from task identifiers to constructors.
///
/// Entries are kept in registration order, which is the order
/// [`list_identifiers()`](Catalog::list_identifiers) reports.
#[derive(Clone, Default)]
pub struct Catalog {
    entries: IndexMap<TaskId, CatalogEntry>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one constructor under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateIdentifierError`] if `id` is already registered.
    /// The catalog is left unchanged in that case.
    pub fn register<F>(
        &mut self,
        id: TaskId,
        constructor: F,
    ) -> Result<(), DuplicateIdentifierError>
    where
        F: Fn(&Overrides) -> Result<Box<dyn Environment>, BoxError> + Send + Sync + 'static,
    {
        if self.entries.contains_key(&id) {
            return Err(DuplicateIdentifierError { id });
        }
        tracing::debug!(%id, "registering environment");
        self.entries.insert(
            id,
            CatalogEntry {
                id,
                constructor: Arc::new(constructor),
            },
        );
        Ok(())
    }

    /// Register a batch of constructors atomically.
    ///
    /// Either every entry is added, or none is: a duplicate against the
    /// existing catalog or within the batch itself aborts the whole batch.
    pub fn register_all<I>(&mut self, entries: I) -> Result<(), DuplicateIdentifierError>
    where
        I: IntoIterator<Item = (TaskId, Constructor)>,
    {
        let mut staged: IndexMap<TaskId, CatalogEntry> = IndexMap::new();
        for (id, constructor) in entries {
            if self.entries.contains_key(&id) || staged.contains_key(&id) {
                return Err(DuplicateIdentifierError { id });
            }
            staged.insert(id, CatalogEntry { id, constructor });
        }
        tracing::debug!(count = staged.len(), "registering environment batch");
        self.entries.extend(staged);
        Ok(())
    }

    /// All registered identifiers, in registration order.
    ///
    /// The returned iterator is lazy and `Clone`, so it can be restarted
    /// by cloning before consumption or by calling this method again.
    pub fn list_identifiers(&self) -> Identifiers<'_> {
        Identifiers {
            inner: self.entries.keys(),
        }
    }

    /// Registered identifiers sharing `topology`, in registration order.
    pub fn identifiers_for(&self, topology: Topology) -> impl Iterator<Item = TaskId> + '_ {
        self.list_identifiers().filter(move |id| id.topology == topology)
    }

    /// Look up the entry for `id`.
    pub fn get(&self, id: &TaskId) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &TaskId) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.keys().map(|id| id.to_string()))
            .finish()
    }
}

/// Iterator over registered identifiers. See [`Catalog::list_identifiers`].
#[derive(Clone, Debug)]
pub struct Identifiers<'a> {
    inner: indexmap::map::Keys<'a, TaskId, CatalogEntry>,
}

impl Iterator for Identifiers<'_> {
    type Item = TaskId;

    fn next(&mut self) -> Option<TaskId> {
        self.inner.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Identifiers<'_> {}

impl FusedIterator for Identifiers<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use gace_core::{Technology, Variant};
    use gace_test_utils::mock_constructor;

    fn id(topology: Topology, variant: Variant) -> TaskId {
        TaskId::new(topology, Technology::Xh035, variant)
    }

    fn boxed(id: TaskId) -> Constructor {
        Arc::new(mock_constructor(id))
    }

    #[test]
    fn register_then_list_preserves_order() {
        let mut catalog = Catalog::new();
        let ids = [
            id(Topology::Op3, Variant::Electrical),
            id(Topology::Op1, Variant::Geometrical),
            id(Topology::St1, Variant::Geometrical),
        ];
        for i in ids {
            catalog.register(i, mock_constructor(i)).unwrap();
        }
        assert_eq!(catalog.list_identifiers().collect::<Vec<_>>(), ids);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn duplicate_registration_is_rejected_and_catalog_unchanged() {
        let mut catalog = Catalog::new();
        let op2 = id(Topology::Op2, Variant::Electrical);
        catalog.register(op2, mock_constructor(op2)).unwrap();
        let before: Vec<_> = catalog.list_identifiers().collect();

        let err = catalog.register(op2, mock_constructor(op2)).unwrap_err();
        assert_eq!(err, DuplicateIdentifierError { id: op2 });
        assert_eq!(catalog.list_identifiers().collect::<Vec<_>>(), before);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn register_all_is_atomic() {
        let mut catalog = Catalog::new();
        let a = id(Topology::Op1, Variant::Electrical);
        let b = id(Topology::Op1, Variant::Geometrical);
        catalog.register(a, mock_constructor(a)).unwrap();

        // Duplicate of an existing entry: nothing from the batch lands.
        let err = catalog
            .register_all([(b, boxed(b)), (a, boxed(a))])
            .unwrap_err();
        assert_eq!(err.id, a);
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.contains(&b));

        // Duplicate within the batch itself.
        let err = catalog
            .register_all([(b, boxed(b)), (b, boxed(b))])
            .unwrap_err();
        assert_eq!(err.id, b);
        assert_eq!(catalog.len(), 1);

        catalog.register_all([(b, boxed(b))]).unwrap();
        assert_eq!(catalog.list_identifiers().collect::<Vec<_>>(), [a, b]);
    }

    #[test]
    fn list_identifiers_is_restartable() {
        let mut catalog = Catalog::new();
        for t in [Topology::Op1, Topology::Op2] {
            let i = id(t, Variant::Electrical);
            catalog.register(i, mock_constructor(i)).unwrap();
        }
        let iter = catalog.list_identifiers();
        assert_eq!(iter.len(), 2);
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
        assert_eq!(first, catalog.list_identifiers().collect::<Vec<_>>());
    }

    #[test]
    fn identifiers_for_filters_by_topology() {
        let mut catalog = Catalog::new();
        for i in [
            id(Topology::Op1, Variant::Electrical),
            id(Topology::Op2, Variant::Electrical),
            id(Topology::Op1, Variant::Geometrical),
        ] {
            catalog.register(i, mock_constructor(i)).unwrap();
        }
        let op1: Vec<_> = catalog.identifiers_for(Topology::Op1).collect();
        assert_eq!(
            op1,
            [
                id(Topology::Op1, Variant::Electrical),
                id(Topology::Op1, Variant::Geometrical)
            ]
        );
        assert_eq!(catalog.identifiers_for(Topology::St1).count(), 0);
    }

    #[test]
    fn entry_constructs_with_overrides() {
        let mut catalog = Catalog::new();
        let op4 = id(Topology::Op4, Variant::Geometrical);
        catalog.register(op4, mock_constructor(op4)).unwrap();
        let entry = catalog.get(&op4).unwrap();
        assert_eq!(entry.id(), op4);
        let env = entry.construct(&Overrides::new()).unwrap();
        assert_eq!(env.task_id(), op4);
    }

    fn build_st1(_: &Overrides) -> Result<Box<dyn Environment>, BoxError> {
        Ok(Box::new(gace_test_utils::MockEnv::new(id(
            Topology::St1,
            Variant::Geometrical,
        ))))
    }

    #[test]
    fn plain_functions_register() {
        let f: gace_core::ConstructorFn = build_st1;
        let st1 = id(Topology::St1, Variant::Geometrical);
        let mut catalog = Catalog::new();
        catalog.register(st1, f).unwrap();
        let env = catalog.get(&st1).unwrap().construct(&Overrides::new()).unwrap();
        assert_eq!(env.task_id(), st1);
    }

    #[test]
    fn debug_lists_identifiers() {
        let mut catalog = Catalog::new();
        let op5 = id(Topology::Op5, Variant::Electrical);
        catalog.register(op5, mock_constructor(op5)).unwrap();
        assert_eq!(format!("{catalog:?}"), r#"["op5-xh035-v0"]"#);
    }
}
