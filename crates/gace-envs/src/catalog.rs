//! The built-in task table and its registration.

use std::sync::Arc;

use gace_core::{
    BoxError, DuplicateIdentifierError, Environment, Overrides, TaskId, Technology, Topology,
    Variant,
};
use gace_registry::{Catalog, Constructor};

use crate::env::CircuitEnv;

const fn xh035(topology: Topology, variant: Variant) -> TaskId {
    TaskId::new(topology, Technology::Xh035, variant)
}

/// Every built-in task, in registration order.
pub const BUILTIN_TASKS: [TaskId; 14] = [
    xh035(Topology::Op1, Variant::Electrical),
    xh035(Topology::Op1, Variant::Geometrical),
    xh035(Topology::Op2, Variant::Electrical),
    xh035(Topology::Op2, Variant::Geometrical),
    xh035(Topology::Op3, Variant::Electrical),
    xh035(Topology::Op3, Variant::Geometrical),
    xh035(Topology::Op4, Variant::Electrical),
    xh035(Topology::Op4, Variant::Geometrical),
    xh035(Topology::Op5, Variant::Electrical),
    xh035(Topology::Op5, Variant::Geometrical),
    xh035(Topology::Op6, Variant::Electrical),
    xh035(Topology::Op6, Variant::Geometrical),
    xh035(Topology::Nand4, Variant::Geometrical),
    xh035(Topology::St1, Variant::Geometrical),
];

/// Constructor building a [`CircuitEnv`] for `id`.
pub fn constructor(id: TaskId) -> Constructor {
    Arc::new(
        move |overrides: &Overrides| -> Result<Box<dyn Environment>, BoxError> {
            Ok(Box::new(CircuitEnv::new(id, overrides)?))
        },
    )
}

/// Register all [`BUILTIN_TASKS`] in `catalog`.
///
/// Registration is all-or-nothing: if any built-in identifier is already
/// present, the catalog is left unchanged.
pub fn register_builtins(catalog: &mut Catalog) -> Result<(), DuplicateIdentifierError> {
    catalog.register_all(BUILTIN_TASKS.iter().map(|&id| (id, constructor(id))))
}
