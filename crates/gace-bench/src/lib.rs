//! Benchmark fixtures for the GACE registry and environments.
//!
//! - [`builtin_resolver`]: resolver over every built-in task
//! - [`action_batch`]: deterministic actions sampled from an action space

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use gace_core::BoxSpace;
use gace_registry::{Catalog, Resolver};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A resolver over the built-in catalog.
pub fn builtin_resolver() -> Resolver {
    let mut catalog = Catalog::new();
    gace_envs::register_builtins(&mut catalog).unwrap();
    Resolver::new(catalog)
}

/// `count` actions sampled uniformly from `space` with a fixed seed.
pub fn action_batch(space: &BoxSpace, count: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| space.sample(&mut rng)).collect()
}
