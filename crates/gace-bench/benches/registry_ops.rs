//! Criterion micro-benchmarks for catalog and resolver operations.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use gace_bench::builtin_resolver;
use gace_core::{Overrides, TaskId, Technology, Topology, Variant};
use gace_registry::{Catalog, Resolver};
use gace_test_utils::mock_constructor;

/// Benchmark: resolve and construct a mock environment (lookup overhead only).
fn bench_create_mock(c: &mut Criterion) {
    let id = TaskId::new(Topology::Op2, Technology::Xh035, Variant::Electrical);
    let mut catalog = Catalog::new();
    catalog.register(id, mock_constructor(id)).unwrap();
    let resolver = Resolver::new(catalog);
    let overrides = Overrides::new();

    c.bench_function("create_mock_hit", |b| {
        b.iter(|| {
            let env = resolver.create(black_box("op2-xh035-v0"), &overrides).unwrap();
            black_box(env.task_id());
        });
    });
}

/// Benchmark: an unknown identifier, including candidate collection.
fn bench_create_miss(c: &mut Criterion) {
    let resolver = builtin_resolver();
    let overrides = Overrides::new();

    c.bench_function("create_miss_same_topology", |b| {
        b.iter(|| black_box(resolver.create(black_box("op2-xh035-v2"), &overrides).is_err()));
    });
    c.bench_function("create_miss_unknown_topology", |b| {
        b.iter(|| black_box(resolver.create(black_box("op9-xh035-v0"), &overrides).is_err()));
    });
}

/// Benchmark: construct a real circuit environment.
fn bench_create_builtin(c: &mut Criterion) {
    let resolver = builtin_resolver();
    let overrides = Overrides::new();

    c.bench_function("create_builtin_op6_v0", |b| {
        b.iter(|| {
            let env = resolver.create(black_box("op6-xh035-v0"), &overrides).unwrap();
            black_box(env.action_space().len());
        });
    });
}

/// Benchmark: enumerate the built-in identifiers.
fn bench_list_identifiers(c: &mut Criterion) {
    let resolver = builtin_resolver();

    c.bench_function("list_identifiers_builtin", |b| {
        b.iter(|| black_box(resolver.list_identifiers().count()));
    });
}

/// Benchmark: parse identifiers from their display form.
fn bench_parse_task_id(c: &mut Criterion) {
    c.bench_function("parse_task_id", |b| {
        b.iter(|| black_box(black_box("nand4-xh035-v1").parse::<TaskId>().is_ok()));
    });
}

criterion_group!(
    benches,
    bench_create_mock,
    bench_create_miss,
    bench_create_builtin,
    bench_list_identifiers,
    bench_parse_task_id
);
criterion_main!(benches);
