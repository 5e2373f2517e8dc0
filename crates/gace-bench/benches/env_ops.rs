//! Criterion micro-benchmarks for environment reset/step and the surrogate
//! simulator.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gace_bench::{action_batch, builtin_resolver};
use gace_core::{Overrides, Technology, Topology};
use gace_envs::{template, Simulator, Sizing, SurrogateSimulator, TechnologyData};

/// Benchmark: one step per built-in task, cycling through 64 fixed actions.
fn bench_step(c: &mut Criterion) {
    let resolver = builtin_resolver();
    let mut group = c.benchmark_group("step");
    for id in resolver.list_identifiers() {
        let mut env = resolver.create_task(id, &Overrides::new()).unwrap();
        let actions = action_batch(env.action_space(), 64, 42);
        env.reset(Some(42)).unwrap();
        let mut i = 0;
        group.bench_function(BenchmarkId::from_parameter(id), |b| {
            b.iter(|| {
                let t = env.step(&actions[i % actions.len()]).unwrap();
                if t.done() {
                    env.reset(None).unwrap();
                }
                i += 1;
                black_box(t.reward)
            });
        });
    }
    group.finish();
}

/// Benchmark: seeded reset with a random start.
fn bench_reset(c: &mut Criterion) {
    let resolver = builtin_resolver();
    let mut env = resolver
        .create("op5-xh035-v1", &Overrides::new().with("random_start", true))
        .unwrap();

    c.bench_function("reset_random_start_op5_v1", |b| {
        b.iter(|| black_box(env.reset(black_box(Some(7))).unwrap()));
    });
}

/// Benchmark: raw surrogate evaluation of a sized OP3.
fn bench_surrogate(c: &mut Criterion) {
    let mut sim = SurrogateSimulator::new(TechnologyData::load(Technology::Xh035));
    let circuit = template(Topology::Op3);
    let sizing = vec![
        Sizing {
            w: 10e-6,
            l: 1e-6,
            m: 2
        };
        circuit.devices.len()
    ];

    c.bench_function("surrogate_op3", |b| {
        b.iter(|| black_box(sim.simulate(circuit, black_box(&sizing)).unwrap()));
    });
}

criterion_group!(benches, bench_step, bench_reset, bench_surrogate);
criterion_main!(benches);
