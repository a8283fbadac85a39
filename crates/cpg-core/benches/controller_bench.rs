// ─────────────────────────────────────────────────────────────────────
// Differential CPG Kernel — Controller Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for the per-tick path and genome replacement
//! at the actuator counts seen on modular robots.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cpg_core::{Actuator, DifferentialCpg, SimulatedActuator};
use cpg_types::{ActuatorSpec, CpgConfig};

/// Square lattice of `side × side` actuators at pitch 2.
fn lattice(side: usize) -> Vec<ActuatorSpec> {
    let mut layout = Vec::with_capacity(side * side);
    for x in 0..side {
        for y in 0..side {
            layout.push(ActuatorSpec::at(x as f64 * 2.0, y as f64 * 2.0, 0.0));
        }
    }
    layout
}

fn genome(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i as f64 * 0.618).fract()).collect()
}

// ── DifferentialCpg.update() ────────────────────────────────────────

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpg_update");
    for side in [2usize, 4, 6] {
        let layout = lattice(side);
        let cpg = DifferentialCpg::new(&layout, CpgConfig::default()).unwrap();
        cpg.set_connection_weights(&genome(cpg.n_weights())).unwrap();
        let mut actuators: Vec<Box<dyn Actuator>> = layout
            .iter()
            .cloned()
            .map(|s| Box::new(SimulatedActuator::new(s)) as Box<dyn Actuator>)
            .collect();
        let mut t = 0.0;
        group.bench_with_input(BenchmarkId::from_parameter(layout.len()), &side, |b, _| {
            b.iter(|| {
                t += 0.01;
                cpg.update(black_box(&mut actuators), &[], t, black_box(0.01))
            })
        });
    }
    group.finish();
}

// ── DifferentialCpg.compute_outputs() ───────────────────────────────

fn bench_compute_outputs(c: &mut Criterion) {
    let layout = lattice(4);
    let cpg = DifferentialCpg::new(&layout, CpgConfig::default()).unwrap();
    cpg.set_connection_weights(&genome(cpg.n_weights())).unwrap();
    c.bench_function("cpg_compute_outputs_16", |b| {
        b.iter(|| cpg.compute_outputs(black_box(0.01)))
    });
}

// ── DifferentialCpg.set_connection_weights() ────────────────────────

fn bench_set_weights(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpg_set_weights");
    for side in [2usize, 4, 6] {
        let layout = lattice(side);
        let cpg = DifferentialCpg::new(&layout, CpgConfig::default()).unwrap();
        let w = genome(cpg.n_weights());
        group.bench_with_input(BenchmarkId::from_parameter(layout.len()), &w, |b, w| {
            b.iter(|| cpg.set_connection_weights(black_box(w)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_update, bench_compute_outputs, bench_set_weights);
criterion_main!(benches);
