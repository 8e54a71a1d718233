use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pharmsim::prelude::*;
use std::hint::black_box;

fn parameters(route: Route, interval: f64) -> CanonicalParameters {
    let compound = CompoundParameters::new()
        .half_life(6.0)
        .volume_of_distribution(50.0)
        .ka(1.0);
    let regimen = DosingRegimen::new().dose(500.0).interval(interval).route(route);
    resolve(&compound, &regimen).unwrap()
}

fn simulate_benchmark(c: &mut Criterion) {
    let ode = SimulationSettings::default();
    let analytical = SimulationSettings::analytical();

    let mut group = c.benchmark_group("Simulate");
    for interval in [24.0, 8.0, 1.0] {
        let iv = parameters(Route::Iv, interval);
        let oral = parameters(Route::Oral, interval);

        group.bench_with_input(BenchmarkId::new("IV bolus", interval), &iv, |b, p| {
            b.iter(|| black_box(simulate_with(p, &ode).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("Oral ODE", interval), &oral, |b, p| {
            b.iter(|| black_box(simulate_with(p, &ode).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("Oral analytical", interval), &oral, |b, p| {
            b.iter(|| black_box(simulate_with(p, &analytical).unwrap()))
        });
    }
    group.finish();
}

fn batch_benchmark(c: &mut Criterion) {
    let settings = SimulationSettings::default();
    let batch: Vec<_> = (1..=32)
        .map(|i| parameters(Route::Oral, 2.0 + i as f64))
        .collect();

    c.bench_function("Batch of 32 oral regimens", |b| {
        b.iter(|| black_box(simulate_batch(&batch, &settings)))
    });
}

criterion_group!(benches, simulate_benchmark, batch_benchmark);
criterion_main!(benches);
