//! Criterion benchmarks for the Heston Monte Carlo engine.
//!
//! Measures path simulation alone and the full European + American pricing
//! run across path counts, to characterise scaling of the rayon simulation
//! against the sequential Longstaff-Schwartz backward induction.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::types::OptionType;
use pricer_models::models::HestonParams;
use pricer_pricing::mc::{
    DividendAdjuster, HestonPricer, MonteCarloConfig, PathSimulator, SimulationRequest,
};

/// Reference market used by every benchmark.
fn benchmark_request(option_type: OptionType, n_paths: usize, n_steps: usize, parallel: bool) -> SimulationRequest {
    let heston = HestonParams::new(2.0, 0.04, 0.3, -0.7, 0.04)
        .unwrap_or_else(|e| panic!("benchmark parameters should be valid: {e}"));
    let config = MonteCarloConfig::builder()
        .n_paths(n_paths)
        .n_steps(n_steps)
        .seed(42)
        .parallel(parallel)
        .build()
        .unwrap_or_else(|e| panic!("benchmark config should be valid: {e}"));
    SimulationRequest::builder()
        .option_type(option_type)
        .spot(100.0)
        .strike(100.0)
        .time_to_expiry(1.0)
        .risk_free_rate(0.05)
        .heston(heston)
        .config(config)
        .build()
        .unwrap_or_else(|e| panic!("benchmark request should be valid: {e}"))
}

/// Benchmark path generation, serial against rayon.
fn bench_path_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("heston_paths");
    group.sample_size(20);

    for n_paths in [1_000, 10_000, 50_000] {
        for parallel in [false, true] {
            let request = benchmark_request(OptionType::Call, n_paths, 252, parallel);
            let adjuster = DividendAdjuster::none(request.n_steps());
            let label = if parallel { "parallel" } else { "serial" };
            group.bench_with_input(BenchmarkId::new(label, n_paths), &request, |b, request| {
                b.iter(|| {
                    let simulator = PathSimulator::new(black_box(request), &adjuster)
                        .unwrap_or_else(|e| panic!("{e}"));
                    black_box(simulator.simulate().unwrap_or_else(|e| panic!("{e}")))
                });
            });
        }
    }

    group.finish();
}

/// Benchmark a full pricing run (simulation, European, Longstaff-Schwartz).
fn bench_full_pricing(c: &mut Criterion) {
    let mut group = c.benchmark_group("heston_pricing");
    group.sample_size(10);
    let pricer = HestonPricer::new();

    for n_paths in [1_000, 10_000] {
        let request = benchmark_request(OptionType::Put, n_paths, 50, true);
        group.bench_with_input(BenchmarkId::from_parameter(n_paths), &request, |b, request| {
            b.iter(|| {
                let result = pricer
                    .price(black_box(request))
                    .unwrap_or_else(|e| panic!("{e}"));
                black_box(result.american.price)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_path_simulation, bench_full_pricing);
criterion_main!(benches);
