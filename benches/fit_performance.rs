//! Performance benchmarks for the fit kernel
//!
//! Measures the linearized Langmuir fit, and the bare regression under it,
//! over increasing sample counts.
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all fit benchmarks
//! cargo bench --bench fit_performance
//!
//! # Run only the regression group
//! cargo bench --bench fit_performance regression
//! ```
//!
//! Both groups should scale linearly with the sample count: one pass for
//! the reciprocals, two for the regression sums, one for the fitted curve.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use langmuir_fit::config::PhysicalConstants;
use langmuir_fit::models::{compute_langmuir_fit, LinearRegression};

// =================================================================================================
// Datasets
// =================================================================================================

/// Langmuir data (q_m = 0.02, K_L = 15) with a small deterministic wobble
fn dataset(n: usize) -> (Vec<f64>, Vec<f64>) {
    let c_e: Vec<f64> = (1..=n).map(|i| 0.01 * i as f64).collect();
    let c_adsorbed = c_e
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let wobble = 1.0 + 0.01 * ((i * 7919) % 13) as f64 / 13.0;
            0.02 * 15.0 * c / (1.0 + 15.0 * c) * wobble
        })
        .collect();
    (c_e, c_adsorbed)
}

// =================================================================================================
// Benchmark Functions
// =================================================================================================

/// Full fit: pairing, q_e conversion, reciprocals, regression, fitted curve
fn benchmark_langmuir_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("langmuir_fit");
    let constants = PhysicalConstants::default();

    for n in [10, 100, 1_000, 10_000] {
        let (c_e, c_adsorbed) = dataset(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                compute_langmuir_fit(black_box(&c_e), black_box(&c_adsorbed), &constants)
            })
        });
    }

    group.finish();
}

/// Least squares alone, on already reciprocal data
fn benchmark_regression(c: &mut Criterion) {
    let mut group = c.benchmark_group("regression");

    for n in [10, 100, 1_000, 10_000] {
        let (c_e, c_adsorbed) = dataset(n);
        let x: Vec<f64> = c_e.iter().map(|v| 1.0 / v).collect();
        let y: Vec<f64> = c_adsorbed.iter().map(|v| 1.0 / v).collect();

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| LinearRegression::fit(black_box(&x), black_box(&y)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_langmuir_fit, benchmark_regression);
criterion_main!(benches);
