//! Benchmarks for the three reduction units at report-sized inputs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use scan_reduce::prelude::*;

/// Generate normally distributed measurements
fn generate_measurements(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let dist = Normal::new(20.0, 5.0).unwrap();
    (0..n).map(|_| dist.sample(&mut rng)).collect()
}

fn bench_binner(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_range_binner");

    for &n in &[1_000usize, 10_000, 100_000] {
        let data = generate_measurements(n, 1);
        let binner = BinnerConfig::new(0.5, 0.0, 40.0).build().unwrap();

        group.bench_with_input(BenchmarkId::new("bin", n), &data, |b, data| {
            b.iter(|| black_box(binner.bin(data)));
        });
    }

    group.finish();
}

fn bench_dynamic_kde(c: &mut Criterion) {
    let mut group = c.benchmark_group("dynamic_kde");

    for &n in &[100usize, 1_000, 5_000] {
        let data = generate_measurements(n, 2);
        for &resolution in &[100usize, 400] {
            group.bench_with_input(
                BenchmarkId::new(format!("res_{resolution}"), n),
                &data,
                |b, data| {
                    b.iter(|| black_box(build_dynamic_kde(data, 0.0, 60.0, resolution, 0.1)));
                },
            );
        }
    }

    group.finish();
}

fn bench_apportion(c: &mut Criterion) {
    let tallies: Vec<(RawTally, u64)> = (0..1_000u64)
        .map(|i| (RawTally::new(i * 7 % 97, i * 13 % 89, i * 3 % 31), i % 50))
        .collect();

    c.bench_function("apportion_1000_categories", |b| {
        b.iter(|| {
            for &(raw, artifacts) in &tallies {
                black_box(apportion(raw, artifacts));
            }
        });
    });
}

criterion_group!(benches, bench_binner, bench_dynamic_kde, bench_apportion);
criterion_main!(benches);
