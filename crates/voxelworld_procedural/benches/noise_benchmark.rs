//! Benchmark for noise sampling.
//!
//! Run with: cargo bench --package voxelworld_procedural --bench noise_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use voxelworld_procedural::{FractalNoise, NoiseSource, SimplexNoise, WorldSeed};

fn benchmark_simplex(c: &mut Criterion) {
    let noise = SimplexNoise::new(WorldSeed::new(42));

    c.bench_function("simplex_single_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.37;
            black_box(noise.sample(black_box(x), black_box(x * 0.5)))
        });
    });
}

fn benchmark_fractal_column_grid(c: &mut Criterion) {
    let noise = FractalNoise::new(SimplexNoise::new(WorldSeed::new(42)), 5, 0.05, 2.5);

    let mut group = c.benchmark_group("fractal");
    // One chunk footprint plus the density padding
    group.throughput(Throughput::Elements(19 * 19));
    group.bench_function("5_octaves_19x19_columns", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for y in 0..19 {
                for x in 0..19 {
                    sum += noise.sample(f64::from(x) * 0.01, f64::from(y) * 0.01);
                }
            }
            black_box(sum)
        });
    });
    group.finish();
}

criterion_group!(benches, benchmark_simplex, benchmark_fractal_column_grid);
criterion_main!(benches);
