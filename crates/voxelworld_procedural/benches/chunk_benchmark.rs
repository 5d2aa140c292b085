//! Benchmark for chunk generation.
//!
//! Run with: cargo bench --package voxelworld_procedural --bench chunk_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use voxelworld_procedural::{BlockRegistry, Chunk, TerrainConfig, TerrainGenerator};
use voxelworld_shared::ChunkCoord;

fn terrain() -> TerrainGenerator {
    let catalog = BlockRegistry::with_defaults();
    TerrainGenerator::from_config(&TerrainConfig::default(), &catalog)
        .expect("default terrain config is valid")
}

fn benchmark_single_chunk(c: &mut Criterion) {
    let terrain = terrain();

    c.bench_function("single_chunk_generation", |b| {
        let mut coord = 0i32;
        b.iter(|| {
            coord = coord.wrapping_add(1);
            let mut chunk = Chunk::new(ChunkCoord::new(coord, coord / 2));
            chunk.generate(&terrain);
            black_box(chunk)
        });
    });
}

fn benchmark_render_window(c: &mut Criterion) {
    let terrain = terrain();

    let mut group = c.benchmark_group("render_window");
    group.sample_size(10);
    // Full window at the default render distance of 8
    group.throughput(Throughput::Elements(17 * 17));
    group.bench_function("17x17_chunks", |b| {
        b.iter(|| {
            for y in -8..=8 {
                for x in -8..=8 {
                    let mut chunk = Chunk::new(ChunkCoord::new(x, y));
                    chunk.generate(&terrain);
                    black_box(&chunk);
                }
            }
        });
    });
    group.finish();
}

criterion_group!(benches, benchmark_single_chunk, benchmark_render_window);
criterion_main!(benches);
