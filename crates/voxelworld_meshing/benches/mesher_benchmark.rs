//! Benchmark for chunk meshing.
//!
//! Run with: cargo bench --package voxelworld_meshing --bench mesher_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use voxelworld_meshing::{ChunkMesher, MeshMode, MeshSettings};
use voxelworld_procedural::{BlockRegistry, Chunk, TerrainConfig, TerrainGenerator};
use voxelworld_shared::ChunkCoord;

fn setup() -> (BlockRegistry, TerrainGenerator, Chunk) {
    let catalog = BlockRegistry::with_defaults();
    let terrain = TerrainGenerator::from_config(&TerrainConfig::default(), &catalog)
        .expect("default terrain config is valid");
    let mut chunk = Chunk::new(ChunkCoord::new(3, -2));
    chunk.generate(&terrain);
    (catalog, terrain, chunk)
}

fn benchmark_blocky(c: &mut Criterion) {
    let (catalog, terrain, chunk) = setup();
    let mesher = ChunkMesher::new(MeshSettings::default());

    c.bench_function("blocky_chunk_mesh", |b| {
        b.iter(|| black_box(mesher.build(&chunk, &terrain, &catalog)));
    });
}

fn benchmark_smooth(c: &mut Criterion) {
    let (catalog, terrain, chunk) = setup();

    let mut group = c.benchmark_group("smooth_chunk_mesh");
    for passes in [0, 1, 3] {
        let mesher = ChunkMesher::new(MeshSettings {
            mode: MeshMode::Smooth,
            smoothing_passes: passes,
            ..MeshSettings::default()
        });
        group.bench_function(format!("{passes}_passes"), |b| {
            b.iter(|| black_box(mesher.build(&chunk, &terrain, &catalog)));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_blocky, benchmark_smooth);
criterion_main!(benches);
