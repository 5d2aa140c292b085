//! # Terrain Generation Tests
//!
//! Chunk generation must be a pure function of the chunk coordinate and
//! the terrain parameters, and neighboring chunks must agree at their seams.

use std::sync::Arc;
use voxelworld_procedural::{
    BlockCatalog, BlockId, BlockRegistry, Chunk, ConstantNoise, TerrainConfig, TerrainGenerator,
    TerrainPalette,
};
use voxelworld_shared::{ChunkCoord, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z};

const SX: i32 = CHUNK_SIZE_X as i32;
const SY: i32 = CHUNK_SIZE_Y as i32;
const SZ: i32 = CHUNK_SIZE_Z as i32;

fn default_terrain() -> (BlockRegistry, TerrainGenerator) {
    let catalog = BlockRegistry::with_defaults();
    let terrain = TerrainGenerator::from_config(&TerrainConfig::default(), &catalog).unwrap();
    (catalog, terrain)
}

fn snapshot(chunk: &Chunk) -> Vec<BlockId> {
    let mut blocks = Vec::new();
    for z in 0..SZ {
        for y in 0..SY {
            for x in 0..SX {
                blocks.push(chunk.get_block(x, y, z));
            }
        }
    }
    blocks
}

/// Test: Regenerating a chunk yields the identical block array.
#[test]
fn test_generation_is_deterministic() {
    let (_, terrain) = default_terrain();

    for coord in [ChunkCoord::new(0, 0), ChunkCoord::new(-7, 3), ChunkCoord::new(120, -45)] {
        let mut a = Chunk::new(coord);
        a.generate(&terrain);

        let mut b = Chunk::new(coord);
        b.generate(&terrain);

        // Regenerate in place after edits
        let mut c = Chunk::new(coord);
        c.generate(&terrain);
        c.set_block(1, 1, 30, BlockId::new(9));
        c.generate(&terrain);

        assert_eq!(snapshot(&a), snapshot(&b), "chunk {coord} differs between runs");
        assert_eq!(snapshot(&a), snapshot(&c), "chunk {coord} differs after regeneration");
    }
}

/// Test: A constant height of 10 gives stone below 7, grass to 10, air above.
#[test]
fn test_flat_world_layers() {
    let config = TerrainConfig {
        height_base: 10.0,
        ..TerrainConfig::default()
    };
    let terrain = TerrainGenerator::new(Arc::new(ConstantNoise(0.0)), &config, TerrainPalette::default());
    let palette = TerrainPalette::default();

    let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
    chunk.generate(&terrain);

    for y in 0..SY {
        for x in 0..SX {
            for z in 0..SZ {
                let expected = match z {
                    0..=6 => palette.stone,
                    7..=9 => palette.grass,
                    _ => BlockId::EMPTY,
                };
                assert_eq!(chunk.get_block(x, y, z), expected, "({x}, {y}, {z})");
            }
        }
    }
    assert_eq!(chunk.solid_count(), 16 * 16 * 10);
}

/// Test: Every column has solid ground at z = 0 and air at the top.
#[test]
fn test_columns_have_ground_and_sky() {
    let (_, terrain) = default_terrain();

    for cy in -2..2 {
        for cx in -2..2 {
            let mut chunk = Chunk::new(ChunkCoord::new(cx, cy));
            chunk.generate(&terrain);
            for y in 0..SY {
                for x in 0..SX {
                    assert!(chunk.is_solid(x, y, 0), "no ground in chunk ({cx}, {cy})");
                    assert!(!chunk.is_solid(x, y, SZ - 1), "no sky in chunk ({cx}, {cy})");
                }
            }
        }
    }
}

/// Test: Foreign-cell queries from one chunk match the neighbor's own data.
#[test]
fn test_cross_chunk_queries_match_neighbor() {
    let (_, terrain) = default_terrain();

    let mut center = Chunk::new(ChunkCoord::new(0, 0));
    center.generate(&terrain);
    let mut east = Chunk::new(ChunkCoord::new(1, 0));
    east.generate(&terrain);

    for y in 0..SY {
        for z in 0..SZ {
            assert_eq!(
                center.world_block(&terrain, SX, y, z),
                east.get_block(0, y, z),
                "seam mismatch at y={y} z={z}"
            );
        }
    }
}

/// Test: Generated terrain only uses catalog-registered blocks.
#[test]
fn test_generated_blocks_are_registered() {
    let (catalog, terrain) = default_terrain();

    let mut chunk = Chunk::new(ChunkCoord::new(4, -9));
    chunk.generate(&terrain);

    for z in 0..SZ {
        for y in 0..SY {
            for x in 0..SX {
                let id = chunk.get_block(x, y, z);
                assert!(id.is_empty() || catalog.is_registered(id));
            }
        }
    }
}

/// Test: Default parameters produce both sand and grass columns.
#[test]
fn test_default_terrain_has_variety() {
    let (_, terrain) = default_terrain();

    let mut min = i32::MAX;
    let mut max = i32::MIN;
    for y in (-400..400).step_by(7) {
        for x in (-400..400).step_by(7) {
            let h = terrain.surface_height(x, y);
            min = min.min(h);
            max = max.max(h);
        }
    }
    println!("Surface height range: {min}..={max}");

    assert!(min >= 1 && max <= SZ - 1);
    assert!(min < 6, "expected some sand columns, min height {min}");
    assert!(max >= 6, "expected some grass columns, max height {max}");
}
