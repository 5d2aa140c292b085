//! # Hybrid Smooth Meshing
//!
//! The top of each column is rendered as a marching-cubes surface; the
//! rock underneath stays cubic so it can still be dug block by block.
//!
//! For a column with surface height `SH` and depth `D`:
//!
//! ```text
//!   SH+2 ┐
//!        │  marching cubes   (cubes SH-D-1 ..= SH+2)
//!   SH-D-1┘
//!        blocky, except natural cells in SH-D ..= SH+1
//! ```
//!
//! Player-placed blocks and small blocks are always cubic.

use crate::blocky;
use crate::density::DensityField;
use crate::marching_cubes;
use crate::mesh::ChunkMesh;
use crate::tables::CORNER_OFFSETS;
use voxelworld_procedural::{BlockCatalog, Chunk, TerrainGenerator, TerrainLayer};
use voxelworld_shared::{Vec2, Vec3, BLOCK_SIZE, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z};

/// Counts from one smooth meshing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmoothStats {
    /// Cube faces from the blocky part.
    pub blocky_faces: usize,
    /// Marching-cubes triangles kept.
    pub surface_triangles: usize,
    /// Marching-cubes triangles dropped as degenerate.
    pub degenerate_triangles: usize,
    /// Small-block faces.
    pub small_block_faces: usize,
}

/// Surface heights of the chunk's columns, indexed `x + y * CHUNK_SIZE_X`.
fn surface_heights(chunk: &Chunk, terrain: &TerrainGenerator) -> Vec<i32> {
    let coord = chunk.coord();
    let mut heights = Vec::with_capacity(CHUNK_SIZE_X * CHUNK_SIZE_Y);
    for y in 0..CHUNK_SIZE_Y as i32 {
        for x in 0..CHUNK_SIZE_X as i32 {
            heights.push(terrain.surface_height(coord.origin_block_x() + x, coord.origin_block_y() + y));
        }
    }
    heights
}

/// Texture coordinates by box projection along the dominant normal axis.
fn project_uv(vertex: Vec3, normal: Vec3) -> Vec2 {
    let n = normal.abs();
    if n.z >= n.x && n.z >= n.y {
        Vec2::new(vertex.x / BLOCK_SIZE, vertex.y / BLOCK_SIZE)
    } else if n.x >= n.y {
        Vec2::new(vertex.y / BLOCK_SIZE, vertex.z / BLOCK_SIZE)
    } else {
        Vec2::new(vertex.x / BLOCK_SIZE, vertex.z / BLOCK_SIZE)
    }
}

/// Meshes a chunk in hybrid mode into `mesh`.
pub fn mesh_smooth(
    chunk: &Chunk,
    terrain: &TerrainGenerator,
    catalog: &dyn BlockCatalog,
    smoothing_passes: u32,
    surface_depth: i32,
    mesh: &mut ChunkMesh,
) -> SmoothStats {
    let mut stats = SmoothStats::default();
    let heights = surface_heights(chunk, terrain);
    let height_at = |x: i32, y: i32| heights[x as usize + y as usize * CHUNK_SIZE_X];

    // Blocky part: everything outside the surface band, plus player blocks
    stats.blocky_faces = blocky::mesh_blocks(chunk, catalog, mesh, |x, y, z| {
        let sh = height_at(x, y);
        let in_band = z >= sh - surface_depth && z <= sh + 1;
        !in_band || chunk.is_player_placed(terrain, x, y, z)
    });

    let mut field = DensityField::build(chunk, terrain);
    field.smooth(smoothing_passes);

    let palette = terrain.palette();
    let mut triangles = Vec::with_capacity(5);

    for y in 0..CHUNK_SIZE_Y as i32 {
        for x in 0..CHUNK_SIZE_X as i32 {
            let sh = height_at(x, y);
            let z_min = (sh - surface_depth - 1).max(0);
            let z_max = (sh + 2).min(CHUNK_SIZE_Z as i32 - 1);

            // One material per column
            let block = palette.block_for(TerrainLayer::surface_for_height(sh));
            let color = catalog.color(block);
            let group = catalog.material_group(block);

            for z in z_min..=z_max {
                let mut densities = [0.0f32; 8];
                let mut positions = [Vec3::ZERO; 8];
                for (i, [cx, cy, cz]) in CORNER_OFFSETS.iter().enumerate() {
                    densities[i] = field.get(x + 1 + cx, y + 1 + cy, z + cz);
                    positions[i] = Vec3::new((x + cx) as f32, (y + cy) as f32, (z + cz) as f32) * BLOCK_SIZE;
                }

                triangles.clear();
                if marching_cubes::polygonize(&positions, &densities, &mut triangles) == 0 {
                    continue;
                }

                let section = mesh.section_mut(group);
                for &[v0, v1, v2] in &triangles {
                    let Some(inward) = (v1 - v0).cross(v2 - v0).try_normalize() else {
                        stats.degenerate_triangles += 1;
                        continue;
                    };
                    let normal = -inward;

                    let a = section.push_vertex(v0, normal, project_uv(v0, normal), color);
                    let b = section.push_vertex(v1, normal, project_uv(v1, normal), color);
                    let c = section.push_vertex(v2, normal, project_uv(v2, normal), color);
                    section.push_triangle(a, b, c);
                    stats.surface_triangles += 1;
                }
            }
        }
    }

    stats.small_block_faces = blocky::mesh_small_blocks(chunk, catalog, mesh);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use voxelworld_procedural::{BlockId, BlockRegistry, ConstantNoise, TerrainConfig, TerrainPalette};
    use voxelworld_shared::ChunkCoord;

    fn flat(height: f64, catalog: &BlockRegistry) -> TerrainGenerator {
        let config = TerrainConfig { height_base: height, ..TerrainConfig::default() };
        TerrainGenerator::new(Arc::new(ConstantNoise(0.0)), &config, TerrainPalette::resolve(catalog))
    }

    #[test]
    fn test_project_uv_axes() {
        let v = Vec3::new(80.0, 160.0, 240.0);
        assert_eq!(project_uv(v, Vec3::Z), Vec2::new(1.0, 2.0));
        assert_eq!(project_uv(v, Vec3::new(-1.0, 0.2, 0.1)), Vec2::new(2.0, 3.0));
        assert_eq!(project_uv(v, Vec3::new(0.1, 0.9, 0.2)), Vec2::new(1.0, 3.0));
    }

    #[test]
    fn test_flat_world_surface_faces_up() {
        let catalog = BlockRegistry::with_defaults();
        let terrain = flat(10.0, &catalog);
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.generate(&terrain);

        let mut mesh = ChunkMesh::new();
        let stats = mesh_smooth(&chunk, &terrain, &catalog, 1, 3, &mut mesh);
        assert!(stats.surface_triangles > 0);

        // Height 10 columns are grass (group 1); only the surface lives there
        let grass = mesh.section(1).expect("grass surface section");
        assert!(grass.colors.iter().all(|c| *c == catalog.color(catalog.id_by_name("Grass").unwrap())));

        // Away from the chunk border the surface is a flat upward sheet
        for (p, n) in grass.positions.iter().zip(&grass.normals) {
            let interior = p.x > 2.0 * BLOCK_SIZE
                && p.x < 14.0 * BLOCK_SIZE
                && p.y > 2.0 * BLOCK_SIZE
                && p.y < 14.0 * BLOCK_SIZE;
            if interior {
                assert!(n.z > 0.99, "normal {n:?} at {p:?} should point up");
            }
        }
    }

    #[test]
    fn test_player_block_stays_cubic() {
        let catalog = BlockRegistry::with_defaults();
        let terrain = flat(10.0, &catalog);
        let brick = catalog.id_by_name("Brick").unwrap();
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.generate(&terrain);
        chunk.set_block(8, 8, 10, brick);

        let mut mesh = ChunkMesh::new();
        mesh_smooth(&chunk, &terrain, &catalog, 1, 3, &mut mesh);

        // Brick is group 3; resting on the ground it shows five faces
        let section = mesh.section(3).expect("brick section");
        assert_eq!(section.triangle_count(), 10);
    }

    #[test]
    fn test_band_cells_not_cubic() {
        let catalog = BlockRegistry::with_defaults();
        let terrain = flat(10.0, &catalog);
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.generate(&terrain);

        let mut blocky_only = ChunkMesh::new();
        let all_faces = blocky::mesh_blocks(&chunk, &catalog, &mut blocky_only, |_, _, _| true);

        let mut mesh = ChunkMesh::new();
        let stats = mesh_smooth(&chunk, &terrain, &catalog, 1, 3, &mut mesh);
        assert!(stats.blocky_faces < all_faces);
        // No cube at or above z = 7 in a height-10 column
        let stone = mesh.section(0).expect("stone section");
        let max_z = stone.positions.iter().map(|p| p.z).fold(f32::MIN, f32::max);
        assert!(max_z <= 7.0 * BLOCK_SIZE + 1e-3);
    }

    #[test]
    fn test_removed_surface_block_dents_surface() {
        let catalog = BlockRegistry::with_defaults();
        let terrain = flat(10.0, &catalog);
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.generate(&terrain);

        let mut before = ChunkMesh::new();
        mesh_smooth(&chunk, &terrain, &catalog, 1, 3, &mut before);

        chunk.set_block(8, 8, 9, BlockId::EMPTY);
        let mut after = ChunkMesh::new();
        mesh_smooth(&chunk, &terrain, &catalog, 1, 3, &mut after);

        assert_ne!(before.section(1), after.section(1));
    }
}
