//! Face-culled cube meshing.
//!
//! Each solid cell emits one quad per face whose neighbor is empty.
//! Neighbors outside the chunk count as empty, so chunk borders are always
//! closed. Small blocks use the same rule at quarter resolution, treating
//! both sibling small blocks and large cells as occluders.

use crate::face::Face;
use crate::mesh::{ChunkMesh, MeshSection};
use voxelworld_procedural::{BlockCatalog, Chunk, Rgba};
use voxelworld_shared::{
    Vec3, BLOCK_SIZE, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z, SUB_BLOCK_SIZE,
};

/// Appends one quad.
pub fn push_face(section: &mut MeshSection, origin: Vec3, face: Face, size: f32, color: Rgba) {
    let normal = face.normal();
    let corners = face.corners(size);
    let base = section.positions.len() as u32;

    for (corner, uv) in corners.into_iter().zip(Face::UVS) {
        section.push_vertex(origin + corner, normal, uv, color);
    }
    section.push_triangle(base, base + 1, base + 2);
    section.push_triangle(base, base + 2, base + 3);
}

/// Meshes large blocks accepted by `include(x, y, z)`.
///
/// Returns the number of faces emitted.
pub fn mesh_blocks(
    chunk: &Chunk,
    catalog: &dyn BlockCatalog,
    mesh: &mut ChunkMesh,
    mut include: impl FnMut(i32, i32, i32) -> bool,
) -> usize {
    let mut faces = 0;

    for z in 0..CHUNK_SIZE_Z as i32 {
        for y in 0..CHUNK_SIZE_Y as i32 {
            for x in 0..CHUNK_SIZE_X as i32 {
                let id = chunk.get_block(x, y, z);
                if id.is_empty() || !include(x, y, z) {
                    continue;
                }

                let color = catalog.color(id);
                let section = mesh.section_mut(catalog.material_group(id));
                let origin = Vec3::new(x as f32, y as f32, z as f32) * BLOCK_SIZE;

                for face in Face::ALL {
                    let (dx, dy, dz) = face.offset();
                    if chunk.is_solid(x + dx, y + dy, z + dz) {
                        continue;
                    }
                    push_face(section, origin, face, BLOCK_SIZE, color);
                    faces += 1;
                }
            }
        }
    }

    faces
}

/// Meshes every small block that lies inside the chunk.
///
/// Returns the number of faces emitted.
pub fn mesh_small_blocks(chunk: &Chunk, catalog: &dyn BlockCatalog, mesh: &mut ChunkMesh) -> usize {
    let mut faces = 0;
    let coord = chunk.coord();

    for block in chunk.small_blocks() {
        if !chunk.contains_sub_block(block.pos) {
            continue;
        }

        let color = catalog.color(block.id);
        let section = mesh.section_mut(catalog.material_group(block.id));
        let (lx, ly, lz) = chunk.local_sub_block(block.pos);
        let origin = Vec3::new(lx as f32, ly as f32, lz as f32) * SUB_BLOCK_SIZE;

        for face in Face::ALL {
            let (dx, dy, dz) = face.offset();
            let neighbor = block.pos.offset(dx, dy, dz);

            let (bx, by, bz) = neighbor.block().local_to(coord);
            if chunk.has_small_block_at(neighbor) || chunk.is_solid(bx, by, bz) {
                continue;
            }
            push_face(section, origin, face, SUB_BLOCK_SIZE, color);
            faces += 1;
        }
    }

    faces
}
