//! Mesh buffers handed to the rendering backend.
//!
//! A [`ChunkMesh`] holds one [`MeshSection`] per material group. Sections
//! are plain structure-of-arrays buffers; positions are chunk-local world
//! units (the renderer places the chunk at its origin).

use std::collections::BTreeMap;
use voxelworld_procedural::Rgba;
use voxelworld_shared::{Vec2, Vec3};

// =============================================================================
// MESH SECTION
// =============================================================================

/// Geometry for one material group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshSection {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Triangle list, three indices per triangle.
    pub indices: Vec<u32>,
    /// Per-vertex normals.
    pub normals: Vec<Vec3>,
    /// Per-vertex texture coordinates.
    pub uvs: Vec<Vec2>,
    /// Per-vertex colors.
    pub colors: Vec<Rgba>,
}

impl MeshSection {
    /// Check if section has no drawable triangles
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    /// Number of vertices
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3, uv: Vec2, color: Rgba) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
        self.colors.push(color);
        index
    }

    /// Appends a triangle over existing vertices.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Positions as raw bytes for upload.
    #[must_use]
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Normals as raw bytes for upload.
    #[must_use]
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// UVs as raw bytes for upload.
    #[must_use]
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Colors as raw bytes for upload.
    #[must_use]
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Indices as raw bytes for upload.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

// =============================================================================
// CHUNK MESH
// =============================================================================

/// Complete mesh of a chunk, keyed by material group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMesh {
    sections: BTreeMap<u32, MeshSection>,
}

impl ChunkMesh {
    /// Creates an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Section for a material group, created on first use.
    pub fn section_mut(&mut self, group: u32) -> &mut MeshSection {
        self.sections.entry(group).or_default()
    }

    /// Section for a material group, if present.
    #[must_use]
    pub fn section(&self, group: u32) -> Option<&MeshSection> {
        self.sections.get(&group)
    }

    /// Sections in ascending group order.
    pub fn sections(&self) -> impl Iterator<Item = (u32, &MeshSection)> {
        self.sections.iter().map(|(group, section)| (*group, section))
    }

    /// Consumes the mesh, returning its sections.
    #[must_use]
    pub fn into_sections(self) -> BTreeMap<u32, MeshSection> {
        self.sections
    }

    /// Drops sections without triangles.
    pub fn retain_non_empty(&mut self) {
        self.sections.retain(|_, section| !section.is_empty());
    }

    /// Number of sections.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// True if no section has triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.values().all(MeshSection::is_empty)
    }

    /// Whether collision should be enabled for this mesh.
    #[must_use]
    pub fn collision_enabled(&self) -> bool {
        !self.is_empty()
    }

    /// Total triangles across sections.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.sections.values().map(MeshSection::triangle_count).sum()
    }

    /// Total vertices across sections.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.sections.values().map(MeshSection::vertex_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_vertex_keeps_attributes_aligned() {
        let mut section = MeshSection::default();
        let a = section.push_vertex(Vec3::ZERO, Vec3::Z, Vec2::ZERO, Rgba::WHITE);
        let b = section.push_vertex(Vec3::new(1.0, 0.0, 0.0), Vec3::Z, Vec2::ZERO, Rgba::WHITE);
        let c = section.push_vertex(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, Vec2::ZERO, Rgba::WHITE);
        section.push_triangle(a, b, c);

        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(section.normals.len(), 3);
        assert_eq!(section.uvs.len(), 3);
        assert_eq!(section.colors.len(), 3);
        assert_eq!(section.triangle_count(), 1);
        assert_eq!(section.position_bytes().len(), 3 * 12);
        assert_eq!(section.color_bytes().len(), 3 * 4);
    }

    #[test]
    fn test_retain_non_empty() {
        let mut mesh = ChunkMesh::new();
        mesh.section_mut(3);
        assert_eq!(mesh.section_count(), 1);
        assert!(!mesh.collision_enabled());

        mesh.retain_non_empty();
        assert_eq!(mesh.section_count(), 0);
    }
}
