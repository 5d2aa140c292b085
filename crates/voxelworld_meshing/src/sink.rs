//! # Mesh Sink
//!
//! Hand-off point between meshing and whatever draws the meshes. The world
//! manager submits a full replacement mesh per chunk and releases it when
//! the chunk unloads; the sink never sees partial updates.

use crate::mesh::{ChunkMesh, MeshSection};
use std::collections::{BTreeMap, HashMap};
use voxelworld_procedural::BlockCatalog;
use voxelworld_shared::ChunkCoord;

/// Material assigned to one mesh section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBinding {
    /// Material group of the section.
    pub group: u32,
    /// Material asset name, if the catalog defines one for the group.
    pub material: Option<String>,
}

/// One chunk's complete mesh, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMeshUpload {
    /// Chunk the mesh belongs to.
    pub coord: ChunkCoord,
    /// Non-empty sections keyed by material group.
    pub sections: BTreeMap<u32, MeshSection>,
    /// Material per section, in section order.
    pub materials: Vec<SectionBinding>,
    /// Whether the mesh should collide.
    pub collision_enabled: bool,
}

impl ChunkMeshUpload {
    /// Packages a mesh, resolving section materials through the catalog.
    #[must_use]
    pub fn new(coord: ChunkCoord, mesh: ChunkMesh, catalog: &dyn BlockCatalog) -> Self {
        let collision_enabled = mesh.collision_enabled();
        let materials = mesh
            .sections()
            .map(|(group, _)| SectionBinding {
                group,
                material: catalog.material_for_group(group).map(str::to_owned),
            })
            .collect();

        Self {
            coord,
            sections: mesh.into_sections(),
            materials,
            collision_enabled,
        }
    }

    /// Total triangles across sections.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.sections.values().map(MeshSection::triangle_count).sum()
    }
}

/// Receiver of chunk meshes.
pub trait MeshSink {
    /// Replaces the chunk's mesh.
    fn submit(&mut self, upload: ChunkMeshUpload);

    /// Drops the chunk's mesh.
    fn release(&mut self, coord: ChunkCoord);
}

impl<S: MeshSink + ?Sized> MeshSink for Box<S> {
    fn submit(&mut self, upload: ChunkMeshUpload) {
        (**self).submit(upload);
    }

    fn release(&mut self, coord: ChunkCoord) {
        (**self).release(coord);
    }
}

/// Sink that keeps the latest mesh per chunk in memory.
///
/// Used headless and in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    meshes: HashMap<ChunkCoord, ChunkMeshUpload>,
    submissions: usize,
    releases: usize,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest mesh of a chunk.
    #[must_use]
    pub fn mesh(&self, coord: ChunkCoord) -> Option<&ChunkMeshUpload> {
        self.meshes.get(&coord)
    }

    /// Number of chunks currently holding a mesh.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Total submits received.
    #[must_use]
    pub const fn submissions(&self) -> usize {
        self.submissions
    }

    /// Total releases received.
    #[must_use]
    pub const fn releases(&self) -> usize {
        self.releases
    }
}

impl MeshSink for MemorySink {
    fn submit(&mut self, upload: ChunkMeshUpload) {
        self.submissions += 1;
        self.meshes.insert(upload.coord, upload);
    }

    fn release(&mut self, coord: ChunkCoord) {
        self.releases += 1;
        self.meshes.remove(&coord);
    }
}
