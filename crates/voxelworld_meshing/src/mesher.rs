//! Chunk mesher entry point.
//!
//! Picks blocky or hybrid smooth meshing, drops empty sections and
//! returns the finished [`ChunkMesh`]. Every call is a full rebuild.

use crate::blocky;
use crate::mesh::ChunkMesh;
use crate::smooth;
use serde::{Deserialize, Serialize};
use voxelworld_procedural::{BlockCatalog, Chunk, TerrainGenerator};

/// Highest accepted smoothing pass count.
pub const MAX_SMOOTHING_PASSES: u32 = 3;
/// Accepted range of the smooth surface depth.
pub const SURFACE_DEPTH_RANGE: (i32, i32) = (1, 8);

/// Meshing strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshMode {
    /// Face-culled cubes everywhere.
    #[default]
    Blocky,
    /// Marching-cubes surface band over cubic rock.
    Smooth,
}

/// Mesher parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    /// Meshing strategy.
    pub mode: MeshMode,
    /// Density smoothing passes (smooth mode only).
    pub smoothing_passes: u32,
    /// Blocks below the surface covered by the smooth band.
    pub smooth_surface_depth: i32,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            mode: MeshMode::Blocky,
            smoothing_passes: 1,
            smooth_surface_depth: 3,
        }
    }
}

impl MeshSettings {
    /// Settings with every value pulled into its accepted range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            mode: self.mode,
            smoothing_passes: self.smoothing_passes.min(MAX_SMOOTHING_PASSES),
            smooth_surface_depth: self
                .smooth_surface_depth
                .clamp(SURFACE_DEPTH_RANGE.0, SURFACE_DEPTH_RANGE.1),
        }
    }
}

/// Builds chunk meshes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChunkMesher {
    settings: MeshSettings,
}

impl ChunkMesher {
    /// Creates a mesher. Out-of-range settings are clamped.
    #[must_use]
    pub fn new(settings: MeshSettings) -> Self {
        Self {
            settings: settings.clamped(),
        }
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &MeshSettings {
        &self.settings
    }

    /// Switches the meshing strategy.
    pub fn set_mode(&mut self, mode: MeshMode) {
        self.settings.mode = mode;
    }

    /// Rebuilds the full mesh of a chunk.
    #[must_use]
    pub fn build(&self, chunk: &Chunk, terrain: &TerrainGenerator, catalog: &dyn BlockCatalog) -> ChunkMesh {
        let mut mesh = ChunkMesh::new();

        match self.settings.mode {
            MeshMode::Blocky => {
                let faces = blocky::mesh_blocks(chunk, catalog, &mut mesh, |_, _, _| true);
                let small = blocky::mesh_small_blocks(chunk, catalog, &mut mesh);
                tracing::trace!(
                    "Blocky mesh {}: {} faces, {} small-block faces",
                    chunk.coord(),
                    faces,
                    small
                );
            }
            MeshMode::Smooth => {
                let stats = smooth::mesh_smooth(
                    chunk,
                    terrain,
                    catalog,
                    self.settings.smoothing_passes,
                    self.settings.smooth_surface_depth,
                    &mut mesh,
                );
                tracing::trace!("Smooth mesh {}: {:?}", chunk.coord(), stats);
            }
        }

        mesh.retain_non_empty();
        mesh
    }
}
