//! # World Manager
//!
//! Owns every resident chunk and keeps the set of loaded chunks equal to
//! the square of radius `render_distance` around the observer.
//!
//! ## Chunk lifecycle
//!
//! ```text
//! Unloaded ──load──> Loaded ──unload──> Unloaded
//!            generate + mesh + submit     release
//! ```
//!
//! Loading happens only when the observer crosses a chunk boundary, so
//! ticks inside a single chunk cost one coordinate comparison plus the
//! remesh queue.
//!
//! ## Edits
//!
//! Edits take continuous world positions, modify the owning chunk if it is
//! resident and queue it for a remesh. Edits in unloaded chunks are dropped.

use crate::config::WorldConfig;
use crate::error::WorldResult;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use voxelworld_meshing::{ChunkMesh, ChunkMeshUpload, ChunkMesher, MeshSink};
use voxelworld_procedural::{BlockCatalog, BlockId, Chunk, TerrainGenerator};
use voxelworld_shared::{BlockPos, ChunkCoord, SubBlockPos, Vec3};

/// Lifetime counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Chunks loaded since creation.
    pub chunks_loaded: u64,
    /// Chunks unloaded since creation.
    pub chunks_unloaded: u64,
    /// Meshes rebuilt after edits.
    pub chunks_remeshed: u64,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Observer chunk after the tick.
    pub observer_chunk: ChunkCoord,
    /// Whether the observer changed chunk and the window was rescanned.
    pub rescanned: bool,
    /// Chunks loaded this tick.
    pub loaded: usize,
    /// Chunks unloaded this tick.
    pub unloaded: usize,
    /// Chunks remeshed this tick.
    pub remeshed: usize,
    /// Chunks still waiting for a remesh.
    pub pending_remeshes: usize,
}

/// Streams chunks around an observer and routes block edits.
pub struct WorldManager<S: MeshSink> {
    config: WorldConfig,
    catalog: Arc<dyn BlockCatalog>,
    terrain: TerrainGenerator,
    mesher: ChunkMesher,
    sink: S,

    chunks: HashMap<ChunkCoord, Chunk>,
    observer_chunk: Option<ChunkCoord>,

    remesh_queue: VecDeque<ChunkCoord>,
    queued: HashSet<ChunkCoord>,

    stats: WorldStats,
}

impl<S: MeshSink> WorldManager<S> {
    /// Creates a world with terrain built from the config.
    ///
    /// No chunks are loaded until the first [`tick`](Self::tick).
    ///
    /// # Errors
    ///
    /// Returns an error if the config fails validation.
    pub fn new(config: WorldConfig, catalog: Arc<dyn BlockCatalog>, sink: S) -> WorldResult<Self> {
        config.validate()?;
        let terrain = TerrainGenerator::from_config(&config.terrain, catalog.as_ref())?;
        Self::with_terrain(config, catalog, terrain, sink)
    }

    /// Creates a world around an existing terrain generator.
    ///
    /// The config's terrain table is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the streaming config is invalid.
    pub fn with_terrain(
        config: WorldConfig,
        catalog: Arc<dyn BlockCatalog>,
        terrain: TerrainGenerator,
        sink: S,
    ) -> WorldResult<Self> {
        config.validate()?;
        let mesher = ChunkMesher::new(config.meshing);

        tracing::info!(
            "World manager started: render distance {}, {:?} meshing",
            config.streaming.render_distance,
            mesher.settings().mode
        );

        Ok(Self {
            config,
            catalog,
            terrain,
            mesher,
            sink,
            chunks: HashMap::new(),
            observer_chunk: None,
            remesh_queue: VecDeque::new(),
            queued: HashSet::new(),
            stats: WorldStats::default(),
        })
    }

    // =========================================================================
    // STREAMING
    // =========================================================================

    /// Advances the world for an observer at `observer_pos`.
    ///
    /// Rescans the window if the observer entered a new chunk, then works
    /// through the remesh queue.
    pub fn tick(&mut self, observer_pos: Vec3) -> TickReport {
        let center = ChunkCoord::from_world(observer_pos);
        let mut report = TickReport {
            observer_chunk: center,
            ..TickReport::default()
        };

        if self.observer_chunk != Some(center) {
            let (loaded, unloaded) = self.update_chunks(center);
            report.rescanned = true;
            report.loaded = loaded;
            report.unloaded = unloaded;
        }

        report.remeshed = self.process_remesh_queue(self.config.streaming.max_remeshes_per_tick);
        report.pending_remeshes = self.queued.len();
        report
    }

    /// Makes the loaded set exactly the window around `center`.
    ///
    /// Returns `(loaded, unloaded)` counts.
    pub fn update_chunks(&mut self, center: ChunkCoord) -> (usize, usize) {
        let radius = self.config.streaming.render_distance;
        self.observer_chunk = Some(center);

        let mut stale: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .copied()
            .filter(|coord| coord.chebyshev_distance(center) > radius)
            .collect();
        stale.sort_unstable_by_key(|c| (c.y, c.x));
        for &coord in &stale {
            self.unload_chunk(coord);
        }

        let mut loaded = 0;
        for y in (center.y - radius)..=(center.y + radius) {
            for x in (center.x - radius)..=(center.x + radius) {
                let coord = ChunkCoord::new(x, y);
                if !self.chunks.contains_key(&coord) {
                    self.load_chunk(coord);
                    loaded += 1;
                }
            }
        }

        tracing::info!(
            "Streaming rescan at {}: {} loaded, {} unloaded, {} resident",
            center,
            loaded,
            stale.len(),
            self.chunks.len()
        );
        (loaded, stale.len())
    }

    fn load_chunk(&mut self, coord: ChunkCoord) {
        let mut chunk = Chunk::new(coord);
        chunk.generate(&self.terrain);

        let mesh = self.mesher.build(&chunk, &self.terrain, self.catalog.as_ref());
        tracing::debug!("Loaded chunk {} ({} triangles)", coord, mesh.triangle_count());
        self.submit(coord, mesh);
        chunk.clear_dirty();

        self.chunks.insert(coord, chunk);
        self.stats.chunks_loaded += 1;
    }

    fn unload_chunk(&mut self, coord: ChunkCoord) {
        if self.chunks.remove(&coord).is_none() {
            return;
        }
        self.sink.release(coord);
        // Stale queue entries are skipped when drained
        self.queued.remove(&coord);
        self.stats.chunks_unloaded += 1;
        tracing::debug!("Unloaded chunk {}", coord);
    }

    fn submit(&mut self, coord: ChunkCoord, mesh: ChunkMesh) {
        let upload = ChunkMeshUpload::new(coord, mesh, self.catalog.as_ref());
        self.sink.submit(upload);
    }

    // =========================================================================
    // REMESHING
    // =========================================================================

    fn enqueue_remesh(&mut self, coord: ChunkCoord) {
        if self.queued.insert(coord) {
            self.remesh_queue.push_back(coord);
        }
    }

    /// Rebuilds up to `limit` queued meshes. 0 means no limit.
    fn process_remesh_queue(&mut self, limit: usize) -> usize {
        let mut remeshed = 0;
        while limit == 0 || remeshed < limit {
            let Some(coord) = self.remesh_queue.pop_front() else {
                break;
            };
            if !self.queued.remove(&coord) {
                continue;
            }
            if self.remesh(coord) {
                remeshed += 1;
            }
        }
        remeshed
    }

    /// Rebuilds every pending mesh now. Returns how many were rebuilt.
    pub fn flush_remesh_queue(&mut self) -> usize {
        self.process_remesh_queue(0)
    }

    fn remesh(&mut self, coord: ChunkCoord) -> bool {
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return false;
        };
        let mesh = self.mesher.build(chunk, &self.terrain, self.catalog.as_ref());
        chunk.clear_dirty();

        tracing::debug!("Remeshed chunk {} ({} triangles)", coord, mesh.triangle_count());
        self.submit(coord, mesh);
        self.stats.chunks_remeshed += 1;
        true
    }

    /// Number of chunks waiting for a remesh.
    #[must_use]
    pub fn pending_remeshes(&self) -> usize {
        self.queued.len()
    }

    // =========================================================================
    // EDITS
    // =========================================================================

    /// Removes the small block at `world_pos`, or else the large block.
    ///
    /// Returns whether anything was removed.
    pub fn remove_block_at(&mut self, world_pos: Vec3) -> bool {
        let sub = SubBlockPos::from_world(world_pos);
        let block = BlockPos::from_world(world_pos);
        let coord = block.chunk();

        let Some(chunk) = self.chunks.get_mut(&coord) else {
            tracing::trace!("Remove at {:?} dropped: chunk {} not loaded", world_pos, coord);
            return false;
        };

        let removed = if chunk.remove_small_block(sub) {
            true
        } else {
            let (x, y, z) = block.local_to(coord);
            chunk.is_solid(x, y, z) && chunk.set_block(x, y, z, BlockId::EMPTY)
        };

        if removed {
            tracing::trace!("Removed block at {:?} in chunk {}", world_pos, coord);
            self.enqueue_remesh(coord);
        }
        removed
    }

    /// Places a large block in the empty cell at `world_pos`.
    ///
    /// Fails if the chunk isn't loaded, the cell is out of height range or
    /// already holds a block, or `id` is air.
    pub fn place_large_block_at(&mut self, world_pos: Vec3, id: BlockId) -> bool {
        if id.is_empty() {
            return false;
        }
        let block = BlockPos::from_world(world_pos);
        let coord = block.chunk();
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return false;
        };

        let (x, y, z) = block.local_to(coord);
        if !Chunk::in_bounds(x, y, z) || chunk.is_solid(x, y, z) {
            return false;
        }
        chunk.set_block(x, y, z, id);

        tracing::trace!("Placed block {:?} at {:?} in chunk {}", id, block, coord);
        self.enqueue_remesh(coord);
        true
    }

    /// Places a small block at `world_pos`.
    ///
    /// Fails if the chunk isn't loaded, the enclosing large cell is solid or
    /// out of height range, the sub-cell is taken, or `id` is air.
    pub fn place_small_block_at(&mut self, world_pos: Vec3, id: BlockId) -> bool {
        if id.is_empty() {
            return false;
        }
        let sub = SubBlockPos::from_world(world_pos);
        let block = sub.block();
        let coord = block.chunk();
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return false;
        };

        let (x, y, z) = block.local_to(coord);
        if !Chunk::in_bounds(x, y, z) || chunk.is_solid(x, y, z) {
            return false;
        }
        if !chunk.add_small_block(sub, id) {
            return false;
        }

        tracing::trace!("Placed small block {:?} at {:?} in chunk {}", id, sub, coord);
        self.enqueue_remesh(coord);
        true
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Resident chunk at `coord`.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Whether `coord` is resident.
    #[must_use]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Number of resident chunks.
    #[must_use]
    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Resident chunk coordinates, sorted by `(y, x)`.
    #[must_use]
    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<_> = self.chunks.keys().copied().collect();
        coords.sort_unstable_by_key(|c| (c.y, c.x));
        coords
    }

    /// Chunk the observer was in at the last rescan.
    #[must_use]
    pub const fn observer_chunk(&self) -> Option<ChunkCoord> {
        self.observer_chunk
    }

    /// Lifetime counters.
    #[must_use]
    pub const fn stats(&self) -> WorldStats {
        self.stats
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Terrain generator.
    #[must_use]
    pub const fn terrain(&self) -> &TerrainGenerator {
        &self.terrain
    }

    /// Block catalog.
    #[must_use]
    pub fn catalog(&self) -> &dyn BlockCatalog {
        self.catalog.as_ref()
    }

    /// Mesh sink.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Mesh sink, mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<S: MeshSink> std::fmt::Debug for WorldManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldManager")
            .field("observer_chunk", &self.observer_chunk)
            .field("loaded", &self.chunks.len())
            .field("pending_remeshes", &self.queued.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StreamingConfig;
    use voxelworld_meshing::MemorySink;
    use voxelworld_procedural::{BlockRegistry, ConstantNoise, TerrainConfig, TerrainPalette};
    use voxelworld_shared::BLOCK_SIZE;

    fn flat_world(render_distance: i32) -> WorldManager<MemorySink> {
        let catalog = Arc::new(BlockRegistry::with_defaults());
        let terrain_config = TerrainConfig { height_base: 10.0, ..TerrainConfig::default() };
        let terrain = TerrainGenerator::new(
            Arc::new(ConstantNoise(0.0)),
            &terrain_config,
            TerrainPalette::resolve(catalog.as_ref()),
        );
        let config = WorldConfig {
            streaming: StreamingConfig { render_distance, ..StreamingConfig::default() },
            ..WorldConfig::default()
        };
        WorldManager::with_terrain(config, catalog, terrain, MemorySink::new()).unwrap()
    }

    fn block_center(x: i32, y: i32, z: i32) -> Vec3 {
        Vec3::new(x as f32 + 0.5, y as f32 + 0.5, z as f32 + 0.5) * BLOCK_SIZE
    }

    #[test]
    fn test_first_tick_loads_window() {
        let mut world = flat_world(2);
        let report = world.tick(Vec3::ZERO);

        assert!(report.rescanned);
        assert_eq!(report.loaded, 25);
        assert_eq!(world.loaded_chunk_count(), 25);
        assert_eq!(world.sink().mesh_count(), 25);
        assert_eq!(world.observer_chunk(), Some(ChunkCoord::new(0, 0)));
    }

    #[test]
    fn test_same_chunk_tick_is_cheap() {
        let mut world = flat_world(1);
        world.tick(Vec3::ZERO);
        let report = world.tick(Vec3::new(BLOCK_SIZE * 3.0, BLOCK_SIZE * 7.0, 500.0));

        assert!(!report.rescanned);
        assert_eq!(report.loaded, 0);
        assert_eq!(world.stats().chunks_loaded, 9);
    }

    #[test]
    fn test_loaded_chunks_are_clean() {
        let mut world = flat_world(1);
        world.tick(Vec3::ZERO);
        for coord in world.loaded_coords() {
            assert!(!world.chunk(coord).unwrap().is_dirty());
        }
    }

    #[test]
    fn test_edit_queues_one_remesh() {
        let mut world = flat_world(1);
        world.tick(Vec3::ZERO);
        let submissions = world.sink().submissions();

        assert!(world.remove_block_at(block_center(3, 3, 9)));
        assert!(world.remove_block_at(block_center(3, 3, 8)));
        assert_eq!(world.pending_remeshes(), 1);
        assert!(world.chunk(ChunkCoord::new(0, 0)).unwrap().is_dirty());

        let report = world.tick(Vec3::ZERO);
        assert_eq!(report.remeshed, 1);
        assert_eq!(report.pending_remeshes, 0);
        assert_eq!(world.sink().submissions(), submissions + 1);
        assert!(!world.chunk(ChunkCoord::new(0, 0)).unwrap().is_dirty());
    }

    #[test]
    fn test_remesh_budget() {
        let mut world = flat_world(1);
        world.config.streaming.max_remeshes_per_tick = 1;
        world.tick(Vec3::ZERO);

        assert!(world.remove_block_at(block_center(0, 0, 9)));
        assert!(world.remove_block_at(block_center(-1, 0, 9)));
        assert!(world.remove_block_at(block_center(0, -1, 9)));

        assert_eq!(world.tick(Vec3::ZERO).remeshed, 1);
        assert_eq!(world.tick(Vec3::ZERO).remeshed, 1);
        assert_eq!(world.flush_remesh_queue(), 1);
        assert_eq!(world.stats().chunks_remeshed, 3);
    }

    #[test]
    fn test_unload_discards_pending_remesh() {
        let mut world = flat_world(0);
        world.tick(Vec3::ZERO);
        assert!(world.remove_block_at(block_center(1, 1, 9)));
        assert_eq!(world.pending_remeshes(), 1);

        let report = world.tick(block_center(40, 0, 0));
        assert_eq!(report.unloaded, 1);
        assert_eq!(report.remeshed, 0);
        assert_eq!(world.pending_remeshes(), 0);
        assert!(world.sink().mesh(ChunkCoord::new(0, 0)).is_none());
    }

    #[test]
    fn test_debug_summary() {
        let mut world = flat_world(0);
        world.tick(Vec3::ZERO);
        let text = format!("{world:?}");
        assert!(text.contains("WorldManager"));
        assert!(text.contains("loaded: 1"));
    }
}
