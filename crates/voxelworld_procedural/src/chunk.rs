//! # Chunk Storage
//!
//! A chunk is a 16x16x32 column of the world: a dense grid of block ids
//! plus a sparse list of sub-block ("small block") placements.
//!
//! ## Memory Layout
//!
//! Blocks are stored in a flat boxed slice indexed `x + y*16 + z*16*16`
//! (via `ndshape`), so a horizontal layer is contiguous.
//!
//! Small blocks are kept in a `Vec` and searched linearly. Placements are
//! rare enough per chunk that hashing does not pay off.
//!
//! ## Coordinate Spaces
//!
//! - Local block coordinates: `0..16`, `0..16`, `0..32`, as `i32` so that
//!   neighbor offsets can go negative without wrapping.
//! - World block coordinates: local plus the chunk origin.
//! - Small blocks are stored in **world** sub-block coordinates.

use crate::catalog::BlockId;
use crate::terrain::{TerrainGenerator, TerrainLayer};
use ndshape::{ConstShape, ConstShape3u32};
use voxelworld_shared::{
    ChunkCoord, SubBlockPos, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z, CHUNK_VOLUME,
    SUB_BLOCK_FACTOR,
};

/// Shape of the dense block grid.
pub type ChunkShape =
    ConstShape3u32<{ CHUNK_SIZE_X as u32 }, { CHUNK_SIZE_Y as u32 }, { CHUNK_SIZE_Z as u32 }>;

const SX: i32 = CHUNK_SIZE_X as i32;
const SY: i32 = CHUNK_SIZE_Y as i32;
const SZ: i32 = CHUNK_SIZE_Z as i32;

/// A sub-block placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SmallBlock {
    /// World sub-block position.
    pub pos: SubBlockPos,
    /// Block id.
    pub id: BlockId,
}

/// A 16x16x32 chunk of blocks.
#[derive(Debug, Clone)]
pub struct Chunk {
    coord: ChunkCoord,
    blocks: Box<[BlockId]>,
    small_blocks: Vec<SmallBlock>,
    dirty: bool,
}

impl Chunk {
    /// Creates an empty (all-air) chunk.
    #[must_use]
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            blocks: vec![BlockId::EMPTY; CHUNK_VOLUME].into_boxed_slice(),
            small_blocks: Vec::new(),
            dirty: true,
        }
    }

    /// Chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Whether a local coordinate lies inside the chunk.
    #[inline]
    #[must_use]
    pub const fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        x >= 0 && x < SX && y >= 0 && y < SY && z >= 0 && z < SZ
    }

    #[inline]
    fn index(x: i32, y: i32, z: i32) -> Option<usize> {
        if Self::in_bounds(x, y, z) {
            Some(ChunkShape::linearize([x as u32, y as u32, z as u32]) as usize)
        } else {
            None
        }
    }

    // =========================================================================
    // LARGE BLOCKS
    // =========================================================================

    /// Block at a local coordinate. Air when out of bounds.
    #[inline]
    #[must_use]
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockId {
        Self::index(x, y, z).map_or(BlockId::EMPTY, |i| self.blocks[i])
    }

    /// Sets a block at a local coordinate and marks the chunk dirty.
    ///
    /// Returns `false` (and does nothing) when out of bounds.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) -> bool {
        match Self::index(x, y, z) {
            Some(i) => {
                self.blocks[i] = id;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Whether a local cell holds a block.
    #[inline]
    #[must_use]
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        !self.get_block(x, y, z).is_empty()
    }

    /// Number of non-air cells.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|id| !id.is_empty()).count()
    }

    // =========================================================================
    // GENERATION
    // =========================================================================

    /// Fills the grid from terrain. Any previous content is overwritten.
    ///
    /// Depends only on the chunk coordinate and the terrain generator.
    pub fn generate(&mut self, terrain: &TerrainGenerator) {
        let palette = *terrain.palette();
        let origin_x = self.coord.origin_block_x();
        let origin_y = self.coord.origin_block_y();

        for y in 0..SY {
            for x in 0..SX {
                let surface = terrain.surface_height(origin_x + x, origin_y + y);
                for z in 0..SZ {
                    let layer = TerrainLayer::classify(surface, z);
                    if let Some(i) = Self::index(x, y, z) {
                        self.blocks[i] = palette.block_for(layer);
                    }
                }
            }
        }
        self.dirty = true;
    }

    // =========================================================================
    // CROSS-CHUNK QUERIES
    // =========================================================================

    /// Block at a world coordinate.
    ///
    /// Cells owned by this chunk read live data. Cells owned by any other
    /// chunk are recomputed from terrain, so neighbor edits are not seen.
    #[must_use]
    pub fn world_block(&self, terrain: &TerrainGenerator, world_x: i32, world_y: i32, world_z: i32) -> BlockId {
        if world_z < 0 || world_z >= SZ {
            return BlockId::EMPTY;
        }
        if ChunkCoord::from_block(world_x, world_y) == self.coord {
            self.get_block(
                world_x - self.coord.origin_block_x(),
                world_y - self.coord.origin_block_y(),
                world_z,
            )
        } else {
            terrain.natural_block(world_x, world_y, world_z)
        }
    }

    /// Whether a world cell holds a block. See [`Chunk::world_block`].
    #[inline]
    #[must_use]
    pub fn is_world_block_solid(&self, terrain: &TerrainGenerator, world_x: i32, world_y: i32, world_z: i32) -> bool {
        !self.world_block(terrain, world_x, world_y, world_z).is_empty()
    }

    /// Whether a local block looks player-placed: it exists and sits at or
    /// above the generated surface of its column.
    ///
    /// A block placed where terrain would be solid anyway is reported as
    /// natural.
    #[must_use]
    pub fn is_player_placed(&self, terrain: &TerrainGenerator, x: i32, y: i32, z: i32) -> bool {
        if !self.is_solid(x, y, z) {
            return false;
        }
        let surface = terrain.surface_height(
            self.coord.origin_block_x() + x,
            self.coord.origin_block_y() + y,
        );
        z >= surface
    }

    // =========================================================================
    // SMALL BLOCKS
    // =========================================================================

    /// Sub-block position relative to this chunk's sub-grid origin.
    #[inline]
    #[must_use]
    pub const fn local_sub_block(&self, pos: SubBlockPos) -> (i32, i32, i32) {
        (
            pos.x - self.coord.origin_block_x() * SUB_BLOCK_FACTOR,
            pos.y - self.coord.origin_block_y() * SUB_BLOCK_FACTOR,
            pos.z,
        )
    }

    /// Whether a world sub-block position falls inside this chunk.
    #[must_use]
    pub const fn contains_sub_block(&self, pos: SubBlockPos) -> bool {
        let (x, y, z) = self.local_sub_block(pos);
        x >= 0
            && x < SX * SUB_BLOCK_FACTOR
            && y >= 0
            && y < SY * SUB_BLOCK_FACTOR
            && z >= 0
            && z < SZ * SUB_BLOCK_FACTOR
    }

    /// Adds a small block. No-op returning `false` if the position is taken.
    pub fn add_small_block(&mut self, pos: SubBlockPos, id: BlockId) -> bool {
        if self.has_small_block_at(pos) {
            return false;
        }
        self.small_blocks.push(SmallBlock { pos, id });
        self.dirty = true;
        true
    }

    /// Removes the small block at a position. Returns whether one existed.
    pub fn remove_small_block(&mut self, pos: SubBlockPos) -> bool {
        match self.small_blocks.iter().position(|b| b.pos == pos) {
            Some(i) => {
                self.small_blocks.swap_remove(i);
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Whether a small block occupies a position.
    #[must_use]
    pub fn has_small_block_at(&self, pos: SubBlockPos) -> bool {
        self.small_blocks.iter().any(|b| b.pos == pos)
    }

    /// Id of the small block at a position.
    #[must_use]
    pub fn small_block_id(&self, pos: SubBlockPos) -> Option<BlockId> {
        self.small_blocks.iter().find(|b| b.pos == pos).map(|b| b.id)
    }

    /// All small blocks, in no particular order.
    #[must_use]
    pub fn small_blocks(&self) -> &[SmallBlock] {
        &self.small_blocks
    }

    /// Number of small blocks.
    #[must_use]
    pub fn small_block_count(&self) -> usize {
        self.small_blocks.len()
    }

    // =========================================================================
    // DIRTY TRACKING
    // =========================================================================

    /// Whether the mesh is out of date.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flags the mesh as out of date.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clears the dirty flag after a rebuild.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
