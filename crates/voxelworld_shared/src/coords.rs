//! # Grid Coordinates
//!
//! Integer addresses for chunks, blocks and sub-blocks, plus the
//! floor-division conversions from continuous world positions.
//!
//! All conversions use `div_euclid` / `floor` so negative coordinates map
//! to the cell *below* them (`-0.5` blocks is cell `-1`, not `0`).

use crate::constants::{
    BLOCK_SIZE, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z, SUB_BLOCK_FACTOR, SUB_BLOCK_SIZE,
};
use crate::math::Vec3;
use serde::{Deserialize, Serialize};

/// Chunk coordinate in the horizontal chunk grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Y coordinate (in chunks, not blocks).
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk that owns the given world block column.
    #[inline]
    #[must_use]
    pub const fn from_block(block_x: i32, block_y: i32) -> Self {
        Self {
            x: block_x.div_euclid(CHUNK_SIZE_X as i32),
            y: block_y.div_euclid(CHUNK_SIZE_Y as i32),
        }
    }

    /// Chunk that contains a continuous world position.
    #[must_use]
    pub fn from_world(pos: Vec3) -> Self {
        let block = BlockPos::from_world(pos);
        Self::from_block(block.x, block.y)
    }

    /// World block X of the chunk's origin corner.
    #[inline]
    #[must_use]
    pub const fn origin_block_x(self) -> i32 {
        self.x * CHUNK_SIZE_X as i32
    }

    /// World block Y of the chunk's origin corner.
    #[inline]
    #[must_use]
    pub const fn origin_block_y(self) -> i32 {
        self.y * CHUNK_SIZE_Y as i32
    }

    /// World-space position of the chunk's origin corner.
    #[must_use]
    pub fn world_origin(self) -> Vec3 {
        Vec3::new(
            self.origin_block_x() as f32 * BLOCK_SIZE,
            self.origin_block_y() as f32 * BLOCK_SIZE,
            0.0,
        )
    }

    /// Chebyshev (max-axis) distance between two chunk coordinates.
    #[inline]
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// World-space integer block position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    /// World block X.
    pub x: i32,
    /// World block Y.
    pub y: i32,
    /// World block Z (height).
    pub z: i32,
}

impl BlockPos {
    /// Creates a new block position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Block containing a continuous world position.
    #[must_use]
    pub fn from_world(pos: Vec3) -> Self {
        Self {
            x: (pos.x / BLOCK_SIZE).floor() as i32,
            y: (pos.y / BLOCK_SIZE).floor() as i32,
            z: (pos.z / BLOCK_SIZE).floor() as i32,
        }
    }

    /// Chunk owning this block's column.
    #[inline]
    #[must_use]
    pub const fn chunk(self) -> ChunkCoord {
        ChunkCoord::from_block(self.x, self.y)
    }

    /// Position relative to the given chunk's origin. Not bounds-checked.
    #[inline]
    #[must_use]
    pub const fn local_to(self, chunk: ChunkCoord) -> (i32, i32, i32) {
        (
            self.x - chunk.origin_block_x(),
            self.y - chunk.origin_block_y(),
            self.z,
        )
    }

    /// Whether `z` lies inside the world's height range.
    #[inline]
    #[must_use]
    pub const fn in_height_range(self) -> bool {
        self.z >= 0 && self.z < CHUNK_SIZE_Z as i32
    }
}

/// World-space integer sub-block position (quarter-block grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubBlockPos {
    /// World sub-block X.
    pub x: i32,
    /// World sub-block Y.
    pub y: i32,
    /// World sub-block Z.
    pub z: i32,
}

impl SubBlockPos {
    /// Creates a new sub-block position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Sub-block containing a continuous world position.
    #[must_use]
    pub fn from_world(pos: Vec3) -> Self {
        Self {
            x: (pos.x / SUB_BLOCK_SIZE).floor() as i32,
            y: (pos.y / SUB_BLOCK_SIZE).floor() as i32,
            z: (pos.z / SUB_BLOCK_SIZE).floor() as i32,
        }
    }

    /// Full block that contains this sub-block.
    #[inline]
    #[must_use]
    pub const fn block(self) -> BlockPos {
        BlockPos::new(
            self.x.div_euclid(SUB_BLOCK_FACTOR),
            self.y.div_euclid(SUB_BLOCK_FACTOR),
            self.z.div_euclid(SUB_BLOCK_FACTOR),
        )
    }

    /// Neighbor offset by the given deltas.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_from_negative_block() {
        assert_eq!(ChunkCoord::from_block(-1, -16), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_block(-17, 15), ChunkCoord::new(-2, 0));
        assert_eq!(ChunkCoord::from_block(16, 31), ChunkCoord::new(1, 1));
    }

    #[test]
    fn test_world_to_block_floors() {
        let pos = Vec3::new(-1.0, 79.9, 160.0);
        assert_eq!(BlockPos::from_world(pos), BlockPos::new(-1, 0, 2));
    }

    #[test]
    fn test_world_to_chunk() {
        let chunk_width = CHUNK_SIZE_X as f32 * BLOCK_SIZE;
        assert_eq!(ChunkCoord::from_world(Vec3::new(0.0, 0.0, 0.0)), ChunkCoord::new(0, 0));
        assert_eq!(
            ChunkCoord::from_world(Vec3::new(chunk_width, -1.0, 500.0)),
            ChunkCoord::new(1, -1)
        );
    }

    #[test]
    fn test_sub_block_to_block() {
        assert_eq!(SubBlockPos::new(3, 4, -1).block(), BlockPos::new(0, 1, -1));
        assert_eq!(
            SubBlockPos::from_world(Vec3::new(25.0, -5.0, 0.0)),
            SubBlockPos::new(1, -1, 0)
        );
    }

    #[test]
    fn test_chebyshev_distance() {
        let a = ChunkCoord::new(0, 0);
        assert_eq!(a.chebyshev_distance(ChunkCoord::new(3, -2)), 3);
        assert_eq!(a.chebyshev_distance(ChunkCoord::new(-1, -1)), 1);
    }
}
