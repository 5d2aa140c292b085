//! # VoxelWorld Shared
//!
//! Common types used by the terrain, meshing and world crates.
//!
//! ## Coordinate Conventions
//!
//! - X and Y are horizontal, Z is up.
//! - A chunk is addressed by a 2D [`ChunkCoord`] and spans the full world height.
//! - World-space positions are continuous `f32` units; one block is
//!   [`BLOCK_SIZE`] units wide and one sub-block is [`SUB_BLOCK_SIZE`].

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod coords;
pub mod math;

pub use constants::{
    BLOCK_SIZE, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z, CHUNK_VOLUME, DEFAULT_RENDER_DISTANCE,
    SAND_HEIGHT_THRESHOLD, SUBSOIL_DEPTH, SUB_BLOCK_FACTOR, SUB_BLOCK_SIZE,
};
pub use coords::{BlockPos, ChunkCoord, SubBlockPos};
pub use math::{Vec2, Vec3};
