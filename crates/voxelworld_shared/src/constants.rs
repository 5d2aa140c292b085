//! # World Constants
//!
//! Grid dimensions and terrain thresholds.
//!
//! **CRITICAL:** Chunk dimensions are baked into the storage shapes of the
//! procedural and meshing crates. Changing them changes every saved layout.

// =============================================================================
// GRID
// =============================================================================

/// Edge length of one full block in world units.
pub const BLOCK_SIZE: f32 = 80.0;

/// Number of sub-blocks per full block along each axis.
pub const SUB_BLOCK_FACTOR: i32 = 4;

/// Edge length of one sub-block ("small block") in world units.
pub const SUB_BLOCK_SIZE: f32 = BLOCK_SIZE / SUB_BLOCK_FACTOR as f32;

/// Chunk width along X, in blocks.
pub const CHUNK_SIZE_X: usize = 16;

/// Chunk width along Y, in blocks.
pub const CHUNK_SIZE_Y: usize = 16;

/// Chunk height along Z, in blocks. Chunks span the whole world height.
pub const CHUNK_SIZE_Z: usize = 32;

/// Number of cells in one chunk.
pub const CHUNK_VOLUME: usize = CHUNK_SIZE_X * CHUNK_SIZE_Y * CHUNK_SIZE_Z;

// =============================================================================
// TERRAIN
// =============================================================================

/// Columns whose surface is below this height get sand instead of grass.
pub const SAND_HEIGHT_THRESHOLD: i32 = 6;

/// Thickness of the sand/grass layer above stone.
pub const SUBSOIL_DEPTH: i32 = 3;

// =============================================================================
// STREAMING
// =============================================================================

/// Default Chebyshev radius of resident chunks around the observer.
pub const DEFAULT_RENDER_DISTANCE: i32 = 8;
