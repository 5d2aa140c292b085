//! # VoxelWorld Procedural Generation
//!
//! Deterministic terrain and block storage for a streamed voxel world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same world
//! 2. **Chunked**: World is generated in fixed-size 16x16x32 chunks
//! 3. **Self-contained**: A chunk generates from noise alone, never from its neighbors
//! 4. **Forgiving**: Out-of-range queries return air instead of failing
//!
//! ## Core Components
//!
//! - `SimplexNoise` / `FractalNoise`: 2D coherent noise and its octave sum
//! - `TerrainGenerator`: column heights and stone/sand/grass classification
//! - `BlockCatalog`: read interface to block colors and material groups
//! - `Chunk`: dense block grid, sparse small blocks, dirty tracking
//!
//! ## Example
//!
//! ```rust,ignore
//! use voxelworld_procedural::{BlockRegistry, Chunk, TerrainConfig, TerrainGenerator};
//! use voxelworld_shared::ChunkCoord;
//!
//! let catalog = BlockRegistry::with_defaults();
//! let terrain = TerrainGenerator::from_config(&TerrainConfig::default(), &catalog)?;
//!
//! let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
//! chunk.generate(&terrain);
//! assert!(chunk.is_solid(0, 0, 0));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod catalog;
pub mod chunk;
pub mod error;
pub mod noise;
pub mod terrain;

pub use catalog::{
    BlockCatalog, BlockCategory, BlockDefinition, BlockId, BlockRegistry, MaterialDefinition, Rgba,
};
pub use chunk::{Chunk, ChunkShape, SmallBlock};
pub use error::{ProceduralError, ProceduralResult};
pub use noise::{ConstantNoise, FractalNoise, NoiseSource, SimplexNoise, WorldSeed};
pub use terrain::{TerrainConfig, TerrainGenerator, TerrainLayer, TerrainPalette};
