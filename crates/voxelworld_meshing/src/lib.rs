//! # VoxelWorld Meshing
//!
//! Turns chunks into renderable triangle meshes.
//!
//! ## Modes
//!
//! - **Blocky**: one quad per exposed cube face, culled against the chunk only
//! - **Smooth**: marching-cubes surface over the top few blocks of each
//!   column, cubes everywhere else
//!
//! Output is split into sections by material group so each section can be
//! drawn with one material. Meshes go out through a [`MeshSink`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod blocky;
pub mod density;
pub mod face;
pub mod marching_cubes;
pub mod mesh;
pub mod mesher;
pub mod sink;
pub mod smooth;
pub mod tables;

pub use density::DensityField;
pub use face::Face;
pub use mesh::{ChunkMesh, MeshSection};
pub use mesher::{ChunkMesher, MeshMode, MeshSettings};
pub use sink::{ChunkMeshUpload, MemorySink, MeshSink, SectionBinding};
pub use smooth::SmoothStats;
