//! # VoxelWorld
//!
//! Streams a chunked voxel terrain around a moving observer and routes
//! block edits to the chunks that own them.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐ tick(pos) ┌──────────────┐ generate ┌────────────────┐
//! │  Game logic  │──────────>│ WorldManager │─────────>│ voxelworld_    │
//! │  (observer)  │  edits    │  (registry)  │          │ procedural     │
//! └──────────────┘           └──────┬───────┘          └────────────────┘
//!                                   │ build            ┌────────────────┐
//!                                   ├─────────────────>│ voxelworld_    │
//!                                   │                  │ meshing        │
//!                                   v submit/release   └────────────────┘
//!                              ┌──────────┐
//!                              │ MeshSink │
//!                              └──────────┘
//! ```
//!
//! Everything runs on the caller's thread. [`ChannelMeshSink`] moves the
//! finished meshes to another thread if the renderer lives elsewhere.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod events;
pub mod world_manager;

pub use config::{StreamingConfig, WorldConfig};
pub use error::{WorldError, WorldResult};
pub use events::{ChannelMeshSink, MeshEvent, MeshReceiver};
pub use world_manager::{TickReport, WorldManager, WorldStats};

// Re-export the lower layers so callers need a single dependency
pub use voxelworld_meshing as meshing;
pub use voxelworld_procedural as procedural;
pub use voxelworld_shared as shared;
