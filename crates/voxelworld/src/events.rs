//! # Mesh Events
//!
//! Channel-backed [`MeshSink`] for handing chunk meshes to a render thread.
//!
//! ```text
//! ┌──────────────┐   MeshEvent   ┌──────────────┐
//! │ WorldManager │──────────────>│ Render loop  │
//! │   (tick)     │   crossbeam   │  (drain)     │
//! └──────────────┘               └──────────────┘
//! ```
//!
//! Uploads are never dropped: a full bounded channel blocks the tick until
//! the render side catches up.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use voxelworld_meshing::{ChunkMeshUpload, MeshSink};
use voxelworld_shared::ChunkCoord;

/// Message from the world to the renderer.
#[derive(Clone, Debug)]
pub enum MeshEvent {
    /// Replace the chunk's geometry.
    Upload(Box<ChunkMeshUpload>),
    /// Drop the chunk's geometry.
    Release(ChunkCoord),
}

impl MeshEvent {
    /// Chunk the event refers to.
    #[must_use]
    pub fn coord(&self) -> ChunkCoord {
        match self {
            Self::Upload(upload) => upload.coord,
            Self::Release(coord) => *coord,
        }
    }
}

/// Sending half, used as the world manager's sink.
#[derive(Clone, Debug)]
pub struct ChannelMeshSink {
    sender: Sender<MeshEvent>,
    disconnected: bool,
}

/// Receiving half, owned by the render loop.
#[derive(Clone, Debug)]
pub struct MeshReceiver {
    receiver: Receiver<MeshEvent>,
}

impl ChannelMeshSink {
    /// Creates a sink over a channel holding at most `capacity` events.
    #[must_use]
    pub fn bounded(capacity: usize) -> (Self, MeshReceiver) {
        let (sender, receiver) = bounded(capacity);
        (Self { sender, disconnected: false }, MeshReceiver { receiver })
    }

    /// Creates a sink over an unbounded channel.
    #[must_use]
    pub fn unbounded() -> (Self, MeshReceiver) {
        let (sender, receiver) = unbounded();
        (Self { sender, disconnected: false }, MeshReceiver { receiver })
    }

    /// Whether the receiver has gone away.
    #[must_use]
    pub const fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    fn send(&mut self, event: MeshEvent) {
        if self.sender.send(event).is_err() && !self.disconnected {
            tracing::warn!("Mesh receiver dropped; further mesh events are discarded");
            self.disconnected = true;
        }
    }
}

impl MeshSink for ChannelMeshSink {
    fn submit(&mut self, upload: ChunkMeshUpload) {
        self.send(MeshEvent::Upload(Box::new(upload)));
    }

    fn release(&mut self, coord: ChunkCoord) {
        self.send(MeshEvent::Release(coord));
    }
}

impl MeshReceiver {
    /// Receives all pending events (non-blocking).
    #[inline]
    pub fn drain(&self) -> Vec<MeshEvent> {
        self.receiver.try_iter().collect()
    }

    /// Waits for the next event. `None` once every sink is gone.
    #[inline]
    pub fn recv(&self) -> Option<MeshEvent> {
        self.receiver.recv().ok()
    }

    /// Receives one event (non-blocking).
    #[inline]
    pub fn try_recv(&self) -> Option<MeshEvent> {
        self.receiver.try_recv().ok()
    }

    /// Number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Whether any events are pending.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}
