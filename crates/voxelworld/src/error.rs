//! # World Error Types
//!
//! Setup errors for the world manager. Runtime edits report failure with
//! `bool`, not with these.

use std::path::PathBuf;
use thiserror::Error;
use voxelworld_procedural::ProceduralError;

/// Errors that can occur while setting up a world.
#[derive(Error, Debug)]
pub enum WorldError {
    /// Config file is not valid TOML or has the wrong shape.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Streaming settings are out of range.
    #[error("invalid streaming config: {0}")]
    InvalidStreaming(String),

    /// Terrain or catalog setup failed.
    #[error(transparent)]
    Procedural(#[from] ProceduralError),
}

/// Result type for world setup.
pub type WorldResult<T> = Result<T, WorldError>;
