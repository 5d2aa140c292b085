//! # World Configuration
//!
//! Loaded once at startup from TOML. Every table is optional:
//!
//! ```toml
//! [terrain]
//! seed = 42
//! height_base = 7.5
//!
//! [meshing]
//! mode = "smooth"
//! smoothing_passes = 2
//!
//! [streaming]
//! render_distance = 6
//! ```

use crate::error::{WorldError, WorldResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use voxelworld_meshing::MeshSettings;
use voxelworld_procedural::TerrainConfig;
use voxelworld_shared::DEFAULT_RENDER_DISTANCE;

/// Largest accepted render distance.
pub const MAX_RENDER_DISTANCE: i32 = 64;

/// Chunk streaming parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Chebyshev radius, in chunks, kept loaded around the observer.
    pub render_distance: i32,
    /// Remeshes per tick. 0 drains the whole queue every tick.
    pub max_remeshes_per_tick: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            render_distance: DEFAULT_RENDER_DISTANCE,
            max_remeshes_per_tick: 0,
        }
    }
}

/// Complete world configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Terrain generation.
    pub terrain: TerrainConfig,
    /// Chunk meshing.
    pub meshing: MeshSettings,
    /// Chunk streaming.
    pub streaming: StreamingConfig,
}

impl WorldConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns a parse error or the first validation failure.
    pub fn from_toml_str(source: &str) -> WorldResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Io`] if the file can't be read, otherwise as
    /// [`WorldConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> WorldResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| WorldError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks terrain and streaming parameters.
    ///
    /// Meshing values are clamped rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter.
    pub fn validate(&self) -> WorldResult<()> {
        self.terrain.validate()?;

        let distance = self.streaming.render_distance;
        if !(0..=MAX_RENDER_DISTANCE).contains(&distance) {
            return Err(WorldError::InvalidStreaming(format!(
                "render_distance {distance} outside 0..={MAX_RENDER_DISTANCE}"
            )));
        }
        Ok(())
    }
}
