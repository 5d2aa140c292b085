//! # Terrain Classification
//!
//! Turns a 2D noise field into a height field and classifies every cell of
//! a column as stone, sand, grass or air.
//!
//! ## Column Layout
//!
//! ```text
//!   z >= H          air
//!   H-3 <= z < H    sand (H < 6) or grass
//!   z < H-3         stone
//! ```
//!
//! `H` is the integer surface height: the continuous height rounded half-up
//! and clamped to `[1, CHUNK_SIZE_Z - 1]`.

use crate::catalog::{BlockCatalog, BlockId};
use crate::error::{ProceduralError, ProceduralResult};
use crate::noise::{FractalNoise, NoiseSource, SimplexNoise, WorldSeed};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use voxelworld_shared::{CHUNK_SIZE_Z, SAND_HEIGHT_THRESHOLD, SUBSOIL_DEPTH};

/// Terrain parameters. Fixed for the lifetime of a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// World seed.
    pub seed: u64,
    /// World block coordinates are multiplied by this before sampling.
    pub noise_scale: f64,
    /// Height at noise value 0.
    pub height_base: f64,
    /// Height swing at noise value +-1.
    pub height_amplitude: f64,
    /// Number of fractal octaves.
    pub octaves: u32,
    /// Amplitude falloff per octave.
    pub persistence: f64,
    /// Frequency growth per octave.
    pub lacunarity: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: WorldSeed::default().value(),
            noise_scale: 0.01,
            height_base: 7.5,
            height_amplitude: 15.0,
            octaves: 5,
            persistence: 0.05,
            lacunarity: 2.5,
        }
    }
}

impl TerrainConfig {
    /// Checks every parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ProceduralError::InvalidTerrainConfig`] naming the first
    /// offending field.
    pub fn validate(&self) -> ProceduralResult<()> {
        let invalid = |field, value, reason| {
            Err(ProceduralError::InvalidTerrainConfig { field, value, reason })
        };

        for (field, value) in [
            ("noise_scale", self.noise_scale),
            ("height_base", self.height_base),
            ("height_amplitude", self.height_amplitude),
            ("persistence", self.persistence),
            ("lacunarity", self.lacunarity),
        ] {
            if !value.is_finite() {
                return invalid(field, value, "must be finite");
            }
        }
        if self.octaves == 0 {
            return invalid("octaves", 0.0, "must be at least 1");
        }
        if self.noise_scale <= 0.0 {
            return invalid("noise_scale", self.noise_scale, "must be positive");
        }
        if self.persistence <= 0.0 {
            return invalid("persistence", self.persistence, "must be positive");
        }
        if self.lacunarity <= 0.0 {
            return invalid("lacunarity", self.lacunarity, "must be positive");
        }
        Ok(())
    }
}

/// Classification of a single terrain cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainLayer {
    /// Deep rock.
    Stone,
    /// Top layer of low columns.
    Sand,
    /// Top layer of high columns.
    Grass,
    /// Above the surface.
    Air,
}

impl TerrainLayer {
    /// Top-layer material for a column of the given surface height.
    #[inline]
    #[must_use]
    pub const fn surface_for_height(surface_height: i32) -> Self {
        if surface_height < SAND_HEIGHT_THRESHOLD {
            Self::Sand
        } else {
            Self::Grass
        }
    }

    /// Classifies height `z` in a column of the given surface height.
    #[inline]
    #[must_use]
    pub const fn classify(surface_height: i32, z: i32) -> Self {
        if z < surface_height - SUBSOIL_DEPTH {
            Self::Stone
        } else if z < surface_height {
            Self::surface_for_height(surface_height)
        } else {
            Self::Air
        }
    }
}

/// Block ids used for each terrain layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainPalette {
    /// Stone layer block.
    pub stone: BlockId,
    /// Sand layer block.
    pub sand: BlockId,
    /// Grass layer block.
    pub grass: BlockId,
}

impl Default for TerrainPalette {
    /// Ids of the stock registry: Stone = 1, Sand = 3, Grass = 5.
    fn default() -> Self {
        Self {
            stone: BlockId::new(1),
            sand: BlockId::new(3),
            grass: BlockId::new(5),
        }
    }
}

impl TerrainPalette {
    /// Resolves terrain blocks from a catalog.
    ///
    /// Prefers the large variants (`StoneL`, `SandL`, `GrassL`) and falls
    /// back to `Stone`, `Sand`, `Grass`. Names missing from the catalog
    /// keep the default id.
    #[must_use]
    pub fn resolve(catalog: &dyn BlockCatalog) -> Self {
        let defaults = Self::default();
        let lookup = |preferred: &str, plain: &str, fallback: BlockId| {
            catalog
                .id_by_name(preferred)
                .or_else(|| catalog.id_by_name(plain))
                .unwrap_or_else(|| {
                    tracing::warn!("Catalog has no '{plain}' block, using id {}", fallback.raw());
                    fallback
                })
        };

        Self {
            stone: lookup("StoneL", "Stone", defaults.stone),
            sand: lookup("SandL", "Sand", defaults.sand),
            grass: lookup("GrassL", "Grass", defaults.grass),
        }
    }

    /// Block id for a layer. Air maps to [`BlockId::EMPTY`].
    #[inline]
    #[must_use]
    pub const fn block_for(&self, layer: TerrainLayer) -> BlockId {
        match layer {
            TerrainLayer::Stone => self.stone,
            TerrainLayer::Sand => self.sand,
            TerrainLayer::Grass => self.grass,
            TerrainLayer::Air => BlockId::EMPTY,
        }
    }
}

/// Deterministic column height and classification source.
///
/// Cheap to clone; the noise source is shared.
#[derive(Clone)]
pub struct TerrainGenerator {
    noise: Arc<dyn NoiseSource>,
    noise_scale: f64,
    height_base: f64,
    height_amplitude: f64,
    palette: TerrainPalette,
}

impl std::fmt::Debug for TerrainGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerrainGenerator")
            .field("noise_scale", &self.noise_scale)
            .field("height_base", &self.height_base)
            .field("height_amplitude", &self.height_amplitude)
            .field("palette", &self.palette)
            .finish_non_exhaustive()
    }
}

impl TerrainGenerator {
    /// Creates a generator over an arbitrary noise source.
    #[must_use]
    pub fn new(noise: Arc<dyn NoiseSource>, config: &TerrainConfig, palette: TerrainPalette) -> Self {
        Self {
            noise,
            noise_scale: config.noise_scale,
            height_base: config.height_base,
            height_amplitude: config.height_amplitude,
            palette,
        }
    }

    /// Creates the standard fractal-simplex generator.
    ///
    /// # Errors
    ///
    /// Returns an error if the config fails validation.
    pub fn from_config(config: &TerrainConfig, catalog: &dyn BlockCatalog) -> ProceduralResult<Self> {
        config.validate()?;
        let noise = FractalNoise::new(
            SimplexNoise::new(WorldSeed::new(config.seed)),
            config.octaves,
            config.persistence,
            config.lacunarity,
        );
        tracing::debug!(
            "Terrain generator: seed={:#x} octaves={} scale={}",
            config.seed,
            config.octaves,
            config.noise_scale
        );
        Ok(Self::new(Arc::new(noise), config, TerrainPalette::resolve(catalog)))
    }

    /// Block ids used for the terrain layers.
    #[must_use]
    pub const fn palette(&self) -> &TerrainPalette {
        &self.palette
    }

    /// Continuous terrain height of a world block column.
    #[must_use]
    pub fn continuous_height(&self, world_x: i32, world_y: i32) -> f64 {
        let sample = self.noise.sample(
            f64::from(world_x) * self.noise_scale,
            f64::from(world_y) * self.noise_scale,
        );
        self.height_base + sample * self.height_amplitude
    }

    /// Integer surface height: first air cell of the column.
    #[must_use]
    pub fn surface_height(&self, world_x: i32, world_y: i32) -> i32 {
        let max = CHUNK_SIZE_Z as i32 - 1;
        let rounded = (self.continuous_height(world_x, world_y) + 0.5).floor();
        (rounded.clamp(1.0, f64::from(max))) as i32
    }

    /// Layer of a world cell in untouched terrain.
    #[must_use]
    pub fn classify(&self, world_x: i32, world_y: i32, z: i32) -> TerrainLayer {
        TerrainLayer::classify(self.surface_height(world_x, world_y), z)
    }

    /// Whether untouched terrain has a block at this cell.
    #[must_use]
    pub fn should_be_solid(&self, world_x: i32, world_y: i32, z: i32) -> bool {
        z < self.surface_height(world_x, world_y)
    }

    /// Block id of a world cell in untouched terrain.
    ///
    /// Cells outside the world height are air.
    #[must_use]
    pub fn natural_block(&self, world_x: i32, world_y: i32, z: i32) -> BlockId {
        if z < 0 || z >= CHUNK_SIZE_Z as i32 {
            return BlockId::EMPTY;
        }
        self.palette.block_for(self.classify(world_x, world_y, z))
    }
}
