//! # Density Field
//!
//! Scalar grid sampled by marching cubes. Positive is solid, zero or below
//! is air.
//!
//! The grid covers the chunk plus one column of padding on the low side
//! and two on the high side in X and Y (so every cube along the chunk
//! border has all eight corners), and one extra layer in Z.
//!
//! Values start as the capped signed distance to the terrain height and
//! are then overridden where the chunk has been edited:
//!
//! - a cell terrain would fill but which is now empty is forced to `-2`
//! - a cell terrain would leave empty but which holds a natural-looking
//!   block is raised to at least `0.5`
//!
//! Player-placed blocks never enter the field; they are meshed as cubes.

use ndshape::{ConstShape, ConstShape3u32};
use voxelworld_procedural::{Chunk, TerrainGenerator};
use voxelworld_shared::{CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z};

/// Density grid width along X.
pub const DENSITY_SIZE_X: usize = CHUNK_SIZE_X + 3;
/// Density grid width along Y.
pub const DENSITY_SIZE_Y: usize = CHUNK_SIZE_Y + 3;
/// Density grid height along Z.
pub const DENSITY_SIZE_Z: usize = CHUNK_SIZE_Z + 1;

/// Shape of the density grid.
pub type DensityShape =
    ConstShape3u32<{ DENSITY_SIZE_X as u32 }, { DENSITY_SIZE_Y as u32 }, { DENSITY_SIZE_Z as u32 }>;

const DENSITY_VOLUME: usize = DENSITY_SIZE_X * DENSITY_SIZE_Y * DENSITY_SIZE_Z;

/// Magnitude cap of the signed distance.
pub const MAX_DENSITY: f32 = 2.0;
/// Value of a removed terrain cell.
pub const REMOVED_DENSITY: f32 = -2.0;
/// Minimum value of a restored non-player cell.
pub const RESTORED_DENSITY: f32 = 0.5;
/// Value read outside the grid.
pub const OUTSIDE_DENSITY: f32 = -1.0;

/// Cells further than this from the surface are left alone by smoothing.
const SMOOTH_SKIP_MAGNITUDE: f32 = 1.5;
/// Weight of the center sample in the 3x3x3 kernel.
const CENTER_WEIGHT: f32 = 4.0;
/// Layers at the bottom that are never smoothed.
const FIXED_BOTTOM_LAYERS: usize = 2;

/// Padded scalar grid for one chunk.
#[derive(Debug, Clone)]
pub struct DensityField {
    values: Box<[f32]>,
    scratch: Box<[f32]>,
}

impl DensityField {
    /// Builds the field for a chunk from terrain heights and edit state.
    #[must_use]
    pub fn build(chunk: &Chunk, terrain: &TerrainGenerator) -> Self {
        let mut field = Self {
            values: vec![0.0; DENSITY_VOLUME].into_boxed_slice(),
            scratch: vec![0.0; DENSITY_VOLUME].into_boxed_slice(),
        };

        let coord = chunk.coord();
        for dy in 0..DENSITY_SIZE_Y {
            for dx in 0..DENSITY_SIZE_X {
                // Padded column dx maps to local column dx - 1
                let lx = dx as i32 - 1;
                let ly = dy as i32 - 1;
                let wx = coord.origin_block_x() + lx;
                let wy = coord.origin_block_y() + ly;
                let in_chunk = lx >= 0 && lx < CHUNK_SIZE_X as i32 && ly >= 0 && ly < CHUNK_SIZE_Y as i32;

                let height = terrain.continuous_height(wx, wy) as f32;
                let surface = terrain.surface_height(wx, wy);

                for dz in 0..DENSITY_SIZE_Z {
                    let mut density = (height - dz as f32).clamp(-MAX_DENSITY, MAX_DENSITY);

                    if dz == 0 {
                        density = density.max(1.0);
                    } else {
                        let bz = dz as i32 - 1;
                        let should_be_solid = bz < surface;
                        let is_solid = chunk.is_world_block_solid(terrain, wx, wy, bz);

                        if should_be_solid && !is_solid {
                            density = REMOVED_DENSITY;
                        } else if !should_be_solid && is_solid {
                            let player_placed = in_chunk && chunk.is_player_placed(terrain, lx, ly, bz);
                            if !player_placed {
                                density = density.max(RESTORED_DENSITY);
                            }
                        }
                    }

                    let index = Self::index(dx, dy, dz);
                    field.values[index] = density;
                }
            }
        }

        field
    }

    #[inline]
    fn index(x: usize, y: usize, z: usize) -> usize {
        DensityShape::linearize([x as u32, y as u32, z as u32]) as usize
    }

    /// Density at a padded grid coordinate. [`OUTSIDE_DENSITY`] when out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, x: i32, y: i32, z: i32) -> f32 {
        if x < 0
            || y < 0
            || z < 0
            || x >= DENSITY_SIZE_X as i32
            || y >= DENSITY_SIZE_Y as i32
            || z >= DENSITY_SIZE_Z as i32
        {
            return OUTSIDE_DENSITY;
        }
        self.values[Self::index(x as usize, y as usize, z as usize)]
    }

    /// Runs `passes` rounds of 3x3x3 weighted smoothing.
    ///
    /// Every pass reads only the previous pass's values.
    pub fn smooth(&mut self, passes: u32) {
        for _ in 0..passes {
            for z in 0..DENSITY_SIZE_Z {
                for y in 0..DENSITY_SIZE_Y {
                    for x in 0..DENSITY_SIZE_X {
                        let index = Self::index(x, y, z);
                        let current = self.values[index];

                        self.scratch[index] =
                            if z < FIXED_BOTTOM_LAYERS || current.abs() > SMOOTH_SKIP_MAGNITUDE {
                                current
                            } else {
                                self.kernel_average(x as i32, y as i32, z as i32)
                            };
                    }
                }
            }
            std::mem::swap(&mut self.values, &mut self.scratch);
        }
    }

    fn kernel_average(&self, x: i32, y: i32, z: i32) -> f32 {
        let mut sum = 0.0;
        let mut weight = 0.0;
        for oz in -1..=1 {
            for oy in -1..=1 {
                for ox in -1..=1 {
                    let w = if ox == 0 && oy == 0 && oz == 0 { CENTER_WEIGHT } else { 1.0 };
                    sum += self.get(x + ox, y + oy, z + oz) * w;
                    weight += w;
                }
            }
        }
        sum / weight
    }
}
