//! # Simplex Noise Implementation
//!
//! Deterministic 2D coherent noise and its fractal (multi-octave) sum.
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed`, this implementation produces **exactly**
//! the same values on any platform. The permutation table is shuffled by
//! `ChaCha8Rng`, whose output stream is identical on every platform.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// World seed for deterministic generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0xDEAD_BEEF_CAFE_BABE)
    }
}

/// Anything that maps a 2D world column to a value in `[-1, 1]`.
///
/// Terrain generation only depends on this trait, so flat or scripted
/// sources can stand in for real noise.
pub trait NoiseSource: Send + Sync {
    /// Samples the source. Must be a pure function of its inputs.
    fn sample(&self, x: f64, y: f64) -> f64;
}

/// Source that returns the same value everywhere. Produces flat worlds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConstantNoise(pub f64);

impl NoiseSource for ConstantNoise {
    fn sample(&self, _x: f64, _y: f64) -> f64 {
        self.0.clamp(-1.0, 1.0)
    }
}

/// 12 gradient vectors for 2D simplex.
const GRADIENTS: [[i8; 2]; 12] = [
    [1, 0], [1, 1], [0, 1], [-1, 1],
    [-1, 0], [-1, -1], [0, -1], [1, -1],
    [1, 0], [0, 1], [-1, 0], [0, -1],
];

/// 512-entry permutation table (256 entries, doubled for overflow handling).
struct PermutationTable {
    perm: [u8; 512],
}

impl PermutationTable {
    fn new(seed: WorldSeed) -> Self {
        let mut base: [u8; 256] = std::array::from_fn(|i| i as u8);
        let mut rng = ChaCha8Rng::seed_from_u64(seed.value());
        base.shuffle(&mut rng);

        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&base);
        perm[256..].copy_from_slice(&base);
        Self { perm }
    }

    #[inline]
    fn get(&self, index: usize) -> u8 {
        self.perm[index & 511]
    }
}

/// 2D Simplex noise generator.
///
/// Produces smooth, continuous noise values in the range [-1, 1].
pub struct SimplexNoise {
    perm_table: PermutationTable,
}

impl SimplexNoise {
    /// Skewing factor for 2D simplex grid.
    const F2: f64 = 0.366_025_403_784_439; // (sqrt(3) - 1) / 2
    /// Unskewing factor for 2D simplex grid.
    const G2: f64 = 0.211_324_865_405_187; // (3 - sqrt(3)) / 6

    /// Creates a new simplex noise generator from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            perm_table: PermutationTable::new(seed),
        }
    }

    /// Samples 2D simplex noise at the given coordinates.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);

        let unskew = f64::from(i + j) * Self::G2;
        let x0 = x - (f64::from(i) - unskew);
        let y0 = y - (f64::from(j) - unskew);

        // Upper or lower triangle of the skewed cell
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + Self::G2;
        let y1 = y0 - j1 as f64 + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;

        let gi0 = self.perm_table.get(ii + self.perm_table.get(jj) as usize);
        let gi1 = self.perm_table.get(ii + i1 + self.perm_table.get(jj + j1) as usize);
        let gi2 = self.perm_table.get(ii + 1 + self.perm_table.get(jj + 1) as usize);

        let n0 = contribution(x0, y0, gi0);
        let n1 = contribution(x1, y1, gi1);
        let n2 = contribution(x2, y2, gi2);

        // 70.0 normalizes the corner sum to [-1, 1]
        (70.0 * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }
}

impl NoiseSource for SimplexNoise {
    #[inline]
    fn sample(&self, x: f64, y: f64) -> f64 {
        SimplexNoise::sample(self, x, y)
    }
}

/// Contribution from one corner of the simplex.
#[inline]
fn contribution(x: f64, y: f64, gradient_index: u8) -> f64 {
    let t = 0.5 - x * x - y * y;
    if t < 0.0 {
        0.0
    } else {
        let grad = GRADIENTS[(gradient_index % 12) as usize];
        let t2 = t * t;
        t2 * t2 * (x * f64::from(grad[0]) + y * f64::from(grad[1]))
    }
}

/// Fractal sum of several noise octaves.
///
/// Octave `i` is sampled at frequency `lacunarity^i` with weight
/// `persistence^i`. The sum is divided by the total weight, so the output
/// stays in the primitive's range whatever the octave count.
pub struct FractalNoise<N = SimplexNoise> {
    primitive: N,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
}

impl<N: NoiseSource> FractalNoise<N> {
    /// Wraps a primitive with the given octave parameters.
    ///
    /// `octaves` is raised to at least 1.
    #[must_use]
    pub fn new(primitive: N, octaves: u32, persistence: f64, lacunarity: f64) -> Self {
        Self {
            primitive,
            octaves: octaves.max(1),
            persistence,
            lacunarity,
        }
    }

    /// Number of octaves summed.
    #[must_use]
    pub const fn octaves(&self) -> u32 {
        self.octaves
    }
}

impl<N: NoiseSource> NoiseSource for FractalNoise<N> {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..self.octaves {
            total += self.primitive.sample(x * frequency, y * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        if max_amplitude <= 0.0 {
            return 0.0;
        }
        (total / max_amplitude).clamp(-1.0, 1.0)
    }
}

/// Fast floor for the simplex skew step.
#[inline]
fn fast_floor(x: f64) -> i32 {
    let xi = x as i32;
    if x < f64::from(xi) { xi - 1 } else { xi }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let seed = WorldSeed::new(12345);
        let noise1 = SimplexNoise::new(seed);
        let noise2 = SimplexNoise::new(seed);

        for i in 0..100 {
            let x = f64::from(i) * 0.1;
            let y = f64::from(i) * 0.17;
            assert_eq!(noise1.sample(x, y), noise2.sample(x, y), "Noise should be deterministic");
        }
    }

    #[test]
    fn test_different_seeds_different_results() {
        let noise1 = SimplexNoise::new(WorldSeed::new(1));
        let noise2 = SimplexNoise::new(WorldSeed::new(2));

        let differs = (0..50).any(|i| {
            let x = f64::from(i) * 1.37 + 0.5;
            noise1.sample(x, x * 0.7) != noise2.sample(x, x * 0.7)
        });
        assert!(differs, "Different seeds should produce different results");
    }

    #[test]
    fn test_range() {
        let noise = SimplexNoise::new(WorldSeed::new(42));

        for i in 0..10000 {
            let x = f64::from(i) * 0.1 - 500.0;
            let y = f64::from(i) * 0.13 - 650.0;
            let value = noise.sample(x, y);
            assert!((-1.0..=1.0).contains(&value), "Value {value} out of range at ({x}, {y})");
        }
    }

    #[test]
    fn test_continuity() {
        let noise = SimplexNoise::new(WorldSeed::new(42));
        let delta = 0.001;

        let v1 = noise.sample(100.0, 100.0);
        let v2 = noise.sample(100.0 + delta, 100.0);
        let v3 = noise.sample(100.0, 100.0 + delta);

        assert!((v1 - v2).abs() < 0.01, "Noise should be continuous");
        assert!((v1 - v3).abs() < 0.01, "Noise should be continuous");
    }

    #[test]
    fn test_fractal_bounded_for_any_octave_count() {
        for octaves in [1, 2, 5, 8, 16] {
            let fractal = FractalNoise::new(SimplexNoise::new(WorldSeed::new(7)), octaves, 0.9, 2.0);
            for i in 0..2000 {
                let x = f64::from(i) * 0.37 - 300.0;
                let y = f64::from(i) * 0.21 + 40.0;
                let value = fractal.sample(x, y);
                assert!(
                    (-1.0..=1.0).contains(&value),
                    "{octaves} octaves: {value} out of range"
                );
            }
        }
    }

    #[test]
    fn test_fractal_deterministic() {
        let a = FractalNoise::new(SimplexNoise::new(WorldSeed::default()), 5, 0.05, 2.5);
        let b = FractalNoise::new(SimplexNoise::new(WorldSeed::default()), 5, 0.05, 2.5);
        for i in 0..100 {
            let x = f64::from(i) * 0.8;
            assert_eq!(a.sample(x, -x), b.sample(x, -x));
        }
    }

    #[test]
    fn test_zero_octaves_clamped_to_one() {
        let fractal = FractalNoise::new(ConstantNoise(0.25), 0, 0.5, 2.0);
        assert_eq!(fractal.octaves(), 1);
        assert!((fractal.sample(3.0, 4.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_seed_derivation() {
        let base = WorldSeed::new(42);
        let derived1 = base.derive(1);
        let derived2 = base.derive(2);

        assert_ne!(derived1, derived2, "Different purposes should give different seeds");
        assert_eq!(derived1, base.derive(1), "Same purpose should give same seed");
        assert_ne!(derived1, base, "Derived seed should differ from base");
    }
}
