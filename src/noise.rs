//! Deterministic 4D coherent noise.
//!
//! [`NoiseField`] drives the particle velocity field. It is sampled once per
//! particle per step at `(position, 2 × elapsed)` and never cached, so it must
//! be a pure function of its arguments: the permutation table is built once
//! from the seed and never mutated afterwards.
//!
//! # Example
//!
//! ```ignore
//! use flowline::noise::NoiseField;
//!
//! let field = NoiseField::with_seed(7);
//! let n = field.sample(1.0, 2.0, 3.0, 0.5, 0.0001, 100.0);
//! assert_eq!(n, field.sample(1.0, 2.0, 3.0, 0.5, 0.0001, 100.0));
//! ```

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

// Skew/unskew factors for 4D simplex noise.
const F4: f64 = 0.309_016_994_374_947_45; // (sqrt(5) - 1) / 4
const G4: f64 = 0.138_196_601_125_010_5; // (5 - sqrt(5)) / 20

/// Gradient directions: midpoints of the 32 edges of a tesseract.
const GRAD4: [[f64; 4]; 32] = [
    [0.0, 1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0, -1.0],
    [0.0, 1.0, -1.0, 1.0],
    [0.0, 1.0, -1.0, -1.0],
    [0.0, -1.0, 1.0, 1.0],
    [0.0, -1.0, 1.0, -1.0],
    [0.0, -1.0, -1.0, 1.0],
    [0.0, -1.0, -1.0, -1.0],
    [1.0, 0.0, 1.0, 1.0],
    [1.0, 0.0, 1.0, -1.0],
    [1.0, 0.0, -1.0, 1.0],
    [1.0, 0.0, -1.0, -1.0],
    [-1.0, 0.0, 1.0, 1.0],
    [-1.0, 0.0, 1.0, -1.0],
    [-1.0, 0.0, -1.0, 1.0],
    [-1.0, 0.0, -1.0, -1.0],
    [1.0, 1.0, 0.0, 1.0],
    [1.0, 1.0, 0.0, -1.0],
    [1.0, -1.0, 0.0, 1.0],
    [1.0, -1.0, 0.0, -1.0],
    [-1.0, 1.0, 0.0, 1.0],
    [-1.0, 1.0, 0.0, -1.0],
    [-1.0, -1.0, 0.0, 1.0],
    [-1.0, -1.0, 0.0, -1.0],
    [1.0, 1.0, 1.0, 0.0],
    [1.0, 1.0, -1.0, 0.0],
    [1.0, -1.0, 1.0, 0.0],
    [1.0, -1.0, -1.0, 0.0],
    [-1.0, 1.0, 1.0, 0.0],
    [-1.0, 1.0, -1.0, 0.0],
    [-1.0, -1.0, 1.0, 0.0],
    [-1.0, -1.0, -1.0, 0.0],
];

/// Seeded 4D simplex noise.
///
/// Output of [`NoiseField::simplex`] lies in roughly `[-1, 1]`;
/// [`NoiseField::sample`] applies a frequency to the inputs and a scale to
/// the output.
#[derive(Clone)]
pub struct NoiseField {
    seed: u64,
    /// Shuffled 0..=255, stored twice so lookups never wrap.
    perm: [u8; 512],
}

impl NoiseField {
    /// Create a noise field with seed 0.
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Create a noise field whose permutation is derived from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        let mut table: Vec<u8> = (0..=255u8).collect();
        table.shuffle(&mut SmallRng::seed_from_u64(seed));

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { seed, perm }
    }

    /// Seed this field was built from.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sample `scale * simplex(x·f, y·f, z·f, w·f)`.
    #[inline]
    pub fn sample(&self, x: f64, y: f64, z: f64, w: f64, frequency: f64, scale: f64) -> f64 {
        scale * self.simplex(x * frequency, y * frequency, z * frequency, w * frequency)
    }

    #[inline]
    fn hash(&self, i: i64, j: i64, k: i64, l: i64) -> usize {
        let p = &self.perm;
        let l = p[(l & 255) as usize] as usize;
        let k = p[(k & 255) as usize + l] as usize;
        let j = p[(j & 255) as usize + k] as usize;
        p[(i & 255) as usize + j] as usize % 32
    }

    /// Raw 4D simplex noise in approximately `[-1, 1]`.
    pub fn simplex(&self, x: f64, y: f64, z: f64, w: f64) -> f64 {
        // Skew into the simplex lattice and find the containing cell.
        let s = (x + y + z + w) * F4;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let k = (z + s).floor();
        let l = (w + s).floor();
        let t = (i + j + k + l) * G4;

        let d0 = [x - (i - t), y - (j - t), z - (k - t), w - (l - t)];

        // Rank the coordinates to pick the traversal order through the simplex.
        let mut rank = [0u8; 4];
        for a in 0..4 {
            for b in (a + 1)..4 {
                if d0[a] > d0[b] {
                    rank[a] += 1;
                } else {
                    rank[b] += 1;
                }
            }
        }

        let (i, j, k, l) = (i as i64, j as i64, k as i64, l as i64);
        let mut sum = 0.0;

        for corner in 0..5u8 {
            // corner 0 is the cell origin, corner 4 the far vertex.
            let step = |r: u8| -> i64 { i64::from(corner > 0 && r >= 4 - corner) };
            let offs = [step(rank[0]), step(rank[1]), step(rank[2]), step(rank[3])];
            let g = G4 * corner as f64;
            let d = [
                d0[0] - offs[0] as f64 + g,
                d0[1] - offs[1] as f64 + g,
                d0[2] - offs[2] as f64 + g,
                d0[3] - offs[3] as f64 + g,
            ];

            let mut falloff = 0.6 - d[0] * d[0] - d[1] * d[1] - d[2] * d[2] - d[3] * d[3];
            if falloff > 0.0 {
                let gi = self.hash(i + offs[0], j + offs[1], k + offs[2], l + offs[3]);
                let grad = &GRAD4[gi];
                falloff *= falloff;
                sum += falloff
                    * falloff
                    * (grad[0] * d[0] + grad[1] * d[1] + grad[2] * d[2] + grad[3] * d[3]);
            }
        }

        27.0 * sum
    }
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_deterministic() {
        let field = NoiseField::with_seed(11);
        let a = field.sample(0.3, -1.7, 4.2, 9.0, 0.5, 100.0);
        for _ in 0..10 {
            assert_eq!(field.sample(0.3, -1.7, 4.2, 9.0, 0.5, 100.0), a);
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = NoiseField::with_seed(42);
        let b = NoiseField::with_seed(42);
        for n in 0..50 {
            let t = n as f64 * 0.37;
            assert_eq!(a.simplex(t, -t, t * 0.5, 1.0), b.simplex(t, -t, t * 0.5, 1.0));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = NoiseField::with_seed(1);
        let b = NoiseField::with_seed(2);
        let differs = (0..50).any(|n| {
            let t = n as f64 * 0.61 + 0.13;
            a.simplex(t, t * 1.3, -t, t * 0.2) != b.simplex(t, t * 1.3, -t, t * 0.2)
        });
        assert!(differs);
    }

    #[test]
    fn test_simplex_range() {
        let field = NoiseField::with_seed(5);
        for n in 0..2000 {
            let t = n as f64 * 0.113;
            let v = field.simplex(t, (t * 1.7).sin() * 10.0, -t * 0.3, t * 0.05);
            assert!(v.is_finite());
            assert!(v.abs() <= 1.1, "out of range: {}", v);
        }
    }

    #[test]
    fn test_lattice_origin_is_zero() {
        // Every corner contribution vanishes at integer lattice points.
        let field = NoiseField::with_seed(3);
        assert!(field.simplex(0.0, 0.0, 0.0, 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_continuity() {
        let field = NoiseField::with_seed(9);
        let a = field.simplex(1.25, 2.5, 3.75, 0.5);
        let b = field.simplex(1.25 + 1e-6, 2.5, 3.75, 0.5);
        assert!((a - b).abs() < 1e-3);
    }

    #[test]
    fn test_scale_and_frequency() {
        let field = NoiseField::with_seed(8);
        let raw = field.simplex(0.2, 0.4, 0.6, 0.8);
        let scaled = field.sample(2.0, 4.0, 6.0, 8.0, 0.1, 100.0);
        assert!((scaled - raw * 100.0).abs() < 1e-9);
    }
}
