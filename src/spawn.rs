//! Spawn helpers used when a particle system is re-seeded.
//!
//! [`SpawnContext`] owns the random source for every draw made at reset:
//! spawn offsets, the per-particle scale and speed multipliers, and the
//! reserved oscillation parameters. [`SpawnOrigin`] is the point the
//! population is scattered around.

use glam::{DVec2, DVec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Where a reset scatters the new population.
///
/// A planar origin comes from a 2D pointer position and spawns around
/// `(x, y, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SpawnOrigin {
    /// World zero.
    #[default]
    World,
    /// A point on the z = 0 plane.
    Planar(DVec2),
    /// An arbitrary 3D point.
    Point(DVec3),
}

impl SpawnOrigin {
    /// The origin as a 3D point.
    pub fn to_dvec3(self) -> DVec3 {
        match self {
            SpawnOrigin::World => DVec3::ZERO,
            SpawnOrigin::Planar(p) => p.extend(0.0),
            SpawnOrigin::Point(p) => p,
        }
    }
}

impl From<DVec2> for SpawnOrigin {
    fn from(p: DVec2) -> Self {
        SpawnOrigin::Planar(p)
    }
}

impl From<DVec3> for SpawnOrigin {
    fn from(p: DVec3) -> Self {
        SpawnOrigin::Point(p)
    }
}

impl From<(f64, f64)> for SpawnOrigin {
    fn from((x, y): (f64, f64)) -> Self {
        SpawnOrigin::Planar(DVec2::new(x, y))
    }
}

impl From<(f64, f64, f64)> for SpawnOrigin {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        SpawnOrigin::Point(DVec3::new(x, y, z))
    }
}

impl<T: Into<SpawnOrigin>> From<Option<T>> for SpawnOrigin {
    fn from(origin: Option<T>) -> Self {
        origin.map_or(SpawnOrigin::World, Into::into)
    }
}

/// Random source for every draw made while seeding particles.
#[derive(Debug, Clone)]
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context. With no seed the RNG is seeded from the wall clock,
    /// so every process run scatters differently.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });

        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Random f64 in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Random f64 in `[min, max)`, or `min` when the range is empty.
    #[inline]
    pub fn random_range(&mut self, min: f64, max: f64) -> f64 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Random f64 in `[-width/2, width/2)`.
    #[inline]
    pub fn random_spread(&mut self, width: f64) -> f64 {
        width * (0.5 - self.random())
    }

    /// Random point in an axis-aligned cube of side `width` centred on `center`.
    pub fn random_around(&mut self, center: DVec3, width: f64) -> DVec3 {
        center
            + DVec3::new(
                self.random_spread(width),
                self.random_spread(width),
                self.random_spread(width),
            )
    }
}
