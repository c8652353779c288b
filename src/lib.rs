//! # Flowline - noise-driven particle flow
//!
//! A fixed pool of particles drifts through a 4D simplex noise field, each one
//! trailed by a fixed-length curve. The crate is the simulation core only:
//! it integrates motion, tracks lifecycles and produces per-frame render
//! data that a host forwards to whatever draws spheres and lines.
//!
//! ## Quick Start
//!
//! ```ignore
//! use flowline::prelude::*;
//!
//! let params = ParameterStore::basic_flow_v2();
//! let mut system = ParticleSystem::new(SystemConfig::basic_flow_v2(), &params)?;
//! let mut time = Time::new();
//!
//! loop {
//!     let (elapsed, dt) = time.update();
//!     system.step(dt, elapsed, &params);
//!     project(&system, &params, &mut backend);
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Lifecycle
//!
//! Every particle starts with `playtime` steps of life and loses one per step.
//!
//! | State | Condition | Motion |
//! |-------|-----------|--------|
//! | Active | `life >= 0` | Noise steering, base drift, damping 0.999 |
//! | Decaying | `-30 <= life < 0` | Coasting, damping 0.95 |
//! | Dormant | `life < -30` | Frozen until the next reset |
//!
//! ### Curves
//!
//! Each particle owns a [`CurveBuffer`] of exactly `K` points. Frames
//! alternate between reshaping the curve with a [`Taper`] and sliding the
//! particle's current position into it.
//!
//! ### Parameters
//!
//! [`ParameterStore`] holds every tunable. It is re-read on each step, so a
//! control surface can edit it live between frames.
//!
//! ### Reset
//!
//! [`ParticleSystem::reset`] re-seeds the whole pool around a new origin
//! (a pointer click in 2D, or any point in 3D) and restarts the one-second
//! scale fade-in.

pub mod curve;
pub mod error;
pub mod lifecycle;
pub mod noise;
pub mod params;
mod particle;
pub mod projection;
pub mod spawn;
mod system;
pub mod time;

pub use bytemuck;
pub use curve::{CurveBuffer, CurveVertex, Parabola, Taper, Uniform};
pub use error::{ConfigIssue, FlowError};
pub use glam::{DVec2, DVec3, Vec3};
pub use lifecycle::{LifeState, Lifecycle};
pub use noise::NoiseField;
pub use params::{parse_hex_color, to_hex_color, ParameterStore};
pub use particle::Particle;
pub use projection::{project, InstanceTransform, LineStyle, RenderBackend};
pub use spawn::{SpawnContext, SpawnOrigin};
pub use system::{ParticleSystem, StepStats, SystemConfig};
pub use time::Time;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use flowline::prelude::*;
/// ```
pub mod prelude {
    pub use crate::curve::{CurveBuffer, CurveVertex, Parabola, Taper, Uniform};
    pub use crate::error::FlowError;
    pub use crate::lifecycle::LifeState;
    pub use crate::params::ParameterStore;
    pub use crate::projection::{project, InstanceTransform, LineStyle, RenderBackend};
    pub use crate::spawn::SpawnOrigin;
    pub use crate::system::{ParticleSystem, StepStats, SystemConfig};
    pub use crate::time::Time;
    pub use glam::{DVec2, DVec3, Vec3};
}
