//! Particle system: pool ownership, integration and curve updates.
//!
//! # Frame contract
//!
//! The host calls [`ParticleSystem::step`] exactly once per frame and may call
//! [`ParticleSystem::reset`] between frames, both from the same thread. Each
//! step is a single O(N·K) pass with no allocation:
//!
//! 1. Classify every particle by its remaining life (see [`crate::lifecycle`]).
//! 2. Integrate Active and Decaying particles; Dormant ones are skipped, but
//!    their life counter still drops so every particle ages independently.
//! 3. Write the particle's instance transform, scaled by the post-reset ramp.
//! 4. Update the particle's curve: reshape on cadence frames, slide otherwise.
//!
//! # Example
//!
//! ```ignore
//! let params = ParameterStore::basic_flow_v2();
//! let mut system = ParticleSystem::new(SystemConfig::basic_flow_v2(), &params)?;
//!
//! // Host render loop
//! let stats = system.step(dt, elapsed, &params);
//! project(&system, &params, &mut backend);
//!
//! // Pointer click
//! system.reset((x, y), &params)?;
//! ```

use crate::curve::{CurveBuffer, Parabola, Taper};
use crate::error::{ConfigIssue, FlowError};
use crate::lifecycle::{LifeState, Lifecycle, DEFAULT_STOP_THRESHOLD};
use crate::noise::NoiseField;
use crate::params::ParameterStore;
use crate::particle::Particle;
use crate::projection::InstanceTransform;
use crate::spawn::{SpawnContext, SpawnOrigin};
use glam::DVec3;

/// Construction-time constants of a particle system.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    /// Number of particles `N`. Fixed for the system's life.
    pub particle_count: usize,
    /// Points per curve `K`. Fixed for the system's life.
    pub curve_length: usize,
    /// Life value at which particles stop; they freeze 10 steps later.
    pub stop_threshold: i64,
    /// Frame `f` (1-based, counted from the last reset) reshapes the curves
    /// when `f % reshape_interval == 1`; every other frame slides them.
    pub reshape_interval: u32,
    /// Seed for spawn positions and per-particle traits. `None` seeds from
    /// the wall clock.
    pub spawn_seed: Option<u64>,
    /// Seed of the noise field's permutation table.
    pub noise_seed: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self::basic_flow_v2()
    }
}

impl SystemConfig {
    /// 100 particles with 50-point curves.
    pub fn basic_flow() -> Self {
        Self {
            particle_count: 100,
            curve_length: 50,
            ..Self::basic_flow_v2()
        }
    }

    /// 150 particles with 25-point curves.
    pub fn basic_flow_v2() -> Self {
        Self {
            particle_count: 150,
            curve_length: 25,
            stop_threshold: DEFAULT_STOP_THRESHOLD,
            reshape_interval: 2,
            spawn_seed: None,
            noise_seed: 0,
        }
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the number of points per curve.
    pub fn with_curve_length(mut self, len: usize) -> Self {
        self.curve_length = len;
        self
    }

    pub fn with_stop_threshold(mut self, threshold: i64) -> Self {
        self.stop_threshold = threshold;
        self
    }

    pub fn with_reshape_interval(mut self, interval: u32) -> Self {
        self.reshape_interval = interval;
        self
    }

    /// Make spawning reproducible.
    pub fn with_spawn_seed(mut self, seed: u64) -> Self {
        self.spawn_seed = Some(seed);
        self
    }

    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = seed;
        self
    }

    /// Check the invariants the system relies on.
    pub fn validate(&self) -> Result<(), FlowError> {
        if self.particle_count == 0 {
            return Err(ConfigIssue::ZeroParticles.into());
        }
        if self.curve_length == 0 {
            return Err(ConfigIssue::ZeroCurveLength.into());
        }
        if self.reshape_interval < 2 {
            return Err(ConfigIssue::ReshapeInterval(self.reshape_interval).into());
        }
        Ok(())
    }

    /// Whether frame `frame` (1-based since the last reset) reshapes curves.
    #[inline]
    pub fn reshapes_on(&self, frame: u64) -> bool {
        frame % u64::from(self.reshape_interval) == 1
    }
}

/// Lifecycle counts for one step, classified before integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub active: usize,
    pub decaying: usize,
    pub dormant: usize,
}

impl StepStats {
    fn record(&mut self, state: LifeState) {
        match state {
            LifeState::Active => self.active += 1,
            LifeState::Decaying => self.decaying += 1,
            LifeState::Dormant => self.dormant += 1,
        }
    }

    /// Total particles counted.
    pub fn total(&self) -> usize {
        self.active + self.decaying + self.dormant
    }
}

/// Owns `N` particles and advances them one frame at a time.
pub struct ParticleSystem {
    config: SystemConfig,
    lifecycle: Lifecycle,
    noise: NoiseField,
    spawner: SpawnContext,
    particles: Vec<Particle>,
    transforms: Vec<InstanceTransform>,
    taper: Box<dyn Taper + Send + Sync>,
    /// Clock value seen by the last step.
    elapsed_time: f64,
    /// Clock value at the last reset; drives the scale ramp.
    start_time: f64,
    last_dt: f64,
    /// Steps since the last reset.
    frame: u64,
    origin: DVec3,
}

impl ParticleSystem {
    /// Build a system and seed its particles around the world origin.
    pub fn new(config: SystemConfig, params: &ParameterStore) -> Result<Self, FlowError> {
        config.validate()?;
        check_spawn_params(params)?;

        let n = config.particle_count;
        let mut spawner = SpawnContext::new(config.spawn_seed);
        let particles: Vec<Particle> = (0..n)
            .map(|_| Particle::spawn(&mut spawner, DVec3::ZERO, params, config.curve_length))
            .collect();
        let transforms = particles
            .iter()
            .map(|p| InstanceTransform {
                position: p.position.as_vec3().to_array(),
                scale: 0.0,
            })
            .collect();

        log::info!(
            "particle system: {} particles, {} curve points each, playtime {}",
            n,
            config.curve_length,
            params.playtime
        );

        Ok(Self {
            lifecycle: Lifecycle::with_stop_threshold(config.stop_threshold),
            noise: NoiseField::with_seed(config.noise_seed),
            spawner,
            particles,
            transforms,
            taper: Box::new(Parabola::default()),
            elapsed_time: 0.0,
            start_time: 0.0,
            last_dt: 0.0,
            frame: 0,
            origin: DVec3::ZERO,
            config,
        })
    }

    /// Replace the curve taper used on reshape frames.
    pub fn with_taper<T: Taper + Send + Sync + 'static>(mut self, taper: T) -> Self {
        self.set_taper(taper);
        self
    }

    pub fn set_taper<T: Taper + Send + Sync + 'static>(&mut self, taper: T) {
        self.taper = Box::new(taper);
    }

    /// Discard every particle and seed `N` fresh ones around `origin`.
    ///
    /// Restarts the scale ramp at the clock value of the last step and
    /// restarts the curve cadence. On error nothing changes.
    pub fn reset<O: Into<SpawnOrigin>>(
        &mut self,
        origin: O,
        params: &ParameterStore,
    ) -> Result<(), FlowError> {
        check_spawn_params(params)?;

        let origin = origin.into().to_dvec3();
        let n = self.particles.len();
        self.start_time = self.elapsed_time;
        self.frame = 0;
        self.origin = origin;

        for (particle, transform) in self.particles.iter_mut().zip(self.transforms.iter_mut()) {
            particle.respawn(&mut self.spawner, origin, params);
            *transform = InstanceTransform {
                position: particle.position.as_vec3().to_array(),
                scale: 0.0,
            };
        }

        log::debug!(
            "reset {} particles around ({:.3}, {:.3}, {:.3}) at t={:.3}",
            n,
            origin.x,
            origin.y,
            origin.z,
            self.start_time
        );
        Ok(())
    }

    /// Advance every particle one frame.
    ///
    /// `elapsed` is the host clock in seconds and feeds both the noise field
    /// and the scale ramp. Integration is frame-locked: `dt` is recorded but
    /// does not scale the motion.
    pub fn step(&mut self, dt: f64, elapsed: f64, params: &ParameterStore) -> StepStats {
        self.elapsed_time = elapsed;
        self.last_dt = dt;
        self.frame += 1;

        let ramp = self.ramp();
        let reshape = self.config.reshapes_on(self.frame);
        let w = elapsed * 2.0;
        let taper: &dyn Taper = self.taper.as_ref();
        let mut stats = StepStats::default();

        for (particle, transform) in self.particles.iter_mut().zip(self.transforms.iter_mut()) {
            let state = self.lifecycle.classify(particle.current_life);
            particle.current_life = particle.current_life.saturating_sub(1);
            stats.record(state);

            match state {
                LifeState::Dormant => continue,
                LifeState::Active => {
                    let p = particle.position;
                    let n = self
                        .noise
                        .sample(p.x, p.y, p.z, w, params.frequency, params.noise_amplitude);
                    particle.integrate_active(n, params);
                }
                LifeState::Decaying => particle.integrate_decaying(),
            }

            *transform = InstanceTransform {
                position: particle.position.as_vec3().to_array(),
                scale: particle.render_scale(ramp) as f32,
            };

            let position = particle.position;
            let curve = particle.curve_mut();
            if reshape {
                curve.reshape(taper);
            } else {
                curve.slide(position);
            }
        }

        log::trace!(
            "step {} t={:.3}: {} active, {} decaying, {} dormant",
            self.frame,
            elapsed,
            stats.active,
            stats.decaying,
            stats.dormant
        );
        stats
    }

    /// Scale ramp in [0, 1]: seconds since the last reset, clamped.
    #[inline]
    pub fn ramp(&self) -> f64 {
        (self.elapsed_time - self.start_time).clamp(0.0, 1.0)
    }

    /// Lifecycle state of every particle right now.
    pub fn census(&self) -> StepStats {
        let mut stats = StepStats::default();
        for p in &self.particles {
            stats.record(self.lifecycle.classify(p.current_life));
        }
        stats
    }

    /// Lifecycle state of particle `index`.
    pub fn state_of(&self, index: usize) -> Option<LifeState> {
        self.particles
            .get(index)
            .map(|p| self.lifecycle.classify(p.current_life))
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to the pool. The slice length is fixed.
    #[inline]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Instance transforms written by the last step, one per particle slot.
    #[inline]
    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    /// Curve buffers in particle order.
    pub fn curves(&self) -> impl ExactSizeIterator<Item = &CurveBuffer> + '_ {
        self.particles.iter().map(Particle::curve)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Always false; a system holds at least one particle.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    #[inline]
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    #[inline]
    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    #[inline]
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    #[inline]
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// `dt` passed to the last step.
    #[inline]
    pub fn last_dt(&self) -> f64 {
        self.last_dt
    }

    /// Steps since the last reset.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Origin used by the last reset.
    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }
}

impl std::fmt::Debug for ParticleSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleSystem")
            .field("config", &self.config)
            .field("particles", &self.particles.len())
            .field("frame", &self.frame)
            .field("elapsed_time", &self.elapsed_time)
            .field("start_time", &self.start_time)
            .finish()
    }
}

/// Spawn-time fields that would break per-particle invariants.
fn check_spawn_params(params: &ParameterStore) -> Result<(), FlowError> {
    if params.playtime <= 0 {
        return Err(ConfigIssue::NonPositivePlaytime(params.playtime).into());
    }
    // Negated so NaN is rejected too.
    if !(params.scale_floor > 0.0) {
        return Err(ConfigIssue::NonPositiveScaleFloor(params.scale_floor).into());
    }
    Ok(())
}
