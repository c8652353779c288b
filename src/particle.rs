//! A single simulated particle.

use crate::curve::CurveBuffer;
use crate::lifecycle::{ACTIVE_DAMPING, DECAY_DAMPING};
use crate::params::ParameterStore;
use crate::spawn::SpawnContext;
use glam::DVec3;

/// Phase offset that decorrelates the z heading from x/y.
const Z_PHASE: f64 = 1000.0;

/// Kinematic and lifecycle state of one particle plus its trailing curve.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: DVec3,
    pub velocity: DVec3,
    /// Reserved oscillation amplitude. Drawn at spawn, not used by the integrator.
    pub z_range: f64,
    /// Reserved oscillation speed. Drawn at spawn, not used by the integrator.
    pub z_speed: f64,
    /// Remaining life in steps; negative once the particle has died.
    pub current_life: i64,
    total_life: i64,
    base_scale: f64,
    base_speed: f64,
    curve: CurveBuffer,
}

impl Particle {
    /// Spawn a particle around `origin` using the spawn-time fields of `params`.
    pub fn spawn(
        ctx: &mut SpawnContext,
        origin: DVec3,
        params: &ParameterStore,
        curve_len: usize,
    ) -> Self {
        let position = ctx.random_around(origin, params.spawn_spread);
        let mut particle = Self {
            position,
            velocity: DVec3::ZERO,
            z_range: 0.0,
            z_speed: 0.0,
            current_life: params.playtime,
            total_life: params.playtime,
            base_scale: 0.0,
            base_speed: 0.0,
            curve: CurveBuffer::filled(curve_len, position),
        };
        particle.draw_traits(ctx, params);
        particle
    }

    /// Re-seed this slot in place, keeping the curve's storage.
    pub fn respawn(&mut self, ctx: &mut SpawnContext, origin: DVec3, params: &ParameterStore) {
        self.position = ctx.random_around(origin, params.spawn_spread);
        self.velocity = DVec3::ZERO;
        self.current_life = params.playtime;
        self.total_life = params.playtime;
        self.curve.refill(self.position);
        self.draw_traits(ctx, params);
    }

    fn draw_traits(&mut self, ctx: &mut SpawnContext, params: &ParameterStore) {
        self.z_range = ctx.random_spread(10.0);
        self.z_speed = ctx.random_spread(3.0);
        self.base_scale =
            ctx.random_range(params.scale_floor, params.scale_variance.max(params.scale_floor));
        self.base_speed =
            ctx.random_range(params.speed_floor, params.speed_variance.max(params.speed_floor));
    }

    /// Life the particle was spawned with. Fixed until the next reset.
    #[inline]
    pub fn total_life(&self) -> i64 {
        self.total_life
    }

    /// Per-particle render scale multiplier.
    #[inline]
    pub fn base_scale(&self) -> f64 {
        self.base_scale
    }

    /// Per-particle noise acceleration multiplier.
    #[inline]
    pub fn base_speed(&self) -> f64 {
        self.base_speed
    }

    #[inline]
    pub fn curve(&self) -> &CurveBuffer {
        &self.curve
    }

    #[inline]
    pub(crate) fn curve_mut(&mut self) -> &mut CurveBuffer {
        &mut self.curve
    }

    /// One Active step: steer by the noise sample `noise`, drift by the base
    /// velocity, then damp.
    pub fn integrate_active(&mut self, noise: f64, params: &ParameterStore) {
        let speed = params.speed * self.base_speed;

        self.velocity.x += noise.cos() * speed;
        self.velocity.y += noise.sin() * speed;
        if params.noise_driven_z {
            self.velocity.z += (noise * 5.0 + Z_PHASE).sin() * speed;
        }

        self.position += self.velocity + params.base_velocity;
        self.velocity *= ACTIVE_DAMPING;
    }

    /// One Decaying step: bleed velocity and coast.
    pub fn integrate_decaying(&mut self) {
        self.velocity *= DECAY_DAMPING;
        self.position += self.velocity;
    }

    /// Render scale at `ramp` in [0, 1] of the post-reset fade-in.
    #[inline]
    pub fn render_scale(&self, ramp: f64) -> f64 {
        ramp * self.base_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(params: &ParameterStore) -> Particle {
        let mut ctx = SpawnContext::new(Some(7));
        Particle::spawn(&mut ctx, DVec3::ZERO, params, 8)
    }

    #[test]
    fn test_spawn_fills_curve_and_life() {
        let params = ParameterStore::basic_flow_v2();
        let p = particle(&params);

        assert_eq!(p.curve().len(), 8);
        assert!(p.curve().points().all(|q| *q == p.position));
        assert_eq!(p.current_life, params.playtime);
        assert_eq!(p.total_life(), params.playtime);
        assert_eq!(p.velocity, DVec3::ZERO);
        assert!(p.position.abs().max_element() <= params.spawn_spread / 2.0);
    }

    #[test]
    fn test_traits_within_bounds() {
        let params = ParameterStore {
            scale_variance: 3.0,
            speed_variance: 2.0,
            ..ParameterStore::basic_flow_v2()
        };
        let mut ctx = SpawnContext::new(Some(11));
        for _ in 0..200 {
            let p = Particle::spawn(&mut ctx, DVec3::ZERO, &params, 4);
            assert!(p.base_scale() >= params.scale_floor && p.base_scale() <= 3.0);
            assert!(p.base_speed() >= 0.0 && p.base_speed() <= 2.0);
        }
    }

    #[test]
    fn test_variance_below_floor_uses_floor() {
        let params = ParameterStore {
            scale_variance: 0.1,
            scale_floor: 0.25,
            ..ParameterStore::default()
        };
        let p = particle(&params);
        assert_eq!(p.base_scale(), 0.25);
    }

    #[test]
    fn test_active_step_uses_noise_heading() {
        let params = ParameterStore {
            speed: 1.0,
            speed_variance: 1.0,
            speed_floor: 1.0,
            ..ParameterStore::default()
        };
        let mut p = particle(&params);
        let start = p.position;

        p.integrate_active(0.0, &params);

        // cos(0) = 1, sin(0) = 0, sin(1000) for z.
        let expected_v = DVec3::new(1.0, 0.0, Z_PHASE.sin());
        assert!((p.position - (start + expected_v)).length() < 1e-12);
        assert!((p.velocity - expected_v * ACTIVE_DAMPING).length() < 1e-12);
    }

    #[test]
    fn test_active_step_without_z_noise() {
        let params = ParameterStore {
            noise_driven_z: false,
            speed_floor: 1.0,
            ..ParameterStore::default()
        };
        let mut p = particle(&params);
        p.integrate_active(0.7, &params);
        assert_eq!(p.velocity.z, 0.0);
        assert!(p.velocity.x != 0.0);
    }

    #[test]
    fn test_base_velocity_drifts_position_only() {
        let params = ParameterStore {
            speed: 0.0,
            base_velocity: DVec3::new(0.1, -0.2, 0.3),
            ..ParameterStore::default()
        };
        let mut p = particle(&params);
        let start = p.position;
        p.integrate_active(1.0, &params);
        assert!((p.position - start - params.base_velocity).length() < 1e-12);
        assert_eq!(p.velocity, DVec3::ZERO);
    }

    #[test]
    fn test_decaying_step() {
        let params = ParameterStore::default();
        let mut p = particle(&params);
        p.velocity = DVec3::new(1.0, 2.0, -4.0);
        let start = p.position;
        p.integrate_decaying();
        assert_eq!(p.velocity, DVec3::new(1.0, 2.0, -4.0) * DECAY_DAMPING);
        assert_eq!(p.position, start + p.velocity);
    }

    #[test]
    fn test_respawn_reuses_slot() {
        let params = ParameterStore::default();
        let mut ctx = SpawnContext::new(Some(5));
        let mut p = Particle::spawn(&mut ctx, DVec3::ZERO, &params, 6);
        p.current_life = -12;
        p.velocity = DVec3::ONE;

        let origin = DVec3::new(10.0, 10.0, 10.0);
        p.respawn(&mut ctx, origin, &params);

        assert_eq!(p.current_life, params.playtime);
        assert_eq!(p.velocity, DVec3::ZERO);
        assert_eq!(p.curve().len(), 6);
        assert!((p.position - origin).abs().max_element() <= params.spawn_spread / 2.0);
        assert!(p.curve().points().all(|q| *q == p.position));
    }
}
