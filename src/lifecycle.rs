//! Particle lifecycle states.
//!
//! A particle's remaining-life counter `current_life` starts at the playtime
//! and drops by one every step. Its value picks one of three states:
//!
//! | State | Condition | Behaviour |
//! |-------|-----------|-----------|
//! | Active | `current_life >= 0` | Noise-driven acceleration, damped by [`ACTIVE_DAMPING`] |
//! | Decaying | `stop - 10 <= current_life < 0` | Coasts on residual velocity, damped by [`DECAY_DAMPING`] |
//! | Dormant | `current_life < stop - 10` | Frozen; only the counter keeps running |
//!
//! where `stop` is [`Lifecycle::stop_threshold`] (default
//! [`DEFAULT_STOP_THRESHOLD`]).

/// Velocity multiplier applied every Active step.
pub const ACTIVE_DAMPING: f64 = 0.999;

/// Velocity multiplier applied every Decaying step.
pub const DECAY_DAMPING: f64 = 0.95;

/// Default stop threshold.
pub const DEFAULT_STOP_THRESHOLD: i64 = -20;

/// Extra steps of coasting past the stop threshold before a particle freezes.
pub const DECAY_GRACE: i64 = 10;

/// Lifecycle state derived from a particle's remaining-life counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifeState {
    /// Alive and steered by the noise field.
    Active,
    /// Dead but still coasting to rest.
    Decaying,
    /// At rest. Skipped by the integrator.
    Dormant,
}

impl LifeState {
    /// Whether the integrator moves particles in this state.
    #[inline]
    pub fn is_moving(self) -> bool {
        !matches!(self, LifeState::Dormant)
    }
}

/// Thresholds that map `current_life` onto a [`LifeState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    stop_threshold: i64,
}

impl Lifecycle {
    /// Lifecycle with the default stop threshold.
    pub fn new() -> Self {
        Self::with_stop_threshold(DEFAULT_STOP_THRESHOLD)
    }

    /// Lifecycle with a custom stop threshold (normally negative).
    pub fn with_stop_threshold(stop_threshold: i64) -> Self {
        Self { stop_threshold }
    }

    #[inline]
    pub fn stop_threshold(&self) -> i64 {
        self.stop_threshold
    }

    /// Lowest `current_life` that is still Decaying.
    #[inline]
    pub fn dormant_below(&self) -> i64 {
        self.stop_threshold.saturating_sub(DECAY_GRACE)
    }

    /// Classify a remaining-life counter.
    #[inline]
    pub fn classify(&self, current_life: i64) -> LifeState {
        if current_life >= 0 {
            LifeState::Active
        } else if current_life >= self.dormant_below() {
            LifeState::Decaying
        } else {
            LifeState::Dormant
        }
    }

    /// Number of steps a particle spawned with `playtime` spends before going
    /// Dormant, i.e. the first step index (1-based) at which it is skipped.
    pub fn steps_until_dormant(&self, playtime: i64) -> i64 {
        playtime - self.dormant_below() + 2
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
