//! Host-side frame clock.
//!
//! [`crate::ParticleSystem::step`] takes `dt` and `elapsed` as plain numbers.
//! [`Time`] produces them for hosts that have no clock of their own, either
//! from the wall clock or from a fixed step for reproducible headless runs.
//!
//! # Example
//!
//! ```ignore
//! use flowline::time::Time;
//!
//! let mut time = Time::new();
//! time.set_fixed_delta(Some(1.0 / 60.0));
//!
//! loop {
//!     let (elapsed, dt) = time.update();
//!     system.step(dt, elapsed, &params);
//! }
//! ```

use std::time::Instant;

/// Elapsed and per-frame time in seconds.
#[derive(Debug)]
pub struct Time {
    origin: Instant,
    previous: Instant,
    elapsed: f64,
    delta: f64,
    frames: u64,
    /// When set, every update advances by exactly this many seconds.
    fixed_delta: Option<f64>,
}

impl Time {
    /// Start a clock at the current instant.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            origin: now,
            previous: now,
            elapsed: 0.0,
            delta: 0.0,
            frames: 0,
            fixed_delta: None,
        }
    }

    /// Advance one frame. Returns `(elapsed, delta)`.
    pub fn update(&mut self) -> (f64, f64) {
        let now = Instant::now();
        match self.fixed_delta {
            Some(step) => {
                self.delta = step;
                self.elapsed += step;
            }
            None => {
                self.delta = now.duration_since(self.previous).as_secs_f64();
                self.elapsed = now.duration_since(self.origin).as_secs_f64();
            }
        }
        self.previous = now;
        self.frames += 1;
        (self.elapsed, self.delta)
    }

    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Seconds covered by the last update.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Updates since creation or the last reset.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frames
    }

    /// Step by a fixed amount per update; `None` follows the wall clock.
    pub fn set_fixed_delta(&mut self, delta: Option<f64>) {
        self.fixed_delta = delta;
    }

    /// Restart from zero. The fixed delta is kept.
    pub fn reset(&mut self) {
        let fixed_delta = self.fixed_delta;
        *self = Self::new();
        self.fixed_delta = fixed_delta;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_wall_clock_advances() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = time.update();

        assert!(elapsed >= 0.01);
        assert!(delta > 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_fixed_delta_accumulates() {
        let mut time = Time::new();
        time.set_fixed_delta(Some(0.25));
        for _ in 0..4 {
            time.update();
        }
        assert_eq!(time.elapsed(), 1.0);
        assert_eq!(time.delta(), 0.25);
        assert_eq!(time.frame(), 4);
    }

    #[test]
    fn test_reset_keeps_fixed_delta() {
        let mut time = Time::new();
        time.set_fixed_delta(Some(0.5));
        time.update();
        time.reset();
        assert_eq!(time.frame(), 0);
        assert_eq!(time.update(), (0.5, 0.5));
    }
}
