//! Error types for flowline.
//!
//! Stepping never fails. The only fallible operations are construction,
//! `reset()`, and parsing control-surface input such as hex colors.

use std::fmt;

/// The specific rule a configuration broke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigIssue {
    /// Particle count `N` was zero.
    ZeroParticles,
    /// Curve length `K` was zero.
    ZeroCurveLength,
    /// Playtime (initial `currentLife`) was zero or negative.
    NonPositivePlaytime(i64),
    /// Lower bound of the per-particle scale was zero, negative or NaN.
    NonPositiveScaleFloor(f64),
    /// Reshape cadence below 2 would never let the curve slide.
    ReshapeInterval(u32),
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigIssue::ZeroParticles => write!(f, "particle count must be at least 1"),
            ConfigIssue::ZeroCurveLength => write!(f, "curve length must be at least 1"),
            ConfigIssue::NonPositivePlaytime(t) => {
                write!(f, "playtime must be positive, got {}", t)
            }
            ConfigIssue::NonPositiveScaleFloor(s) => {
                write!(f, "scale floor must be positive, got {}", s)
            }
            ConfigIssue::ReshapeInterval(n) => {
                write!(f, "reshape interval must be at least 2, got {}", n)
            }
        }
    }
}

/// Errors raised while building or re-seeding a particle system.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowError {
    /// Construction or reset was asked to run with degenerate invariants.
    InvalidConfiguration(ConfigIssue),
    /// A color string could not be parsed as `#rrggbb`.
    InvalidColor(String),
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::InvalidConfiguration(issue) => {
                write!(f, "Invalid configuration: {}", issue)
            }
            FlowError::InvalidColor(s) => {
                write!(f, "Invalid color '{}': expected #rrggbb", s)
            }
        }
    }
}

impl std::error::Error for FlowError {}

impl From<ConfigIssue> for FlowError {
    fn from(issue: ConfigIssue) -> Self {
        FlowError::InvalidConfiguration(issue)
    }
}
