//! Tunable parameters read by the particle system every step.
//!
//! [`ParameterStore`] is a plain bag of values owned by the host. A control
//! surface may rewrite any field between steps; the system re-reads them on
//! the next step with no reset needed. The exceptions are the spawn-time
//! fields (`playtime`, `spawn_spread`, the variances and floors), which only
//! shape particles created by the next `reset()`.
//!
//! No validation happens here. Out-of-range values produce odd motion, not
//! panics; `reset()` rejects a non-positive playtime.
//!
//! # Presets
//!
//! ```ignore
//! let calm = ParameterStore::basic_flow();
//! let dense = ParameterStore::basic_flow_v2();
//! ```

use crate::error::FlowError;
use glam::{DVec3, Vec3};

/// Per-step tunables for a [`crate::ParticleSystem`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterStore {
    /// Noise-driven acceleration per step, before the per-particle multiplier.
    pub speed: f64,
    /// Spatial and temporal frequency of the noise field.
    pub frequency: f64,
    /// Output scale of the noise sample. Large values make the heading
    /// (`cos`/`sin` of the sample) change quickly over space.
    pub noise_amplitude: f64,
    /// Constant drift added to the position of Active particles every step.
    pub base_velocity: DVec3,
    /// Whether the z velocity is noise driven. When false only x and y steer.
    pub noise_driven_z: bool,
    /// Initial `current_life` of particles created at reset, in steps.
    pub playtime: i64,
    /// Upper bound of the per-particle speed multiplier.
    pub speed_variance: f64,
    /// Lower bound of the per-particle speed multiplier.
    pub speed_floor: f64,
    /// Upper bound of the per-particle scale multiplier.
    pub scale_variance: f64,
    /// Lower bound of the per-particle scale multiplier. Keep positive.
    pub scale_floor: f64,
    /// Side of the cube particles are scattered in around the spawn origin.
    pub spawn_spread: f64,
    /// Curve width multiplier.
    pub line_width: f32,
    /// Curve opacity in [0, 1].
    pub line_opacity: f32,
    /// Curve RGB color.
    pub line_color: Vec3,
    /// Sphere RGB color.
    pub ball_color: Vec3,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::basic_flow_v2()
    }
}

impl ParameterStore {
    // =========================================================================
    // PRESETS
    // =========================================================================

    /// Sparse, long-lived flow: 10-unit spawn cube, thick opaque lines.
    pub fn basic_flow() -> Self {
        Self {
            playtime: 100,
            scale_floor: 0.05,
            spawn_spread: 10.0,
            line_width: 0.2,
            line_opacity: 1.0,
            line_color: rgb(0x55, 0x77, 0x99),
            ball_color: rgb(0xf0, 0xf0, 0xf0),
            ..Self::shared()
        }
    }

    /// Dense, short-lived flow: tight spawn cube, thin translucent lines.
    pub fn basic_flow_v2() -> Self {
        Self {
            playtime: 50,
            scale_floor: 0.25,
            spawn_spread: 2.5,
            line_width: 0.05,
            line_opacity: 0.4,
            line_color: rgb(0x41, 0x2f, 0x2f),
            ball_color: rgb(0x49, 0x49, 0xe8),
            ..Self::shared()
        }
    }

    /// Look up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "basic_flow" => Some(Self::basic_flow()),
            "basic_flow_v2" => Some(Self::basic_flow_v2()),
            _ => None,
        }
    }

    /// Names accepted by [`ParameterStore::preset`].
    pub fn preset_names() -> &'static [&'static str] {
        &["basic_flow", "basic_flow_v2"]
    }

    fn shared() -> Self {
        Self {
            speed: 0.005,
            frequency: 0.0001,
            noise_amplitude: 100.0,
            base_velocity: DVec3::ZERO,
            noise_driven_z: true,
            playtime: 50,
            speed_variance: 1.0,
            speed_floor: 0.0,
            scale_variance: 1.0,
            scale_floor: 0.25,
            spawn_spread: 2.5,
            line_width: 0.05,
            line_opacity: 0.4,
            line_color: Vec3::ONE,
            ball_color: Vec3::ONE,
        }
    }

    // =========================================================================
    // CONTROL SURFACE HELPERS
    // =========================================================================

    /// Set the curve color from a `#rrggbb` string.
    pub fn set_line_color_hex(&mut self, hex: &str) -> Result<(), FlowError> {
        self.line_color = parse_hex_color(hex)?;
        Ok(())
    }

    /// Set the sphere color from a `#rrggbb` string.
    pub fn set_ball_color_hex(&mut self, hex: &str) -> Result<(), FlowError> {
        self.ball_color = parse_hex_color(hex)?;
        Ok(())
    }
}

fn rgb(r: u8, g: u8, b: u8) -> Vec3 {
    Vec3::new(r as f32, g as f32, b as f32) / 255.0
}

/// Parse `#rrggbb` (leading `#` optional) into RGB in [0, 1].
pub fn parse_hex_color(hex: &str) -> Result<Vec3, FlowError> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(FlowError::InvalidColor(hex.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| FlowError::InvalidColor(hex.to_string()))
    };
    Ok(rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Format an RGB color in [0, 1] as `#rrggbb`.
pub fn to_hex_color(color: Vec3) -> String {
    let [r, g, b] = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round().to_array();
    format!("#{:02x}{:02x}{:02x}", r as u8, g as u8, b as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        let c = parse_hex_color("#4949e8").unwrap();
        assert!((c.x - 0x49 as f32 / 255.0).abs() < 1e-6);
        assert!((c.z - 0xe8 as f32 / 255.0).abs() < 1e-6);
        assert_eq!(parse_hex_color("ffffff").unwrap(), Vec3::ONE);
    }

    #[test]
    fn test_parse_hex_color_rejects_garbage() {
        assert!(matches!(parse_hex_color("#12345"), Err(FlowError::InvalidColor(_))));
        assert!(matches!(parse_hex_color("#zzzzzz"), Err(FlowError::InvalidColor(_))));
        assert!(parse_hex_color("#ééé").is_err());
    }

    #[test]
    fn test_hex_round_trip_of_preset_colors() {
        let p = ParameterStore::basic_flow_v2();
        assert_eq!(to_hex_color(p.line_color), "#412f2f");
        assert_eq!(to_hex_color(p.ball_color), "#4949e8");
    }

    #[test]
    fn test_presets() {
        let v1 = ParameterStore::basic_flow();
        let v2 = ParameterStore::basic_flow_v2();
        assert_eq!(v1.playtime, 100);
        assert_eq!(v2.playtime, 50);
        assert_eq!(v1.speed, v2.speed);
        assert!(v1.scale_floor > 0.0 && v2.scale_floor > 0.0);
        assert_eq!(ParameterStore::preset("basic_flow"), Some(v1));
        assert!(ParameterStore::preset("nope").is_none());
        assert_eq!(ParameterStore::default(), v2);
    }

    #[test]
    fn test_set_color_hex_keeps_old_value_on_error() {
        let mut p = ParameterStore::default();
        let before = p.ball_color;
        assert!(p.set_ball_color_hex("#nothex").is_err());
        assert_eq!(p.ball_color, before);
        p.set_line_color_hex("#000000").unwrap();
        assert_eq!(p.line_color, Vec3::ZERO);
    }
}
