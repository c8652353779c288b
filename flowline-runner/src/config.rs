//! Serializable scene configuration.
//!
//! A [`SceneConfig`] is the JSON form of a [`SystemConfig`] plus a
//! [`ParameterStore`]. Colors are stored as `#rrggbb` strings and vectors as
//! plain arrays so files stay easy to edit by hand. Every field has a
//! default, so a partial file fills the gaps from `basic_flow_v2`.
//!
//! ```json
//! {
//!   "name": "calm",
//!   "particle_count": 100,
//!   "curve_length": 50,
//!   "flow": { "playtime": 100, "spawn_spread": 10.0 },
//!   "lines": { "color": "#557799", "width": 0.2, "opacity": 1.0 },
//!   "taper": { "type": "Parabola", "k": 1.0 }
//! }
//! ```

use flowline::{
    parse_hex_color, to_hex_color, FlowError, Parabola, ParameterStore, ParticleSystem,
    SystemConfig, Uniform,
};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

// ============================================================================
// Errors
// ============================================================================

/// Failure to load or apply a scene configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// The file parsed but describes an invalid system.
    Flow(FlowError),
    UnknownPreset(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Parse(e) => write!(f, "Malformed scene file: {}", e),
            ConfigError::Flow(e) => write!(f, "{}", e),
            ConfigError::UnknownPreset(name) => write!(
                f,
                "Unknown preset '{}' (expected one of: {})",
                name,
                ParameterStore::preset_names().join(", ")
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Flow(e) => Some(e),
            ConfigError::UnknownPreset(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<FlowError> for ConfigError {
    fn from(e: FlowError) -> Self {
        ConfigError::Flow(e)
    }
}

// ============================================================================
// Scene
// ============================================================================

/// Complete scene configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub name: String,
    pub particle_count: usize,
    pub curve_length: usize,
    pub stop_threshold: i64,
    /// Curves reshape on frames 1, 1 + n, 1 + 2n, ... after each reset.
    pub reshape_interval: u32,
    /// Fixed seed for spawning. Omit for a different scatter every run.
    pub spawn_seed: Option<u64>,
    pub noise_seed: u64,
    pub flow: FlowConfig,
    pub lines: LineConfig,
    pub ball_color: String,
    pub taper: TaperConfig,
}

/// Motion and spawn tunables.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlowConfig {
    pub speed: f64,
    pub frequency: f64,
    pub noise_amplitude: f64,
    pub base_velocity: [f64; 3],
    pub noise_driven_z: bool,
    pub playtime: i64,
    pub speed_variance: f64,
    pub speed_floor: f64,
    pub scale_variance: f64,
    pub scale_floor: f64,
    pub spawn_spread: f64,
}

/// Curve material.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LineConfig {
    pub color: String,
    pub width: f32,
    pub opacity: f32,
}

/// Width profile applied to curves on reshape frames.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum TaperConfig {
    Parabola { k: f64 },
    Uniform,
}

impl Default for TaperConfig {
    fn default() -> Self {
        TaperConfig::Parabola { k: 1.0 }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::from_parts(
            "basic_flow_v2",
            &SystemConfig::basic_flow_v2(),
            &ParameterStore::basic_flow_v2(),
        )
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        SceneConfig::default().flow
    }
}

impl Default for LineConfig {
    fn default() -> Self {
        SceneConfig::default().lines
    }
}

impl SceneConfig {
    /// Snapshot a system configuration and parameter set.
    pub fn from_parts(name: &str, system: &SystemConfig, params: &ParameterStore) -> Self {
        Self {
            name: name.to_string(),
            particle_count: system.particle_count,
            curve_length: system.curve_length,
            stop_threshold: system.stop_threshold,
            reshape_interval: system.reshape_interval,
            spawn_seed: system.spawn_seed,
            noise_seed: system.noise_seed,
            flow: FlowConfig {
                speed: params.speed,
                frequency: params.frequency,
                noise_amplitude: params.noise_amplitude,
                base_velocity: params.base_velocity.to_array(),
                noise_driven_z: params.noise_driven_z,
                playtime: params.playtime,
                speed_variance: params.speed_variance,
                speed_floor: params.speed_floor,
                scale_variance: params.scale_variance,
                scale_floor: params.scale_floor,
                spawn_spread: params.spawn_spread,
            },
            lines: LineConfig {
                color: to_hex_color(params.line_color),
                width: params.line_width,
                opacity: params.line_opacity,
            },
            ball_color: to_hex_color(params.ball_color),
            taper: TaperConfig::default(),
        }
    }

    /// Scene for a named preset (`basic_flow` or `basic_flow_v2`).
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        let system = match name {
            "basic_flow" => SystemConfig::basic_flow(),
            "basic_flow_v2" => SystemConfig::basic_flow_v2(),
            _ => return Err(ConfigError::UnknownPreset(name.to_string())),
        };
        let params = ParameterStore::preset(name)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))?;
        Ok(Self::from_parts(name, &system, &params))
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_system_config(&self) -> SystemConfig {
        SystemConfig {
            particle_count: self.particle_count,
            curve_length: self.curve_length,
            stop_threshold: self.stop_threshold,
            reshape_interval: self.reshape_interval,
            spawn_seed: self.spawn_seed,
            noise_seed: self.noise_seed,
        }
    }

    /// Convert to runtime parameters. Fails on malformed colors.
    pub fn to_params(&self) -> Result<ParameterStore, ConfigError> {
        let flow = &self.flow;
        Ok(ParameterStore {
            speed: flow.speed,
            frequency: flow.frequency,
            noise_amplitude: flow.noise_amplitude,
            base_velocity: DVec3::from_array(flow.base_velocity),
            noise_driven_z: flow.noise_driven_z,
            playtime: flow.playtime,
            speed_variance: flow.speed_variance,
            speed_floor: flow.speed_floor,
            scale_variance: flow.scale_variance,
            scale_floor: flow.scale_floor,
            spawn_spread: flow.spawn_spread,
            line_width: self.lines.width,
            line_opacity: self.lines.opacity,
            line_color: parse_hex_color(&self.lines.color)?,
            ball_color: parse_hex_color(&self.ball_color)?,
        })
    }

    /// Build a ready-to-step system and its parameters.
    pub fn build(&self) -> Result<(ParticleSystem, ParameterStore), ConfigError> {
        let params = self.to_params()?;
        let system = ParticleSystem::new(self.to_system_config(), &params)?;
        let system = match self.taper {
            TaperConfig::Parabola { k } => system.with_taper(Parabola::new(k)),
            TaperConfig::Uniform => system.with_taper(Uniform),
        };
        Ok((system, params))
    }
}
