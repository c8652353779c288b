//! Flowline runner - scene files and a headless driver
//!
//! This crate provides:
//! - Serializable scene configuration ([`SceneConfig`]) with JSON load/save
//! - A statistics-only render backend for running without a window
//! - Argument parsing for the `flowline-runner` binary

pub mod cli;
pub mod config;
pub mod recorder;

pub use cli::RunArgs;
pub use config::{ConfigError, FlowConfig, LineConfig, SceneConfig, TaperConfig};
pub use recorder::{FrameRecord, RecordingBackend};
