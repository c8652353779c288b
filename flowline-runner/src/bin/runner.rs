//! Flowline headless runner
//!
//! Loads a scene from JSON (or a named preset), steps it on a fixed 60 Hz
//! clock and logs what a renderer would have drawn.
//!
//! Usage: `flowline-runner [config.json] [--frames N] [--preset NAME] [--respawn-every N]`

use flowline::prelude::*;
use flowline_runner::cli::USAGE;
use flowline_runner::{RecordingBackend, RunArgs, SceneConfig};
use std::env;
use std::process::ExitCode;

const FRAME_DELTA: f64 = 1.0 / 60.0;

/// Origin of the `k`-th respawn: a slow circle in the view plane, like a
/// pointer being dragged around.
fn respawn_origin(k: u64) -> DVec2 {
    let angle = k as f64 * 0.7;
    DVec2::new(angle.cos(), angle.sin()) * 2.0
}

fn load_scene(args: &RunArgs) -> SceneConfig {
    if let Some(name) = &args.preset {
        match SceneConfig::from_preset(name) {
            Ok(scene) => return scene,
            Err(e) => log::warn!("{}; using defaults", e),
        }
    } else if let Some(path) = &args.config {
        match SceneConfig::load(path) {
            Ok(scene) => return scene,
            Err(e) => log::warn!("Failed to load config from {:?}: {}; using defaults", path, e),
        }
    }
    SceneConfig::default()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match RunArgs::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    let scene = load_scene(&args);
    let (mut system, params) = match scene.build() {
        Ok(built) => built,
        Err(e) => {
            log::error!("Scene '{}' is invalid: {}", scene.name, e);
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "Running '{}' for {} frames ({} particles, {} points per curve)",
        scene.name,
        args.frames,
        scene.particle_count,
        scene.curve_length
    );

    let mut time = Time::new();
    time.set_fixed_delta(Some(FRAME_DELTA));
    let mut backend = RecordingBackend::new();
    let mut respawns = 0;
    let mut last = StepStats::default();

    for frame in 1..=args.frames {
        if let Some(every) = args.respawn_every {
            if frame > 1 && (frame - 1) % every == 0 {
                respawns += 1;
                if let Err(e) = system.reset(respawn_origin(respawns), &params) {
                    log::error!("Reset failed: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }

        let (elapsed, dt) = time.update();
        last = system.step(dt, elapsed, &params);
        project(&system, &params, &mut backend);

        let record = backend.last_frame();
        log::debug!(
            "frame {:>5} t={:7.3}s active {:>4} decaying {:>4} dormant {:>4} curves {:>4} vertices {:>6}",
            frame,
            elapsed,
            last.active,
            last.decaying,
            last.dormant,
            record.curves,
            record.vertices
        );
    }

    let record = backend.last_frame();
    log::info!(
        "Done: {} frames, {} respawns, final counts active {} / decaying {} / dormant {}",
        backend.frames(),
        respawns,
        last.active,
        last.decaying,
        last.dormant
    );
    log::info!(
        "Last frame bounds ({:.2}, {:.2}, {:.2})..({:.2}, {:.2}, {:.2}), max scale {:.3}, {} curve vertices in total",
        record.min.x,
        record.min.y,
        record.min.z,
        record.max.x,
        record.max.y,
        record.max.z,
        record.max_scale,
        backend.total_vertices()
    );
    ExitCode::SUCCESS
}
