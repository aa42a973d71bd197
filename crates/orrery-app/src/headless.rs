//! Runs the scene on the in-memory backend for a fixed number of frames.

use std::time::{Duration, Instant};

use glam::Vec3;
use orrery_config::Config;
use orrery_scene::{BodyId, HeadlessBackend, SceneBuilder, SceneError, SurfaceSize};
use tracing::{info, instrument};

/// Simulated display refresh.
pub const FRAME_INTERVAL: Duration = Duration::from_nanos(16_666_667);

/// What a headless run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessSummary {
    pub seed: u64,
    pub frames: u32,
    pub ticks: u64,
    pub frames_rendered: u64,
    pub simulated: Duration,
    pub camera_position: Vec3,
    pub positions: Vec<(BodyId, Vec3)>,
}

/// Build the scene at the configured window size and drive `frames` frames.
#[instrument(skip(config))]
pub fn run_headless(config: &Config, frames: u32) -> Result<HeadlessSummary, SceneError> {
    let surface = SurfaceSize::new(config.window.width, config.window.height, 1.0);
    let backend = HeadlessBackend::new(surface);
    let mut ctx = SceneBuilder::new(config).initialize(backend, surface)?;
    ctx.start_loop();

    let start = Instant::now();
    for frame in 0..frames {
        ctx.frame(start + FRAME_INTERVAL * frame)?;
    }

    let positions: Vec<(BodyId, Vec3)> = ctx
        .bodies()
        .iter()
        .map(|body| (body.id(), body.position()))
        .collect();
    for (id, position) in &positions {
        info!(
            body = id.name(),
            x = position.x,
            z = position.z,
            "final position"
        );
    }

    let summary = HeadlessSummary {
        seed: ctx.seed(),
        frames,
        ticks: ctx.ticks(),
        frames_rendered: ctx.backend().frames_rendered(),
        simulated: FRAME_INTERVAL * frames,
        camera_position: ctx.camera().position,
        positions,
    };
    info!(
        seed = summary.seed,
        ticks = summary.ticks,
        rendered = summary.frames_rendered,
        simulated_ms = summary.simulated.as_millis() as u64,
        "headless run complete"
    );
    Ok(summary)
}
