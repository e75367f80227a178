//! Offscreen rendering to PNG frames.
//!
//! Runs a [`Scene`] against a [`ManualHost`] with a fixed time step, so the
//! output depends only on the configuration and seed. The pointer follows a
//! scripted circle around the viewport centre.

use std::f32::consts::TAU;
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;

use crate::config::SceneConfig;
use crate::error::RenderError;
use crate::input::Viewport;
use crate::raster::RasterSink;
use crate::scene::Scene;
use crate::scheduler::ManualHost;
use crate::time::Time;

/// Seconds per simulated frame.
pub const FIXED_STEP: f32 = 1.0 / 60.0;

/// Seconds per revolution of the scripted pointer.
const POINTER_PERIOD: f32 = 4.0;

/// Headless render settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub frames: u32,
    pub width: u32,
    pub height: u32,
    pub out_dir: PathBuf,
}

/// Pointer position of the scripted path at `t` seconds.
pub fn scripted_pointer(viewport: Viewport, t: f32) -> Vec2 {
    let radius = viewport.width.min(viewport.height) * 0.25;
    let angle = TAU * t / POINTER_PERIOD;
    viewport.center() + Vec2::new(angle.cos(), angle.sin()) * radius
}

/// Render `job.frames` frames of `config` and return the written paths.
pub fn render(config: SceneConfig, job: &RenderJob) -> Result<Vec<PathBuf>, RenderError> {
    fs::create_dir_all(&job.out_dir)?;

    let viewport = Viewport::new(job.width as f32, job.height as f32);
    let background = config.background;
    let mut scene = Scene::new(config, viewport)?;
    *scene.time_mut() = Time::fixed(FIXED_STEP);

    let mut host = ManualHost::new();
    let mut sink = RasterSink::new(job.width, job.height, background);
    scene.start(&mut host, &mut sink);

    let mut written = Vec::with_capacity(job.frames as usize);
    for frame in 0..job.frames {
        let t = frame as f32 * FIXED_STEP;
        scene.pointer_moved(scripted_pointer(viewport, t));
        for token in host.drain() {
            scene.run_frame(token, &mut host, &mut sink);
        }

        let path = frame_path(&job.out_dir, frame);
        sink.save_png(&path)?;
        written.push(path);
    }

    tracing::info!(
        frames = job.frames,
        seed = scene.seed(),
        out = %job.out_dir.display(),
        "headless render finished"
    );
    Ok(written)
}

fn frame_path(dir: &Path, frame: u32) -> PathBuf {
    dir.join(format!("frame_{frame:05}.png"))
}
