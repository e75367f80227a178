//! Animation clock for the swarm's floating motion.
//!
//! Elapsed time only grows while the clock runs: a paused clock holds its
//! value, and resuming does not count the paused span. With a fixed step the
//! wall clock is ignored and every update adds exactly that step, which makes
//! trajectories reproducible in tests and headless renders.

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

#[derive(Debug)]
pub struct Time {
    last_frame: Instant,
    /// Seconds, excluding pauses.
    elapsed_secs: f32,
    paused: bool,
    fixed_step: Option<f32>,
}

impl Time {
    /// Wall-clock driven, starting now.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            elapsed_secs: 0.0,
            paused: false,
            fixed_step: None,
        }
    }

    /// Advances by exactly `step` seconds per update.
    pub fn fixed(step: f32) -> Self {
        Self {
            fixed_step: Some(step),
            ..Self::new()
        }
    }

    /// Advance one frame and return the elapsed time.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        let wall = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if !self.paused {
            self.elapsed_secs += self.fixed_step.unwrap_or(wall);
        }
        self.elapsed_secs
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freeze or unfreeze elapsed time.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if !self.paused {
            // The span spent paused must not show up as one long frame
            self.last_frame = Instant::now();
        }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
