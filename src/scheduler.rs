//! Repaint-driven frame loops with cancellation.
//!
//! Each subsystem runs its own loop: a frame is requested from the host
//! ("call me when the display is ready to repaint"), and when it fires the
//! loop does its work and requests exactly one more. The host decides when
//! frames fire - winit's `RedrawRequested`, the browser's
//! `requestAnimationFrame`, or a test draining a queue.
//!
//! Every request carries a [`FrameToken`] stamped with the scheduler's
//! generation. [`FrameScheduler::stop`] and [`FrameScheduler::start`] bump the
//! generation, so a frame that was already requested by a torn-down loop
//! fires as a no-op instead of touching the new population.

use std::collections::VecDeque;

/// Which animation loop a frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    Swarm,
    Field,
}

/// Ticket for one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken {
    subsystem: Subsystem,
    generation: u64,
}

impl FrameToken {
    #[inline]
    pub fn subsystem(&self) -> Subsystem {
        self.subsystem
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Something that can call back once the display is ready to repaint.
pub trait RepaintHost {
    /// Arrange for a frame carrying `token` to fire on the next repaint.
    fn request_repaint(&mut self, token: FrameToken);
}

/// Host that queues requests until someone drains them.
///
/// Used by tests and the headless renderer to step frames by hand.
#[derive(Debug, Default)]
pub struct ManualHost {
    pending: VecDeque<FrameToken>,
}

impl ManualHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending request, oldest first.
    pub fn drain(&mut self) -> Vec<FrameToken> {
        self.pending.drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl RepaintHost for ManualHost {
    fn request_repaint(&mut self, token: FrameToken) {
        self.pending.push_back(token);
    }
}

/// Self-rearming frame loop for one subsystem.
#[derive(Debug)]
pub struct FrameScheduler {
    subsystem: Subsystem,
    generation: u64,
    running: bool,
    frames: u64,
}

impl FrameScheduler {
    pub fn new(subsystem: Subsystem) -> Self {
        Self {
            subsystem,
            generation: 0,
            running: false,
            frames: 0,
        }
    }

    /// Begin a new loop and request its first frame.
    ///
    /// Any frame requested by a previous loop becomes stale.
    pub fn start(&mut self, host: &mut dyn RepaintHost) -> FrameToken {
        self.generation += 1;
        self.running = true;
        let token = self.token();
        tracing::debug!(subsystem = ?self.subsystem, generation = self.generation, "frame loop started");
        host.request_repaint(token);
        token
    }

    /// End the loop. Frames already requested will fire as no-ops.
    pub fn stop(&mut self) {
        if self.running {
            self.generation += 1;
            self.running = false;
            tracing::debug!(subsystem = ?self.subsystem, "frame loop stopped");
        }
    }

    /// Whether `token` belongs to the live loop.
    pub fn is_current(&self, token: FrameToken) -> bool {
        self.running && token.subsystem == self.subsystem && token.generation == self.generation
    }

    /// Run `frame` if `token` is current, then request the next frame.
    ///
    /// Returns `false` (and requests nothing) for stale tokens.
    pub fn fire<F: FnOnce()>(
        &mut self,
        token: FrameToken,
        host: &mut dyn RepaintHost,
        frame: F,
    ) -> bool {
        if !self.is_current(token) {
            tracing::trace!(subsystem = ?self.subsystem, stale = token.generation, "dropping stale frame");
            return false;
        }
        frame();
        self.frames += 1;
        host.request_repaint(token);
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Frames executed over the scheduler's lifetime.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn subsystem(&self) -> Subsystem {
        self.subsystem
    }

    fn token(&self) -> FrameToken {
        FrameToken {
            subsystem: self.subsystem,
            generation: self.generation,
        }
    }
}
