//! Cursor-following dot swarm.
//!
//! A fixed population of followers trails the pointer. Each follower aims at
//! `pointer + offset + float(t, phase)` and closes a fixed fraction of the
//! remaining distance every frame:
//!
//! ```text
//! float(i)   = A * (sin(t + i), cos(t + 0.5 i))
//! target(i)  = pointer + offset(i) + float(i)
//! position  += (target - position) * follow_rate(i)
//! ```
//!
//! This is exponential smoothing, not physics. There is no momentum, so a
//! follower never overshoots a stationary target. Because the float term
//! depends on time, the swarm keeps moving even if the pointer never does.

use crate::input::Viewport;
use crate::sink::{ElementId, ElementStyle, Pose, RenderSink};
use crate::spawn::SpawnContext;
use crate::visuals::{Color, Layer, ShapeKind};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Creation parameters for a swarm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// Number of followers.
    pub count: u32,
    /// Dot side length in pixels.
    pub size: Range<f32>,
    /// Side of the centred square that static offsets are drawn from.
    pub spread: f32,
    /// Per-follower lag coefficient, within `(0, 1]`.
    pub follow_rate: Range<f32>,
    /// Amplitude of the floating motion in pixels.
    pub float_amplitude: f32,
    /// Time units per second for the floating motion.
    pub float_speed: f32,
    pub color: Color,
    pub opacity: f32,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            count: 40,
            size: 5.0..13.0,
            spread: 150.0,
            follow_rate: 0.03..0.10,
            float_amplitude: 30.0,
            float_speed: 2.0,
            color: Color::WHITE,
            opacity: 0.8,
        }
    }
}

/// One swarm particle.
///
/// Only `position` changes after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Follower {
    pub position: Vec2,
    offset: Vec2,
    follow_rate: f32,
    phase: u32,
    size: f32,
}

impl Follower {
    pub fn new(position: Vec2, offset: Vec2, follow_rate: f32, phase: u32, size: f32) -> Self {
        Self {
            position,
            offset,
            follow_rate,
            phase,
            size,
        }
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    #[inline]
    pub fn follow_rate(&self) -> f32 {
        self.follow_rate
    }

    #[inline]
    pub fn phase(&self) -> u32 {
        self.phase
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Where this follower is heading this frame.
    #[inline]
    pub fn target(&self, t: f32, pointer: Vec2, amplitude: f32) -> Vec2 {
        pointer + self.offset + float_offset(t, self.phase, amplitude)
    }
}

/// Periodic wandering term, desynchronised by `phase`.
#[inline]
pub fn float_offset(t: f32, phase: u32, amplitude: f32) -> Vec2 {
    let i = phase as f32;
    Vec2::new((t + i).sin(), (t + i * 0.5).cos()) * amplitude
}

/// One smoothing step from `position` toward `target`.
#[inline]
pub fn follow_step(position: Vec2, target: Vec2, rate: f32) -> Vec2 {
    position + (target - position) * rate
}

/// Owns a fixed-size follower population and its rendered elements.
#[derive(Debug)]
pub struct SwarmEngine {
    config: SwarmConfig,
    followers: Vec<Follower>,
    elements: Vec<ElementId>,
}

impl SwarmEngine {
    /// Build `config.count` followers at the viewport centre.
    ///
    /// Any swarm elements already in `sink` are removed first, so calling this
    /// again replaces the previous population instead of adding to it.
    pub fn create(
        config: SwarmConfig,
        spawn: &mut SpawnContext,
        viewport: Viewport,
        sink: &mut dyn RenderSink,
    ) -> Self {
        let start = viewport.center();
        let followers = (0..config.count)
            .map(|i| {
                let size = spawn.random_range(config.size.clone());
                let offset = spawn.in_square(config.spread);
                let follow_rate = spawn.random_range(config.follow_rate.clone());
                Follower::new(start, offset, follow_rate, i, size)
            })
            .collect();

        tracing::info!(count = config.count, seed = spawn.seed(), "created swarm");
        Self::with_followers(config, followers, sink)
    }

    /// Build a swarm from an explicit population.
    pub fn with_followers(
        config: SwarmConfig,
        followers: Vec<Follower>,
        sink: &mut dyn RenderSink,
    ) -> Self {
        let removed = sink.len_layer(Layer::Swarm);
        if removed > 0 {
            tracing::debug!(removed, "tearing down previous swarm elements");
        }
        sink.clear_layer(Layer::Swarm);

        let elements = followers
            .iter()
            .map(|f| {
                let id = sink.attach(
                    Layer::Swarm,
                    ElementStyle {
                        size: f.size,
                        color: config.color,
                        shape: ShapeKind::Circle,
                        opacity: config.opacity,
                    },
                );
                sink.place(id, Pose::translate(f.position));
                id
            })
            .collect();

        Self {
            config,
            followers,
            elements,
        }
    }

    /// Advance every follower one frame.
    ///
    /// `elapsed_secs` is scaled by `float_speed` to get the float time unit.
    /// `pointer` is a value snapshot taken once for the whole frame.
    pub fn step(&mut self, elapsed_secs: f32, pointer: Vec2) {
        let t = elapsed_secs * self.config.float_speed;
        let amplitude = self.config.float_amplitude;
        for follower in &mut self.followers {
            let target = follower.target(t, pointer, amplitude);
            follower.position = follow_step(follower.position, target, follower.follow_rate);
        }
    }

    /// Push every follower's pose to the sink.
    pub fn present(&self, sink: &mut dyn RenderSink) {
        for (follower, id) in self.followers.iter().zip(&self.elements) {
            sink.place(*id, Pose::translate(follower.position));
        }
    }

    /// [`step`](Self::step) then [`present`](Self::present).
    pub fn update(&mut self, elapsed_secs: f32, pointer: Vec2, sink: &mut dyn RenderSink) {
        self.step(elapsed_secs, pointer);
        self.present(sink);
    }

    pub fn followers(&self) -> &[Follower] {
        &self.followers
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.followers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.followers.is_empty()
    }
}
