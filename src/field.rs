//! Free-floating background shapes.
//!
//! Each drifter moves with a constant velocity and spins at a constant rate.
//! When it leaves the padded viewport `[-size, width] x [-size, height]` the
//! offending velocity component flips sign. Reflection is lossless, so speed
//! per axis never changes. The check runs on the already-moved position,
//! which allows one frame of overshoot before the bounce.
//!
//! The padding equals the shape's own size, so a shape turns around only once
//! it is fully off-screen on the left/top edges.

use crate::input::Viewport;
use crate::sink::{ElementId, ElementStyle, Pose, RenderSink};
use crate::spawn::SpawnContext;
use crate::visuals::{Color, Layer, Palette, ShapeKind};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Creation parameters for a field of drifting shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of shapes.
    pub count: u32,
    /// Shape side length in pixels.
    pub size: Range<f32>,
    /// Velocity components are drawn from `[-max_speed, max_speed)` px/frame.
    pub max_speed: f32,
    /// Angular velocity is drawn from `[-max_spin, max_spin)` degrees/frame.
    pub max_spin: f32,
    pub palette: Palette,
    /// Probability that a shape is a circle rather than a rounded square.
    pub circle_chance: f32,
    pub opacity: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: 8,
            size: 100.0..300.0,
            max_speed: 1.5,
            max_spin: 1.0,
            palette: Palette::Candy,
            circle_chance: 0.5,
            opacity: 0.35,
        }
    }
}

/// One drifting shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drifter {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Degrees, unbounded.
    pub rotation: f32,
    /// Degrees per frame.
    pub angular_velocity: f32,
    pub size: f32,
    pub color: Color,
    pub shape: ShapeKind,
}

impl Drifter {
    /// Shape at rest with zero rotation; tweak the public fields as needed.
    pub fn new(position: Vec2, velocity: Vec2, size: f32) -> Self {
        Self {
            position,
            velocity,
            rotation: 0.0,
            angular_velocity: 0.0,
            size,
            color: Color::WHITE,
            shape: ShapeKind::Circle,
        }
    }

    /// Reflection padding: the shape's own footprint.
    #[inline]
    pub fn margin(&self) -> f32 {
        self.size
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }
}

/// Advance one drifter by one frame against the live viewport.
pub fn drift_step(drifter: &mut Drifter, viewport: Viewport) {
    drifter.position += drifter.velocity;
    drifter.rotation += drifter.angular_velocity;

    let margin = drifter.margin();
    let p = drifter.position;
    if p.x < -margin || p.x > viewport.width {
        drifter.velocity.x = -drifter.velocity.x;
    }
    if p.y < -margin || p.y > viewport.height {
        drifter.velocity.y = -drifter.velocity.y;
    }
}

/// Owns a fixed-size drifter population and its rendered elements.
#[derive(Debug)]
pub struct FieldEngine {
    config: FieldConfig,
    drifters: Vec<Drifter>,
    elements: Vec<ElementId>,
}

impl FieldEngine {
    /// Scatter `config.count` shapes across the viewport.
    ///
    /// Existing field elements in `sink` are removed first.
    pub fn create(
        config: FieldConfig,
        spawn: &mut SpawnContext,
        viewport: Viewport,
        sink: &mut dyn RenderSink,
    ) -> Self {
        let palette = config.palette.colors();
        let drifters = (0..config.count)
            .map(|_| {
                let size = spawn.random_range(config.size.clone());
                let color = spawn.pick(palette).copied().unwrap_or(Color::WHITE);
                let shape = if spawn.chance(config.circle_chance) {
                    ShapeKind::Circle
                } else {
                    ShapeKind::RoundedSquare
                };
                let position = spawn.in_rect(viewport);
                let velocity = Vec2::new(
                    spawn.symmetric(config.max_speed),
                    spawn.symmetric(config.max_speed),
                );
                let angular_velocity = spawn.symmetric(config.max_spin);
                Drifter {
                    position,
                    velocity,
                    rotation: 0.0,
                    angular_velocity,
                    size,
                    color,
                    shape,
                }
            })
            .collect();

        tracing::info!(count = config.count, seed = spawn.seed(), "created field");
        Self::with_drifters(config, drifters, sink)
    }

    /// Build a field from an explicit population.
    pub fn with_drifters(
        config: FieldConfig,
        drifters: Vec<Drifter>,
        sink: &mut dyn RenderSink,
    ) -> Self {
        let removed = sink.len_layer(Layer::Field);
        if removed > 0 {
            tracing::debug!(removed, "tearing down previous field elements");
        }
        sink.clear_layer(Layer::Field);

        let elements = drifters
            .iter()
            .map(|d| {
                let id = sink.attach(
                    Layer::Field,
                    ElementStyle {
                        size: d.size,
                        color: d.color,
                        shape: d.shape,
                        opacity: config.opacity,
                    },
                );
                sink.place(id, d.pose());
                id
            })
            .collect();

        Self {
            config,
            drifters,
            elements,
        }
    }

    /// Advance every drifter one frame. `viewport` must be the live size.
    pub fn step(&mut self, viewport: Viewport) {
        for drifter in &mut self.drifters {
            drift_step(drifter, viewport);
        }
    }

    pub fn present(&self, sink: &mut dyn RenderSink) {
        for (drifter, id) in self.drifters.iter().zip(&self.elements) {
            sink.place(*id, drifter.pose());
        }
    }

    pub fn update(&mut self, viewport: Viewport, sink: &mut dyn RenderSink) {
        self.step(viewport);
        self.present(sink);
    }

    pub fn drifters(&self) -> &[Drifter] {
        &self.drifters
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.drifters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drifters.is_empty()
    }
}
