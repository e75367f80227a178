//! Render sinks: where particle poses go every frame.
//!
//! Engines never draw. They attach one element per particle when a population
//! is created and push a [`Pose`] for each element every frame. A sink decides
//! how that pose becomes pixels (DOM transform, GPU instance, CPU raster) or
//! just records it.
//!
//! Writes to an unknown or already removed element are ignored: placing is
//! fire-and-forget and never fails.

use crate::visuals::{Color, Layer, ShapeKind};
use glam::Vec2;
use std::collections::BTreeMap;

/// Handle to one rendered element. Never reused within a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// Where an element sits on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Top-left corner in logical pixels (the CSS `translate`).
    pub position: Vec2,
    /// Rotation about the element centre, degrees in `[0, 360)`.
    pub rotation: f32,
}

impl Pose {
    /// Translation only.
    pub fn translate(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
        }
    }

    /// Translation plus rotation. Any angle is accepted and wrapped.
    pub fn new(position: Vec2, rotation_degrees: f32) -> Self {
        let mut rotation = rotation_degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if rotation >= 360.0 {
            rotation = 0.0;
        }
        Self { position, rotation }
    }

    /// CSS transform string for this pose.
    pub fn css_transform(&self) -> String {
        if self.rotation == 0.0 {
            format!("translate({}px, {}px)", self.position.x, self.position.y)
        } else {
            format!(
                "translate({}px, {}px) rotate({}deg)",
                self.position.x, self.position.y, self.rotation
            )
        }
    }
}

/// Fixed appearance of an element, set once at attach time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    /// Side length in logical pixels.
    pub size: f32,
    pub color: Color,
    pub shape: ShapeKind,
    /// `0.0..=1.0`
    pub opacity: f32,
}

/// One-way output for particle poses.
pub trait RenderSink {
    /// Create a new element on `layer` and return its handle.
    fn attach(&mut self, layer: Layer, style: ElementStyle) -> ElementId;

    /// Move an element. Unknown handles are a no-op.
    fn place(&mut self, id: ElementId, pose: Pose);

    /// Remove every element on `layer`.
    fn clear_layer(&mut self, layer: Layer);

    /// Number of elements currently attached on `layer`.
    fn len_layer(&self, layer: Layer) -> usize;
}

/// An element tracked by the in-memory sinks.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkElement {
    pub layer: Layer,
    pub style: ElementStyle,
    /// Last placed pose, `None` until the first placement.
    pub pose: Option<Pose>,
    /// Number of placements received.
    pub updates: u64,
}

/// Shared element table for sinks that keep their elements in memory.
#[derive(Debug, Default, Clone)]
pub struct ElementTable {
    next_id: u32,
    elements: BTreeMap<ElementId, SinkElement>,
}

impl ElementTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, layer: Layer, style: ElementStyle) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(
            id,
            SinkElement {
                layer,
                style,
                pose: None,
                updates: 0,
            },
        );
        id
    }

    pub fn place(&mut self, id: ElementId, pose: Pose) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.pose = Some(pose);
            element.updates += 1;
        }
    }

    pub fn clear_layer(&mut self, layer: Layer) {
        self.elements.retain(|_, e| e.layer != layer);
    }

    pub fn len_layer(&self, layer: Layer) -> usize {
        self.elements.values().filter(|e| e.layer == layer).count()
    }

    pub fn get(&self, id: ElementId) -> Option<&SinkElement> {
        self.elements.get(&id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in draw order: by layer, then by creation.
    pub fn iter_draw_order(&self) -> impl Iterator<Item = (ElementId, &SinkElement)> {
        let mut ordered: Vec<_> = self.elements.iter().map(|(id, e)| (*id, e)).collect();
        ordered.sort_by_key(|(id, e)| (e.layer, *id));
        ordered.into_iter()
    }
}

/// Records every element and its latest pose. Used by tests and headless runs.
#[derive(Debug, Default, Clone)]
pub struct HeadlessSink {
    table: ElementTable,
}

impl HeadlessSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, id: ElementId) -> Option<&SinkElement> {
        self.table.get(id)
    }

    /// Last pose placed for `id`.
    pub fn pose(&self, id: ElementId) -> Option<Pose> {
        self.table.get(id).and_then(|e| e.pose)
    }

    /// Total attached elements across all layers.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn table(&self) -> &ElementTable {
        &self.table
    }
}

impl RenderSink for HeadlessSink {
    fn attach(&mut self, layer: Layer, style: ElementStyle) -> ElementId {
        self.table.attach(layer, style)
    }

    fn place(&mut self, id: ElementId, pose: Pose) {
        self.table.place(id, pose);
    }

    fn clear_layer(&mut self, layer: Layer) {
        self.table.clear_layer(layer);
    }

    fn len_layer(&self, layer: Layer) -> usize {
        self.table.len_layer(layer)
    }
}

/// Hands out handles and discards poses.
#[derive(Debug, Default, Clone)]
pub struct NullSink {
    next_id: u32,
    counts: BTreeMap<Layer, usize>,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderSink for NullSink {
    fn attach(&mut self, layer: Layer, _style: ElementStyle) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        *self.counts.entry(layer).or_default() += 1;
        id
    }

    fn place(&mut self, _id: ElementId, _pose: Pose) {}

    fn clear_layer(&mut self, layer: Layer) {
        self.counts.remove(&layer);
    }

    fn len_layer(&self, layer: Layer) -> usize {
        self.counts.get(&layer).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot() -> ElementStyle {
        ElementStyle {
            size: 8.0,
            color: Color::WHITE,
            shape: ShapeKind::Circle,
            opacity: 1.0,
        }
    }

    #[test]
    fn pose_wraps_rotation() {
        assert_eq!(Pose::new(Vec2::ZERO, 360.0).rotation, 0.0);
        assert_eq!(Pose::new(Vec2::ZERO, 450.0).rotation, 90.0);
        assert_eq!(Pose::new(Vec2::ZERO, -90.0).rotation, 270.0);
        assert!(Pose::new(Vec2::ZERO, -1e-9).rotation < 360.0);
    }

    #[test]
    fn css_transform_format() {
        let pose = Pose::translate(Vec2::new(10.0, 20.5));
        assert_eq!(pose.css_transform(), "translate(10px, 20.5px)");
        let pose = Pose::new(Vec2::new(1.0, 2.0), 45.0);
        assert_eq!(pose.css_transform(), "translate(1px, 2px) rotate(45deg)");
    }

    #[test]
    fn headless_records_latest_pose() {
        let mut sink = HeadlessSink::new();
        let id = sink.attach(Layer::Swarm, dot());
        assert_eq!(sink.pose(id), None);

        sink.place(id, Pose::translate(Vec2::new(1.0, 1.0)));
        sink.place(id, Pose::translate(Vec2::new(2.0, 3.0)));
        assert_eq!(sink.pose(id).unwrap().position, Vec2::new(2.0, 3.0));
        assert_eq!(sink.element(id).unwrap().updates, 2);
    }

    #[test]
    fn clear_layer_leaves_other_layer() {
        let mut sink = HeadlessSink::new();
        sink.attach(Layer::Swarm, dot());
        sink.attach(Layer::Field, dot());
        sink.clear_layer(Layer::Swarm);
        assert_eq!(sink.len_layer(Layer::Swarm), 0);
        assert_eq!(sink.len_layer(Layer::Field), 1);
    }

    #[test]
    fn place_on_removed_element_is_ignored() {
        let mut sink = HeadlessSink::new();
        let stale = sink.attach(Layer::Swarm, dot());
        sink.clear_layer(Layer::Swarm);
        let fresh = sink.attach(Layer::Swarm, dot());
        assert_ne!(stale, fresh);

        sink.place(stale, Pose::translate(Vec2::ONE));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.pose(fresh), None);
    }

    #[test]
    fn draw_order_puts_field_first() {
        let mut table = ElementTable::new();
        let a = table.attach(Layer::Swarm, dot());
        let b = table.attach(Layer::Field, dot());
        let order: Vec<_> = table.iter_draw_order().map(|(id, _)| id).collect();
        assert_eq!(order, [b, a]);
    }

    #[test]
    fn null_sink_counts() {
        let mut sink = NullSink::new();
        sink.attach(Layer::Field, dot());
        sink.attach(Layer::Field, dot());
        assert_eq!(sink.len_layer(Layer::Field), 2);
        sink.clear_layer(Layer::Field);
        assert_eq!(sink.len_layer(Layer::Field), 0);
    }
}
