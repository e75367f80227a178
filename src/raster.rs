//! CPU canvas sink.
//!
//! Keeps the latest pose of every element and rasterizes them on demand into
//! an RGBA image: rotated rounded boxes with one-pixel anti-aliased edges,
//! blended in draw order over a solid background. Used for headless renders
//! and for checking what the GPU path should look like.

use crate::error::RenderError;
use crate::sink::{ElementId, ElementStyle, ElementTable, Pose, RenderSink};
use crate::visuals::{Color, Layer};
use glam::Vec2;
use image::{Rgba, RgbaImage};
use std::path::Path;

pub struct RasterSink {
    table: ElementTable,
    width: u32,
    height: u32,
    background: Color,
}

impl RasterSink {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            table: ElementTable::new(),
            width,
            height,
            background,
        }
    }

    pub fn table(&self) -> &ElementTable {
        &self.table
    }

    /// Rasterize every placed element.
    pub fn render(&self) -> RgbaImage {
        let bg = self.background;
        let mut img = RgbaImage::from_pixel(self.width, self.height, Rgba([bg.r, bg.g, bg.b, 255]));
        for (_, element) in self.table.iter_draw_order() {
            if let Some(pose) = element.pose {
                self.draw(&mut img, &element.style, pose);
            }
        }
        img
    }

    /// Render and write a PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        self.render().save(path)?;
        Ok(())
    }

    fn draw(&self, img: &mut RgbaImage, style: &ElementStyle, pose: Pose) {
        let size = style.size;
        let half = size * 0.5;
        let center = pose.position + Vec2::splat(half);
        let radius = style.shape.corner_fraction() * size;
        let (sin, cos) = pose.rotation.to_radians().sin_cos();

        // Conservative bounds for any rotation
        let reach = half * std::f32::consts::SQRT_2 + 1.0;
        let x0 = (center.x - reach).floor().max(0.0) as u32;
        let y0 = (center.y - reach).floor().max(0.0) as u32;
        let x1 = ((center.x + reach).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((center.y + reach).ceil().max(0.0) as u32).min(self.height);

        let src = style.color.to_f32();
        for py in y0..y1 {
            for px in x0..x1 {
                let d = Vec2::new(px as f32 + 0.5, py as f32 + 0.5) - center;
                let local = Vec2::new(d.x * cos + d.y * sin, -d.x * sin + d.y * cos);
                let dist = rounded_box_sdf(local, half, radius);
                let alpha = (0.5 - dist).clamp(0.0, 1.0) * style.opacity;
                if alpha <= 0.0 {
                    continue;
                }
                let dst = img.get_pixel_mut(px, py);
                for c in 0..3 {
                    let under = dst.0[c] as f32 / 255.0;
                    let over = src[c] * alpha + under * (1.0 - alpha);
                    dst.0[c] = (over * 255.0).round() as u8;
                }
            }
        }
    }
}

/// Signed distance from `p` to a box of half-side `half` with corner `radius`.
fn rounded_box_sdf(p: Vec2, half: f32, radius: f32) -> f32 {
    let q = p.abs() - Vec2::splat(half - radius);
    q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0) - radius
}

impl RenderSink for RasterSink {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visuals::ShapeKind;

    fn style(shape: ShapeKind, color: Color, opacity: f32) -> ElementStyle {
        ElementStyle {
            size: 20.0,
            color,
            shape,
            opacity,
        }
    }

    #[test]
    fn empty_sink_is_background() {
        let sink = RasterSink::new(8, 4, Color::rgb(10, 20, 30));
        let img = sink.render();
        assert_eq!(img.dimensions(), (8, 4));
        assert!(img.pixels().all(|p| p.0 == [10, 20, 30, 255]));
    }

    #[test]
    fn circle_fills_centre_not_corner() {
        let mut sink = RasterSink::new(40, 40, Color::BLACK);
        let id = sink.attach(Layer::Swarm, style(ShapeKind::Circle, Color::WHITE, 1.0));
        sink.place(id, Pose::translate(Vec2::new(10.0, 10.0)));
        let img = sink.render();

        assert_eq!(img.get_pixel(20, 20).0, [255, 255, 255, 255]);
        // Bounding-box corner lies outside the circle
        assert_eq!(img.get_pixel(10, 10).0, [0, 0, 0, 255]);
    }

    #[test]
    fn rounded_square_fills_near_corner() {
        let mut sink = RasterSink::new(40, 40, Color::BLACK);
        let id = sink.attach(Layer::Field, style(ShapeKind::RoundedSquare, Color::WHITE, 1.0));
        sink.place(id, Pose::translate(Vec2::new(10.0, 10.0)));
        let img = sink.render();
        // 3px in from the corner is inside a 4px-radius rounded square
        assert_eq!(img.get_pixel(13, 13).0, [255, 255, 255, 255]);
    }

    #[test]
    fn opacity_blends_over_background() {
        let mut sink = RasterSink::new(40, 40, Color::BLACK);
        let id = sink.attach(Layer::Field, style(ShapeKind::Circle, Color::WHITE, 0.5));
        sink.place(id, Pose::translate(Vec2::new(10.0, 10.0)));
        let px = sink.render().get_pixel(20, 20).0;
        assert!((127..=128).contains(&px[0]));
    }

    #[test]
    fn unplaced_and_offscreen_elements_are_skipped() {
        let mut sink = RasterSink::new(16, 16, Color::BLACK);
        sink.attach(Layer::Swarm, style(ShapeKind::Circle, Color::WHITE, 1.0));
        let far = sink.attach(Layer::Swarm, style(ShapeKind::Circle, Color::WHITE, 1.0));
        sink.place(far, Pose::translate(Vec2::new(-500.0, 900.0)));
        assert!(sink.render().pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn sdf_signs() {
        assert!(rounded_box_sdf(Vec2::ZERO, 10.0, 2.0) < 0.0);
        assert!(rounded_box_sdf(Vec2::new(20.0, 0.0), 10.0, 2.0) > 0.0);
        assert!((rounded_box_sdf(Vec2::new(10.0, 0.0), 10.0, 2.0)).abs() < 1e-5);
    }
}
