//! The drawing surface trait engines render through

use glam::Vec2;
use tatter_core::{Color, Rect};

use crate::composite::CompositeOp;
use crate::texture::RasterImage;

/// One color stop of a gradient, `offset` in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Concentric radial gradient filling the disc of `outer_radius`.
///
/// Offset 0 sits on the inner circle and offset 1 on the outer one; points
/// inside the inner circle take the first stop's color.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub stops: Vec<GradientStop>,
}

impl RadialGradient {
    pub fn new(center: Vec2, inner_radius: f32, outer_radius: f32) -> Self {
        Self {
            center,
            inner_radius,
            outer_radius,
            stops: Vec::new(),
        }
    }

    pub fn with_stop(mut self, offset: f32, color: Color) -> Self {
        self.stops.push(GradientStop::new(offset.clamp(0.0, 1.0), color));
        self
    }

    /// Straight-alpha color at distance `d` from the center
    pub fn color_at(&self, d: f32) -> Color {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Color::TRANSPARENT;
        };
        let span = self.outer_radius - self.inner_radius;
        let t = if span > f32::EPSILON {
            ((d - self.inner_radius) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let w = b.offset - a.offset;
                let k = if w > f32::EPSILON { (t - a.offset) / w } else { 1.0 };
                return Color::new(
                    a.color.r + (b.color.r - a.color.r) * k,
                    a.color.g + (b.color.g - a.color.g) * k,
                    a.color.b + (b.color.b - a.color.b) * k,
                    a.color.a + (b.color.a - a.color.a) * k,
                );
            }
        }
        last.color
    }
}

/// A 2D raster drawing surface with canvas-style state.
///
/// All geometry is in user space and passes through the current transform.
/// Fills use the current composite op and global alpha; `save`/`restore`
/// bracket transform, alpha, composite op, shadow and clip.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Erase every pixel to transparent
    fn clear(&mut self);

    fn save(&mut self);
    fn restore(&mut self);

    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, radians: f32);
    fn scale(&mut self, factor: f32);

    fn set_global_alpha(&mut self, alpha: f32);
    fn set_composite(&mut self, op: CompositeOp);
    /// Glow drawn under subsequent fills; `blur <= 0` disables it
    fn set_shadow(&mut self, blur: f32, color: Color);

    /// Intersect the clip region with a polygon
    fn clip_polygon(&mut self, points: &[Vec2]);

    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    fn fill_radial_gradient(&mut self, gradient: &RadialGradient);
    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Color);
    /// Draw `image` scaled into `dest`
    fn draw_image(&mut self, image: &RasterImage, dest: Rect);

    /// Redirect subsequent draws into a fresh transparent off-screen layer
    fn begin_layer(&mut self);
    /// Composite the top layer onto the one below as a single image
    fn end_layer(&mut self, op: CompositeOp, alpha: f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_interpolates_between_stops() {
        let g = RadialGradient::new(Vec2::ZERO, 10.0, 20.0)
            .with_stop(0.0, Color::new(1.0, 0.0, 0.0, 1.0))
            .with_stop(1.0, Color::new(0.0, 0.0, 0.0, 0.0));
        let mid = g.color_at(15.0);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert!((mid.a - 0.5).abs() < 1e-6);
        // Inside the inner circle pads with the first stop
        assert_eq!(g.color_at(2.0), Color::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(g.color_at(40.0).a, 0.0);
    }

    #[test]
    fn gradient_without_stops_is_transparent() {
        let g = RadialGradient::new(Vec2::ZERO, 0.0, 5.0);
        assert_eq!(g.color_at(1.0), Color::TRANSPARENT);
    }
}
