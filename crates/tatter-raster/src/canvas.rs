//! Software rasterizer implementing [`Surface`]
//!
//! Coverage is sampled once at each pixel centre (no anti-aliasing) and
//! textures are sampled nearest-neighbour. That is plenty for previewing
//! destruction frames and for pixel-level tests of the composite rules.

use glam::{Affine2, Vec2};
use std::path::Path;
use tatter_core::{Color, Rect, Result};

use crate::composite::CompositeOp;
use crate::surface::{RadialGradient, Surface};
use crate::texture::{RasterImage, Rgba};

type Premul = [f32; 4];

const CLEAR: Premul = [0.0; 4];

#[derive(Clone)]
struct DrawState {
    transform: Affine2,
    alpha: f32,
    op: CompositeOp,
    shadow_blur: f32,
    shadow_color: Color,
    /// Clip polygons already mapped to device space
    clips: Vec<Vec<Vec2>>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            alpha: 1.0,
            op: CompositeOp::SourceOver,
            shadow_blur: 0.0,
            shadow_color: Color::TRANSPARENT,
            clips: Vec::new(),
        }
    }
}

/// Half-open pixel rectangle
#[derive(Clone, Copy, Debug)]
struct PixelBounds {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

/// In-memory premultiplied RGBA drawing surface
pub struct Canvas {
    width: u32,
    height: u32,
    /// Layer 0 is the visible surface; `begin_layer` pushes off-screen layers
    layers: Vec<Vec<Premul>>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            layers: vec![vec![CLEAR; width as usize * height as usize]],
            state: DrawState::default(),
            stack: Vec::new(),
        }
    }

    /// Pixel of the visible layer
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) as usize;
        Some(Rgba::from_premultiplied(self.layers[0][idx]))
    }

    /// Snapshot the visible layer as a straight-alpha image
    pub fn to_image(&self) -> RasterImage {
        let pixels = self.layers[0]
            .iter()
            .map(|p| Rgba::from_premultiplied(*p))
            .collect();
        RasterImage::from_pixels(self.width, self.height, pixels)
            .unwrap_or_else(|_| RasterImage::new(self.width, self.height))
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_image().save_png(path)
    }

    /// Number of off-screen layers currently open
    pub fn open_layers(&self) -> usize {
        self.layers.len() - 1
    }

    fn inverse_transform(&self) -> Option<Affine2> {
        let det = self.state.transform.matrix2.determinant();
        if det.is_finite() && det.abs() > 1e-12 {
            Some(self.state.transform.inverse())
        } else {
            None
        }
    }

    /// Device-space bounds of a user-space box under the current transform
    fn user_bounds(&self, min: Vec2, max: Vec2) -> Option<PixelBounds> {
        let t = self.state.transform;
        let corners = [
            t.transform_point2(min),
            t.transform_point2(Vec2::new(max.x, min.y)),
            t.transform_point2(max),
            t.transform_point2(Vec2::new(min.x, max.y)),
        ];
        self.device_bounds(&corners, 0.0)
    }

    fn device_bounds(&self, points: &[Vec2], pad: f32) -> Option<PixelBounds> {
        let mut lo = Vec2::splat(f32::INFINITY);
        let mut hi = Vec2::splat(f32::NEG_INFINITY);
        for p in points {
            if !p.is_finite() {
                return None;
            }
            lo = lo.min(*p);
            hi = hi.max(*p);
        }
        let x0 = (lo.x - pad).floor().max(0.0);
        let y0 = (lo.y - pad).floor().max(0.0);
        let x1 = (hi.x + pad).ceil().min(self.width as f32);
        let y1 = (hi.y + pad).ceil().min(self.height as f32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(PixelBounds {
            x0: x0 as usize,
            y0: y0 as usize,
            x1: x1 as usize,
            y1: y1 as usize,
        })
    }

    /// Run `shader` over every unclipped pixel centre in `bounds` and blend
    /// its premultiplied output into the current layer.
    fn paint<F>(&mut self, bounds: PixelBounds, shader: F)
    where
        F: Fn(Vec2) -> Option<Premul>,
    {
        let width = self.width as usize;
        let Canvas { layers, state, .. } = self;
        let alpha = state.alpha.clamp(0.0, 1.0);
        let op = state.op;
        let Some(layer) = layers.last_mut() else {
            return;
        };
        for y in bounds.y0..bounds.y1 {
            for x in bounds.x0..bounds.x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if !state.clips.iter().all(|clip| point_in_polygon(p, clip)) {
                    continue;
                }
                if let Some(src) = shader(p) {
                    let idx = y * width + x;
                    layer[idx] = op.blend(scale(src, alpha), layer[idx]);
                }
            }
        }
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Color) {
        let Some(inv) = self.inverse_transform() else {
            return;
        };
        let Some(bounds) = self.user_bounds(center - Vec2::splat(radius), center + Vec2::splat(radius))
        else {
            return;
        };
        let src = premultiply(color);
        let r2 = radius * radius;
        self.paint(bounds, |p| {
            (inv.transform_point2(p).distance_squared(center) <= r2).then_some(src)
        });
    }

    fn fill_gradient(&mut self, gradient: &RadialGradient) {
        let outer = gradient.outer_radius;
        if !(outer.is_finite() && outer > 0.0) {
            return;
        }
        let Some(inv) = self.inverse_transform() else {
            return;
        };
        let c = gradient.center;
        let Some(bounds) = self.user_bounds(c - Vec2::splat(outer), c + Vec2::splat(outer)) else {
            return;
        };
        self.paint(bounds, |p| {
            let d = inv.transform_point2(p).distance(c);
            (d <= outer).then(|| premultiply(gradient.color_at(d)))
        });
    }
}

impl Surface for Canvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.fill(CLEAR);
        }
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.state.transform = self.state.transform * Affine2::from_translation(offset);
    }

    fn rotate(&mut self, radians: f32) {
        self.state.transform = self.state.transform * Affine2::from_angle(radians);
    }

    fn scale(&mut self, factor: f32) {
        self.state.transform = self.state.transform * Affine2::from_scale(Vec2::splat(factor));
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() {
            self.state.alpha = alpha.clamp(0.0, 1.0);
        }
    }

    fn set_composite(&mut self, op: CompositeOp) {
        self.state.op = op;
    }

    fn set_shadow(&mut self, blur: f32, color: Color) {
        self.state.shadow_blur = if blur.is_finite() { blur.max(0.0) } else { 0.0 };
        self.state.shadow_color = color;
    }

    fn clip_polygon(&mut self, points: &[Vec2]) {
        let t = self.state.transform;
        let device = if points.len() >= 3 {
            points.iter().map(|p| t.transform_point2(*p)).collect()
        } else {
            // Degenerate clip path: nothing stays visible
            Vec::new()
        };
        self.state.clips.push(device);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill_polygon(&rect.corners(), color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if !(radius.is_finite() && radius > 0.0) {
            return;
        }
        let blur = self.state.shadow_blur;
        let shadow = self.state.shadow_color;
        if blur > 0.0 && shadow.a > 0.0 {
            let halo = RadialGradient::new(center, radius, radius + blur)
                .with_stop(0.0, shadow)
                .with_stop(1.0, shadow.with_alpha(0.0));
            self.fill_gradient(&halo);
        }
        self.fill_disc(center, radius, color);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 {
            return;
        }
        let t = self.state.transform;
        let device: Vec<Vec2> = points.iter().map(|p| t.transform_point2(*p)).collect();
        let Some(bounds) = self.device_bounds(&device, 0.0) else {
            return;
        };
        let src = premultiply(color);
        self.paint(bounds, |p| point_in_polygon(p, &device).then_some(src));
    }

    fn fill_radial_gradient(&mut self, gradient: &RadialGradient) {
        self.fill_gradient(gradient);
    }

    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Color) {
        if points.len() < 2 || !(width.is_finite() && width > 0.0) {
            return;
        }
        let t = self.state.transform;
        let device: Vec<Vec2> = points.iter().map(|p| t.transform_point2(*p)).collect();
        let half = width * 0.5 * t.matrix2.x_axis.length();
        let Some(bounds) = self.device_bounds(&device, half) else {
            return;
        };
        let src = premultiply(color);
        self.paint(bounds, |p| {
            device
                .windows(2)
                .any(|seg| distance_to_segment(p, seg[0], seg[1]) <= half)
                .then_some(src)
        });
    }

    fn draw_image(&mut self, image: &RasterImage, dest: Rect) {
        if image.width() == 0 || image.height() == 0 || dest.width <= 0.0 || dest.height <= 0.0 {
            return;
        }
        let Some(inv) = self.inverse_transform() else {
            return;
        };
        let Some(bounds) = self.user_bounds(dest.origin(), dest.origin() + dest.size()) else {
            return;
        };
        let (iw, ih) = (image.width(), image.height());
        self.paint(bounds, |p| {
            let u = inv.transform_point2(p);
            if u.x < dest.left() || u.x >= dest.right() || u.y < dest.top() || u.y >= dest.bottom() {
                return None;
            }
            let sx = (((u.x - dest.x) / dest.width) * iw as f32) as u32;
            let sy = (((u.y - dest.y) / dest.height) * ih as f32) as u32;
            let px = image.get(sx.min(iw - 1), sy.min(ih - 1))?;
            (px.a > 0).then(|| px.premultiplied())
        });
    }

    fn begin_layer(&mut self) {
        self.layers
            .push(vec![CLEAR; self.width as usize * self.height as usize]);
    }

    fn end_layer(&mut self, op: CompositeOp, alpha: f32) {
        if self.layers.len() < 2 {
            return;
        }
        let Some(top) = self.layers.pop() else {
            return;
        };
        let alpha = if alpha.is_finite() { alpha.clamp(0.0, 1.0) } else { 0.0 };
        let width = self.width as usize;
        let Canvas { layers, state, .. } = self;
        let Some(below) = layers.last_mut() else {
            return;
        };
        for (idx, src) in top.iter().enumerate() {
            if src[3] <= 0.0 {
                continue;
            }
            let p = Vec2::new((idx % width) as f32 + 0.5, (idx / width) as f32 + 0.5);
            if !state.clips.iter().all(|clip| point_in_polygon(p, clip)) {
                continue;
            }
            below[idx] = op.blend(scale(*src, alpha), below[idx]);
        }
    }
}

fn premultiply(c: Color) -> Premul {
    let a = c.a.clamp(0.0, 1.0);
    [c.r * a, c.g * a, c.b * a, a]
}

fn scale(p: Premul, k: f32) -> Premul {
    [p[0] * k, p[1] * k, p[2] * k, p[3] * k]
}

/// Even-odd point in polygon test
fn point_in_polygon(p: Vec2, poly: &[Vec2]) -> bool {
    if poly.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let (a, b) = (poly[i], poly[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
