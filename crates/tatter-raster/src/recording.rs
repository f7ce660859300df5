//! Command-recording surface for headless tests

use glam::{Affine2, Vec2};
use tatter_core::{Color, Rect};

use crate::composite::CompositeOp;
use crate::surface::{RadialGradient, Surface};
use crate::texture::RasterImage;

/// Draw state in effect when a command was recorded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintState {
    pub op: CompositeOp,
    pub alpha: f32,
    pub transform: Affine2,
    pub shadow_blur: f32,
    /// Number of clip polygons active
    pub clip_depth: usize,
    /// Number of off-screen layers open
    pub layer_depth: usize,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            op: CompositeOp::SourceOver,
            alpha: 1.0,
            transform: Affine2::IDENTITY,
            shadow_blur: 0.0,
            clip_depth: 0,
            layer_depth: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    ClipPolygon {
        points: Vec<Vec2>,
    },
    FillRect {
        rect: Rect,
        color: Color,
        paint: PaintState,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
        paint: PaintState,
    },
    FillPolygon {
        points: Vec<Vec2>,
        color: Color,
        paint: PaintState,
    },
    FillRadialGradient {
        gradient: RadialGradient,
        paint: PaintState,
    },
    StrokePolyline {
        points: Vec<Vec2>,
        width: f32,
        color: Color,
        paint: PaintState,
    },
    DrawImage {
        dest: Rect,
        size: (u32, u32),
        paint: PaintState,
    },
    BeginLayer,
    EndLayer {
        op: CompositeOp,
        alpha: f32,
    },
}

impl DrawCommand {
    /// Paint state of a drawing command, `None` for state-only commands
    pub fn paint(&self) -> Option<&PaintState> {
        match self {
            DrawCommand::FillRect { paint, .. }
            | DrawCommand::FillCircle { paint, .. }
            | DrawCommand::FillPolygon { paint, .. }
            | DrawCommand::FillRadialGradient { paint, .. }
            | DrawCommand::StrokePolyline { paint, .. }
            | DrawCommand::DrawImage { paint, .. } => Some(paint),
            _ => None,
        }
    }
}

/// A surface that paints nothing and remembers everything
pub struct RecordingSurface {
    width: u32,
    height: u32,
    state: PaintState,
    stack: Vec<PaintState>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            state: PaintState::default(),
            stack: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the log empty
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Depth of the save/restore stack (0 when balanced)
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn layer_depth(&self) -> usize {
        self.state.layer_depth
    }

    fn record(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.record(DrawCommand::Clear);
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            // Layers are not part of the saved state
            let layer_depth = self.state.layer_depth;
            self.state = state;
            self.state.layer_depth = layer_depth;
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

    fn set_shadow(&mut self, blur: f32, _color: Color) {
        self.state.shadow_blur = blur.max(0.0);
    }

    fn clip_polygon(&mut self, points: &[Vec2]) {
        self.state.clip_depth += 1;
        self.record(DrawCommand::ClipPolygon {
            points: points.to_vec(),
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let paint = self.state;
        self.record(DrawCommand::FillRect { rect, color, paint });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let paint = self.state;
        self.record(DrawCommand::FillCircle {
            center,
            radius,
            color,
            paint,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        let paint = self.state;
        self.record(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
            paint,
        });
    }

    fn fill_radial_gradient(&mut self, gradient: &RadialGradient) {
        let paint = self.state;
        self.record(DrawCommand::FillRadialGradient {
            gradient: gradient.clone(),
            paint,
        });
    }

    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Color) {
        let paint = self.state;
        self.record(DrawCommand::StrokePolyline {
            points: points.to_vec(),
            width,
            color,
            paint,
        });
    }

    fn draw_image(&mut self, image: &RasterImage, dest: Rect) {
        let paint = self.state;
        self.record(DrawCommand::DrawImage {
            dest,
            size: (image.width(), image.height()),
            paint,
        });
    }

    fn begin_layer(&mut self) {
        self.state.layer_depth += 1;
        self.record(DrawCommand::BeginLayer);
    }

    fn end_layer(&mut self, op: CompositeOp, alpha: f32) {
        self.state.layer_depth = self.state.layer_depth.saturating_sub(1);
        self.record(DrawCommand::EndLayer { op, alpha });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_state_with_each_command() {
        let mut surface = RecordingSurface::new(100, 100);
        surface.save();
        surface.set_composite(CompositeOp::DestinationOut);
        surface.set_global_alpha(0.25);
        surface.fill_circle(Vec2::new(5.0, 5.0), 3.0, Color::BLACK);
        surface.restore();
        surface.fill_circle(Vec2::new(5.0, 5.0), 3.0, Color::BLACK);

        let cmds = surface.commands();
        assert_eq!(cmds.len(), 2);
        let first = cmds[0].paint().unwrap();
        assert_eq!(first.op, CompositeOp::DestinationOut);
        assert!((first.alpha - 0.25).abs() < 1e-6);
        let second = cmds[1].paint().unwrap();
        assert_eq!(second.op, CompositeOp::SourceOver);
        assert_eq!(surface.save_depth(), 0);
    }

    #[test]
    fn tracks_layer_depth() {
        let mut surface = RecordingSurface::new(10, 10);
        surface.begin_layer();
        surface.fill_rect(Rect::from_size(1.0, 1.0), Color::WHITE);
        surface.end_layer(CompositeOp::SourceAtop, 1.0);
        let cmds = surface.take();
        assert_eq!(cmds[1].paint().unwrap().layer_depth, 1);
        assert_eq!(surface.layer_depth(), 0);
        assert!(surface.commands().is_empty());
    }
}
