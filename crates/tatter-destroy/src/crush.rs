//! Crush: taps crumple the card into a ball, a fast flick throws it away

use glam::Vec2;
use log::debug;
use tatter_core::{Color, CrushConfig, DestroyMode, Rect, Result, TatterError};
use tatter_raster::{CompositeOp, RasterImage, Surface};
use tatter_runtime::{DragTracker, PointerEvent, PointerPhase};

use crate::engine::{Engine, EngineStats, Feedback};

/// Scale changes smaller than this are not eased further
const SETTLE_EPSILON: f32 = 0.001;

pub struct CrushEngine {
    rect: Rect,
    config: CrushConfig,
    taps: usize,
    scale: f32,
    offset: Vec2,
    velocity: Vec2,
    thrown: bool,
    drag: DragTracker,
    drag_start_offset: Vec2,
}

impl CrushEngine {
    pub fn new(rect: Rect, config: CrushConfig) -> Self {
        Self {
            rect,
            config,
            taps: 0,
            scale: 1.0,
            offset: Vec2::ZERO,
            velocity: Vec2::ZERO,
            thrown: false,
            drag: DragTracker::new(),
            drag_start_offset: Vec2::ZERO,
        }
    }

    pub fn taps(&self) -> usize {
        self.taps
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn is_thrown(&self) -> bool {
        self.thrown
    }

    /// Scale the crumple is easing toward
    pub fn target_scale(&self) -> f32 {
        let last = self.config.scales.len().saturating_sub(1);
        self.config
            .scales
            .get(self.taps.min(last))
            .copied()
            .unwrap_or(1.0)
    }

    fn fully_crumpled(&self) -> bool {
        self.taps >= self.config.max_taps()
    }

    /// One crumple step. Returns false once the card is fully crumpled.
    pub fn tap(&mut self) -> bool {
        if self.fully_crumpled() {
            return false;
        }
        self.taps += 1;
        true
    }

    /// Release the ball with a flick; below the speed threshold nothing happens
    pub fn throw(&mut self, direction: Vec2, speed: f32) -> bool {
        if self.thrown || !self.fully_crumpled() || speed <= self.config.throw_speed_threshold {
            return false;
        }
        self.velocity = direction * speed * self.config.throw_amplify;
        self.thrown = true;
        debug!(
            "Crush thrown at {:.2} px/ms, velocity {}",
            speed, self.velocity
        );
        true
    }
}

impl Engine for CrushEngine {
    fn mode(&self) -> DestroyMode {
        DestroyMode::Crush
    }

    fn update(&mut self, _dt_ms: f64) -> Result<()> {
        if self.thrown {
            self.offset += self.velocity;
            self.scale = (self.scale * self.config.recede_factor).max(0.0);
            self.velocity.y += self.config.gravity;
        } else {
            let diff = self.target_scale() - self.scale;
            if diff.abs() > SETTLE_EPSILON {
                self.scale += diff * self.config.smoothing;
            }
        }

        if !(self.scale.is_finite() && self.offset.is_finite()) {
            return Err(TatterError::NonFinite(format!(
                "crush scale {} offset {}",
                self.scale, self.offset
            )));
        }
        Ok(())
    }

    fn draw(&self, surface: &mut dyn Surface, card: &RasterImage, opacity: f32) {
        let (w, h) = (self.rect.width, self.rect.height);
        let local = Rect::new(-w / 2.0, -h / 2.0, w, h);

        surface.save();
        surface.set_global_alpha(opacity);
        surface.translate(self.rect.center() + self.offset);
        surface.scale(self.scale);
        surface.draw_image(card, local);

        if self.taps > 0 {
            let strength = self.taps as f32;
            surface.set_composite(CompositeOp::SourceAtop);
            surface.fill_rect(local, Color::BLACK.with_alpha(0.1 * strength));

            let crease = Color::BLACK.with_alpha((0.15 * strength).min(1.0));
            surface.stroke_polyline(
                &[Vec2::new(-w / 3.0, -h / 3.0), Vec2::new(w / 3.0, h / 4.0)],
                2.0,
                crease,
            );
            surface.stroke_polyline(
                &[Vec2::new(w / 4.0, -h / 2.0), Vec2::new(-w / 4.0, h / 3.0)],
                2.0,
                crease,
            );
        }
        surface.restore();
    }

    fn is_complete(&self) -> bool {
        self.thrown && self.scale < self.config.complete_scale
    }

    fn handle_pointer(&mut self, event: &PointerEvent) -> Result<Feedback> {
        if self.thrown {
            return Ok(Feedback::None);
        }
        match event.phase {
            PointerPhase::Start if !self.fully_crumpled() => {
                self.tap();
                return Ok(Feedback::Haptic);
            }
            PointerPhase::Start => {
                self.drag.begin(event.position, event.timestamp_ms);
                self.drag_start_offset = self.offset;
            }
            PointerPhase::Move => {
                if let Some(moved) = self.drag.update(event.position, event.timestamp_ms) {
                    self.offset = self.drag_start_offset + moved;
                }
            }
            PointerPhase::End => {
                if let Some((direction, speed)) =
                    self.drag.release(event.position, event.timestamp_ms)
                {
                    self.throw(direction, speed);
                }
            }
        }
        Ok(Feedback::None)
    }

    fn stats(&self) -> EngineStats {
        EngineStats {
            scale: self.scale,
            ..EngineStats::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tatter_raster::{DrawCommand, RecordingSurface};

    fn engine() -> CrushEngine {
        CrushEngine::new(Rect::new(0.0, 0.0, 300.0, 400.0), CrushConfig::default())
    }

    fn tap(crush: &mut CrushEngine) -> Feedback {
        crush
            .handle_pointer(&PointerEvent::start(Vec2::new(150.0, 200.0), 0.0))
            .unwrap()
    }

    #[test]
    fn taps_walk_the_scale_ladder() {
        let mut crush = engine();
        let mut targets = vec![crush.target_scale()];
        for _ in 0..4 {
            assert_eq!(tap(&mut crush), Feedback::Haptic);
            targets.push(crush.target_scale());
        }
        assert_eq!(targets, vec![1.0, 0.8, 0.6, 0.4, 0.3]);

        // Saturated: a fifth press starts a drag instead
        assert_eq!(tap(&mut crush), Feedback::None);
        assert_eq!(crush.taps(), 4);
    }

    #[test]
    fn scale_eases_toward_target() {
        let mut crush = engine();
        tap(&mut crush);
        crush.update(16.0).unwrap();
        assert!((crush.scale() - 0.98).abs() < 1e-6);
        for _ in 0..200 {
            crush.update(16.0).unwrap();
        }
        assert!((crush.scale() - 0.8).abs() < 0.011);
        assert!(!crush.is_complete());
    }

    fn crumple(crush: &mut CrushEngine) {
        for _ in 0..4 {
            tap(crush);
        }
    }

    #[test]
    fn slow_release_does_not_throw() {
        let mut crush = engine();
        crumple(&mut crush);
        crush
            .handle_pointer(&PointerEvent::start(Vec2::new(150.0, 200.0), 0.0))
            .unwrap();
        crush
            .handle_pointer(&PointerEvent::moved(Vec2::new(160.0, 200.0), 100.0))
            .unwrap();
        // 2 px over 20 ms = 0.1 px/ms
        crush
            .handle_pointer(&PointerEvent::end(Vec2::new(162.0, 200.0), 120.0))
            .unwrap();
        assert!(!crush.is_thrown());
        assert_eq!(crush.offset(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn fast_release_throws_and_recedes() {
        let mut crush = engine();
        crumple(&mut crush);
        crush
            .handle_pointer(&PointerEvent::start(Vec2::new(150.0, 200.0), 0.0))
            .unwrap();
        crush
            .handle_pointer(&PointerEvent::moved(Vec2::new(150.0, 180.0), 16.0))
            .unwrap();
        // 30 px over 10 ms = 3 px/ms upward
        crush
            .handle_pointer(&PointerEvent::end(Vec2::new(150.0, 150.0), 26.0))
            .unwrap();
        assert!(crush.is_thrown());
        assert!((crush.velocity() - Vec2::new(0.0, -60.0)).length() < 1e-3);

        let before = crush.scale();
        crush.update(16.0).unwrap();
        assert!((crush.scale() - before * 0.95).abs() < 1e-6);
        assert!((crush.velocity().y - -59.0).abs() < 1e-4);

        let mut ticks = 1;
        while !crush.is_complete() {
            crush.update(16.0).unwrap();
            ticks += 1;
            assert!(ticks < 200);
        }
        assert!(crush.scale() < 0.2);
    }

    #[test]
    fn throw_requires_full_crumple() {
        let mut crush = engine();
        tap(&mut crush);
        assert!(!crush.throw(Vec2::X, 5.0));
        crumple(&mut crush);
        assert!(crush.throw(Vec2::X, 5.0));
        assert!(!crush.throw(Vec2::Y, 5.0));
        assert_eq!(crush.velocity(), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn wrinkles_scale_with_taps() {
        let mut crush = engine();
        crumple(&mut crush);
        let mut surface = RecordingSurface::new(300, 400);
        crush.draw(&mut surface, &RasterImage::new(300, 400), 1.0);

        let commands = surface.commands();
        assert!(matches!(
            commands[0],
            DrawCommand::DrawImage { paint, .. } if paint.op == CompositeOp::SourceOver
        ));
        match &commands[1] {
            DrawCommand::FillRect { color, paint, .. } => {
                assert_eq!(paint.op, CompositeOp::SourceAtop);
                assert!((color.a - 0.4).abs() < 1e-6);
            }
            other => panic!("expected wrinkle fill, got {other:?}"),
        }
        let creases = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokePolyline { .. }))
            .count();
        assert_eq!(creases, 2);
    }

    #[test]
    fn faded_wrinkles_take_opacity_only_from_global_alpha() {
        let mut crush = engine();
        crumple(&mut crush);
        let mut surface = RecordingSurface::new(300, 400);
        crush.draw(&mut surface, &RasterImage::new(300, 400), 0.5);

        for command in surface.commands().iter().skip(1) {
            match command {
                DrawCommand::FillRect { color, paint, .. } => {
                    assert!((paint.alpha - 0.5).abs() < 1e-6);
                    assert!((color.a - 0.4).abs() < 1e-6);
                }
                DrawCommand::StrokePolyline { color, paint, .. } => {
                    assert!((paint.alpha - 0.5).abs() < 1e-6);
                    assert!((color.a - 0.6).abs() < 1e-6);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn uncrumpled_card_has_no_wrinkles() {
        let crush = engine();
        let mut surface = RecordingSurface::new(300, 400);
        crush.draw(&mut surface, &RasterImage::new(300, 400), 1.0);
        assert_eq!(surface.commands().len(), 1);
    }
}
