//! Tear: straight cuts chip pieces off the card until it collapses

use glam::Vec2;
use log::{debug, trace};
use tatter_core::{Color, DestroyMode, Rect, Result, TatterError, TearConfig};
use tatter_geometry::Polygon;
use tatter_particles::ParticleRng;
use tatter_raster::{RasterImage, Surface};
use tatter_runtime::{PointerEvent, StrokeTracker};

use crate::engine::{Engine, EngineStats, Feedback};

const STROKE_WIDTH: f32 = 2.0;

/// A detached fragment falling under gravity
#[derive(Debug, Clone, PartialEq)]
pub struct Shard {
    /// Outline relative to `position`
    pub vertices: Vec<Vec2>,
    pub position: Vec2,
    pub velocity: Vec2,
    pub angle: f32,
    pub angular_velocity: f32,
    /// Where the shard's centre sat on the card, for texture alignment
    pub origin: Vec2,
}

pub struct TearEngine {
    rect: Rect,
    config: TearConfig,
    original_area: f32,
    floor: f32,
    polygons: Vec<Polygon>,
    shards: Vec<Shard>,
    stroke: StrokeTracker,
    rng: ParticleRng,
}

impl TearEngine {
    /// `viewport_height` is where shards leave the screen
    pub fn new(rect: Rect, viewport_height: f32, config: TearConfig, rng: ParticleRng) -> Self {
        let floor = viewport_height + config.offscreen_margin;
        Self {
            rect,
            original_area: rect.area(),
            floor,
            config,
            polygons: vec![Polygon::from_rect(&rect)],
            shards: Vec::new(),
            stroke: StrokeTracker::new(),
            rng,
        }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn shards(&self) -> &[Shard] {
        &self.shards
    }

    pub fn remaining_area(&self) -> f32 {
        self.polygons.iter().map(Polygon::area).sum()
    }

    /// Cut every piece along `a-b`. Returns the number of shards detached.
    ///
    /// Chords shorter than the configured minimum are ignored. Pieces the
    /// chord does not cross exactly twice are left whole.
    pub fn cut(&mut self, a: Vec2, b: Vec2) -> usize {
        if (b - a).length_squared() < self.config.min_cut_length_sq {
            trace!("Cut ignored, too short");
            return 0;
        }

        let mut detached = 0;
        let mut kept = Vec::with_capacity(self.polygons.len());
        for polygon in std::mem::take(&mut self.polygons) {
            match polygon.split(a, b) {
                Ok((first, second)) => {
                    let (shard, keep) = if first.area() < second.area() {
                        (first, second)
                    } else {
                        (second, first)
                    };
                    let fall = self.rng.range(2.0, 7.0);
                    self.detach(shard, fall);
                    kept.push(keep);
                    detached += 1;
                }
                Err(TatterError::DegenerateSplit { crossings }) => {
                    trace!("Piece left whole, cut crossed {crossings} edge(s)");
                    kept.push(polygon);
                }
                Err(TatterError::SliverPiece { area }) => {
                    trace!("Piece left whole, cut would chip {area:.2} px^2");
                    kept.push(polygon);
                }
                Err(err) => {
                    trace!("Piece left whole: {err}");
                    kept.push(polygon);
                }
            }
        }
        self.polygons = kept;
        self.collapse_if_small();
        detached
    }

    fn detach(&mut self, polygon: Polygon, fall_speed: f32) {
        let center = polygon.centroid();
        self.shards.push(Shard {
            vertices: polygon.relative_to(center),
            position: center,
            velocity: Vec2::new((self.rng.next_f32() - 0.5) * 5.0, fall_speed),
            angle: 0.0,
            angular_velocity: (self.rng.next_f32() - 0.5) * 0.2,
            origin: center,
        });
    }

    /// Drop every remaining piece once too little of the card is left
    fn collapse_if_small(&mut self) {
        if self.polygons.is_empty() {
            return;
        }
        let remaining = self.remaining_area();
        if remaining >= self.original_area * self.config.collapse_ratio {
            return;
        }
        debug!(
            "Tear collapsing {} piece(s), {:.0}% of the card left",
            self.polygons.len(),
            remaining / self.original_area * 100.0
        );
        for polygon in std::mem::take(&mut self.polygons) {
            let fall = self.rng.range(5.0, 10.0);
            self.detach(polygon, fall);
        }
    }
}

impl Engine for TearEngine {
    fn mode(&self) -> DestroyMode {
        DestroyMode::Tear
    }

    fn update(&mut self, _dt_ms: f64) -> Result<()> {
        let gravity = self.config.gravity;
        for shard in &mut self.shards {
            shard.position += shard.velocity;
            shard.angle += shard.angular_velocity;
            shard.velocity.y += gravity;
        }
        if let Some(shard) = self.shards.iter().find(|s| !s.position.is_finite()) {
            return Err(TatterError::NonFinite(format!(
                "shard position {}",
                shard.position
            )));
        }
        let floor = self.floor;
        self.shards.retain(|s| s.position.y <= floor);

        self.collapse_if_small();
        Ok(())
    }

    fn draw(&self, surface: &mut dyn Surface, card: &RasterImage, opacity: f32) {
        surface.save();
        surface.set_global_alpha(opacity);

        for polygon in &self.polygons {
            surface.save();
            surface.clip_polygon(polygon.points());
            surface.draw_image(card, self.rect);
            surface.restore();
        }

        for shard in &self.shards {
            surface.save();
            surface.translate(shard.position);
            surface.rotate(shard.angle);
            surface.clip_polygon(&shard.vertices);
            // Card placed so the shard's original centre lands on the local origin
            let dest = Rect::new(
                self.rect.x - shard.origin.x,
                self.rect.y - shard.origin.y,
                self.rect.width,
                self.rect.height,
            );
            surface.draw_image(card, dest);
            surface.restore();
        }

        let stroke = self.stroke.points();
        if stroke.len() > 1 {
            surface.stroke_polyline(stroke, STROKE_WIDTH, Color::RED);
        }
        surface.restore();
    }

    fn is_complete(&self) -> bool {
        self.polygons.is_empty() && self.shards.is_empty()
    }

    fn handle_pointer(&mut self, event: &PointerEvent) -> Result<Feedback> {
        let Some((a, b)) = self.stroke.feed(event) else {
            return Ok(Feedback::None);
        };
        if self.cut(a, b) > 0 {
            Ok(Feedback::Haptic)
        } else {
            Ok(Feedback::None)
        }
    }

    fn stats(&self) -> EngineStats {
        EngineStats {
            polygons: self.polygons.len(),
            shards: self.shards.len(),
            scale: 1.0,
            ..EngineStats::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tatter_raster::{DrawCommand, RecordingSurface};

    fn engine() -> TearEngine {
        TearEngine::new(
            Rect::new(0.0, 0.0, 300.0, 400.0),
            600.0,
            TearConfig::default(),
            ParticleRng::new(17),
        )
    }

    #[test]
    fn center_cut_detaches_one_half() {
        let mut tear = engine();
        let detached = tear.cut(Vec2::new(-10.0, 200.0), Vec2::new(310.0, 200.0));
        assert_eq!(detached, 1);
        assert_eq!(tear.polygons().len(), 1);
        assert_eq!(tear.shards().len(), 1);
        assert!((tear.remaining_area() - 60_000.0).abs() < 600.0);

        let shard = &tear.shards()[0];
        assert_eq!(shard.position, shard.origin);
        assert!(shard.velocity.y >= 2.0 && shard.velocity.y < 7.0);
    }

    #[test]
    fn smaller_piece_becomes_the_shard() {
        let mut tear = engine();
        tear.cut(Vec2::new(-10.0, 100.0), Vec2::new(310.0, 100.0));
        assert!((tear.remaining_area() - 90_000.0).abs() < 1.0);
        // Top strip's centre
        assert!((tear.shards()[0].origin.y - 50.0).abs() < 1e-3);
    }

    #[test]
    fn short_or_interior_cuts_do_nothing() {
        let mut tear = engine();
        assert_eq!(tear.cut(Vec2::new(10.0, 10.0), Vec2::new(15.0, 15.0)), 0);
        assert_eq!(tear.cut(Vec2::new(50.0, 50.0), Vec2::new(250.0, 50.0)), 0);
        assert_eq!(tear.polygons().len(), 1);
        assert!(tear.shards().is_empty());
    }

    #[test]
    fn corner_grazing_cut_leaves_the_card_whole() {
        let mut tear = engine();
        assert_eq!(tear.cut(Vec2::new(-20.0, 20.5), Vec2::new(20.5, -20.0)), 0);
        assert_eq!(tear.polygons().len(), 1);
        assert!(tear.shards().is_empty());
        assert!((tear.remaining_area() - 120_000.0).abs() < 1e-2);
    }

    #[test]
    fn collapse_happens_in_the_cutting_tick() {
        let mut tear = engine();
        let mut y = 100.0;
        while !tear.polygons().is_empty() {
            assert!(y < 400.0, "never collapsed");
            tear.cut(Vec2::new(-10.0, y), Vec2::new(310.0, y));
            let remaining = tear.remaining_area();
            assert!(tear.polygons().is_empty() || remaining >= 120_000.0 * 0.3);
            y += 60.0;
        }
        assert!(!tear.shards().is_empty());
    }

    #[test]
    fn finishes_after_shards_fall_off_screen() {
        let mut tear = engine();
        tear.cut(Vec2::new(-10.0, 100.0), Vec2::new(310.0, 100.0));
        tear.cut(Vec2::new(-10.0, 300.0), Vec2::new(310.0, 300.0));
        tear.cut(Vec2::new(100.0, -10.0), Vec2::new(100.0, 410.0));
        tear.cut(Vec2::new(200.0, -10.0), Vec2::new(200.0, 410.0));

        let mut ticks = 0;
        while !tear.is_complete() {
            tear.update(16.0).unwrap();
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert!(tear.polygons().is_empty());
    }

    #[test]
    fn stroke_end_cuts_and_requests_haptic() {
        let mut tear = engine();
        let events = [
            PointerEvent::start(Vec2::new(-20.0, 150.0), 0.0),
            PointerEvent::moved(Vec2::new(100.0, 180.0), 16.0),
            PointerEvent::moved(Vec2::new(200.0, 120.0), 32.0),
        ];
        for event in &events {
            assert_eq!(tear.handle_pointer(event).unwrap(), Feedback::None);
        }
        let end = PointerEvent::end(Vec2::new(320.0, 150.0), 48.0);
        assert_eq!(tear.handle_pointer(&end).unwrap(), Feedback::Haptic);
        assert_eq!(tear.shards().len(), 1);
    }

    #[test]
    fn draws_pieces_then_shards_then_stroke() {
        let mut tear = engine();
        tear.cut(Vec2::new(-10.0, 100.0), Vec2::new(310.0, 100.0));
        tear.handle_pointer(&PointerEvent::start(Vec2::new(5.0, 5.0), 0.0))
            .unwrap();
        tear.handle_pointer(&PointerEvent::moved(Vec2::new(25.0, 5.0), 10.0))
            .unwrap();

        let mut surface = RecordingSurface::new(300, 600);
        tear.draw(&mut surface, &RasterImage::new(300, 400), 1.0);
        let images: Vec<&DrawCommand> = surface
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::DrawImage { .. }))
            .collect();
        assert_eq!(images.len(), 2);

        // Kept piece draws the card in place, the shard offsets it by its origin
        match (images[0], images[1]) {
            (
                DrawCommand::DrawImage { dest: kept, .. },
                DrawCommand::DrawImage { dest: shard, .. },
            ) => {
                assert_eq!(kept.origin(), Vec2::ZERO);
                assert!((shard.y - -50.0).abs() < 1e-3);
            }
            _ => unreachable!(),
        }
        assert!(matches!(
            surface.commands().last(),
            Some(DrawCommand::StrokePolyline { color, width, .. }) if *color == Color::RED && *width == 2.0
        ));
        assert_eq!(surface.save_depth(), 0);
    }
}
