//! Burn: growing holes with glowing edges, fire particles, then a fade-out

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use log::debug;
use tatter_core::{BurnConfig, Color, DestroyMode, ParticleConfig, Rect, Result, TatterError};
use tatter_particles::curves::ramp_down;
use tatter_particles::{ParticleRng, ParticleSystem, SpawnSpec};
use tatter_raster::{CompositeOp, RadialGradient, RasterImage, Surface};
use tatter_runtime::{PointerEvent, PointerPhase};

use crate::engine::{Engine, EngineStats, Feedback};

/// Holes past this radius grow progressively slower
const SLOWDOWN_RADIUS: f32 = 50.0;
const SLOWDOWN_FACTOR: f32 = 0.995;

/// Edge particle candidates per px of circumference
const EDGE_DENSITY: f32 = 1.3 / 10.0;
/// Chance each candidate actually spawns
const EDGE_SURVIVAL: f32 = 0.15;

const TAP_SPARKS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurnPhase {
    Igniting,
    Burning,
    FadingOut,
    Done,
}

/// A growing circular cut, in card-local coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Hole {
    pub position: Vec2,
    pub radius: f32,
    pub growth: f32,
    pub max_radius: f32,
}

impl Hole {
    pub fn area(&self) -> f32 {
        PI * self.radius * self.radius
    }

    /// Grow by `growth + noise`, never shrinking and never past `max_radius`
    fn grow(&mut self, noise: f32) {
        if self.radius >= self.max_radius {
            return;
        }
        self.radius = (self.radius + (self.growth + noise).max(0.0)).min(self.max_radius);
        if self.radius > SLOWDOWN_RADIUS {
            self.growth *= SLOWDOWN_FACTOR;
        }
    }
}

pub struct BurnEngine {
    rect: Rect,
    config: BurnConfig,
    decay: (f32, f32),
    phase: BurnPhase,
    elapsed_ms: f64,
    holes: Vec<Hole>,
    particles: ParticleSystem,
    rng: ParticleRng,
}

impl BurnEngine {
    pub fn new(
        rect: Rect,
        config: BurnConfig,
        particles: &ParticleConfig,
        rng: ParticleRng,
    ) -> Self {
        Self {
            rect,
            config,
            decay: (particles.burning_decay, particles.fading_decay),
            phase: BurnPhase::Igniting,
            elapsed_ms: 0.0,
            holes: Vec::new(),
            particles: ParticleSystem::new(particles.capacity),
            rng,
        }
    }

    pub fn phase(&self) -> BurnPhase {
        self.phase
    }

    pub fn holes(&self) -> &[Hole] {
        &self.holes
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Sum of hole disc areas, overlap ignored
    pub fn burnt_area(&self) -> f32 {
        self.holes.iter().map(Hole::area).sum()
    }

    fn max_radius(&self) -> f32 {
        self.rect.width.max(self.rect.height) * self.config.max_radius_factor
    }

    fn seed_hole(&mut self) {
        let position = self.rng.point_in(Vec2::ZERO, self.rect.size());
        let growth = self.rng.range(self.config.growth_min, self.config.growth_max);
        let max_radius = self.max_radius();
        self.holes.push(Hole {
            position,
            radius: 0.0,
            growth,
            max_radius,
        });
    }

    fn ignite(&mut self) {
        let count = self
            .rng
            .int_range(self.config.initial_holes_min, self.config.initial_holes_max);
        for _ in 0..count {
            self.seed_hole();
        }
        self.phase = BurnPhase::Burning;
        debug!("Burn ignited with {count} holes");
    }

    /// Seed a hole where the user tapped, with a burst of sparks
    pub fn ignite_at(&mut self, point: Vec2) -> Result<()> {
        let bounds = self.rect.expanded(self.config.tap_slack);
        if !bounds.contains(point) {
            return Err(TatterError::InputOutOfBounds {
                x: point.x,
                y: point.y,
            });
        }
        let growth = self.rng.range(0.5, 1.0);
        let max_radius = self.max_radius();
        self.holes.push(Hole {
            position: point - self.rect.origin(),
            radius: 1.0,
            growth,
            max_radius,
        });
        let burst = SpawnSpec::ignition_burst();
        for _ in 0..TAP_SPARKS {
            self.particles.spawn(&mut self.rng, &burst, point);
        }
        Ok(())
    }

    fn grow_holes(&mut self) {
        for hole in &mut self.holes {
            let noise = (self.rng.next_f32() - 0.2) * 0.5;
            hole.grow(noise);
        }
        if self.elapsed_ms < self.config.spawn_cutoff_ms
            && self.holes.len() < self.config.max_holes
            && self.rng.chance(self.config.spawn_probability)
        {
            self.seed_hole();
        }
    }

    /// Fire and ash along each hole's rim, only where the rim is over the card
    fn emit_edge_particles(&mut self) {
        let local = Rect::from_size(self.rect.width, self.rect.height);
        let origin = self.rect.origin();
        let (spark, flame, ash) = (SpawnSpec::spark(), SpawnSpec::flame(), SpawnSpec::ash());

        for i in 0..self.holes.len() {
            let (center, radius) = (self.holes[i].position, self.holes[i].radius);
            if radius <= 0.0 || !self.rng.chance(self.config.emit_probability) {
                continue;
            }
            let candidates = (TAU * radius * EDGE_DENSITY).floor() as u32;
            let mut emitted = 0;
            for _ in 0..candidates {
                if emitted >= self.config.max_edge_particles {
                    break;
                }
                if !self.rng.chance(EDGE_SURVIVAL) {
                    continue;
                }
                let angle = self.rng.angle();
                let point = center + Vec2::new(angle.cos(), angle.sin()) * radius;
                if !local.contains(point) {
                    continue;
                }
                let roll = self.rng.next_f32();
                let spec = if roll < 0.1 {
                    &ash
                } else if roll < 0.6 {
                    &spark
                } else {
                    &flame
                };
                self.particles.spawn(&mut self.rng, spec, origin + point);
                emitted += 1;
            }
        }
    }

    fn hard_stop_reached(&self) -> bool {
        self.elapsed_ms >= self.config.hard_stop_ms()
    }

    fn fade_over(&self) -> bool {
        self.elapsed_ms >= self.config.max_duration_ms + self.config.fade_out_ms
    }

    fn card_alpha(&self) -> f32 {
        ramp_down(
            self.elapsed_ms,
            self.config.max_duration_ms,
            self.config.fade_out_ms,
        )
    }
}

impl Engine for BurnEngine {
    fn mode(&self) -> DestroyMode {
        DestroyMode::Burn
    }

    fn update(&mut self, dt_ms: f64) -> Result<()> {
        if self.phase == BurnPhase::Done {
            return Ok(());
        }
        if self.phase == BurnPhase::Igniting {
            self.ignite();
        }
        self.elapsed_ms += dt_ms.max(0.0);

        if self.phase == BurnPhase::Burning && self.elapsed_ms >= self.config.max_duration_ms {
            self.phase = BurnPhase::FadingOut;
            debug!("Burn fading out after {:.0} ms", self.elapsed_ms);
        }

        let decay = match self.phase {
            BurnPhase::Burning => {
                self.grow_holes();
                self.emit_edge_particles();
                self.decay.0
            }
            _ => self.decay.1,
        };
        self.particles.update(self.elapsed_ms, decay);

        if let Some(hole) = self.holes.iter().find(|h| !h.radius.is_finite()) {
            return Err(TatterError::NonFinite(format!(
                "hole radius {} at {}",
                hole.radius, hole.position
            )));
        }

        let card_area = self.rect.area();
        let burnt_out = self.phase == BurnPhase::Burning
            && self.burnt_area() > card_area * self.config.area_factor;
        let faded =
            self.phase == BurnPhase::FadingOut && self.fade_over() && self.particles.is_empty();
        if burnt_out || faded || self.hard_stop_reached() {
            debug!(
                "Burn complete at {:.0} ms ({} holes, {} particles)",
                self.elapsed_ms,
                self.holes.len(),
                self.particles.len()
            );
            self.phase = BurnPhase::Done;
        }
        Ok(())
    }

    fn draw(&self, surface: &mut dyn Surface, card: &RasterImage, opacity: f32) {
        let card_alpha = opacity * self.card_alpha();
        if card_alpha > 0.0 {
            surface.save();
            surface.translate(self.rect.origin());

            surface.set_composite(CompositeOp::SourceOver);
            surface.set_global_alpha(card_alpha);
            surface.draw_image(card, Rect::from_size(self.rect.width, self.rect.height));

            // Glow is merged off-screen first so overlapping rims do not stack
            surface.begin_layer();
            surface.set_global_alpha(1.0);
            for hole in self.holes.iter().filter(|h| h.radius > 0.0) {
                surface.fill_radial_gradient(&glow(hole, self.config.glow_width));
            }
            surface.end_layer(CompositeOp::SourceAtop, card_alpha);

            // Cuts are always full strength
            surface.set_composite(CompositeOp::DestinationOut);
            surface.set_global_alpha(1.0);
            for hole in self.holes.iter().filter(|h| h.radius > 0.0) {
                surface.fill_circle(hole.position, hole.radius, Color::BLACK);
            }
            surface.restore();
        }

        self.particles.draw(surface, opacity);
    }

    fn is_complete(&self) -> bool {
        self.phase == BurnPhase::Done
    }

    fn handle_pointer(&mut self, event: &PointerEvent) -> Result<Feedback> {
        if event.phase != PointerPhase::Start || self.phase == BurnPhase::Done {
            return Ok(Feedback::None);
        }
        self.ignite_at(event.position)?;
        Ok(Feedback::None)
    }

    fn wants_fade_tail(&self) -> bool {
        true
    }

    fn stats(&self) -> EngineStats {
        EngineStats {
            particles: self.particles.len(),
            holes: self.holes.len(),
            scale: 1.0,
            ..EngineStats::default()
        }
    }
}

fn glow(hole: &Hole, width: f32) -> RadialGradient {
    RadialGradient::new(hole.position, hole.radius, hole.radius + width)
        .with_stop(0.0, Color::rgba8(255, 60, 0, 0.9))
        .with_stop(0.4, Color::rgba8(255, 120, 0, 0.6))
        .with_stop(1.0, Color::TRANSPARENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Affine2;
    use tatter_raster::{DrawCommand, RecordingSurface};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn engine(seed: u32) -> BurnEngine {
        BurnEngine::new(
            Rect::new(40.0, 60.0, 300.0, 400.0),
            BurnConfig::default(),
            &ParticleConfig::default(),
            ParticleRng::new(seed),
        )
    }

    fn card() -> RasterImage {
        RasterImage::new(300, 400)
    }

    #[test]
    fn ignition_seeds_three_to_five_holes() {
        for seed in 1..50 {
            let mut burn = engine(seed);
            assert_eq!(burn.phase(), BurnPhase::Igniting);
            burn.update(FRAME_MS).unwrap();
            // One extra hole may spawn on the first burning tick
            let n = burn.holes().len();
            assert!((3..=6).contains(&n), "seed {seed}: {n} holes");
            assert_eq!(burn.phase(), BurnPhase::Burning);
        }
    }

    #[test]
    fn radius_is_monotonic_and_bounded() {
        let mut burn = engine(11);
        let mut previous: Vec<f32> = Vec::new();
        for _ in 0..600 {
            burn.update(FRAME_MS).unwrap();
            for (hole, before) in burn.holes().iter().zip(&previous) {
                assert!(hole.radius >= *before);
                assert!(hole.radius <= hole.max_radius);
            }
            previous = burn.holes().iter().map(|h| h.radius).collect();
            if burn.is_complete() {
                break;
            }
        }
    }

    #[test]
    fn completes_within_hard_stop_for_any_seed() {
        let limit = BurnConfig::default().hard_stop_ms();
        for seed in 1..40 {
            let mut burn = engine(seed * 7919);
            let mut simulated = 0.0;
            while !burn.is_complete() {
                burn.update(FRAME_MS).unwrap();
                simulated += FRAME_MS;
                assert!(simulated <= limit + FRAME_MS, "seed {seed} overran");
            }
        }
    }

    #[test]
    fn completes_early_when_holes_cover_the_card() {
        let mut burn = engine(3);
        burn.update(FRAME_MS).unwrap();
        for hole in &mut burn.holes {
            hole.radius = 400.0;
        }
        burn.update(FRAME_MS).unwrap();
        assert!(burn.is_complete());
        assert!(burn.elapsed_ms() < 100.0);
    }

    #[test]
    fn fades_after_max_duration() {
        let mut burn = engine(5);
        burn.config.area_factor = f32::INFINITY;
        while burn.elapsed_ms() < 4000.0 {
            burn.update(FRAME_MS).unwrap();
        }
        assert!(matches!(burn.phase(), BurnPhase::FadingOut | BurnPhase::Done));
        let holes = burn.holes().len();
        burn.update(FRAME_MS).unwrap();
        assert_eq!(burn.holes().len(), holes);
        assert!(burn.card_alpha() < 1.0);
    }

    #[test]
    fn draw_order_card_glow_cut_particles() {
        let mut burn = engine(9);
        for _ in 0..30 {
            burn.update(FRAME_MS).unwrap();
        }
        assert!(!burn.particles().is_empty());

        let mut surface = RecordingSurface::new(400, 600);
        burn.draw(&mut surface, &card(), 1.0);
        let commands = surface.commands();

        let image = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::DrawImage { .. }))
            .unwrap();
        let layer = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::BeginLayer))
            .unwrap();
        let end = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::EndLayer { .. }))
            .unwrap();
        let first_cut = commands
            .iter()
            .position(|c| c.paint().is_some_and(|p| p.op == CompositeOp::DestinationOut))
            .unwrap();
        let first_particle = commands
            .iter()
            .position(|c| c.paint().is_some_and(|p| p.transform == Affine2::IDENTITY))
            .unwrap();

        assert!(image < layer && layer < end && end < first_cut && first_cut < first_particle);
        assert!(matches!(
            commands[end],
            DrawCommand::EndLayer {
                op: CompositeOp::SourceAtop,
                ..
            }
        ));
        // Glow happens only inside the layer
        for c in &commands[layer + 1..end] {
            assert!(matches!(c, DrawCommand::FillRadialGradient { .. }));
        }
    }

    #[test]
    fn cuts_stay_opaque_while_fading() {
        let mut burn = engine(21);
        burn.update(FRAME_MS).unwrap();
        burn.update(FRAME_MS).unwrap();

        let mut surface = RecordingSurface::new(400, 600);
        burn.draw(&mut surface, &card(), 0.3);
        let cuts: Vec<f32> = surface
            .commands()
            .iter()
            .filter_map(|c| c.paint())
            .filter(|p| p.op == CompositeOp::DestinationOut)
            .map(|p| p.alpha)
            .collect();
        assert!(!cuts.is_empty());
        assert!(cuts.iter().all(|a| *a == 1.0));

        let card_alpha = surface.commands().iter().find_map(|c| match c {
            DrawCommand::DrawImage { paint, .. } => Some(paint.alpha),
            _ => None,
        });
        assert_eq!(card_alpha, Some(0.3));
    }

    #[test]
    fn tap_ignites_inside_slack_only() {
        let mut burn = engine(4);
        burn.update(FRAME_MS).unwrap();
        let holes = burn.holes().len();

        let inside = PointerEvent::start(Vec2::new(30.0, 50.0), 0.0);
        assert_eq!(burn.handle_pointer(&inside).unwrap(), Feedback::None);
        assert_eq!(burn.holes().len(), holes + 1);
        let tapped = burn.holes().last().unwrap();
        assert_eq!(tapped.position, Vec2::new(-10.0, -10.0));
        assert_eq!(tapped.radius, 1.0);
        assert!(burn.particles().len() >= TAP_SPARKS);

        let outside = PointerEvent::start(Vec2::new(0.0, 0.0), 0.0);
        let err = burn.handle_pointer(&outside).unwrap_err();
        assert!(matches!(err, TatterError::InputOutOfBounds { .. }));
        assert_eq!(burn.holes().len(), holes + 1);
    }

    #[test]
    fn slowdown_past_fifty_pixels() {
        let mut hole = Hole {
            position: Vec2::ZERO,
            radius: 60.0,
            growth: 1.0,
            max_radius: 600.0,
        };
        hole.grow(0.0);
        assert_eq!(hole.radius, 61.0);
        assert!((hole.growth - 0.995).abs() < 1e-6);

        hole.radius = 599.5;
        hole.grow(0.0);
        assert_eq!(hole.radius, 600.0);
        hole.grow(0.4);
        assert_eq!(hole.radius, 600.0);
    }
}
