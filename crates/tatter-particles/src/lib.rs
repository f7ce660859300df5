//! Tatter Particles - short-lived point sprites for the burn effect
//!
//! Provides pooled particle simulation with:
//! - Per-tick position/life integration with kind-specific modifiers
//! - Swap-remove particle pool with a hard capacity
//! - Spawn presets for sparks, flames, and ash
//! - Two-pass drawing: additive glow for fire, normal blending for ash

pub mod curves;
pub mod emitter;
pub mod particle;
pub mod rand;

use glam::Vec2;
use tatter_core::Color;
use tatter_raster::{CompositeOp, Surface};

pub use emitter::{ColorRule, SpawnSpec};
pub use particle::{Particle, ParticleKind, ParticlePool};
pub use rand::ParticleRng;

/// Shadow blur per unit of particle size for the fire glow
const GLOW_PER_SIZE: f32 = 1.5;

/// Segments used for the rounded bottom of a flame teardrop
const FLAME_ARC_SEGMENTS: usize = 8;

/// The particle system: one pool plus spawn, integrate, and draw passes.
pub struct ParticleSystem {
    pool: ParticlePool,
}

impl ParticleSystem {
    pub fn new(capacity: usize) -> Self {
        Self {
            pool: ParticlePool::new(capacity),
        }
    }

    /// Spawn one particle sampled from `spec`. Returns false when the pool is full.
    pub fn spawn(&mut self, rng: &mut ParticleRng, spec: &SpawnSpec, position: Vec2) -> bool {
        self.pool.spawn(spec.sample(rng, position))
    }

    /// Advance every particle one tick and drop the expired ones.
    ///
    /// `time_ms` drives the ash sway; `decay` is subtracted from each life.
    pub fn update(&mut self, time_ms: f64, decay: f32) {
        let phase = (time_ms / 200.0) as f32;
        for p in self.pool.alive_slice_mut() {
            p.integrate(phase, decay);
        }
        self.pool.update_and_compact();
    }

    /// Draw fire additively with glow, then ash on top with normal blending.
    pub fn draw(&self, surface: &mut dyn Surface, opacity: f32) {
        surface.save();
        surface.set_composite(CompositeOp::Lighter);
        surface.set_global_alpha(opacity);
        for p in self.pool.alive_slice().iter().filter(|p| !p.is_ash()) {
            let color = p.draw_color();
            surface.set_shadow(p.size * GLOW_PER_SIZE, color);
            match p.kind {
                ParticleKind::Flame => surface.fill_polygon(&flame_outline(p), color),
                _ => surface.fill_circle(p.position, p.size, color),
            }
        }
        surface.set_shadow(0.0, Color::TRANSPARENT);
        surface.restore();

        // Ash last so the fire glow never covers it
        surface.save();
        surface.set_composite(CompositeOp::SourceOver);
        surface.set_global_alpha(opacity);
        for p in self.pool.alive_slice().iter().filter(|p| p.is_ash()) {
            surface.fill_circle(p.position, p.size, p.draw_color());
        }
        surface.restore();
    }

    pub fn len(&self) -> usize {
        self.pool.alive_count()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.alive_count() == 0
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub fn particles(&self) -> &[Particle] {
        self.pool.alive_slice()
    }

    /// Release every particle (session cancelled or finished)
    pub fn clear(&mut self) {
        self.pool.clear();
    }
}

/// Teardrop: a point `size` above the particle and a half-disc below it
fn flame_outline(p: &Particle) -> Vec<Vec2> {
    let r = p.size * 0.5;
    let mut points = Vec::with_capacity(FLAME_ARC_SEGMENTS + 2);
    points.push(p.position - Vec2::new(0.0, p.size));
    for i in 0..=FLAME_ARC_SEGMENTS {
        let a = std::f32::consts::PI * i as f32 / FLAME_ARC_SEGMENTS as f32;
        points.push(p.position + Vec2::new(a.cos(), a.sin()) * r);
    }
    points
}
