//! Spawn presets: value ranges sampled into fresh particles

use glam::Vec2;

use crate::particle::{Particle, ParticleKind};
use crate::rand::ParticleRng;

/// How a particle's RGB colour is chosen at spawn time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorRule {
    Fixed([u8; 3]),
    /// Red and blue fixed, green sampled from `[min, max)`
    GreenRange { red: u8, min: u8, max: u8, blue: u8 },
}

impl ColorRule {
    fn sample(&self, rng: &mut ParticleRng) -> [u8; 3] {
        match *self {
            ColorRule::Fixed(rgb) => rgb,
            ColorRule::GreenRange {
                red,
                min,
                max,
                blue,
            } => {
                let g = rng.range(min as f32, max as f32).floor();
                [red, g.clamp(0.0, 255.0) as u8, blue]
            }
        }
    }
}

/// Ranges a particle is drawn from
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnSpec {
    pub kind: ParticleKind,
    pub velocity_x: (f32, f32),
    pub velocity_y: (f32, f32),
    pub life: (f32, f32),
    pub size: (f32, f32),
    pub color: ColorRule,
}

impl SpawnSpec {
    pub fn spark() -> Self {
        Self {
            kind: ParticleKind::Spark,
            velocity_x: (-1.0, 1.0),
            velocity_y: (-4.0, -1.0),
            life: (0.5, 1.0),
            size: (1.0, 3.0),
            color: ColorRule::GreenRange {
                red: 255,
                min: 0,
                max: 200,
                blue: 0,
            },
        }
    }

    pub fn flame() -> Self {
        Self {
            kind: ParticleKind::Flame,
            velocity_x: (-0.5, 0.5),
            velocity_y: (-7.0, -3.0),
            life: (0.3, 0.7),
            size: (6.0, 15.0),
            color: ColorRule::GreenRange {
                red: 255,
                min: 100,
                max: 200,
                blue: 0,
            },
        }
    }

    pub fn ash() -> Self {
        Self {
            kind: ParticleKind::Ash { alpha: 1.0 },
            velocity_x: (-3.0, -1.0),
            velocity_y: (-2.0, -0.5),
            life: (1.0, 2.0),
            size: (2.0, 4.0),
            color: ColorRule::Fixed([80, 80, 80]),
        }
    }

    /// Sparks thrown outward in every direction from a tap
    pub fn ignition_burst() -> Self {
        Self {
            velocity_x: (-2.5, 2.5),
            velocity_y: (-2.5, 2.5),
            size: (3.0, 8.0),
            ..Self::spark()
        }
    }

    pub fn sample(&self, rng: &mut ParticleRng, position: Vec2) -> Particle {
        let velocity = Vec2::new(
            rng.range(self.velocity_x.0, self.velocity_x.1),
            rng.range(self.velocity_y.0, self.velocity_y.1),
        );
        let life = rng.range(self.life.0, self.life.1);
        let kind = match self.kind {
            ParticleKind::Ash { .. } => ParticleKind::Ash { alpha: life.min(1.0) },
            other => other,
        };
        Particle {
            kind,
            position,
            velocity,
            life,
            size: rng.range(self.size.0, self.size.1),
            color: self.color.sample(rng),
        }
    }
}
