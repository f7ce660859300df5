//! Particle state and the swap-remove pool that owns it

use glam::Vec2;
use tatter_core::Color;

/// Particles smaller than this are culled
pub const MIN_SIZE: f32 = 0.1;

/// Per-tick shrink and vertical damping applied to sparks
pub const SPARK_DAMPING: f32 = 0.95;

/// Amplitude of the sideways ash drift, in px per tick
const ASH_SWAY: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleKind {
    /// Small ember that slows and shrinks as it rises
    Spark,
    /// Upward tongue of fire, drawn as a teardrop
    Flame,
    /// Grey flake that drifts sideways; `alpha` tracks remaining life
    Ash { alpha: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Remaining life in [0, 1+], removed at zero
    pub life: f32,
    pub size: f32,
    pub color: [u8; 3],
}

impl Particle {
    pub fn is_ash(&self) -> bool {
        matches!(self.kind, ParticleKind::Ash { .. })
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0 && self.size > MIN_SIZE
    }

    /// Advance one tick. `phase` is wall-clock time in units of 200 ms.
    pub fn integrate(&mut self, phase: f32, decay: f32) {
        self.position += self.velocity;
        self.life = (self.life - decay).max(0.0);

        match &mut self.kind {
            ParticleKind::Spark => {
                self.velocity.y *= SPARK_DAMPING;
                self.size *= SPARK_DAMPING;
            }
            ParticleKind::Flame => {}
            ParticleKind::Ash { alpha } => {
                self.position.x += (phase + self.position.y * 0.01).sin() * ASH_SWAY;
                *alpha = self.life;
            }
        }
    }

    /// Fill colour with the kind's alpha applied
    pub fn draw_color(&self) -> Color {
        let alpha = match self.kind {
            ParticleKind::Ash { alpha } => alpha,
            _ => self.life,
        };
        let [r, g, b] = self.color;
        Color::rgba8(r, g, b, alpha.clamp(0.0, 1.0))
    }
}

/// Swap-remove pool for O(1) particle kill and contiguous alive iteration.
pub struct ParticlePool {
    particles: Vec<Particle>,
    capacity: usize,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn alive_count(&self) -> usize {
        self.particles.len()
    }

    /// Add a particle. Returns false if the pool is full.
    pub fn spawn(&mut self, particle: Particle) -> bool {
        if self.particles.len() >= self.capacity {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Kill expired particles via swap-remove.
    pub fn update_and_compact(&mut self) {
        let mut i = 0;
        while i < self.particles.len() {
            if self.particles[i].is_alive() {
                i += 1;
            } else {
                // Don't increment i: the swapped-in particle needs checking
                self.particles.swap_remove(i);
            }
        }
    }

    pub fn alive_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn alive_slice_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
