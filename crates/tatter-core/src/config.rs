//! Tunable simulation constants, loadable from TOML
//!
//! The thresholds here (burn area factor, tear collapse ratio, crush scale
//! ladder) were tuned by feel rather than derived from a model, so they are
//! exposed as parameters instead of being baked into the engines.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TatterError};

/// Burn engine constants. Times are in milliseconds, distances in logical pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnConfig {
    pub max_duration_ms: f64,
    pub fade_out_ms: f64,
    pub hard_stop_margin_ms: f64,
    /// New holes stop appearing after this much elapsed time
    pub spawn_cutoff_ms: f64,
    pub spawn_probability: f32,
    pub max_holes: usize,
    /// Burn counts as complete when summed hole disc area exceeds `area_factor * card area`
    pub area_factor: f32,
    pub initial_holes_min: u32,
    pub initial_holes_max: u32,
    pub growth_min: f32,
    pub growth_max: f32,
    /// Hole radius cap as a multiple of the card's longer side
    pub max_radius_factor: f32,
    pub glow_width: f32,
    pub emit_probability: f32,
    pub max_edge_particles: u32,
    /// Extra margin around the card that still accepts ignition taps
    pub tap_slack: f32,
}

impl Default for BurnConfig {
    fn default() -> Self {
        Self {
            max_duration_ms: 4000.0,
            fade_out_ms: 500.0,
            hard_stop_margin_ms: 1000.0,
            spawn_cutoff_ms: 3000.0,
            spawn_probability: 0.05,
            max_holes: 48,
            area_factor: 1.5,
            initial_holes_min: 3,
            initial_holes_max: 5,
            growth_min: 0.3,
            growth_max: 0.8,
            max_radius_factor: 1.5,
            glow_width: 20.0,
            emit_probability: 0.4,
            max_edge_particles: 24,
            tap_slack: 20.0,
        }
    }
}

impl BurnConfig {
    /// Latest elapsed time at which the burn is forced to `Done`
    pub fn hard_stop_ms(&self) -> f64 {
        self.max_duration_ms + self.fade_out_ms + self.hard_stop_margin_ms
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TearConfig {
    /// Remaining polygons collapse into shards below this fraction of the card area
    pub collapse_ratio: f32,
    /// Strokes whose chord length squared is below this are treated as taps
    pub min_cut_length_sq: f32,
    pub gravity: f32,
    /// Shards are dropped once they fall this far below the surface
    pub offscreen_margin: f32,
}

impl Default for TearConfig {
    fn default() -> Self {
        Self {
            collapse_ratio: 0.3,
            min_cut_length_sq: 100.0,
            gravity: 0.5,
            offscreen_margin: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrushConfig {
    /// Target scale indexed by tap count; its length fixes the tap limit
    pub scales: Vec<f32>,
    pub smoothing: f32,
    /// Release speed (px/ms) above which the crumpled card is thrown
    pub throw_speed_threshold: f32,
    pub throw_amplify: f32,
    pub gravity: f32,
    pub recede_factor: f32,
    pub complete_scale: f32,
}

impl Default for CrushConfig {
    fn default() -> Self {
        Self {
            scales: vec![1.0, 0.8, 0.6, 0.4, 0.3],
            smoothing: 0.1,
            throw_speed_threshold: 0.5,
            throw_amplify: 20.0,
            gravity: 1.0,
            recede_factor: 0.95,
            complete_scale: 0.2,
        }
    }
}

impl CrushConfig {
    /// Number of taps before the card can be thrown
    pub fn max_taps(&self) -> usize {
        self.scales.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub capacity: usize,
    pub burning_decay: f32,
    pub fading_decay: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            capacity: 4096,
            burning_decay: 0.02,
            fading_decay: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Opacity removed per tick during the burn fade tail
    pub fade_tail_step: f32,
    /// Frame deltas are clamped to this to survive long stalls
    pub max_frame_ms: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fade_tail_step: 0.05,
            max_frame_ms: 250.0,
        }
    }
}

/// Top-level configuration for all destruction engines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DestroyConfig {
    pub burn: BurnConfig,
    pub tear: TearConfig,
    pub crush: CrushConfig,
    pub particles: ParticleConfig,
    pub session: SessionConfig,
}

impl DestroyConfig {
    /// Parse and validate a configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: DestroyConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values that would stall a session or poison it with NaN
    pub fn validate(&self) -> Result<()> {
        let b = &self.burn;
        positive("burn.max_duration_ms", b.max_duration_ms)?;
        positive("burn.fade_out_ms", b.fade_out_ms)?;
        non_negative("burn.hard_stop_margin_ms", b.hard_stop_margin_ms)?;
        non_negative("burn.spawn_cutoff_ms", b.spawn_cutoff_ms)?;
        unit("burn.spawn_probability", b.spawn_probability)?;
        unit("burn.emit_probability", b.emit_probability)?;
        positive("burn.area_factor", b.area_factor as f64)?;
        positive("burn.max_radius_factor", b.max_radius_factor as f64)?;
        non_negative("burn.growth_min", b.growth_min as f64)?;
        non_negative("burn.glow_width", b.glow_width as f64)?;
        non_negative("burn.tap_slack", b.tap_slack as f64)?;
        if b.growth_max < b.growth_min {
            return Err(TatterError::Config(
                "burn.growth_max must be >= burn.growth_min".into(),
            ));
        }
        if b.initial_holes_min == 0 || b.initial_holes_max < b.initial_holes_min {
            return Err(TatterError::Config(
                "burn.initial_holes_min must be >= 1 and <= burn.initial_holes_max".into(),
            ));
        }
        if b.initial_holes_max as usize > b.max_holes {
            return Err(TatterError::Config(format!(
                "burn.initial_holes_max ({}) exceeds burn.max_holes ({})",
                b.initial_holes_max, b.max_holes
            )));
        }

        let t = &self.tear;
        if !(t.collapse_ratio > 0.0 && t.collapse_ratio < 1.0) {
            return Err(TatterError::Config(format!(
                "tear.collapse_ratio must be in (0, 1), got {}",
                t.collapse_ratio
            )));
        }
        non_negative("tear.min_cut_length_sq", t.min_cut_length_sq as f64)?;
        positive("tear.gravity", t.gravity as f64)?;
        non_negative("tear.offscreen_margin", t.offscreen_margin as f64)?;

        let c = &self.crush;
        if c.scales.len() < 2 {
            return Err(TatterError::Config(
                "crush.scales needs at least two entries".into(),
            ));
        }
        for (i, s) in c.scales.iter().enumerate() {
            positive(&format!("crush.scales[{i}]"), *s as f64)?;
        }
        unit("crush.smoothing", c.smoothing)?;
        non_negative("crush.throw_speed_threshold", c.throw_speed_threshold as f64)?;
        positive("crush.throw_amplify", c.throw_amplify as f64)?;
        if !(c.recede_factor > 0.0 && c.recede_factor < 1.0) {
            return Err(TatterError::Config(format!(
                "crush.recede_factor must be in (0, 1), got {}",
                c.recede_factor
            )));
        }
        positive("crush.complete_scale", c.complete_scale as f64)?;

        let p = &self.particles;
        if p.capacity == 0 {
            return Err(TatterError::Config("particles.capacity must be > 0".into()));
        }
        positive("particles.burning_decay", p.burning_decay as f64)?;
        positive("particles.fading_decay", p.fading_decay as f64)?;

        let s = &self.session;
        if !(s.fade_tail_step > 0.0 && s.fade_tail_step <= 1.0) {
            return Err(TatterError::Config(format!(
                "session.fade_tail_step must be in (0, 1], got {}",
                s.fade_tail_step
            )));
        }
        positive("session.max_frame_ms", s.max_frame_ms)?;
        Ok(())
    }
}

fn positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TatterError::Config(format!("{field} must be > 0, got {value}")))
    }
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TatterError::Config(format!("{field} must be >= 0, got {value}")))
    }
}

fn unit(field: &str, value: f32) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TatterError::Config(format!(
            "{field} must be in [0, 1], got {value}"
        )))
    }
}
