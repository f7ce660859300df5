//! The engine trait shared by every destruction mode

use serde::Serialize;
use tatter_core::{DestroyMode, Result};
use tatter_raster::{RasterImage, Surface};
use tatter_runtime::PointerEvent;

/// What the host should do in response to a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feedback {
    #[default]
    None,
    /// Fire a short vibration
    Haptic,
}

/// Snapshot of an engine's live object counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EngineStats {
    pub particles: usize,
    pub holes: usize,
    pub polygons: usize,
    pub shards: usize,
    pub scale: f32,
}

/// A mode-specific destruction simulation.
///
/// `update` advances state by one frame, `draw` renders the current state
/// without mutating it. The controller calls them in that order every tick.
pub trait Engine {
    fn mode(&self) -> DestroyMode;

    /// Advance one frame. `dt_ms` drives elapsed-time decisions only;
    /// motion is integrated per tick.
    fn update(&mut self, dt_ms: f64) -> Result<()>;

    /// Render onto `surface`. `opacity` multiplies everything except hole cuts.
    fn draw(&self, surface: &mut dyn Surface, card: &RasterImage, opacity: f32);

    fn is_complete(&self) -> bool;

    /// Route a pointer event. Modes that take no input ignore it.
    fn handle_pointer(&mut self, event: &PointerEvent) -> Result<Feedback>;

    /// Whether the controller should redraw with decreasing opacity after completion
    fn wants_fade_tail(&self) -> bool {
        false
    }

    fn stats(&self) -> EngineStats;
}
