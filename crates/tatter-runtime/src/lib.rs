//! Tatter Runtime - Frame loop infrastructure
//!
//! Provides the building blocks the destruction controller is driven by:
//! - `FrameClock` - turns host refresh timestamps into clamped frame deltas
//! - `SessionEvent` / `EventBus` - typed event queue drained by the host
//! - `SessionState` - the Idle → Active → Finishing → Done lifecycle
//! - `PointerEvent`, `StrokeTracker`, `DragTracker` - touch input shaping

mod clock;
mod event;
mod event_bus;
mod input;
mod state;

pub use clock::FrameClock;
pub use event::SessionEvent;
pub use event_bus::EventBus;
pub use input::{DragTracker, PointerEvent, PointerPhase, StrokeTracker};
pub use state::SessionState;
