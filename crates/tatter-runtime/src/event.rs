//! Session events

use serde::{Deserialize, Serialize};
use tatter_core::{DestroyMode, SessionId};

/// Notifications the controller emits for the host to act on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A session was created and its first frame is scheduled
    Started { session: SessionId, mode: DestroyMode },
    /// Short vibration feedback (trigger, crumple tap, torn-off shard)
    Haptic { session: SessionId },
    /// The animation completed (or was forced to stop); emitted exactly once per session
    Finished { session: SessionId, mode: DestroyMode },
    /// The host cancelled the session before it finished
    Cancelled { session: SessionId },
}

impl SessionEvent {
    pub fn session(&self) -> SessionId {
        match *self {
            SessionEvent::Started { session, .. }
            | SessionEvent::Haptic { session }
            | SessionEvent::Finished { session, .. }
            | SessionEvent::Cancelled { session } => session,
        }
    }

    /// Finished and Cancelled end a session; at most one is ever delivered
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionEvent::Finished { .. } | SessionEvent::Cancelled { .. }
        )
    }
}
