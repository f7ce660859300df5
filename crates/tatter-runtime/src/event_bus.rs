//! Session event queue

use std::collections::HashSet;

use tatter_core::SessionId;

use crate::event::SessionEvent;

/// Events raised by the controller, drained by the host once per frame.
///
/// A session ends exactly once: after its `Finished` or `Cancelled` has been
/// queued, every later event for that session is dropped.
#[derive(Default)]
pub struct EventBus {
    events: Vec<SessionEvent>,
    closed: HashSet<SessionId>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event`. Returns false if its session already ended.
    pub fn push(&mut self, event: SessionEvent) -> bool {
        let session = event.session();
        if self.closed.contains(&session) {
            log::warn!("Dropping {event:?}, session {session} already ended");
            return false;
        }
        if event.is_terminal() {
            self.closed.insert(session);
        }
        self.events.push(event);
        true
    }

    /// Take every queued event, oldest first
    pub fn drain(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tatter_core::DestroyMode;

    fn finished(raw: u64) -> SessionEvent {
        SessionEvent::Finished {
            session: SessionId::from_raw(raw),
            mode: DestroyMode::Tear,
        }
    }

    #[test]
    fn drain_returns_events_in_order_and_empties() {
        let mut bus = EventBus::new();
        let session = SessionId::from_raw(1);
        assert!(bus.push(SessionEvent::Haptic { session }));
        assert!(bus.push(finished(1)));

        let events = bus.drain();
        assert_eq!(events, vec![SessionEvent::Haptic { session }, finished(1)]);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn a_session_ends_only_once() {
        let mut bus = EventBus::new();
        let session = SessionId::from_raw(3);
        assert!(bus.push(finished(3)));
        assert!(!bus.push(finished(3)));
        assert!(!bus.push(SessionEvent::Cancelled { session }));
        assert!(!bus.push(SessionEvent::Haptic { session }));
        assert_eq!(bus.drain(), vec![finished(3)]);

        // Still closed after draining
        assert!(!bus.push(finished(3)));
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn other_sessions_are_unaffected() {
        let mut bus = EventBus::new();
        bus.push(SessionEvent::Cancelled {
            session: SessionId::from_raw(1),
        });
        assert!(bus.push(SessionEvent::Started {
            session: SessionId::from_raw(2),
            mode: DestroyMode::Burn,
        }));
        assert!(bus.push(finished(2)));
        assert_eq!(bus.drain().len(), 3);
    }
}
