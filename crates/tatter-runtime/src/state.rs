//! Session lifecycle state machine.
//!
//! A session moves `Idle → Active → Finishing → Done`. `Finishing` is the
//! optional fade tail; `Active → Done` skips it. `Done` is terminal and every
//! other edge is rejected so a late tick can never resurrect a finished session.

use std::fmt;

/// Lifecycle of one destruction session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Created, card not yet snapshotted
    #[default]
    Idle,
    /// Engine is simulating and drawing every frame
    Active,
    /// Engine reported completion; the fade tail is running
    Finishing,
    /// Completion signalled; engine state released
    Done,
}

impl SessionState {
    /// Whether `self → next` is a legal edge
    pub fn can_transition(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Idle, Active) | (Idle, Done) | (Active, Finishing) | (Active, Done) | (Finishing, Done)
        )
    }

    /// Move to `next` if legal. Returns false (and stays put) otherwise.
    pub fn transition(&mut self, next: SessionState) -> bool {
        if self.can_transition(next) {
            log::trace!("session state {self} -> {next}");
            *self = next;
            true
        } else {
            false
        }
    }

}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Active => "active",
            SessionState::Finishing => "finishing",
            SessionState::Done => "done",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_starts_idle() {
        let state = SessionState::default();
        assert_eq!(state, SessionState::Idle);
        assert!(!state.can_transition(SessionState::Finishing));
    }

    #[test]
    fn full_lifecycle_with_fade_tail() {
        let mut state = SessionState::Idle;
        assert!(state.transition(SessionState::Active));
        assert!(state.transition(SessionState::Finishing));
        assert_eq!(state, SessionState::Finishing);
        assert!(state.transition(SessionState::Done));
        assert_eq!(state, SessionState::Done);
    }

    #[test]
    fn active_can_finish_directly() {
        let mut state = SessionState::Active;
        assert!(state.transition(SessionState::Done));
    }

    #[test]
    fn done_is_terminal() {
        let mut state = SessionState::Done;
        assert!(!state.transition(SessionState::Active));
        assert!(!state.transition(SessionState::Finishing));
        assert_eq!(state, SessionState::Done);
    }

    #[test]
    fn cannot_skip_back() {
        let mut state = SessionState::Finishing;
        assert!(!state.transition(SessionState::Active));
        assert_eq!(state, SessionState::Finishing);
    }
}
