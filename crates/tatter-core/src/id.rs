//! Destruction session identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one destruction session from trigger to completion signal.
///
/// Ids are handed out by the controller that runs the session, starting at 1,
/// so two controllers fed the same triggers produce the same ids. Every
/// session event carries one, which lets hosts tell a stale `Finished` from a
/// fresh one.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-controller id allocator
#[derive(Debug, Clone)]
pub struct SessionIds {
    next: u64,
}

impl Default for SessionIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl SessionIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next id. Never returns the same id twice.
    pub fn allocate(&mut self) -> SessionId {
        let id = SessionId(self.next);
        self.next = self.next.wrapping_add(1).max(1);
        id
    }
}
