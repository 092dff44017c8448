//! Receive deduplicator.
//!
//! Broadcast links re-send a frame on their own retry policy, so the same
//! command can arrive several times back to back.  A frame is a duplicate
//! when its (origin, sequence) pair equals that of the most recently
//! *accepted* frame.  Only one pair is remembered: A5, B1, A5 accepts all
//! three.

use crate::events::Origin;

/// Verdict for one inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Duplicate,
}

/// Identity of the last accepted inbound frame.
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    last: Option<(Origin, u8)>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a frame and remember it when accepted.
    pub fn check(&mut self, origin: Origin, seq: u8) -> Verdict {
        if self.last == Some((origin, seq)) {
            return Verdict::Duplicate;
        }
        self.last = Some((origin, seq));
        Verdict::Accept
    }

    pub fn last_accepted(&self) -> Option<(Origin, u8)> {
        self.last
    }
}
