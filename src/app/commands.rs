//! Inbound commands to the counting core.
//!
//! The receiver controls the node with one-character payloads.  Only the
//! first byte is inspected; everything after it is ignored.

use super::state::CounterState;

/// Commands a receiver can send to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `'R'`: zero both counters and the elapsed timer, then report.
    Reset,
    /// `'Q'`: report the current values unchanged.
    Query,
}

impl Command {
    /// Decode a payload.  Empty or unrecognised payloads yield `None`;
    /// they are not an error.
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        match payload.first()? {
            b'R' => Some(Self::Reset),
            b'Q' => Some(Self::Query),
            _ => None,
        }
    }

    /// Apply the command to `state`.  Both commands flag a report.
    pub fn apply(self, state: &mut CounterState) {
        match self {
            Self::Reset => state.reset(),
            Self::Query => state.request_report(),
        }
    }
}
