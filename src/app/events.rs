//! Outbound application events.
//!
//! The [`CounterService`](super::service::CounterService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Inputs the
//! core deliberately ignores (unknown payloads, duplicates, failed
//! enqueues) still produce an event here, so tests and logs can see them.

use crate::events::Origin;

use super::codec::ReportFrame;
use super::commands::Command;
use super::ports::RadioError;
use super::state::Line;

/// Structured events emitted by the counting core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service handled the startup event.
    Started,

    /// An asserted edge was counted.
    Counted { line: Line, total: u32 },

    /// A reset or query command was applied.
    CommandApplied { origin: Origin, command: Command },

    /// An accepted frame carried no recognised command.
    PayloadIgnored { origin: Origin, first_byte: Option<u8> },

    /// A repeat of the last accepted frame was dropped.
    DuplicateDropped { origin: Origin, seq: u8 },

    /// A report was handed to the radio.
    ReportSent { seq: u8, payload: ReportFrame },

    /// The radio refused the report.
    EnqueueFailed { seq: u8, error: RadioError },

    /// The radio finished a transmission (informational only).
    TransmitComplete { ok: bool },
}

/// Running tallies of link activity since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub reports_sent: u32,
    pub enqueue_failures: u32,
    pub frames_accepted: u32,
    pub duplicates_dropped: u32,
    pub payloads_ignored: u32,
    pub commands_applied: u32,
    pub tx_complete_ok: u32,
    pub tx_complete_failed: u32,
}
