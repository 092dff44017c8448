//! Counter state: the single blackboard every handler reads and writes.
//!
//! Created once at boot, zeroed, and owned by the
//! [`CounterService`](super::service::CounterService) for the lifetime of
//! the process.  Only the sampler and the command handler mutate the
//! counters; only the transmitter touches `sequence`.

use super::sampler::LineState;

/// One of the two counted input lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    A,
    B,
}

impl Line {
    /// Bit position of this line inside a [`LineState`].
    pub const fn mask(self) -> u8 {
        match self {
            Self::A => 0b01,
            Self::B => 0b10,
        }
    }

    pub const ALL: [Line; 2] = [Line::A, Line::B];
}

/// The three reported values, frozen at the moment a report is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSnapshot {
    pub counter_a: u32,
    pub counter_b: u32,
    pub elapsed_seconds: u32,
}

/// Live counting state.
#[derive(Debug, Clone, Default)]
pub struct CounterState {
    pub(crate) counter_a: u32,
    pub(crate) counter_b: u32,
    pub(crate) elapsed_seconds: u32,
    /// Outgoing frame sequence; the low byte goes on the wire.
    pub(crate) sequence: u32,
    /// Most recent sample of both lines.
    pub(crate) last_sample: LineState,
    /// State changed since the last transmission.
    pub(crate) pending_send: bool,
}

impl CounterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            counter_a: self.counter_a,
            counter_b: self.counter_b,
            elapsed_seconds: self.elapsed_seconds,
        }
    }

    pub fn count(&self, line: Line) -> u32 {
        match line {
            Line::A => self.counter_a,
            Line::B => self.counter_b,
        }
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn last_sample(&self) -> LineState {
        self.last_sample
    }

    pub fn pending_send(&self) -> bool {
        self.pending_send
    }

    /// Count one asserted edge on `line` and flag a report.
    /// Returns the new total.
    pub(crate) fn record_edge(&mut self, line: Line) -> u32 {
        let counter = match line {
            Line::A => &mut self.counter_a,
            Line::B => &mut self.counter_b,
        };
        // 2^32 cases is far beyond any shift; wrap like the hardware register would.
        *counter = counter.wrapping_add(1);
        self.pending_send = true;
        *counter
    }

    /// Zero both counters and the elapsed timer, and flag a report.
    pub(crate) fn reset(&mut self) {
        self.counter_a = 0;
        self.counter_b = 0;
        self.elapsed_seconds = 0;
        self.pending_send = true;
    }

    /// Flag a report without touching the counters.
    pub(crate) fn request_report(&mut self) {
        self.pending_send = true;
    }

    /// Advance the elapsed timer by one second.  Does not flag a report.
    pub(crate) fn tick_second(&mut self) {
        self.elapsed_seconds = self.elapsed_seconds.wrapping_add(1);
    }

    /// Advance `sequence` for a new transmission and return it.
    pub(crate) fn next_sequence(&mut self) -> u32 {
        self.sequence = self.sequence.wrapping_add(1);
        self.sequence
    }

    pub(crate) fn clear_pending(&mut self) {
        self.pending_send = false;
    }
}
