//! Input sampler: rate-limited falling-edge detection on two lines.
//!
//! The sampler runs once per scheduling tick.  It compares the fresh
//! sample against the previous one and counts a line when it changed
//! *and* is now asserted (low).  There is no multi-sample filter: the
//! tick period is the debounce period.  Bounce that settles inside one
//! period can never be counted twice, and two real cases closer together
//! than one period may merge into one.
//!
//! ```text
//!  line A  ‾‾‾‾‾\__/‾\_____/‾‾‾‾‾‾
//!  sample    ^     ^     ^     ^
//!  counted         A
//! ```

use super::ports::InputPort;
use super::state::{CounterState, Line};

/// Two-bit snapshot of the input lines.  Bit 0 = line A, bit 1 = line B;
/// a set bit means the line is high (idle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineState(u8);

impl LineState {
    pub const fn new(a_high: bool, b_high: bool) -> Self {
        Self((a_high as u8) | ((b_high as u8) << 1))
    }

    /// Build from raw bits; anything above bit 1 is discarded.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b11)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_high(self, line: Line) -> bool {
        self.0 & line.mask() != 0
    }

    /// Both lines idle (high).
    pub const IDLE: LineState = LineState(0b11);
}

/// Which lines were counted by one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub a: bool,
    pub b: bool,
}

impl Edges {
    pub fn any(self) -> bool {
        self.a || self.b
    }

    pub fn contains(self, line: Line) -> bool {
        match line {
            Line::A => self.a,
            Line::B => self.b,
        }
    }
}

/// Asserted transitions between two consecutive samples.
pub fn asserted_edges(prev: LineState, now: LineState) -> Edges {
    let fell = |line: Line| prev.is_high(line) != now.is_high(line) && !now.is_high(line);
    Edges {
        a: fell(Line::A),
        b: fell(Line::B),
    }
}

/// Read the lines, count asserted edges into `state`, and remember the
/// sample for the next poll.
pub fn poll(input: &mut impl InputPort, state: &mut CounterState) -> Edges {
    let now = input.read_lines();
    let edges = asserted_edges(state.last_sample, now);
    for line in Line::ALL {
        if edges.contains(line) {
            state.record_edge(line);
        }
    }
    state.last_sample = now;
    edges
}
