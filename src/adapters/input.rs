//! Line input adapters: implement [`InputPort`].
//!
//! - [`PinLines`]: two `embedded_hal` input pins (pulled up, active-low
//!   sensors).  On ESP-IDF these are `PinDriver`s.
//! - [`SimulatedLines`]: a synthetic pattern advanced once per second, for
//!   bench demos without sensors wired.  Line A toggles every 2 s and
//!   line B every 4 s, so A counts every 4 s and B every 8 s.

use embedded_hal::digital::InputPin;
use log::debug;

use crate::app::ports::InputPort;
use crate::app::sampler::LineState;

/// Two real GPIO inputs.
pub struct PinLines<A, B> {
    a: A,
    b: B,
}

impl<A: InputPin, B: InputPin> PinLines<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

/// A failed read reports the line as idle so it can never count.
fn read_level(pin: &mut impl InputPin) -> bool {
    pin.is_high().unwrap_or_else(|_| {
        debug!("input: pin read failed, treating line as idle");
        true
    })
}

impl<A: InputPin, B: InputPin> InputPort for PinLines<A, B> {
    fn read_lines(&mut self) -> LineState {
        LineState::new(read_level(&mut self.a), read_level(&mut self.b))
    }
}

/// Synthetic two-line pattern driven by elapsed seconds.
#[derive(Debug, Default)]
pub struct SimulatedLines {
    seconds: u32,
}

impl SimulatedLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the pattern by one second.
    pub fn advance(&mut self) {
        self.seconds = self.seconds.wrapping_add(1);
    }
}

impl InputPort for SimulatedLines {
    fn read_lines(&mut self) -> LineState {
        LineState::from_bits((self.seconds >> 1) as u8)
    }
}

/// Either real pins or the simulator, chosen from config at boot.
pub enum LineSource<A, B> {
    Pins(PinLines<A, B>),
    Simulated(SimulatedLines),
}

impl<A, B> LineSource<A, B> {
    /// Forward a wall-clock second to the simulator, if active.
    pub fn on_second(&mut self) {
        if let Self::Simulated(sim) = self {
            sim.advance();
        }
    }
}

impl<A: InputPin, B: InputPin> InputPort for LineSource<A, B> {
    fn read_lines(&mut self) -> LineState {
        match self {
            Self::Pins(pins) => pins.read_lines(),
            Self::Simulated(sim) => sim.read_lines(),
        }
    }
}
