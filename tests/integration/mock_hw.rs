//! Mock hardware adapter for integration tests.
//!
//! Records every radio and indicator call so tests can assert on the full
//! history without touching real GPIO or the radio driver.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use linecounter::app::events::AppEvent;
use linecounter::app::ports::{
    EventSink, IndicatorPort, InputPort, OutboundFrame, RadioError, RadioPort,
};
use linecounter::app::sampler::LineState;
use linecounter::app::service::CounterService;
use linecounter::app::state::Line;
use linecounter::config::CounterConfig;
use linecounter::events::{Event, InboundFrame, Origin};

// ── MockNode ──────────────────────────────────────────────────

/// Input lines + radio + indicator in one value, like `NodeHardware`.
pub struct MockNode {
    pub a_high: bool,
    pub b_high: bool,
    pub sent: Vec<OutboundFrame>,
    /// Number of upcoming broadcasts to refuse with `QueueFull`.
    pub refuse: u32,
    pub led: bool,
    pub led_history: Vec<bool>,
}

#[allow(dead_code)]
impl MockNode {
    /// Both lines idle (high).
    pub fn new() -> Self {
        Self {
            a_high: true,
            b_high: true,
            sent: Vec::new(),
            refuse: 0,
            led: false,
            led_history: Vec::new(),
        }
    }

    pub fn set_line(&mut self, line: Line, high: bool) {
        match line {
            Line::A => self.a_high = high,
            Line::B => self.b_high = high,
        }
    }

    pub fn payloads(&self) -> Vec<String> {
        self.sent
            .iter()
            .map(|f| f.payload.as_str().to_string())
            .collect()
    }

    pub fn last_payload(&self) -> Option<String> {
        self.sent.last().map(|f| f.payload.as_str().to_string())
    }
}

impl Default for MockNode {
    fn default() -> Self {
        Self::new()
    }
}

impl InputPort for MockNode {
    fn read_lines(&mut self) -> LineState {
        LineState::new(self.a_high, self.b_high)
    }
}

impl RadioPort for MockNode {
    fn broadcast(&mut self, frame: &OutboundFrame) -> Result<(), RadioError> {
        if self.refuse > 0 {
            self.refuse -= 1;
            return Err(RadioError::QueueFull);
        }
        self.sent.push(frame.clone());
        Ok(())
    }
}

impl IndicatorPort for MockNode {
    fn set_active(&mut self, on: bool) {
        self.led = on;
        self.led_history.push(on);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands_applied(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::CommandApplied { .. }))
            .count()
    }

    pub fn duplicates(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::DuplicateDropped { .. }))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── MockPin ───────────────────────────────────────────────────

/// Output pin that remembers its level.
#[derive(Debug, Default)]
pub struct MockPin {
    pub high: bool,
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high = true;
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────

/// Service with default config, plus an idle mock node and an empty sink.
/// No startup event has been dispatched.
#[allow(dead_code)]
pub fn bench() -> (CounterService, MockNode, RecordingSink) {
    (
        CounterService::new(&CounterConfig::default()),
        MockNode::new(),
        RecordingSink::new(),
    )
}

/// Service after boot: startup report sent, one quiet tick to latch the
/// idle line state.
#[allow(dead_code)]
pub fn booted() -> (CounterService, MockNode, RecordingSink) {
    let (mut app, mut node, mut sink) = bench();
    app.dispatch(Event::Startup, &mut node, &mut sink);
    app.dispatch(Event::Tick, &mut node, &mut sink);
    (app, node, sink)
}

/// Assert `line` for one tick, then release it for one tick.
#[allow(dead_code)]
pub fn pulse(app: &mut CounterService, node: &mut MockNode, sink: &mut RecordingSink, line: Line) {
    node.set_line(line, false);
    app.dispatch(Event::Tick, node, sink);
    node.set_line(line, true);
    app.dispatch(Event::Tick, node, sink);
}

#[allow(dead_code)]
pub fn frame(origin: u64, seq: u8, payload: &[u8]) -> Event {
    Event::Receive(InboundFrame::new(Origin(origin), seq, payload))
}
