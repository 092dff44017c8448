//! Fuzz target: air frame → deduplicator → command handler
//!
//! Splits the input into length-prefixed air frames, strips the link
//! header and dispatches each accepted frame into a live service.  The
//! service must never panic, never transmit from the receive path, and
//! the counters may only ever be zeroed by inbound traffic.
//!
//! cargo fuzz run fuzz_receive_path

#![no_main]

use libfuzzer_sys::fuzz_target;
use linecounter::adapters::espnow::parse_air_frame;
use linecounter::app::events::AppEvent;
use linecounter::app::ports::{
    EventSink, IndicatorPort, InputPort, OutboundFrame, RadioError, RadioPort,
};
use linecounter::app::sampler::LineState;
use linecounter::app::service::CounterService;
use linecounter::config::CounterConfig;
use linecounter::events::Event;

struct Node {
    sent: usize,
}

impl InputPort for Node {
    fn read_lines(&mut self) -> LineState {
        LineState::IDLE
    }
}

impl RadioPort for Node {
    fn broadcast(&mut self, _frame: &OutboundFrame) -> Result<(), RadioError> {
        self.sent += 1;
        Ok(())
    }
}

impl IndicatorPort for Node {
    fn set_active(&mut self, _on: bool) {}
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = CounterConfig::default();
    let mut app = CounterService::new(&config);
    let mut node = Node { sent: 0 };
    let mut sink = NullSink;

    // Every chunk gets the configured app id so the header check passes.
    let app_id = config.app_id;

    let mut rest = data;
    while let Some((&len, tail)) = rest.split_first() {
        let take = (len as usize).min(tail.len());
        let (chunk, next) = tail.split_at(take);
        rest = next;

        let mut air = app_id.to_be_bytes().to_vec();
        air.extend_from_slice(chunk);
        let mac = [0x24, 0x0A, 0xC4, 0, 0, len];

        if let Some(frame) = parse_air_frame(app_id, &mac, &air) {
            let sent_before = node.sent;
            app.dispatch(Event::Receive(frame), &mut node, &mut sink);
            assert_eq!(node.sent, sent_before, "receive path must not transmit");
        }
        assert_eq!(app.snapshot().counter_a, 0);
        assert_eq!(app.snapshot().counter_b, 0);
    }

    let pending = app.state().pending_send();
    app.dispatch(Event::Tick, &mut node, &mut sink);
    assert_eq!(node.sent, usize::from(pending));
});
