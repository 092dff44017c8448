//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production).  Routine traffic
//! goes out at `debug`, state changes at `info`.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::app::state::Line;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn line_name(line: Line) -> char {
    match line {
        Line::A => 'A',
        Line::B => 'B',
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | sending initial report");
            }
            AppEvent::Counted { line, total } => {
                info!("COUNT | line={} total={}", line_name(*line), total);
            }
            AppEvent::CommandApplied { origin, command } => {
                info!("CMD   | {:?} from {}", command, origin);
            }
            AppEvent::PayloadIgnored { origin, first_byte } => {
                debug!("RX    | ignored from {} first_byte={:?}", origin, first_byte);
            }
            AppEvent::DuplicateDropped { origin, seq } => {
                debug!("RX    | dup from {} seq={:#04X}", origin, seq);
            }
            AppEvent::ReportSent { seq, payload } => {
                info!("TX    | seq={:#04X} payload={}", seq, payload);
            }
            AppEvent::EnqueueFailed { seq, error } => {
                warn!("TX    | seq={:#04X} refused: {}", seq, error);
            }
            AppEvent::TransmitComplete { ok } => {
                debug!("TX    | complete {}", if *ok { "OK" } else { "NG" });
            }
        }
    }
}
