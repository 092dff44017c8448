//! Counter service: the hexagonal core.
//!
//! [`CounterService`] owns the counter state, the receive deduplicator and
//! the link statistics.  Every external stimulus arrives as one
//! [`Event`] through [`dispatch`](CounterService::dispatch) and runs to
//! completion.  All I/O flows through port traits injected at call sites.
//!
//! ```text
//!   InputPort ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!                 │       CounterService         │
//!   RadioPort ◀── │ sampler · dedup · commands   │
//!                 │ send trigger · transmitter   │
//! IndicatorPort ◀─└─────────────────────────────┘
//! ```
//!
//! Reports are coalesced: the sampler and the command handler only raise
//! `pending_send`; at most one frame leaves per scheduling tick.

use log::{debug, info, warn};

use crate::config::CounterConfig;
use crate::events::{Event, InboundFrame};

use super::codec::encode_report;
use super::commands::Command;
use super::dedup::{Deduplicator, Verdict};
use super::events::{AppEvent, LinkStats};
use super::ports::{EventSink, IndicatorPort, InputPort, OutboundFrame, RadioPort};
use super::sampler::{self, Edges};
use super::state::{CounterSnapshot, CounterState, Line};

// ───────────────────────────────────────────────────────────────
// CounterService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all counting and reporting logic.
pub struct CounterService {
    state: CounterState,
    dedup: Deduplicator,
    stats: LinkStats,
    /// Retry budget handed to the radio with every frame.
    tx_retries: u8,
}

impl CounterService {
    pub fn new(config: &CounterConfig) -> Self {
        Self {
            state: CounterState::new(),
            dedup: Deduplicator::new(),
            stats: LinkStats::default(),
            tx_retries: config.tx_retries,
        }
    }

    // ── Dispatch ──────────────────────────────────────────────

    /// Handle one event to completion.
    ///
    /// The `node` parameter satisfies every hardware port at once, which
    /// avoids juggling several mutable borrows of the same adapter.
    pub fn dispatch(
        &mut self,
        event: Event,
        node: &mut (impl InputPort + RadioPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) {
        match event {
            Event::Startup => self.start(node, sink),
            Event::Tick => self.tick(node, sink),
            Event::SecondElapsed => self.state.tick_second(),
            Event::Receive(frame) => self.receive(&frame, node, sink),
            Event::TransmitComplete { ok } => self.transmit_complete(ok, sink),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Power-on: send the initial report regardless of `pending_send`.
    pub fn start(&mut self, node: &mut (impl RadioPort + IndicatorPort), sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
        info!("CounterService started (tx_retries={})", self.tx_retries);
        self.transmit(node, sink);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// One scheduling tick: sample → count → flush at most one report.
    pub fn tick(
        &mut self,
        node: &mut (impl InputPort + RadioPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) {
        node.set_active(false);

        let edges = sampler::poll(node, &mut self.state);
        self.emit_counts(edges, sink);

        self.flush_pending(node, sink);
    }

    /// Send-trigger: transmit once if anything changed since the last report.
    /// A refused enqueue shows up as [`AppEvent::EnqueueFailed`] and in
    /// [`LinkStats`], never as a return value.
    pub fn flush_pending(
        &mut self,
        node: &mut (impl RadioPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) {
        if self.state.pending_send() {
            self.transmit(node, sink);
        }
    }

    // ── Receive path ──────────────────────────────────────────

    /// Deduplicate, decode and apply one inbound frame.  Never fails:
    /// duplicates and unknown payloads are dropped (and reported to `sink`).
    pub fn receive(
        &mut self,
        frame: &InboundFrame,
        node: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        if self.dedup.check(frame.origin, frame.seq) == Verdict::Duplicate {
            self.stats.duplicates_dropped += 1;
            debug!("RX dup origin={} seq={}", frame.origin, frame.seq);
            sink.emit(&AppEvent::DuplicateDropped {
                origin: frame.origin,
                seq: frame.seq,
            });
            return;
        }
        self.stats.frames_accepted += 1;

        match Command::from_payload(&frame.payload) {
            Some(command) => {
                node.set_active(true);
                command.apply(&mut self.state);
                self.stats.commands_applied += 1;
                sink.emit(&AppEvent::CommandApplied {
                    origin: frame.origin,
                    command,
                });
            }
            None => {
                self.stats.payloads_ignored += 1;
                sink.emit(&AppEvent::PayloadIgnored {
                    origin: frame.origin,
                    first_byte: frame.payload.first().copied(),
                });
            }
        }
    }

    /// Informational: the radio reports how a transmission ended.
    pub fn transmit_complete(&mut self, ok: bool, sink: &mut impl EventSink) {
        if ok {
            self.stats.tx_complete_ok += 1;
        } else {
            self.stats.tx_complete_failed += 1;
        }
        sink.emit(&AppEvent::TransmitComplete { ok });
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn snapshot(&self) -> CounterSnapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &CounterState {
        &self.state
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    // ── Internal ──────────────────────────────────────────────

    /// Transmitter: bump the sequence, encode, enqueue, clear `pending_send`.
    fn transmit(&mut self, node: &mut (impl RadioPort + IndicatorPort), sink: &mut impl EventSink) {
        node.set_active(true);

        let seq = (self.state.next_sequence() & 0xFF) as u8;
        let frame = OutboundFrame {
            seq,
            retries: self.tx_retries,
            payload: encode_report(&self.state.snapshot()),
        };
        self.state.clear_pending();

        match node.broadcast(&frame) {
            Ok(()) => {
                self.stats.reports_sent += 1;
                sink.emit(&AppEvent::ReportSent {
                    seq,
                    payload: frame.payload,
                });
            }
            Err(error) => {
                self.stats.enqueue_failures += 1;
                warn!("Report seq={} not enqueued: {}", seq, error);
                sink.emit(&AppEvent::EnqueueFailed { seq, error });
            }
        }
    }

    fn emit_counts(&self, edges: Edges, sink: &mut impl EventSink) {
        for line in Line::ALL {
            if edges.contains(line) {
                sink.emit(&AppEvent::Counted {
                    line,
                    total: self.state.count(line),
                });
            }
        }
    }
}
