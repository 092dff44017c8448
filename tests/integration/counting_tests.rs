//! Sampler → send trigger → transmitter, driven through `dispatch`.

use super::mock_hw::{booted, bench, frame, pulse};

use linecounter::app::events::AppEvent;
use linecounter::app::sampler::{self, LineState};
use linecounter::app::state::{CounterState, Line};
use linecounter::events::Event;

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn startup_broadcasts_zero_report_with_seq_one() {
    let (mut app, mut node, mut sink) = bench();
    app.dispatch(Event::Startup, &mut node, &mut sink);

    assert_eq!(node.payloads(), vec!["C:00000000:00000000:00000000"]);
    assert_eq!(node.sent[0].seq, 1);
    assert_eq!(node.sent[0].retries, 2);
    assert_eq!(sink.events.first(), Some(&AppEvent::Started));
    assert!(!app.state().pending_send());
}

#[test]
fn idle_lines_at_boot_count_nothing() {
    let (app, node, _sink) = booted();
    assert_eq!(node.sent.len(), 1, "only the startup report");
    assert_eq!(app.snapshot().counter_a, 0);
    assert_eq!(app.snapshot().counter_b, 0);
}

#[test]
fn lines_held_low_at_boot_are_not_counted() {
    let (mut app, mut node, mut sink) = bench();
    node.a_high = false;
    node.b_high = false;
    app.dispatch(Event::Startup, &mut node, &mut sink);
    for _ in 0..5 {
        app.dispatch(Event::Tick, &mut node, &mut sink);
    }
    assert_eq!(app.snapshot().counter_a, 0);
    assert_eq!(app.snapshot().counter_b, 0);
    assert_eq!(node.sent.len(), 1);
}

// ── Edge counting ─────────────────────────────────────────────

#[test]
fn falling_edge_on_a_sets_pending_and_counts_once() {
    let mut state = CounterState::new();
    let mut node = super::mock_hw::MockNode::new();

    // Latch (A=1, B=1).
    sampler::poll(&mut node, &mut state);
    assert!(!state.pending_send());

    node.a_high = false;
    let edges = sampler::poll(&mut node, &mut state);

    assert!(edges.a && !edges.b);
    assert_eq!(state.count(Line::A), 1);
    assert_eq!(state.count(Line::B), 0);
    assert!(state.pending_send());
    assert_eq!(state.last_sample(), LineState::new(false, true));
}

#[test]
fn held_line_counts_once() {
    let (mut app, mut node, mut sink) = booted();
    node.a_high = false;
    for _ in 0..10 {
        app.dispatch(Event::Tick, &mut node, &mut sink);
    }
    assert_eq!(app.snapshot().counter_a, 1);
    assert_eq!(node.sent.len(), 2);
}

#[test]
fn rising_edge_is_not_counted() {
    let (mut app, mut node, mut sink) = booted();
    pulse(&mut app, &mut node, &mut sink, Line::B);
    assert_eq!(app.snapshot().counter_b, 1);
    // The release tick produced no report.
    assert_eq!(node.sent.len(), 2);
    assert_eq!(node.last_payload().as_deref(), Some("C:00000000:00000001:00000000"));
}

#[test]
fn counted_events_carry_running_totals() {
    let (mut app, mut node, mut sink) = booted();
    pulse(&mut app, &mut node, &mut sink, Line::A);
    pulse(&mut app, &mut node, &mut sink, Line::A);
    assert!(sink.events.contains(&AppEvent::Counted {
        line: Line::A,
        total: 2
    }));
}

// ── Coalescing ────────────────────────────────────────────────

#[test]
fn two_edges_in_one_tick_send_one_report() {
    let (mut app, mut node, mut sink) = booted();
    node.a_high = false;
    node.b_high = false;
    app.dispatch(Event::Tick, &mut node, &mut sink);

    assert_eq!(node.sent.len(), 2);
    assert_eq!(node.last_payload().as_deref(), Some("C:00000001:00000001:00000000"));
}

#[test]
fn query_and_edge_before_one_tick_send_one_report() {
    let (mut app, mut node, mut sink) = booted();
    app.dispatch(frame(1, 1, b"Q"), &mut node, &mut sink);
    node.a_high = false;
    app.dispatch(Event::Tick, &mut node, &mut sink);

    assert_eq!(node.sent.len(), 2);
    assert_eq!(node.last_payload().as_deref(), Some("C:00000001:00000000:00000000"));
}

// ── Elapsed time ──────────────────────────────────────────────

#[test]
fn seconds_alone_never_trigger_a_report() {
    let (mut app, mut node, mut sink) = booted();
    for _ in 0..30 {
        app.dispatch(Event::SecondElapsed, &mut node, &mut sink);
        app.dispatch(Event::Tick, &mut node, &mut sink);
    }
    assert_eq!(node.sent.len(), 1);
    assert_eq!(app.snapshot().elapsed_seconds, 30);
}

// ── Sequence ──────────────────────────────────────────────────

#[test]
fn sequence_advances_by_one_per_transmission() {
    let (mut app, mut node, mut sink) = booted();
    for _ in 0..5 {
        pulse(&mut app, &mut node, &mut sink, Line::A);
    }
    let seqs: Vec<u8> = node.sent.iter().map(|f| f.seq).collect();
    assert_eq!(seqs, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(app.state().sequence(), 6);
}

#[test]
fn refused_enqueue_consumes_a_sequence_number() {
    let (mut app, mut node, mut sink) = booted();
    node.refuse = 1;
    pulse(&mut app, &mut node, &mut sink, Line::A);
    pulse(&mut app, &mut node, &mut sink, Line::A);

    let seqs: Vec<u8> = node.sent.iter().map(|f| f.seq).collect();
    assert_eq!(seqs, vec![1, 3]);
    assert_eq!(app.stats().enqueue_failures, 1);
    assert!(!app.state().pending_send(), "a failed send is not retried");
}

#[test]
fn wire_sequence_wraps_after_255() {
    let (mut app, mut node, mut sink) = booted();
    for _ in 0..300 {
        pulse(&mut app, &mut node, &mut sink, Line::B);
    }
    assert_eq!(app.state().sequence(), 301);
    assert_eq!(node.sent[254].seq, 255);
    assert_eq!(node.sent[255].seq, 0);
    assert_eq!(node.sent.last().map(|f| f.seq), Some((301 & 0xFF) as u8));
}

// ── Indicator ─────────────────────────────────────────────────

#[test]
fn indicator_lit_on_send_and_cleared_on_next_tick() {
    let (mut app, mut node, mut sink) = booted();
    node.a_high = false;
    app.dispatch(Event::Tick, &mut node, &mut sink);
    assert!(node.led);
    app.dispatch(Event::Tick, &mut node, &mut sink);
    assert!(!node.led);
}
