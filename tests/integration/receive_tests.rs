//! Receive path: deduplicator → command handler → send trigger.

use super::mock_hw::{booted, frame, pulse};

use linecounter::app::commands::Command;
use linecounter::app::events::AppEvent;
use linecounter::app::state::Line;
use linecounter::events::{Event, Origin};

const X: u64 = 0x0024_0AC4_1122;
const Y: u64 = 0x0024_0AC4_3344;

/// Drive the node to `{a:3, b:5, elapsed:12}` with every report flushed.
fn drive_to_3_5_12() -> (
    linecounter::app::service::CounterService,
    super::mock_hw::MockNode,
    super::mock_hw::RecordingSink,
) {
    let (mut app, mut node, mut sink) = booted();
    for _ in 0..3 {
        pulse(&mut app, &mut node, &mut sink, Line::A);
    }
    for _ in 0..5 {
        pulse(&mut app, &mut node, &mut sink, Line::B);
    }
    for _ in 0..12 {
        app.dispatch(Event::SecondElapsed, &mut node, &mut sink);
    }
    app.dispatch(Event::Tick, &mut node, &mut sink);
    assert!(!app.state().pending_send());
    (app, node, sink)
}

// ── Query ─────────────────────────────────────────────────────

#[test]
fn query_reports_current_values_without_mutation() {
    let (mut app, mut node, mut sink) = drive_to_3_5_12();
    let before = app.snapshot();
    let sent_before = node.sent.len();

    app.dispatch(frame(X, 9, b"Q"), &mut node, &mut sink);
    assert_eq!(app.snapshot(), before);
    assert_eq!(node.sent.len(), sent_before, "reply waits for the tick");

    app.dispatch(Event::Tick, &mut node, &mut sink);
    app.dispatch(Event::Tick, &mut node, &mut sink);

    assert_eq!(node.sent.len(), sent_before + 1);
    assert_eq!(node.last_payload().as_deref(), Some("C:00000003:00000005:0000000C"));
    assert_eq!(app.snapshot(), before);
}

// ── Reset ─────────────────────────────────────────────────────

#[test]
fn reset_zeroes_counters_and_elapsed() {
    let (mut app, mut node, mut sink) = drive_to_3_5_12();
    app.dispatch(frame(X, 1, b"R"), &mut node, &mut sink);
    app.dispatch(Event::Tick, &mut node, &mut sink);

    assert_eq!(node.last_payload().as_deref(), Some("C:00000000:00000000:00000000"));
    assert!(sink.events.contains(&AppEvent::CommandApplied {
        origin: Origin(X),
        command: Command::Reset,
    }));
}

#[test]
fn reset_twice_is_idempotent_but_reports_twice() {
    let (mut app, mut node, mut sink) = drive_to_3_5_12();
    let sent_before = node.sent.len();

    app.dispatch(frame(X, 1, b"R"), &mut node, &mut sink);
    app.dispatch(Event::Tick, &mut node, &mut sink);
    let after_first = app.snapshot();
    app.dispatch(frame(X, 2, b"R"), &mut node, &mut sink);
    app.dispatch(Event::Tick, &mut node, &mut sink);

    assert_eq!(app.snapshot(), after_first);
    assert_eq!(node.sent.len(), sent_before + 2);
    assert_eq!(node.payloads()[sent_before], node.payloads()[sent_before + 1]);
}

#[test]
fn reset_leaves_sequence_running() {
    let (mut app, mut node, mut sink) = drive_to_3_5_12();
    let seq_before = app.state().sequence();
    app.dispatch(frame(X, 1, b"R"), &mut node, &mut sink);
    app.dispatch(Event::Tick, &mut node, &mut sink);
    assert_eq!(app.state().sequence(), seq_before + 1);
}

// ── Deduplication ─────────────────────────────────────────────

#[test]
fn repeated_frame_is_handled_once() {
    let (mut app, mut node, mut sink) = booted();
    app.dispatch(frame(X, 5, b"Q"), &mut node, &mut sink);
    app.dispatch(frame(X, 5, b"Q"), &mut node, &mut sink);
    app.dispatch(frame(X, 6, b"Q"), &mut node, &mut sink);

    assert_eq!(sink.commands_applied(), 2);
    assert_eq!(sink.duplicates(), 1);
    assert_eq!(app.stats().frames_accepted, 2);
}

#[test]
fn only_the_last_accepted_frame_is_remembered() {
    let (mut app, mut node, mut sink) = booted();
    app.dispatch(frame(X, 5, b"Q"), &mut node, &mut sink);
    app.dispatch(frame(Y, 1, b"Q"), &mut node, &mut sink);
    app.dispatch(frame(X, 5, b"Q"), &mut node, &mut sink);

    assert_eq!(sink.commands_applied(), 3);
    assert_eq!(sink.duplicates(), 0);
}

#[test]
fn same_seq_from_other_origin_is_accepted() {
    let (mut app, mut node, mut sink) = booted();
    app.dispatch(frame(X, 5, b"R"), &mut node, &mut sink);
    app.dispatch(frame(Y, 5, b"R"), &mut node, &mut sink);
    assert_eq!(sink.commands_applied(), 2);
}

#[test]
fn duplicate_reset_does_not_trigger_a_second_report() {
    let (mut app, mut node, mut sink) = booted();
    app.dispatch(frame(X, 7, b"R"), &mut node, &mut sink);
    app.dispatch(Event::Tick, &mut node, &mut sink);
    let sent = node.sent.len();

    app.dispatch(frame(X, 7, b"R"), &mut node, &mut sink);
    app.dispatch(Event::Tick, &mut node, &mut sink);
    assert_eq!(node.sent.len(), sent);
}

// ── Unknown payloads ──────────────────────────────────────────

#[test]
fn unknown_and_empty_payloads_are_ignored() {
    let (mut app, mut node, mut sink) = booted();
    app.dispatch(frame(X, 1, b"X"), &mut node, &mut sink);
    app.dispatch(frame(X, 2, b""), &mut node, &mut sink);
    app.dispatch(frame(X, 3, b"q"), &mut node, &mut sink);
    app.dispatch(Event::Tick, &mut node, &mut sink);

    assert_eq!(node.sent.len(), 1, "only the startup report");
    assert_eq!(app.stats().payloads_ignored, 3);
    assert!(sink.events.contains(&AppEvent::PayloadIgnored {
        origin: Origin(X),
        first_byte: None,
    }));
}

#[test]
fn trailing_bytes_after_command_are_ignored() {
    let (mut app, mut node, mut sink) = booted();
    app.dispatch(frame(X, 1, b"Query everything"), &mut node, &mut sink);
    assert_eq!(sink.commands_applied(), 1);
    assert!(app.state().pending_send());
}

#[test]
fn command_lights_indicator() {
    let (mut app, mut node, mut sink) = booted();
    app.dispatch(Event::Tick, &mut node, &mut sink);
    assert!(!node.led);
    app.dispatch(frame(X, 1, b"Q"), &mut node, &mut sink);
    assert!(node.led);
}
