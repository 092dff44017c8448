//! Callback-driven event system.
//!
//! Events are produced by:
//! - Timer callbacks (sampling tick, one-second tick)
//! - Radio callbacks (frame received, transmit complete)
//! - The boot path (one `Startup` before the loop starts)
//!
//! Events are consumed by the main loop, which hands them one at a time to
//! [`CounterService::dispatch`](crate::app::service::CounterService::dispatch).
//! Each handler runs to completion before the next event is popped, so the
//! counter state needs no locking.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ esp_timer   │────▶│              │     │              │
//! │ ESP-NOW rx  │────▶│  Event Queue │────▶│  Main Loop   │
//! │ ESP-NOW tx  │────▶│  (bounded)   │     │  (consumer)  │
//! │ Boot        │────▶│              │     │              │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// Bytes of an inbound payload kept for the core.  Commands are one byte;
/// the rest is only there for logging.
pub const INBOUND_PAYLOAD_CAP: usize = 64;

/// Maximum number of pending events.
const EVENT_QUEUE_CAP: usize = 16;

/// Sender identity of an inbound frame (6-byte MAC, big-endian in the low
/// 48 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Origin(pub u64);

impl Origin {
    pub fn from_mac(mac: &[u8; 6]) -> Self {
        let mut wide = [0u8; 8];
        wide[2..].copy_from_slice(mac);
        Self(u64::from_be_bytes(wide))
    }

    pub fn mac(self) -> [u8; 6] {
        let wide = self.0.to_be_bytes();
        let mut mac = [0u8; 6];
        mac.copy_from_slice(&wide[2..]);
        mac
    }
}

impl core::fmt::Display for Origin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let m = self.mac();
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            m[0], m[1], m[2], m[3], m[4], m[5]
        )
    }
}

/// A frame delivered by the radio, with its link metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame {
    pub origin: Origin,
    /// Link-layer sequence byte chosen by the sender.
    pub seq: u8,
    pub payload: heapless::Vec<u8, INBOUND_PAYLOAD_CAP>,
}

impl InboundFrame {
    /// Build a frame, truncating the payload to [`INBOUND_PAYLOAD_CAP`].
    pub fn new(origin: Origin, seq: u8, payload: &[u8]) -> Self {
        let keep = payload.len().min(INBOUND_PAYLOAD_CAP);
        let mut buf = heapless::Vec::new();
        // `keep` never exceeds the capacity.
        let _ = buf.extend_from_slice(&payload[..keep]);
        Self {
            origin,
            seq,
            payload: buf,
        }
    }
}

/// Everything that can wake the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Power-on.  Always produces one report.
    Startup,
    /// Scheduling tick: sample the lines, then flush a pending report.
    Tick,
    /// One second of wall time passed.
    SecondElapsed,
    /// A frame arrived from the radio.
    Receive(InboundFrame),
    /// The radio finished a transmission.
    TransmitComplete { ok: bool },
}

/// Bounded multi-producer queue between callbacks and the main loop.
pub struct EventQueue<const N: usize> {
    channel: Channel<CriticalSectionRawMutex, Event, N>,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Push an event.  Safe to call from timer and radio callbacks.
    /// Returns `false` if the queue is full (event dropped).
    pub fn push(&self, event: Event) -> bool {
        self.channel.try_send(event).is_ok()
    }

    /// Pop the next event, or `None` if the queue is empty.
    pub fn pop(&self) -> Option<Event> {
        self.channel.try_receive().ok()
    }

    /// Wait for the next event.
    pub async fn next(&self) -> Event {
        self.channel.receive().await
    }

    /// Drain all pending events into a callback, in FIFO order.
    pub fn drain(&self, mut handler: impl FnMut(Event)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

static EVENTS: EventQueue<EVENT_QUEUE_CAP> = EventQueue::new();

/// Push into the global queue.
pub fn push_event(event: Event) -> bool {
    EVENTS.push(event)
}

/// Block the calling task until the global queue yields an event.
pub fn wait_event() -> Event {
    futures_lite::future::block_on(EVENTS.next())
}
