//! Port traits: the hexagonal boundary between the counting core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ CounterService (domain)
//! ```
//!
//! The core consumes exactly four capabilities: read the two input lines,
//! hand a frame to the broadcast radio, drive the status indicator, and
//! publish structured events.  Production and host-test builds differ only
//! in which adapters are plugged in here.

use crate::config::CounterConfig;

use super::codec::ReportFrame;
use super::sampler::LineState;

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: GPIO → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the two counted lines.
pub trait InputPort {
    /// Sample both lines once.  Lines are active-low: a `false` bit means
    /// the line is asserted (a case is passing the sensor).
    fn read_lines(&mut self) -> LineState;
}

// ───────────────────────────────────────────────────────────────
// Radio port (driven adapter: domain → broadcast link)
// ───────────────────────────────────────────────────────────────

/// One outbound broadcast request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundFrame {
    /// Link-layer sequence byte (`sequence & 0xFF`).
    pub seq: u8,
    /// How many times the link may re-send after a failed enqueue.
    pub retries: u8,
    /// Fixed-format report payload.
    pub payload: ReportFrame,
}

/// Write-side port: hand a frame to the broadcast link.
///
/// Success means the frame was *enqueued*.  Broadcast carries no
/// acknowledgment, so eventual delivery is never reported here.
pub trait RadioPort {
    fn broadcast(&mut self, frame: &OutboundFrame) -> Result<(), RadioError>;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → status LED)
// ───────────────────────────────────────────────────────────────

/// Single on/off activity indicator.
pub trait IndicatorPort {
    fn set_active(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists node configuration.
///
/// Implementations MUST call [`CounterConfig::validate`] before persisting
/// and reject invalid values rather than clamping them.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`CounterConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<CounterConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&mut self, config: &CounterConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`RadioPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// The driver's transmit queue had no room.
    QueueFull,
    /// The radio has not been started (or was stopped).
    NotStarted,
    /// Header + payload exceed the link MTU.
    PayloadTooLarge,
    /// Raw driver error code.
    Driver(i32),
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for RadioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::QueueFull => write!(f, "transmit queue full"),
            Self::NotStarted => write!(f, "radio not started"),
            Self::PayloadTooLarge => write!(f, "payload too large"),
            Self::Driver(rc) => write!(f, "driver error (rc={})", rc),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
