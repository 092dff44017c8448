//! Node configuration parameters
//!
//! All tunable parameters for the counter node.
//! Values can be overridden via NVS (non-volatile storage).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core node configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterConfig {
    // --- Sampling ---
    /// Scheduling tick period (milliseconds).  This is also the debounce
    /// period: edges closer together than one tick may merge.
    pub sample_interval_ms: u32,

    // --- Radio ---
    /// Re-sends the link may attempt after a failed enqueue
    pub tx_retries: u8,
    /// Radio channel (Wi-Fi channel used by ESP-NOW)
    pub radio_channel: u8,
    /// Application id carried in every link header; foreign ids are dropped
    pub app_id: u32,

    // --- Bench ---
    /// Drive both lines from a synthetic pattern instead of GPIO
    pub simulate_inputs: bool,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            // Sampling
            sample_interval_ms: 164, // 41 × 4 ms system ticks

            // Radio
            tx_retries: 2,
            radio_channel: 1,
            app_id: 0x6772_0103,

            // Bench
            simulate_inputs: false,
        }
    }
}

impl CounterConfig {
    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(10..=10_000).contains(&self.sample_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "sample_interval_ms must be 10–10000",
            ));
        }
        if self.tx_retries > 7 {
            return Err(ConfigError::ValidationFailed("tx_retries must be 0–7"));
        }
        if !(1..=13).contains(&self.radio_channel) {
            return Err(ConfigError::ValidationFailed("radio_channel must be 1–13"));
        }
        if self.app_id == 0 {
            return Err(ConfigError::ValidationFailed("app_id must be non-zero"));
        }
        Ok(())
    }
}
