//! Unified error type for the counter node firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping
//! the boot path's error handling uniform.  All variants are `Copy`.
//! The counting core itself never returns errors: unknown payloads,
//! duplicates and refused frames are reported as events instead.

use core::fmt;

use crate::app::ports::{ConfigError, RadioError};

/// Every fallible operation outside the core funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The radio could not be started or refused a frame.
    Radio(RadioError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radio(e) => write!(f, "radio: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<RadioError> for Error {
    fn from(e: RadioError) -> Self {
        Self::Radio(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
