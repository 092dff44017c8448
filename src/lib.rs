//! LineCounter firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;

// ESP-IDF-backed modules; each carries a host simulation so the crate
// builds and tests off-target.
pub mod adapters;
pub mod drivers;

#[cfg(target_os = "espidf")]
mod esp_link_shims;
