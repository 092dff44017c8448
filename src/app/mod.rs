//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the counting and reporting rules for the node:
//! edge sampling, the report codec, receive deduplication, command
//! handling and the send trigger.  All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without a radio or GPIO.

pub mod codec;
pub mod commands;
pub mod dedup;
pub mod events;
pub mod ports;
pub mod sampler;
pub mod service;
pub mod state;
