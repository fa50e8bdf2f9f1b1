//! WSPR / CW Beacon Firmware Library
//!
//! This library provides the core functionality for an ESP32 beacon that
//! keys the audio PLL straight onto a GPIO pin. It sends a WSPR frame in
//! every even minute and a Morse identification in the odd minutes,
//! aligned to UTC.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │  Beacon Control  │  Status  │  Serial Console               │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   SYNTHESIS / ENCODING                       │
//! │  APLL Divider Math  │  WSPR Symbols  │  Morse Table          │
//! ├─────────────────────────────────────────────────────────────┤
//! │                         HAL LAYER                            │
//! │  APLL (regi2c)  │  I2S Clock  │  GPIO Matrix                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Polled deadlines**: state machines never block; each tick compares
//!   the monotonic clock against a stored deadline
//! - **Type-driven design**: symbol buffers and divider settings are
//!   validated at construction
//! - **No unsafe in application code**: all unsafe isolated in the HAL
//! - **Functional core, imperative shell**: pure logic separated from I/O

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_time;
#[cfg(feature = "embedded")]
pub use esp_hal;

/// Hardware Abstraction Layer
///
/// APLL and GPIO access for the ESP32.
#[cfg(feature = "embedded")]
pub mod hal;

/// Frequency Synthesis
///
/// Divider calculation and carrier control.
pub mod synth;

/// Message Encoding
///
/// WSPR symbol generation and the Morse table.
pub mod encoding;

/// Beacon Control Logic
///
/// WSPR and CW state machines and the scheduler.
pub mod radio;

/// Wall-clock time
pub mod clock;

/// Status snapshots and publication
pub mod status;

/// Communication Protocols
///
/// Serial console command parser and responses.
pub mod protocol;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    pub use crate::clock::TimeSource;
    pub use crate::status::StatusSink;
    pub use crate::synth::OscillatorDriver;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
