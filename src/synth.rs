//! Frequency Synthesis
//!
//! Turns a requested carrier frequency into audio-PLL divider settings
//! and drives the oscillator through a small peripheral interface:
//! - Divider calculation (pure, testable on the host)
//! - Carrier control behind the `OscillatorDriver` capability
//! - GPIO matrix routing of the carrier to the RF pin

pub mod divider;
pub mod pin;
pub mod synthesizer;

pub use divider::DividerParameters;
pub use pin::{ClockPin, PinState, RegisterBus};
pub use synthesizer::{ApllPeripheral, FrequencySynthesizer, OscillatorDriver};
