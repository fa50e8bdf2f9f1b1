//! RF Output Pin
//!
//! Binds [`ClockPin`] to the real GPIO matrix registers. The pin itself is
//! held as an esp-hal [`Output`] so IO_MUX stays configured for the GPIO
//! function while the matrix selects the clock signal.

#![allow(unsafe_code)]

use core::ptr;

use esp_hal::gpio::Output;

use crate::synth::{ClockPin, PinState, RegisterBus};

/// Volatile writes to ESP32 peripheral registers
pub struct Mmio {
    _private: (),
}

impl RegisterBus for Mmio {
    fn write(&mut self, addr: usize, value: u32) {
        // SAFETY: only reached from ClockPin with GPIO matrix addresses for
        // the pin held by RfPin
        unsafe { ptr::write_volatile(addr as *mut u32, value) }
    }
}

/// RF output pin driver
pub struct RfPin<'d> {
    _pin: Output<'d>,
    matrix: ClockPin<Mmio>,
}

impl<'d> RfPin<'d> {
    /// Wrap an output pin; `number` must be the GPIO number of `pin`
    #[must_use]
    pub fn new(pin: Output<'d>, number: u8) -> Self {
        Self {
            _pin: pin,
            matrix: ClockPin::new(Mmio { _private: () }, number),
        }
    }

    /// Route the APLL clock onto the pin
    pub fn route_clock(&mut self) {
        self.matrix.route_clock();
    }

    /// Disconnect the clock and stop driving the pin
    pub fn float(&mut self) {
        self.matrix.float();
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> PinState {
        self.matrix.state()
    }
}
