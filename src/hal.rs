//! Hardware Abstraction Layer
//!
//! Register-level access to the ESP32 audio PLL and the GPIO matrix.
//! This is the only place the crate touches hardware directly; the rest
//! of the firmware sees it through [`crate::synth::ApllPeripheral`].

pub mod apll;
pub mod gpio;

pub use apll::Apll;
pub use gpio::RfPin;

use crate::synth::{ApllPeripheral, DividerParameters};

/// APLL clock output on the RF pin
pub struct Esp32Oscillator<'d> {
    apll: Apll,
    pin: RfPin<'d>,
}

impl<'d> Esp32Oscillator<'d> {
    /// Combine the APLL and the RF pin, leaving the output floating
    #[must_use]
    pub fn new(apll: Apll, mut pin: RfPin<'d>) -> Self {
        pin.float();
        Self { apll, pin }
    }
}

impl ApllPeripheral for Esp32Oscillator<'_> {
    fn enable(&mut self, params: &DividerParameters) {
        if !self.apll.enable(params) {
            defmt::warn!("APLL calibration timed out ({})", params);
        }
    }

    fn power_down(&mut self) {
        self.apll.power_down();
    }

    fn route_to_pin(&mut self) {
        self.pin.route_clock();
    }

    fn float_pin(&mut self) {
        self.pin.float();
    }
}
