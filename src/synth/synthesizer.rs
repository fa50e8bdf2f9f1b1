//! Carrier Synthesizer
//!
//! Programs the audio PLL and routes its clock to the RF pin. The register
//! work sits behind [`ApllPeripheral`] so the control logic here runs on
//! the host against a fake.
//!
//! The synthesizer owns the pin state: it is either driven by the APLL
//! clock or floating as a high-impedance input.

use super::divider::{self, DividerParameters};
use crate::config::XTAL_HZ;
use crate::types::Frequency;

/// Low-level access to the APLL and the RF output pin
pub trait ApllPeripheral {
    /// Power up the APLL and program its dividers
    fn enable(&mut self, params: &DividerParameters);

    /// Stop the APLL
    fn power_down(&mut self);

    /// Connect the APLL clock to the output pin and enable the driver
    fn route_to_pin(&mut self);

    /// Disconnect the pin and leave it as a high-impedance input
    fn float_pin(&mut self);
}

/// Carrier control used by the transmission state machines
pub trait OscillatorDriver {
    /// Program the carrier and enable the output
    ///
    /// Frequencies below [`Frequency::MIN_HZ`] turn the output off instead.
    fn set_frequency(&mut self, freq: Frequency);

    /// Stop the carrier and float the output pin
    fn disable(&mut self);

    /// Whether the carrier is currently on the pin
    fn is_enabled(&self) -> bool;
}

/// APLL-backed carrier generator
pub struct FrequencySynthesizer<P> {
    apll: P,
    xtal_hz: f64,
    enabled: bool,
    frequency: Option<Frequency>,
    params: Option<DividerParameters>,
}

impl<P: ApllPeripheral> FrequencySynthesizer<P> {
    /// Create a synthesizer using the board crystal
    ///
    /// The output starts disabled; nothing is written to the peripheral.
    pub const fn new(apll: P) -> Self {
        Self::with_xtal(apll, XTAL_HZ)
    }

    /// Create a synthesizer with an explicit crystal frequency
    pub const fn with_xtal(apll: P, xtal_hz: f64) -> Self {
        Self {
            apll,
            xtal_hz,
            enabled: false,
            frequency: None,
            params: None,
        }
    }

    /// Requested frequency while the output is enabled
    #[must_use]
    pub const fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    /// Parameters last written to the APLL
    #[must_use]
    pub const fn parameters(&self) -> Option<DividerParameters> {
        self.params
    }

    /// Frequency actually produced by the last parameters
    #[must_use]
    pub fn actual_frequency(&self) -> Option<Frequency> {
        self.params.map(|p| p.output_frequency(self.xtal_hz))
    }

    /// Borrow the underlying peripheral
    #[must_use]
    pub const fn peripheral(&self) -> &P {
        &self.apll
    }

    /// Release the underlying peripheral
    pub fn into_inner(self) -> P {
        self.apll
    }
}

impl<P: ApllPeripheral> OscillatorDriver for FrequencySynthesizer<P> {
    fn set_frequency(&mut self, freq: Frequency) {
        if !freq.is_synthesizable() {
            self.disable();
            return;
        }

        let params = divider::calculate(freq, self.xtal_hz);
        self.apll.enable(&params);
        // Re-route on every call; the pin may have been floated since
        self.apll.route_to_pin();

        self.params = Some(params);
        self.frequency = Some(freq);
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.apll.power_down();
        self.apll.float_pin();
        self.frequency = None;
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
