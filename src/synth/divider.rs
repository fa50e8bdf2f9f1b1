//! APLL Divider Calculation
//!
//! Computes audio-PLL settings for a target output frequency. This module
//! is testable on the host.
//!
//! # Theory of Operation
//!
//! The APLL multiplies the crystal by a fractional factor and then divides
//! the result down to the output:
//! 1. PLL stage: FPLL = FXTAL × (4 + sdm2 + sdm1/256 + sdm0/65536)
//! 2. Output stage: FOUT = FPLL / (2 × (odiv + 2)), 0 ≤ odiv ≤ 31
//!
//! The PLL only locks between 350 and 500 MHz, so the smallest output
//! divider that lands FPLL in that band is chosen. When none does, a fixed
//! fallback divider is used and the output is only approximate.

use crate::config::{APLL_FALLBACK_DIVIDER, APLL_MAX_DIVIDER, APLL_MAX_HZ, APLL_MIN_HZ};
use crate::types::Frequency;

/// APLL parameters for one output frequency
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DividerParameters {
    /// Integer part of the multiplier above 4 (sdm2)
    pub integer_part: u8,
    /// First 1/256 fractional step (sdm1)
    pub frac_high: u8,
    /// Residual in 1/65536 steps (sdm0, always below 256)
    pub frac_low: u16,
    /// Output divider (0-31)
    pub output_divider: u8,
}

impl DividerParameters {
    /// Fixed offset the hardware adds to the integer part
    pub const MULTIPLIER_OFFSET: f64 = 4.0;

    /// Multiplier applied to the crystal, including the fixed offset
    #[must_use]
    pub fn multiplier(&self) -> f64 {
        Self::MULTIPLIER_OFFSET
            + f64::from(self.integer_part)
            + f64::from(self.frac_high) / 256.0
            + f64::from(self.frac_low) / 65_536.0
    }

    /// Fractional part of the multiplier as programmed
    #[must_use]
    pub fn fraction(&self) -> f64 {
        f64::from(self.frac_high) / 256.0 + f64::from(self.frac_low) / 65_536.0
    }

    /// Total division from the PLL to the output pin
    #[must_use]
    pub fn post_divisor(&self) -> f64 {
        2.0 * (f64::from(self.output_divider) + 2.0)
    }

    /// Internal PLL frequency given the crystal frequency
    #[must_use]
    pub fn pll_frequency(&self, xtal_hz: f64) -> Frequency {
        Frequency::from_hz(xtal_hz * self.multiplier())
    }

    /// Output frequency given the crystal frequency
    #[must_use]
    pub fn output_frequency(&self, xtal_hz: f64) -> Frequency {
        Frequency::from_hz(xtal_hz * self.multiplier() / self.post_divisor())
    }

    /// Check whether the PLL runs inside its lock band
    #[must_use]
    pub fn is_pll_in_band(&self, xtal_hz: f64) -> bool {
        let pll = self.pll_frequency(xtal_hz).as_hz();
        (APLL_MIN_HZ..=APLL_MAX_HZ).contains(&pll)
    }

    /// Low fraction byte as written to the sdm0 register
    #[must_use]
    pub fn frac_low_register(&self) -> u8 {
        u8::try_from(self.frac_low).unwrap_or(u8::MAX)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DividerParameters {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "sdm2={} sdm1={} sdm0={} odiv={}",
            self.integer_part,
            self.frac_high,
            self.frac_low,
            self.output_divider
        );
    }
}

/// Find the smallest output divider that puts the PLL in band
///
/// Returns `None` if no divider in 0..=31 qualifies.
#[must_use]
pub fn select_output_divider(target_hz: f64) -> Option<u8> {
    (0..=APLL_MAX_DIVIDER).find(|&d| {
        let pll = 2.0 * target_hz * (f64::from(d) + 2.0);
        (APLL_MIN_HZ..=APLL_MAX_HZ).contains(&pll)
    })
}

/// Calculate APLL parameters for a target frequency
///
/// Never fails: out-of-band targets use the fallback divider and a
/// negative multiplier is clamped to zero, both giving a degraded output.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn calculate(target: Frequency, xtal_hz: f64) -> DividerParameters {
    let target_hz = target.as_hz();
    let output_divider = select_output_divider(target_hz).unwrap_or(APLL_FALLBACK_DIVIDER);

    let pll_hz = 2.0 * target_hz * (f64::from(output_divider) + 2.0);
    let mut total = pll_hz / xtal_hz - DividerParameters::MULTIPLIER_OFFSET;
    if total < 0.0 {
        total = 0.0;
    }

    // total is non-negative here, so truncation is floor
    let whole = total as u32;
    let remainder = total - f64::from(whole);
    let frac_high = (remainder * 256.0) as u32;
    let frac_low = ((remainder - f64::from(frac_high) / 256.0) * 65_536.0) as u32;

    DividerParameters {
        integer_part: u8::try_from(whole).unwrap_or(u8::MAX),
        frac_high: u8::try_from(frac_high).unwrap_or(u8::MAX),
        frac_low: u16::try_from(frac_low.min(255)).unwrap_or(255),
        output_divider,
    }
}
