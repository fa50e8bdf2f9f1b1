//! WSPR Transmission
//!
//! Steps through the 162 channel symbols at a fixed symbol rate, shifting
//! the carrier by one tone spacing per symbol value. Deadlines advance by
//! exactly one symbol period per firing, so polling jitter never
//! accumulates over the two-minute frame.

use crate::config::{WSPR_SYMBOL_COUNT, WSPR_SYMBOL_DURATION, WSPR_TONE_SPACING_HZ};
use crate::encoding::wspr::SymbolBuffer;
use crate::synth::OscillatorDriver;
use crate::types::{Frequency, Instant};

/// Result of advancing a transmission
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// Still transmitting
    Running,
    /// Output disabled, session over
    Finished,
}

#[cfg(feature = "embedded")]
impl defmt::Format for SessionStatus {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Running => defmt::write!(f, "Running"),
            Self::Finished => defmt::write!(f, "Finished"),
        }
    }
}

/// One WSPR frame in progress
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WsprSession {
    /// Next symbol to send
    cursor: usize,
    /// When the next symbol (or the final disable) is due
    next_deadline: Instant,
    /// Carrier for symbol 0
    base: Frequency,
    finished: bool,
}

impl WsprSession {
    /// Start a frame: key the base carrier and arm the first symbol
    pub fn start<D: OscillatorDriver>(now: Instant, base: Frequency, driver: &mut D) -> Self {
        driver.set_frequency(base);
        Self {
            cursor: 0,
            next_deadline: now + WSPR_SYMBOL_DURATION,
            base,
            finished: false,
        }
    }

    /// Advance the frame if the next deadline has passed
    ///
    /// Each firing programs the next symbol tone; the firing after the
    /// last symbol disables the output and finishes the session.
    pub fn update<D: OscillatorDriver>(
        &mut self,
        now: Instant,
        symbols: &SymbolBuffer,
        driver: &mut D,
    ) -> SessionStatus {
        if self.finished {
            return SessionStatus::Finished;
        }
        if now < self.next_deadline {
            return SessionStatus::Running;
        }

        self.next_deadline += WSPR_SYMBOL_DURATION;

        match symbols.get(self.cursor) {
            Some(symbol) if self.cursor < WSPR_SYMBOL_COUNT => {
                driver.set_frequency(Self::tone(self.base, symbol));
                self.cursor += 1;
                SessionStatus::Running
            }
            _ => {
                driver.disable();
                self.finished = true;
                SessionStatus::Finished
            }
        }
    }

    /// Carrier frequency for a symbol value
    #[must_use]
    pub fn tone(base: Frequency, symbol: u8) -> Frequency {
        base.offset(f64::from(symbol) * WSPR_TONE_SPACING_HZ)
    }

    /// Symbols sent so far
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Deadline of the next firing
    #[must_use]
    pub const fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    /// Base carrier of this frame
    #[must_use]
    pub const fn base(&self) -> Frequency {
        self.base
    }

    /// Whether the frame has completed
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Carrier {
        freq: Option<Frequency>,
        sets: usize,
    }

    impl OscillatorDriver for Carrier {
        fn set_frequency(&mut self, freq: Frequency) {
            self.freq = Some(freq);
            self.sets += 1;
        }
        fn disable(&mut self) {
            self.freq = None;
        }
        fn is_enabled(&self) -> bool {
            self.freq.is_some()
        }
    }

    fn ramp() -> SymbolBuffer {
        let raw: [u8; 162] = core::array::from_fn(|i| (i % 4) as u8);
        SymbolBuffer::from_symbols(&raw).unwrap()
    }

    #[test]
    fn start_keys_base() {
        let mut carrier = Carrier::default();
        let base = Frequency::from_hz(14_095_600.0);
        let s = WsprSession::start(Instant::ZERO, base, &mut carrier);
        assert_eq!(carrier.freq, Some(base));
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.next_deadline(), Instant::from_micros(682_667));
    }

    #[test]
    fn no_change_before_deadline() {
        let mut carrier = Carrier::default();
        let buf = ramp();
        let mut s = WsprSession::start(Instant::ZERO, Frequency::from_hz(7_038_600.0), &mut carrier);
        let status = s.update(Instant::from_micros(682_666), &buf, &mut carrier);
        assert_eq!(status, SessionStatus::Running);
        assert_eq!(s.cursor(), 0);
        assert_eq!(carrier.sets, 1);
    }

    #[test]
    fn late_poll_does_not_shift_schedule() {
        let mut carrier = Carrier::default();
        let buf = ramp();
        let mut s = WsprSession::start(Instant::ZERO, Frequency::from_hz(7_038_600.0), &mut carrier);
        s.update(Instant::from_micros(690_000), &buf, &mut carrier);
        assert_eq!(s.next_deadline(), Instant::from_micros(2 * 682_667));
    }

    #[test]
    fn tone_offsets() {
        let base = Frequency::from_hz(14_095_600.0);
        let t3 = WsprSession::tone(base, 3);
        assert!((t3.as_hz() - (14_095_600.0 + 3.0 * 1.4648)).abs() < 1e-6);
        assert_eq!(WsprSession::tone(base, 0), base);
    }
}
