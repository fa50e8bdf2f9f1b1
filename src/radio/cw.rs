//! CW Identification
//!
//! Keys a fixed message in Morse by switching the carrier on and off.
//! Timing follows the PARIS standard: one dot is `1200 / WPM` ms.
//!
//! | Gap               | Total | Added after the element space |
//! |-------------------|-------|-------------------------------|
//! | between elements  | 1 dot | 0                             |
//! | between characters| 3 dots| 2                             |
//! | between words     | 7 dots| 6                             |

use super::wspr::SessionStatus;
use crate::encoding::morse::{MorsePattern, MorseTable};
use crate::synth::OscillatorDriver;
use crate::types::{Duration, Frequency, Instant};

/// Extra dots added before a new character
const CHAR_GAP_DOTS: u64 = 2;

/// Extra dots added for a word separator
const WORD_GAP_DOTS: u64 = 6;

/// Keying phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CwPhase {
    /// Between characters or not yet keyed
    #[default]
    Idle,
    /// Carrier on for a dot or dash
    Tone,
    /// Carrier off after an element
    Space,
}

#[cfg(feature = "embedded")]
impl defmt::Format for CwPhase {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "Idle"),
            Self::Tone => defmt::write!(f, "Tone"),
            Self::Space => defmt::write!(f, "Space"),
        }
    }
}

/// Dot length for a keying speed
///
/// A speed of zero is treated as 1 WPM.
#[must_use]
#[allow(clippy::cast_lossless)]
pub const fn dot_duration(wpm: u32) -> Duration {
    let wpm = if wpm == 0 { 1 } else { wpm };
    Duration::from_micros(1_200_000 / wpm as u64)
}

/// One pass of the CW message
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CwSession {
    message: &'static str,
    char_index: usize,
    element_index: usize,
    pattern: MorsePattern,
    phase: CwPhase,
    next_deadline: Instant,
    dot: Duration,
    carrier: Frequency,
    finished: bool,
}

impl CwSession {
    /// Arm the session with the first character due immediately
    #[must_use]
    pub fn start(now: Instant, message: &'static str, wpm: u32, carrier: Frequency) -> Self {
        let pattern = message
            .chars()
            .next()
            .map_or(MorsePattern::EMPTY, MorseTable::pattern);
        Self {
            message,
            char_index: 0,
            element_index: 0,
            pattern,
            phase: CwPhase::Idle,
            next_deadline: now,
            dot: dot_duration(wpm),
            carrier,
            finished: false,
        }
    }

    /// Advance the keying if the next deadline has passed
    pub fn update<D: OscillatorDriver>(&mut self, now: Instant, driver: &mut D) -> SessionStatus {
        if self.finished {
            return SessionStatus::Finished;
        }
        if now < self.next_deadline {
            return SessionStatus::Running;
        }

        if self.phase == CwPhase::Tone {
            driver.disable();
            self.phase = CwPhase::Space;
            self.next_deadline = now + self.dot;
            return SessionStatus::Running;
        }

        let Some(element) = self.pattern.get(self.element_index) else {
            return self.next_character(now, driver);
        };

        driver.set_frequency(self.carrier);
        self.phase = CwPhase::Tone;
        self.next_deadline = now + self.dot * u64::from(element.units());
        self.element_index += 1;
        SessionStatus::Running
    }

    /// Move on once the current pattern is exhausted
    fn next_character<D: OscillatorDriver>(
        &mut self,
        now: Instant,
        driver: &mut D,
    ) -> SessionStatus {
        self.char_index += 1;
        self.element_index = 0;

        match self.message.as_bytes().get(self.char_index).map(|&b| char::from(b)) {
            None => {
                driver.disable();
                self.phase = CwPhase::Idle;
                self.pattern = MorsePattern::EMPTY;
                self.finished = true;
                SessionStatus::Finished
            }
            Some(c) if MorseTable::is_word_separator(c) => {
                self.pattern = MorsePattern::EMPTY;
                self.next_deadline = now + self.dot * WORD_GAP_DOTS;
                SessionStatus::Running
            }
            Some(c) => {
                self.pattern = MorseTable::pattern(c);
                self.next_deadline = now + self.dot * CHAR_GAP_DOTS;
                SessionStatus::Running
            }
        }
    }

    /// Current keying phase
    #[must_use]
    pub const fn phase(&self) -> CwPhase {
        self.phase
    }

    /// Index of the character being sent
    #[must_use]
    pub const fn char_index(&self) -> usize {
        self.char_index
    }

    /// Index of the next element within the current character
    #[must_use]
    pub const fn element_index(&self) -> usize {
        self.element_index
    }

    /// Deadline of the next transition
    #[must_use]
    pub const fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    /// Dot length in use
    #[must_use]
    pub const fn dot(&self) -> Duration {
        self.dot
    }

    /// Message being sent
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.message
    }

    /// Whether the message has been sent
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }
}
