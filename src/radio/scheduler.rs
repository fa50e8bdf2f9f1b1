//! Transmission Scheduler
//!
//! Picks which transmission starts at a given UTC second. WSPR frames
//! begin one second into every even minute; the CW identification goes
//! out in the odd minutes in between.

use crate::config::{CW_START_SECOND, WSPR_START_SECOND};
use crate::types::{Mode, UtcTime};

/// Transmission to start
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Start a WSPR frame
    Wspr,
    /// Start the CW identification
    Cw,
}

impl Trigger {
    /// Mode the beacon enters for this trigger
    #[must_use]
    pub const fn mode(self) -> Mode {
        match self {
            Self::Wspr => Mode::Wspr,
            Self::Cw => Mode::Cw,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Trigger {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Wspr => defmt::write!(f, "WSPR"),
            Self::Cw => defmt::write!(f, "CW"),
        }
    }
}

/// Minute/second slot table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransmissionScheduler {
    wspr_second: u8,
    cw_second: u8,
}

impl TransmissionScheduler {
    /// Scheduler using the configured trigger seconds
    #[must_use]
    pub const fn new() -> Self {
        Self::with_seconds(WSPR_START_SECOND, CW_START_SECOND)
    }

    /// Scheduler with explicit trigger seconds
    #[must_use]
    pub const fn with_seconds(wspr_second: u8, cw_second: u8) -> Self {
        Self {
            wspr_second,
            cw_second,
        }
    }

    /// Decide what, if anything, starts at this time
    ///
    /// Matches the trigger second exactly; a slot whose second is never
    /// observed is skipped until the next one.
    #[must_use]
    pub const fn evaluate(&self, time: UtcTime) -> Option<Trigger> {
        let even_minute = time.minute() % 2 == 0;
        let second = time.second();

        if even_minute && second == self.wspr_second {
            Some(Trigger::Wspr)
        } else if !even_minute && second == self.cw_second {
            Some(Trigger::Cw)
        } else {
            None
        }
    }
}

impl Default for TransmissionScheduler {
    fn default() -> Self {
        Self::new()
    }
}
