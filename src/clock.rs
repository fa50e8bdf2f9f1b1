//! Wall-Clock Time
//!
//! The beacon has no RTC; UTC comes from an external source and is
//! carried forward on the monotonic clock between updates.

use crate::types::{Instant, UtcTime};

/// Source of UTC time at a monotonic instant
pub trait TimeSource {
    /// UTC time at `now`, or `None` while time is unknown
    fn utc_at(&self, now: Instant) -> Option<UtcTime>;
}

/// UTC anchored to the monotonic clock
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncedClock {
    /// Epoch microseconds and the monotonic instant they were taken at
    anchor: Option<(u64, Instant)>,
}

impl SyncedClock {
    /// Clock with no time yet
    #[must_use]
    pub const fn new() -> Self {
        Self { anchor: None }
    }

    /// Set UTC epoch seconds as of the monotonic instant `now`
    pub fn sync(&mut self, epoch_secs: u64, now: Instant) {
        self.anchor = Some((epoch_secs.saturating_mul(1_000_000), now));
    }

    /// Forget the time
    pub fn clear(&mut self) {
        self.anchor = None;
    }

    /// Whether time has been set
    #[must_use]
    pub const fn is_synced(&self) -> bool {
        self.anchor.is_some()
    }
}

impl TimeSource for SyncedClock {
    fn utc_at(&self, now: Instant) -> Option<UtcTime> {
        let (epoch_us, at) = self.anchor?;
        let elapsed = now.saturating_since(at).as_micros();
        Some(UtcTime::from_epoch(epoch_us.saturating_add(elapsed) / 1_000_000))
    }
}
