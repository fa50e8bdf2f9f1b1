//! Shared types used across the beacon firmware
//!
//! This module defines domain-specific types for frequencies, monotonic
//! time and wall-clock time. Keeping them independent of the hardware
//! timers lets the state machines run unchanged on the host.

use core::fmt;
use core::ops::{Add, AddAssign, Mul, Sub};

/// Frequency in Hertz
///
/// Stored as `f64` because WSPR tone offsets are fractions of a hertz.
/// No range is enforced here: the synthesizer treats anything below
/// [`Frequency::MIN_HZ`] as a request to switch the carrier off.
#[derive(Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Frequency(f64);

impl Frequency {
    /// Lowest frequency the synthesizer will program (100 kHz)
    pub const MIN_HZ: f64 = 100_000.0;

    /// Create a frequency from Hz
    #[must_use]
    pub const fn from_hz(hz: f64) -> Self {
        Self(hz)
    }

    /// Get the frequency in Hz
    #[must_use]
    pub const fn as_hz(self) -> f64 {
        self.0
    }

    /// Get the frequency in whole kHz (truncated)
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_khz(self) -> u32 {
        (self.0 / 1000.0) as u32
    }

    /// Shift the frequency by an offset in Hz
    #[must_use]
    pub fn offset(self, hz: f64) -> Self {
        Self(self.0 + hz)
    }

    /// Check whether the synthesizer accepts this frequency
    #[must_use]
    pub fn is_synthesizable(self) -> bool {
        self.0 >= Self::MIN_HZ
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({:.4} Hz)", self.0)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} Hz", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Frequency {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn format(&self, f: defmt::Formatter) {
        // Millihertz keeps the tone offsets visible without float formatting
        let mhz = (self.0 * 1000.0) as u64;
        defmt::write!(f, "{}.{=u64:03} Hz", mhz / 1000, mhz % 1000);
    }
}

/// Span of monotonic time in microseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(u64);

impl Duration {
    /// Zero-length duration
    pub const ZERO: Self = Self(0);

    /// Create from microseconds
    #[must_use]
    pub const fn from_micros(us: u64) -> Self {
        Self(us)
    }

    /// Create from milliseconds
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms * 1_000)
    }

    /// Create from seconds
    #[must_use]
    pub const fn from_secs(s: u64) -> Self {
        Self(s * 1_000_000)
    }

    /// Get the duration in microseconds
    #[must_use]
    pub const fn as_micros(self) -> u64 {
        self.0
    }

    /// Get the duration in whole milliseconds
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0 / 1_000
    }

    /// Get the duration in whole seconds
    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0 / 1_000_000
    }
}

impl Mul<u64> for Duration {
    type Output = Self;

    fn mul(self, rhs: u64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Duration {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}us", self.0);
    }
}

/// Point on the monotonic clock, in microseconds since boot
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Instant(u64);

impl Instant {
    /// Clock origin
    pub const ZERO: Self = Self(0);

    /// Create from microseconds since boot
    #[must_use]
    pub const fn from_micros(us: u64) -> Self {
        Self(us)
    }

    /// Create from milliseconds since boot
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms * 1_000)
    }

    /// Create from seconds since boot
    #[must_use]
    pub const fn from_secs(s: u64) -> Self {
        Self(s * 1_000_000)
    }

    /// Microseconds since boot
    #[must_use]
    pub const fn as_micros(self) -> u64 {
        self.0
    }

    /// Time elapsed since an earlier instant (zero if `earlier` is later)
    #[must_use]
    pub const fn saturating_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Instant {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign<Duration> for Instant {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0;
    }
}

impl Sub for Instant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.saturating_since(rhs)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Instant {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "T+{}us", self.0);
    }
}

/// UTC wall-clock time, decomposed from epoch seconds
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcTime {
    epoch_secs: u64,
}

impl UtcTime {
    /// Create from seconds since the Unix epoch
    #[must_use]
    pub const fn from_epoch(epoch_secs: u64) -> Self {
        Self { epoch_secs }
    }

    /// Seconds since the Unix epoch
    #[must_use]
    pub const fn epoch_secs(self) -> u64 {
        self.epoch_secs
    }

    /// Minutes since the Unix epoch
    #[must_use]
    pub const fn epoch_minute(self) -> u64 {
        self.epoch_secs / 60
    }

    /// Hour of day (0-23)
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn hour(self) -> u8 {
        ((self.epoch_secs / 3600) % 24) as u8
    }

    /// Minute of hour (0-59)
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn minute(self) -> u8 {
        ((self.epoch_secs / 60) % 60) as u8
    }

    /// Second of minute (0-59)
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn second(self) -> u8 {
        (self.epoch_secs % 60) as u8
    }
}

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for UtcTime {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{=u8:02}:{=u8:02}:{=u8:02}Z",
            self.hour(),
            self.minute(),
            self.second()
        );
    }
}

/// Transmission mode of the beacon
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    /// Carrier off, waiting for the next slot
    #[default]
    Idle,
    /// Sending the WSPR frame
    Wspr,
    /// Sending the Morse identification
    Cw,
}

impl Mode {
    /// Short label used by the status line
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Wspr => "WSPR",
            Self::Cw => "CW",
        }
    }

    /// Numeric code used by the serial console
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Wspr => 1,
            Self::Cw => 2,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Mode {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.label());
    }
}
