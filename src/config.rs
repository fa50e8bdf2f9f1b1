//! Beacon configuration and hardware constants
//!
//! This module defines compile-time constants for the beacon. Station
//! identity, band plan, synthesizer limits, timing and pin mappings are
//! centralized here; nothing is configurable at runtime.

use crate::types::{Duration, Frequency};

/// Station callsign
pub const CALLSIGN: &str = "N0CALL";

/// Maidenhead grid locator (4 or 6 characters, only 4 are sent in WSPR)
pub const GRID_LOCATOR: &str = "AA00aa";

/// Reported transmit power in dBm
pub const TX_POWER_DBM: u8 = 10;

/// WSPR dial frequency on 20m
pub const WSPR_FREQ_20M_HZ: f64 = 14_095_600.0;

/// WSPR dial frequency on 40m
pub const WSPR_FREQ_40M_HZ: f64 = 7_038_600.0;

/// Carrier frequency used for both WSPR and CW
pub const TARGET_FREQUENCY: Frequency = Frequency::from_hz(WSPR_FREQ_20M_HZ);

/// APLL reference crystal (40 MHz)
pub const XTAL_HZ: f64 = 40_000_000.0;

/// Lower bound of the APLL internal frequency band
pub const APLL_MIN_HZ: f64 = 350_000_000.0;

/// Upper bound of the APLL internal frequency band
pub const APLL_MAX_HZ: f64 = 500_000_000.0;

/// Largest APLL output divider value
pub const APLL_MAX_DIVIDER: u8 = 31;

/// Output divider used when no divider puts the APLL in band
pub const APLL_FALLBACK_DIVIDER: u8 = 6;

/// Number of channel symbols in a WSPR frame
pub const WSPR_SYMBOL_COUNT: usize = 162;

/// WSPR symbol period (8192 / 12000 s)
pub const WSPR_SYMBOL_DURATION: Duration = Duration::from_micros(682_667);

/// Spacing between adjacent WSPR tones in Hz
pub const WSPR_TONE_SPACING_HZ: f64 = 1.4648;

/// Morse speed in words per minute
pub const CW_WPM: u32 = 20;

/// Identification sent in CW: callsign, one space, locator (uppercase)
pub const CW_MESSAGE: &str = "N0CALL AA00AA";

/// Second of an even minute at which WSPR starts
pub const WSPR_START_SECOND: u8 = 1;

/// Second of an odd minute at which CW starts
pub const CW_START_SECOND: u8 = 10;

/// Control loop poll interval in milliseconds
pub const POLL_INTERVAL_MS: u64 = 5;

/// Interval between status snapshots
pub const STATUS_INTERVAL: Duration = Duration::from_secs(1);

/// Serial console buffer size
pub const CONSOLE_BUFFER_SIZE: usize = 64;

/// Serial console baud rate
pub const CONSOLE_BAUD: u32 = 115_200;

/// Largest epoch accepted by `TM<digits>;` (2106-02-07 06:28:15 UTC)
pub const MAX_EPOCH_SECS: u64 = 4_294_967_295;

/// APLL calibration poll limit
pub const APLL_CAL_TIMEOUT_POLLS: u32 = 10_000;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments for the ESP32 devkit wiring

    /// RF output (APLL clock routed through the GPIO matrix)
    pub const RF_OUT: u8 = 27;

    /// Console UART RX
    pub const CONSOLE_RX: u8 = 16;

    /// Console UART TX
    pub const CONSOLE_TX: u8 = 17;
}
