//! WSPR Channel Symbols
//!
//! Builds the 162-symbol type-1 WSPR frame for a callsign, 4-character
//! locator and power level, and holds the result in a validated buffer.
//!
//! # Theory of Operation
//!
//! 1. Pack callsign (28 bits), locator (15 bits) and power (7 bits) into
//!    50 bits, followed by 31 zero tail bits.
//! 2. Convolve with a K=32, r=1/2 code, giving 162 bits.
//! 3. Interleave by 8-bit bit reversal of the bit index.
//! 4. Merge with the sync vector: `symbol = sync + 2 × data`.

use core::fmt;

use crate::config::WSPR_SYMBOL_COUNT;

/// Convolutional code polynomials
const POLY_A: u32 = 0xF2D0_5351;
const POLY_B: u32 = 0xE461_3C47;

/// Packed message plus tail bits
const MESSAGE_BITS: usize = 81;

/// Pseudo-random sync vector
const SYNC_VECTOR: [u8; WSPR_SYMBOL_COUNT] = [
    1, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 1, 1, 0, 0, 0, 1, 0, //
    0, 1, 0, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 1, //
    0, 0, 0, 0, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 0, 1, //
    1, 0, 1, 0, 0, 0, 0, 1, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 0, 1, //
    0, 0, 1, 0, 1, 1, 0, 0, 0, 1, 1, 0, 1, 0, 1, 0, 0, 0, 1, 0, //
    0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 1, 1, 1, 0, 1, 1, 0, 0, 1, 1, //
    0, 1, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 1, 0, 1, 0, 0, 1, 1, //
    0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 1, 0, 1, 1, 0, 0, 0, 1, 1, 0, //
    0, 0,
];

/// Power levels that can be encoded, in dBm
pub const VALID_POWER_DBM: [u8; 19] = [
    0, 3, 7, 10, 13, 17, 20, 23, 27, 30, 33, 37, 40, 43, 47, 50, 53, 57, 60,
];

/// Rejected raw symbol data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolError {
    /// Slice length is not 162
    WrongLength(usize),
    /// Symbol value above 3
    OutOfRange {
        /// Position of the bad symbol
        index: usize,
        /// Value found there
        value: u8,
    },
}

impl fmt::Display for SymbolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength(len) => {
                write!(f, "expected {WSPR_SYMBOL_COUNT} symbols, got {len}")
            }
            Self::OutOfRange { index, value } => {
                write!(f, "symbol {index} is {value}, must be 0-3")
            }
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SymbolError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::WrongLength(len) => defmt::write!(f, "WrongLength({})", len),
            Self::OutOfRange { index, value } => {
                defmt::write!(f, "OutOfRange({}={})", index, value);
            }
        }
    }
}

/// Rejected message fields
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// Callsign cannot be packed into 28 bits
    InvalidCallsign,
    /// Locator is not a valid 4 or 6 character Maidenhead square
    InvalidLocator,
    /// Power is not one of the standard levels
    InvalidPower(u8),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCallsign => write!(f, "invalid callsign"),
            Self::InvalidLocator => write!(f, "invalid locator"),
            Self::InvalidPower(dbm) => write!(f, "invalid power {dbm} dBm"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for EncodeError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::InvalidCallsign => defmt::write!(f, "InvalidCallsign"),
            Self::InvalidLocator => defmt::write!(f, "InvalidLocator"),
            Self::InvalidPower(dbm) => defmt::write!(f, "InvalidPower({})", dbm),
        }
    }
}

/// The 162 channel symbols of one WSPR frame, each in 0..=3
#[derive(Clone, PartialEq, Eq)]
pub struct SymbolBuffer {
    symbols: [u8; WSPR_SYMBOL_COUNT],
}

impl SymbolBuffer {
    /// Number of symbols in every buffer
    pub const LEN: usize = WSPR_SYMBOL_COUNT;

    /// Build a buffer from raw symbols
    ///
    /// # Errors
    ///
    /// Returns `SymbolError` if the slice is not 162 long or holds a value
    /// above 3.
    pub fn from_symbols(raw: &[u8]) -> Result<Self, SymbolError> {
        if raw.len() != Self::LEN {
            return Err(SymbolError::WrongLength(raw.len()));
        }
        if let Some((index, &value)) = raw.iter().enumerate().find(|&(_, &v)| v > 3) {
            return Err(SymbolError::OutOfRange { index, value });
        }

        let mut symbols = [0u8; WSPR_SYMBOL_COUNT];
        symbols.copy_from_slice(raw);
        Ok(Self { symbols })
    }

    /// Symbol at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.symbols.get(index).copied()
    }

    /// Always 162
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        Self::LEN
    }

    /// Symbols as a slice
    #[must_use]
    pub const fn as_slice(&self) -> &[u8] {
        &self.symbols
    }

    /// Iterate over the symbols
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.symbols.iter().copied()
    }
}

impl fmt::Debug for SymbolBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolBuffer")
            .field("first", &&self.symbols[..8])
            .finish_non_exhaustive()
    }
}

/// Encode a type-1 WSPR message
///
/// The locator may have 4 or 6 characters; only the first 4 are sent.
///
/// # Errors
///
/// Returns `EncodeError` for a callsign, locator or power that cannot be
/// represented in a type-1 message.
pub fn encode(callsign: &str, locator: &str, power_dbm: u8) -> Result<SymbolBuffer, EncodeError> {
    let n = pack_callsign(callsign)?;
    let m = pack_locator(locator)? * 128 + pack_power(power_dbm)?;

    let message = pack_message(n, m);
    let coded = convolve(&message);
    let data = interleave(&coded);

    let mut symbols = [0u8; WSPR_SYMBOL_COUNT];
    for (i, symbol) in symbols.iter_mut().enumerate() {
        *symbol = SYNC_VECTOR[i] + 2 * data[i];
    }
    Ok(SymbolBuffer { symbols })
}

/// Value of a callsign/locator character in the packing alphabet
fn char_value(c: u8) -> Option<u32> {
    match c {
        b'0'..=b'9' => Some(u32::from(c - b'0')),
        b'A'..=b'Z' => Some(u32::from(c - b'A') + 10),
        b' ' => Some(36),
        _ => None,
    }
}

/// Pack a callsign into 28 bits
///
/// A callsign whose digit sits in the second position gets a leading
/// space so the digit lands in the third. Characters past the sixth are
/// dropped, as the reference encoder does.
fn pack_callsign(callsign: &str) -> Result<u32, EncodeError> {
    let raw = callsign.as_bytes();
    if raw.is_empty() || raw.len() > 6 || !raw.iter().all(u8::is_ascii_alphanumeric) {
        return Err(EncodeError::InvalidCallsign);
    }

    let mut call = [b' '; 7];
    let shift = usize::from(raw.len() >= 3 && !raw[2].is_ascii_digit() && raw[1].is_ascii_digit());
    for (dst, src) in call[shift..].iter_mut().zip(raw) {
        *dst = src.to_ascii_uppercase();
    }
    let call = &call[..6];

    if !call[2].is_ascii_digit() {
        return Err(EncodeError::InvalidCallsign);
    }

    let value = |i: usize| char_value(call[i]).ok_or(EncodeError::InvalidCallsign);
    let mut n = value(0)?;
    n = n * 36 + value(1)?;
    n = n * 10 + value(2)?;
    for i in 3..6 {
        // Suffix positions only hold letters or space
        let v = value(i)?;
        if v < 10 {
            return Err(EncodeError::InvalidCallsign);
        }
        n = n * 27 + (v - 10);
    }
    Ok(n)
}

/// Pack a Maidenhead square into 15 bits
fn pack_locator(locator: &str) -> Result<u32, EncodeError> {
    let loc = locator.as_bytes();
    if loc.len() != 4 && loc.len() != 6 {
        return Err(EncodeError::InvalidLocator);
    }

    let field = |c: u8| match c.to_ascii_uppercase() {
        f @ b'A'..=b'R' => Ok(u32::from(f - b'A')),
        _ => Err(EncodeError::InvalidLocator),
    };
    let square = |c: u8| match c {
        b'0'..=b'9' => Ok(u32::from(c - b'0')),
        _ => Err(EncodeError::InvalidLocator),
    };
    if loc.len() == 6 && !loc[4..].iter().all(u8::is_ascii_alphabetic) {
        return Err(EncodeError::InvalidLocator);
    }

    Ok((179 - 10 * field(loc[0])? - square(loc[2])?) * 180 + 10 * field(loc[1])? + square(loc[3])?)
}

/// Pack a power level into 7 bits
fn pack_power(power_dbm: u8) -> Result<u32, EncodeError> {
    if VALID_POWER_DBM.contains(&power_dbm) {
        Ok(u32::from(power_dbm) + 64)
    } else {
        Err(EncodeError::InvalidPower(power_dbm))
    }
}

/// Lay the 28-bit callsign and 22-bit locator/power out MSB first
#[allow(clippy::cast_possible_truncation)]
fn pack_message(n: u32, m: u32) -> [u8; 11] {
    let mut c = [0u8; 11];
    c[0] = (n >> 20) as u8;
    c[1] = (n >> 12) as u8;
    c[2] = (n >> 4) as u8;
    c[3] = (((n & 0x0f) << 4) | ((m >> 18) & 0x0f)) as u8;
    c[4] = (m >> 10) as u8;
    c[5] = (m >> 2) as u8;
    c[6] = ((m & 0x03) << 6) as u8;
    c
}

/// Rate 1/2 convolutional code over the first 81 bits
fn convolve(message: &[u8; 11]) -> [u8; WSPR_SYMBOL_COUNT] {
    let mut out = [0u8; WSPR_SYMBOL_COUNT];
    let mut reg: u32 = 0;

    for i in 0..MESSAGE_BITS {
        let bit = (message[i / 8] >> (7 - i % 8)) & 1;
        reg = (reg << 1) | u32::from(bit);
        out[2 * i] = parity(reg & POLY_A);
        out[2 * i + 1] = parity(reg & POLY_B);
    }
    out
}

#[allow(clippy::cast_possible_truncation)]
const fn parity(x: u32) -> u8 {
    (x.count_ones() & 1) as u8
}

/// Scatter bits to their bit-reversed 8-bit index, skipping indexes ≥ 162
fn interleave(bits: &[u8; WSPR_SYMBOL_COUNT]) -> [u8; WSPR_SYMBOL_COUNT] {
    let mut out = [0u8; WSPR_SYMBOL_COUNT];
    let mut next = 0;

    for j in 0..=u8::MAX {
        let rev = usize::from(j.reverse_bits());
        if rev < WSPR_SYMBOL_COUNT {
            out[rev] = bits[next];
            next += 1;
        }
    }
    out
}
