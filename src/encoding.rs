//! Message Encoding
//!
//! Converts the station identity into what the transmitters key:
//! - Morse patterns for the CW identification
//! - WSPR channel symbols for the digital frame

pub mod morse;
pub mod wspr;

pub use morse::{MorseElement, MorsePattern, MorseTable};
pub use wspr::{encode, EncodeError, SymbolBuffer, SymbolError};
