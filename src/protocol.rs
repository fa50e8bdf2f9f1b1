//! Serial Console Protocol
//!
//! Kenwood-style two-letter commands terminated by `;`, used to set the
//! beacon's clock and read its state over a UART.
//!
//! | Command       | Response                          |
//! |---------------|-----------------------------------|
//! | `TM;`         | `TM<epoch:010>;` or `TM?;`        |
//! | `TM<digits>;` | sets UTC epoch seconds, then `TM` |
//! | `ST;`         | `ST<mode><done:03><total:03>;`    |
//! | anything else | `?;`                              |
//!
//! Epochs above [`MAX_EPOCH_SECS`] are rejected as unknown.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::config::{CONSOLE_BUFFER_SIZE, MAX_EPOCH_SECS};
use crate::status::StatusSnapshot;
use crate::types::UtcTime;

/// Maximum command length
pub const MAX_CMD_LEN: usize = CONSOLE_BUFFER_SIZE;

/// Console command parser
pub struct CommandParser {
    /// Command buffer
    buffer: Vec<u8, MAX_CMD_LEN>,
}

impl CommandParser {
    /// Create a new parser
    #[must_use]
    pub const fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Feed a byte to the parser
    /// Returns a command if one is complete
    pub fn feed(&mut self, byte: u8) -> Option<Command> {
        match byte {
            b';' => {
                let cmd = self.parse_buffer();
                self.buffer.clear();
                Some(cmd)
            }
            // Ignore line endings
            b'\r' | b'\n' => None,
            _ => {
                // Overlong input is dropped whole
                if self.buffer.push(byte).is_err() {
                    self.buffer.clear();
                }
                None
            }
        }
    }

    /// Parse the current buffer as a command
    fn parse_buffer(&self) -> Command {
        let Ok(cmd) = core::str::from_utf8(&self.buffer) else {
            return Command::Unknown;
        };
        let cmd = cmd.trim();
        if cmd.len() < 2 || !cmd.is_char_boundary(2) {
            return Command::Unknown;
        }

        let (name, args) = cmd.split_at(2);
        if name.eq_ignore_ascii_case("TM") {
            Self::parse_time(args)
        } else if name.eq_ignore_ascii_case("ST") && args.is_empty() {
            Command::ReadStatus
        } else {
            Command::Unknown
        }
    }

    fn parse_time(args: &str) -> Command {
        if args.is_empty() {
            return Command::ReadTime;
        }
        if !args.bytes().all(|b| b.is_ascii_digit()) {
            return Command::Unknown;
        }
        match args.parse::<u64>() {
            Ok(epoch) if epoch <= MAX_EPOCH_SECS => Command::SetTime(epoch),
            _ => Command::Unknown,
        }
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Console command parsed from serial input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Read UTC time
    ReadTime,
    /// Set UTC time (epoch seconds)
    SetTime(u64),
    /// Read beacon status
    ReadStatus,
    /// Unknown or malformed command
    Unknown,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Command {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::ReadTime => defmt::write!(f, "ReadTime"),
            Self::SetTime(t) => defmt::write!(f, "SetTime({})", t),
            Self::ReadStatus => defmt::write!(f, "ReadStatus"),
            Self::Unknown => defmt::write!(f, "Unknown"),
        }
    }
}

/// Console response formatter
pub struct Response {
    buffer: String<MAX_CMD_LEN>,
}

impl Response {
    /// Create a new response formatter
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Format the reply to a command given the latest status
    ///
    /// A `SetTime` is acknowledged with the time it sets.
    pub fn reply(&mut self, cmd: Command, snapshot: &StatusSnapshot) {
        match cmd {
            Command::ReadTime => self.time(snapshot.time.map(UtcTime::epoch_secs)),
            Command::SetTime(t) => self.time(Some(t)),
            Command::ReadStatus => self.status(snapshot),
            Command::Unknown => self.unknown(),
        }
    }

    /// Format time response
    pub fn time(&mut self, epoch_secs: Option<u64>) {
        self.buffer.clear();
        let _ = match epoch_secs {
            Some(t) => write!(self.buffer, "TM{t:010};"),
            None => write!(self.buffer, "TM?;"),
        };
    }

    /// Format status response
    pub fn status(&mut self, snapshot: &StatusSnapshot) {
        self.buffer.clear();
        let (done, total) = snapshot.progress.map_or((0, 0), |p| (p.done, p.total));
        let _ = write!(
            self.buffer,
            "ST{}{:03}{:03};",
            snapshot.mode.code(),
            done.min(999),
            total.min(999)
        );
    }

    /// Format error response
    pub fn unknown(&mut self) {
        self.buffer.clear();
        let _ = self.buffer.push_str("?;");
    }

    /// Get the response string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Get the response bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
