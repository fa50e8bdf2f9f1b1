//! Beacon Status
//!
//! A compact snapshot of what the beacon is doing, rendered as one text
//! line for the console and log, and a ticker that rate-limits how often
//! snapshots are published.

use core::fmt;

use heapless::String;

use crate::types::{Duration, Instant, Mode, UtcTime};

/// Maximum rendered status line length
pub const STATUS_LINE_LEN: usize = 40;

/// How far a transmission has got
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Units sent (symbols or characters)
    pub done: usize,
    /// Units in the whole transmission
    pub total: usize,
}

/// What the beacon is doing at one instant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    /// Active mode
    pub mode: Mode,
    /// UTC time, if known
    pub time: Option<UtcTime>,
    /// Progress of the active transmission
    pub progress: Option<Progress>,
}

impl StatusSnapshot {
    /// Render into a fixed-capacity string
    #[must_use]
    pub fn render(&self) -> String<STATUS_LINE_LEN> {
        let mut line = String::new();
        // Truncates silently if the line ever outgrows the buffer
        let _ = fmt::write(&mut line, format_args!("{self}"));
        line
    }
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.time {
            Some(t) => write!(f, "{t}")?,
            None => f.write_str("--:--:--")?,
        }

        match (self.mode, self.progress) {
            (Mode::Idle, _) => f.write_str(" IDLE"),
            (Mode::Wspr, Some(p)) => write!(f, " TX WSPR sym {}/{}", p.done, p.total),
            (Mode::Cw, Some(p)) => write!(f, " TX CW chr {}/{}", p.done, p.total),
            (mode, None) => write!(f, " TX {}", mode.label()),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for StatusSnapshot {
    fn format(&self, f: defmt::Formatter) {
        let line = self.render();
        defmt::write!(f, "{=str}", line.as_str());
    }
}

/// Receiver of status snapshots
///
/// Publishing is fire-and-forget; a sink that cannot keep up drops.
pub trait StatusSink {
    /// Accept one snapshot
    fn publish(&mut self, snapshot: &StatusSnapshot);
}

/// Rate limiter for status publication
#[derive(Clone, Copy, Debug)]
pub struct StatusTicker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl StatusTicker {
    /// Ticker firing once per `interval`
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Whether a snapshot is due at `now`
    ///
    /// The first poll is always due. After a long stall the ticker
    /// resumes from `now` instead of catching up.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now < due => false,
            Some(due) if now < due + self.interval => {
                self.next_due = Some(due + self.interval);
                true
            }
            _ => {
                self.next_due = Some(now + self.interval);
                true
            }
        }
    }

    /// Publish to `sink` if due
    pub fn publish_if_due<S: StatusSink>(
        &mut self,
        now: Instant,
        snapshot: &StatusSnapshot,
        sink: &mut S,
    ) -> bool {
        let due = self.poll(now);
        if due {
            sink.publish(snapshot);
        }
        due
    }
}
