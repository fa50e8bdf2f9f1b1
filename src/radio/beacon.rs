//! Beacon Controller
//!
//! Owns everything the control loop needs between ticks: the encoded
//! frame, the scheduler and the active transmission. Exactly one of
//! Idle, WSPR or CW holds at a time, and the carrier is off whenever the
//! beacon is idle.

use super::cw::CwSession;
use super::scheduler::{TransmissionScheduler, Trigger};
use super::wspr::{SessionStatus, WsprSession};
use crate::config::{CW_MESSAGE, CW_WPM, TARGET_FREQUENCY};
use crate::encoding::wspr::SymbolBuffer;
use crate::status::{Progress, StatusSnapshot};
use crate::synth::OscillatorDriver;
use crate::types::{Frequency, Instant, Mode, UtcTime};

/// Active transmission
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum TransmissionSession {
    /// Nothing on air
    #[default]
    Idle,
    /// WSPR frame in progress
    Wspr(WsprSession),
    /// CW identification in progress
    Cw(CwSession),
}

impl TransmissionSession {
    /// Mode this session represents
    #[must_use]
    pub const fn mode(&self) -> Mode {
        match self {
            Self::Idle => Mode::Idle,
            Self::Wspr(_) => Mode::Wspr,
            Self::Cw(_) => Mode::Cw,
        }
    }

    /// Check if no transmission is active
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Notable transitions reported back to the control loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeaconEvent {
    /// A transmission started
    Started {
        /// Mode entered
        mode: Mode,
        /// UTC time of the trigger
        at: UtcTime,
    },
    /// A transmission completed and the carrier is off
    Finished {
        /// Mode left
        mode: Mode,
    },
}

#[cfg(feature = "embedded")]
impl defmt::Format for BeaconEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Started { mode, at } => defmt::write!(f, "{} started at {}", mode, at),
            Self::Finished { mode } => defmt::write!(f, "{} finished", mode),
        }
    }
}

/// Beacon state carried across control-loop ticks
#[derive(Clone, Debug)]
pub struct BeaconState {
    symbols: SymbolBuffer,
    carrier: Frequency,
    cw_message: &'static str,
    cw_wpm: u32,
    scheduler: TransmissionScheduler,
    session: TransmissionSession,
    /// Epoch minute of the last trigger, so a slot fires at most once
    last_trigger_minute: Option<u64>,
}

impl BeaconState {
    /// Beacon with the configured carrier, message and schedule
    #[must_use]
    pub const fn new(symbols: SymbolBuffer) -> Self {
        Self::with_settings(
            symbols,
            TARGET_FREQUENCY,
            CW_MESSAGE,
            CW_WPM,
            TransmissionScheduler::new(),
        )
    }

    /// Beacon with explicit settings
    #[must_use]
    pub const fn with_settings(
        symbols: SymbolBuffer,
        carrier: Frequency,
        cw_message: &'static str,
        cw_wpm: u32,
        scheduler: TransmissionScheduler,
    ) -> Self {
        Self {
            symbols,
            carrier,
            cw_message,
            cw_wpm,
            scheduler,
            session: TransmissionSession::Idle,
            last_trigger_minute: None,
        }
    }

    /// Run one control-loop iteration
    ///
    /// Advances the active session, or while idle asks the scheduler
    /// whether one should start. `utc` is `None` until time is known, in
    /// which case nothing is started.
    pub fn tick<D: OscillatorDriver>(
        &mut self,
        now: Instant,
        utc: Option<UtcTime>,
        driver: &mut D,
    ) -> Option<BeaconEvent> {
        let status = match &mut self.session {
            TransmissionSession::Idle => return self.try_start(now, utc?, driver),
            TransmissionSession::Wspr(s) => s.update(now, &self.symbols, driver),
            TransmissionSession::Cw(s) => s.update(now, driver),
        };

        match status {
            SessionStatus::Running => None,
            SessionStatus::Finished => {
                let mode = self.session.mode();
                self.session = TransmissionSession::Idle;
                Some(BeaconEvent::Finished { mode })
            }
        }
    }

    fn try_start<D: OscillatorDriver>(
        &mut self,
        now: Instant,
        utc: UtcTime,
        driver: &mut D,
    ) -> Option<BeaconEvent> {
        let trigger = self.scheduler.evaluate(utc)?;
        let minute = utc.epoch_minute();
        if self.last_trigger_minute == Some(minute) {
            return None;
        }
        self.last_trigger_minute = Some(minute);

        self.session = match trigger {
            Trigger::Wspr => {
                TransmissionSession::Wspr(WsprSession::start(now, self.carrier, driver))
            }
            Trigger::Cw => TransmissionSession::Cw(CwSession::start(
                now,
                self.cw_message,
                self.cw_wpm,
                self.carrier,
            )),
        };

        Some(BeaconEvent::Started {
            mode: trigger.mode(),
            at: utc,
        })
    }

    /// Current status for display and the console
    #[must_use]
    pub fn snapshot(&self, utc: Option<UtcTime>) -> StatusSnapshot {
        let progress = match &self.session {
            TransmissionSession::Idle => None,
            TransmissionSession::Wspr(s) => Some(Progress {
                done: s.cursor(),
                total: self.symbols.len(),
            }),
            TransmissionSession::Cw(s) => Some(Progress {
                done: s.char_index().min(s.message().len()),
                total: s.message().len(),
            }),
        };

        StatusSnapshot {
            mode: self.session.mode(),
            time: utc,
            progress,
        }
    }

    /// Active session
    #[must_use]
    pub const fn session(&self) -> &TransmissionSession {
        &self.session
    }

    /// Active mode
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.session.mode()
    }

    /// Encoded WSPR frame
    #[must_use]
    pub const fn symbols(&self) -> &SymbolBuffer {
        &self.symbols
    }

    /// Carrier frequency used for both modes
    #[must_use]
    pub const fn carrier(&self) -> Frequency {
        self.carrier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Carrier {
        on: bool,
    }

    impl OscillatorDriver for Carrier {
        fn set_frequency(&mut self, _freq: Frequency) {
            self.on = true;
        }
        fn disable(&mut self) {
            self.on = false;
        }
        fn is_enabled(&self) -> bool {
            self.on
        }
    }

    fn beacon() -> BeaconState {
        BeaconState::new(SymbolBuffer::from_symbols(&[1; 162]).unwrap())
    }

    // Start of an hour, so minute 0 is even
    const HOUR: u64 = 1_699_999_200;

    #[test]
    fn nothing_without_time() {
        let mut b = beacon();
        let mut c = Carrier::default();
        assert_eq!(b.tick(Instant::ZERO, None, &mut c), None);
        assert_eq!(b.mode(), Mode::Idle);
    }

    #[test]
    fn wspr_starts_once_per_slot() {
        let mut b = beacon();
        let mut c = Carrier::default();
        let t = UtcTime::from_epoch(HOUR + 1);
        let ev = b.tick(Instant::ZERO, Some(t), &mut c);
        assert_eq!(ev, Some(BeaconEvent::Started { mode: Mode::Wspr, at: t }));
        assert!(c.on);
        assert_eq!(b.tick(Instant::from_millis(5), Some(t), &mut c), None);
        assert_eq!(b.mode(), Mode::Wspr);
    }

    #[test]
    fn cw_starts_on_odd_minute() {
        let mut b = beacon();
        let mut c = Carrier::default();
        let t = UtcTime::from_epoch(HOUR + 60 + 10);
        let ev = b.tick(Instant::ZERO, Some(t), &mut c);
        assert_eq!(ev, Some(BeaconEvent::Started { mode: Mode::Cw, at: t }));
        // Armed, keyed on the next tick
        assert!(!c.on);
        b.tick(Instant::from_millis(5), Some(t), &mut c);
        assert!(c.on);
    }

    #[test]
    fn snapshot_reports_progress() {
        let mut b = beacon();
        let mut c = Carrier::default();
        let t = UtcTime::from_epoch(HOUR + 1);
        b.tick(Instant::ZERO, Some(t), &mut c);
        let snap = b.snapshot(Some(t));
        assert_eq!(snap.mode, Mode::Wspr);
        assert_eq!(snap.progress, Some(Progress { done: 0, total: 162 }));
    }
}
