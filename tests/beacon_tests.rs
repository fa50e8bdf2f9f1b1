//! Beacon Controller Tests
//!
//! Tests for scheduling, mode exclusivity and the idle-means-silent rule,
//! driven through the same clock and status plumbing as the firmware.
//! Run with: cargo test --no-default-features --features std --test beacon_tests

use wspr_beacon::clock::{SyncedClock, TimeSource};
use wspr_beacon::config::{CW_START_SECOND, WSPR_START_SECOND};
use wspr_beacon::encoding::wspr::{encode, SymbolBuffer};
use wspr_beacon::radio::{
    BeaconEvent, BeaconState, TransmissionScheduler, TransmissionSession, Trigger,
};
use wspr_beacon::status::{StatusSink, StatusSnapshot, StatusTicker};
use wspr_beacon::synth::OscillatorDriver;
use wspr_beacon::types::{Duration, Frequency, Instant, Mode, UtcTime};

/// 2023-11-14 22:00:00 UTC, start of an even minute
const HOUR: u64 = 1_699_999_200;

#[derive(Default)]
struct Carrier {
    on: bool,
    changes: u32,
}

impl OscillatorDriver for Carrier {
    fn set_frequency(&mut self, _freq: Frequency) {
        self.on = true;
        self.changes += 1;
    }

    fn disable(&mut self) {
        self.on = false;
    }

    fn is_enabled(&self) -> bool {
        self.on
    }
}

#[derive(Default)]
struct RecordingSink {
    snapshots: Vec<StatusSnapshot>,
}

impl StatusSink for RecordingSink {
    fn publish(&mut self, snapshot: &StatusSnapshot) {
        self.snapshots.push(*snapshot);
    }
}

fn symbols() -> SymbolBuffer {
    encode("K1ABC", "FN42", 37).unwrap()
}

/// Runs the control loop like the firmware task does
struct Harness {
    beacon: BeaconState,
    clock: SyncedClock,
    carrier: Carrier,
    ticker: StatusTicker,
    sink: RecordingSink,
    now: Instant,
    events: Vec<(Instant, BeaconEvent)>,
}

impl Harness {
    fn new(beacon: BeaconState, epoch: u64) -> Self {
        let mut clock = SyncedClock::new();
        clock.sync(epoch, Instant::ZERO);
        Self {
            beacon,
            clock,
            carrier: Carrier::default(),
            ticker: StatusTicker::new(Duration::from_secs(1)),
            sink: RecordingSink::default(),
            now: Instant::ZERO,
            events: Vec::new(),
        }
    }

    fn run_for(&mut self, span: Duration) {
        let end = self.now + span;
        while self.now < end {
            let utc = self.clock.utc_at(self.now);
            if let Some(event) = self.beacon.tick(self.now, utc, &mut self.carrier) {
                self.events.push((self.now, event));
            }
            if self.beacon.mode() == Mode::Idle {
                assert!(!self.carrier.on, "carrier on while idle at {:?}", self.now);
            }
            let snapshot = self.beacon.snapshot(utc);
            self.ticker.publish_if_due(self.now, &snapshot, &mut self.sink);
            self.now += Duration::from_millis(5);
        }
    }

    fn starts(&self) -> Vec<Mode> {
        self.events
            .iter()
            .filter_map(|(_, e)| match e {
                BeaconEvent::Started { mode, .. } => Some(*mode),
                BeaconEvent::Finished { .. } => None,
            })
            .collect()
    }
}

// =============================================================================
// Scheduler Tests
// =============================================================================

#[test]
fn scheduler_slots() {
    let s = TransmissionScheduler::new();
    assert_eq!(s.evaluate(UtcTime::from_epoch(HOUR + 1)), Some(Trigger::Wspr));
    assert_eq!(s.evaluate(UtcTime::from_epoch(HOUR + 70)), Some(Trigger::Cw));
    assert_eq!(s.evaluate(UtcTime::from_epoch(HOUR + 61)), None);
    assert_eq!(s.evaluate(UtcTime::from_epoch(HOUR + 10)), None);
    assert_eq!(s.evaluate(UtcTime::from_epoch(HOUR + 2)), None);
    assert_eq!(WSPR_START_SECOND, 1);
    assert_eq!(CW_START_SECOND, 10);
}

#[test]
fn one_wspr_start_per_trigger_second() {
    let mut h = Harness::new(BeaconState::new(symbols()), HOUR);
    h.run_for(Duration::from_millis(1_995));

    assert_eq!(h.starts(), vec![Mode::Wspr]);
    let (at, event) = h.events[0];
    assert_eq!(at, Instant::from_secs(1));
    assert_eq!(
        event,
        BeaconEvent::Started {
            mode: Mode::Wspr,
            at: UtcTime::from_epoch(HOUR + 1)
        }
    );
}

#[test]
fn nothing_starts_without_time() {
    let mut beacon = BeaconState::new(symbols());
    let mut carrier = Carrier::default();
    let mut now = Instant::ZERO;
    for _ in 0..1_000 {
        assert_eq!(beacon.tick(now, None, &mut carrier), None);
        now += Duration::from_millis(5);
    }
    assert!(beacon.session().is_idle());
    assert_eq!(carrier.changes, 0);
}

#[test]
fn completed_session_not_restarted_in_same_minute() {
    // A one-character CW message finishes well inside its trigger second
    let beacon = BeaconState::with_settings(
        symbols(),
        Frequency::from_hz(14_095_600.0),
        "E",
        20,
        TransmissionScheduler::new(),
    );
    let mut h = Harness::new(beacon, HOUR + 60 + 9);
    h.run_for(Duration::from_secs(3));

    assert_eq!(h.starts(), vec![Mode::Cw]);
    assert!(matches!(
        h.events.last(),
        Some((_, BeaconEvent::Finished { mode: Mode::Cw }))
    ));
}

#[test]
fn maximum_epoch_keeps_running() {
    // Clock pinned at the top of its range must not panic the loop
    let mut h = Harness::new(BeaconState::new(symbols()), u64::MAX);
    h.run_for(Duration::from_secs(2));
    assert!(h.clock.utc_at(h.now).is_some());
}

// =============================================================================
// Full Cycle Tests
// =============================================================================

#[test]
fn wspr_frame_runs_to_completion() {
    let mut h = Harness::new(BeaconState::new(symbols()), HOUR);
    h.run_for(Duration::from_secs(115));

    let finished: Vec<_> = h
        .events
        .iter()
        .filter(|(_, e)| matches!(e, BeaconEvent::Finished { mode: Mode::Wspr }))
        .collect();
    assert_eq!(finished.len(), 1);

    // 163 symbol periods after the start at 1 s, within one poll
    let expected = Instant::from_secs(1) + Duration::from_micros(682_667) * 163;
    let (at, _) = finished[0];
    assert!(*at >= expected && *at - expected < Duration::from_millis(5));
    assert!(h.beacon.session().is_idle());
    assert!(!h.carrier.on);
    // Initial tone plus 162 symbols
    assert_eq!(h.carrier.changes, 163);
}

#[test]
fn wspr_frame_covers_cw_slot() {
    // Even-minute frame still running at :10 of the odd minute
    let mut h = Harness::new(BeaconState::new(symbols()), HOUR);
    h.run_for(Duration::from_secs(125));
    assert_eq!(h.starts(), vec![Mode::Wspr, Mode::Wspr]);
}

#[test]
fn cw_runs_when_beacon_idle() {
    let mut h = Harness::new(BeaconState::new(symbols()), HOUR + 60);
    h.run_for(Duration::from_secs(30));

    assert_eq!(h.starts(), vec![Mode::Cw]);
    assert!(matches!(
        h.events.last(),
        Some((_, BeaconEvent::Finished { mode: Mode::Cw }))
    ));
    assert!(!h.carrier.on);
}

#[test]
fn modes_never_overlap() {
    let mut h = Harness::new(BeaconState::new(symbols()), HOUR + 60);
    h.run_for(Duration::from_secs(250));

    // Every start is preceded by the finish of the previous session
    let mut active: Option<Mode> = None;
    for (_, event) in &h.events {
        match event {
            BeaconEvent::Started { mode, .. } => {
                assert_eq!(active, None);
                active = Some(*mode);
            }
            BeaconEvent::Finished { mode } => {
                assert_eq!(active, Some(*mode));
                active = None;
            }
        }
    }
}

// =============================================================================
// Status Tests
// =============================================================================

#[test]
fn status_published_once_per_second() {
    let mut h = Harness::new(BeaconState::new(symbols()), HOUR);
    h.run_for(Duration::from_secs(10));

    assert_eq!(h.sink.snapshots.len(), 10);
    let first = h.sink.snapshots[0];
    assert_eq!(first.mode, Mode::Idle);
    assert_eq!(first.time, Some(UtcTime::from_epoch(HOUR)));
    assert!(h.sink.snapshots[1..].iter().all(|s| s.mode == Mode::Wspr));
}

#[test]
fn snapshot_tracks_wspr_progress() {
    let mut h = Harness::new(BeaconState::new(symbols()), HOUR);
    h.run_for(Duration::from_secs(11));

    let snapshot = h.beacon.snapshot(h.clock.utc_at(h.now));
    let progress = snapshot.progress.unwrap();
    assert_eq!(progress.total, 162);
    // Ten seconds in is about 14 symbols
    assert_eq!(progress.done, 14);
    assert!(matches!(h.beacon.session(), TransmissionSession::Wspr(_)));
}
