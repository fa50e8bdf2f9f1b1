//! CW Identification Tests
//!
//! Tests for Morse keying: element lengths, character and word gaps.
//! Run with: cargo test --no-default-features --features std --test cw_tests

use wspr_beacon::config::{CW_MESSAGE, CW_WPM, WSPR_FREQ_20M_HZ};
use wspr_beacon::radio::cw::dot_duration;
use wspr_beacon::radio::{CwPhase, CwSession, SessionStatus};
use wspr_beacon::synth::OscillatorDriver;
use wspr_beacon::types::{Duration, Frequency, Instant};

/// Driver that only tracks key state
#[derive(Default)]
struct Key {
    down: bool,
    presses: u32,
}

impl OscillatorDriver for Key {
    fn set_frequency(&mut self, _freq: Frequency) {
        if !self.down {
            self.presses += 1;
        }
        self.down = true;
    }

    fn disable(&mut self) {
        self.down = false;
    }

    fn is_enabled(&self) -> bool {
        self.down
    }
}

fn carrier() -> Frequency {
    Frequency::from_hz(WSPR_FREQ_20M_HZ)
}

/// Key a message at 20 WPM with 1 ms polling
///
/// Returns the key transitions as `(ms, down)` and the finishing time.
fn key_message(message: &'static str) -> (Vec<(u64, bool)>, u64) {
    let mut key = Key::default();
    let mut session = CwSession::start(Instant::ZERO, message, 20, carrier());
    let mut edges = Vec::new();

    for ms in 0..600_000 {
        let was_down = key.down;
        let status = session.update(Instant::from_millis(ms), &mut key);
        if key.down != was_down {
            edges.push((ms, key.down));
        }
        if status == SessionStatus::Finished {
            return (edges, ms);
        }
    }
    panic!("message {message:?} never finished");
}

// =============================================================================
// Timing Tests
// =============================================================================

#[test]
fn dot_length_paris() {
    assert_eq!(dot_duration(20), Duration::from_millis(60));
    assert_eq!(dot_duration(12), Duration::from_millis(100));
    assert_eq!(dot_duration(0), Duration::from_millis(1_200));
}

#[test]
fn single_e() {
    let (edges, end) = key_message("E");
    assert_eq!(edges, vec![(0, true), (60, false)]);
    assert_eq!(end, 120);
}

#[test]
fn single_t_is_three_dots() {
    let (edges, end) = key_message("T");
    assert_eq!(edges, vec![(0, true), (180, false)]);
    assert_eq!(end, 240);
}

#[test]
fn element_space_is_one_dot() {
    // A = dot dash
    let (edges, _) = key_message("A");
    assert_eq!(edges, vec![(0, true), (60, false), (120, true), (300, false)]);
}

#[test]
fn character_gap_is_three_dots() {
    let (edges, end) = key_message("EE");
    assert_eq!(edges, vec![(0, true), (60, false), (240, true), (300, false)]);
    assert_eq!(end, 360);
}

#[test]
fn word_gap() {
    // Element space, word gap, then the load of the next character
    let (edges, _) = key_message("E E");
    assert_eq!(edges[2], (600, true));
    assert_eq!(edges[2].0 - edges[1].0, 9 * 60);
}

#[test]
fn trailing_space_is_silent_gap() {
    let (edges, end) = key_message("E ");
    assert_eq!(edges, vec![(0, true), (60, false)]);
    // Element space plus one word gap, then the message ends
    assert_eq!(end, 480);
}

#[test]
fn double_space_doubles_word_gap() {
    let (edges, end) = key_message("E  E");
    assert_eq!(edges.len(), 4);
    assert_eq!(edges[2], (960, true));
    // Element space, two word gaps, then the character load
    assert_eq!(edges[2].0 - edges[1].0, (1 + 6 + 6 + 2) * 60);
    assert_eq!(edges[3], (1_020, false));
    assert_eq!(end, 1_080);
}

#[test]
fn lowercase_keys_like_uppercase() {
    assert_eq!(key_message("k"), key_message("K"));
}

#[test]
fn unmapped_character_is_silent() {
    let (edges, _) = key_message("E?E");
    assert_eq!(edges.iter().filter(|(_, down)| *down).count(), 2);
}

#[test]
fn empty_message_finishes_silently() {
    let (edges, end) = key_message("");
    assert!(edges.is_empty());
    assert_eq!(end, 0);
}

// =============================================================================
// State Tests
// =============================================================================

#[test]
fn start_is_armed_not_keyed() {
    let session = CwSession::start(Instant::from_millis(10), "E", 20, carrier());
    assert_eq!(session.phase(), CwPhase::Idle);
    assert_eq!(session.next_deadline(), Instant::from_millis(10));
    assert!(!session.is_finished());
}

#[test]
fn deadlines_never_decrease() {
    let mut key = Key::default();
    let mut session = CwSession::start(Instant::ZERO, CW_MESSAGE, CW_WPM, carrier());
    let mut last = session.next_deadline();

    let mut ms = 0;
    while session.update(Instant::from_millis(ms), &mut key) == SessionStatus::Running {
        assert!(session.next_deadline() >= last);
        last = session.next_deadline();
        ms += 5;
    }
    assert!(!key.down);
}

#[test]
fn configured_message_keys_every_element() {
    let mut key = Key::default();
    let mut session = CwSession::start(Instant::ZERO, CW_MESSAGE, CW_WPM, carrier());
    let mut ms = 0;
    while session.update(Instant::from_millis(ms), &mut key) == SessionStatus::Running {
        ms += 1;
    }

    let elements: usize = CW_MESSAGE
        .chars()
        .map(|c| wspr_beacon::encoding::MorseTable::pattern(c).len())
        .sum();
    assert_eq!(key.presses as usize, elements);
    assert_eq!(session.char_index(), CW_MESSAGE.len());
}
