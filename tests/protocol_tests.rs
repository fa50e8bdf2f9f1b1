//! Serial Console Protocol Tests
//!
//! Tests for time/status command parsing and response formatting.
//! Run with: cargo test --no-default-features --features std --test protocol_tests

use wspr_beacon::config::MAX_EPOCH_SECS;
use wspr_beacon::protocol::{Command, CommandParser, Response, MAX_CMD_LEN};
use wspr_beacon::status::{Progress, StatusSnapshot};
use wspr_beacon::types::{Mode, UtcTime};

fn feed(parser: &mut CommandParser, input: &[u8]) -> Vec<Command> {
    input.iter().filter_map(|&b| parser.feed(b)).collect()
}

fn idle_at(epoch: Option<u64>) -> StatusSnapshot {
    StatusSnapshot {
        mode: Mode::Idle,
        time: epoch.map(UtcTime::from_epoch),
        progress: None,
    }
}

// ============================================================================
// Parser Tests
// ============================================================================

#[test]
fn test_parser_default() {
    let mut parser = CommandParser::default();
    assert_eq!(feed(&mut parser, b"TM;"), vec![Command::ReadTime]);
}

#[test]
fn test_parser_clear() {
    let mut parser = CommandParser::new();
    parser.feed(b'T');
    parser.feed(b'M');
    parser.clear();
    assert_eq!(parser.feed(b';'), Some(Command::Unknown));
}

#[test]
fn test_parse_commands_in_stream() {
    let mut parser = CommandParser::new();
    assert_eq!(
        feed(&mut parser, b"TM1700000000;ST;TM;"),
        vec![
            Command::SetTime(1_700_000_000),
            Command::ReadStatus,
            Command::ReadTime
        ]
    );
}

#[test]
fn test_parse_lowercase() {
    let mut parser = CommandParser::new();
    assert_eq!(feed(&mut parser, b"st;tm;"), vec![Command::ReadStatus, Command::ReadTime]);
}

#[test]
fn test_parse_rejects_malformed() {
    let mut parser = CommandParser::new();
    assert_eq!(
        feed(&mut parser, b"TM-5;ST1;FA;T;"),
        vec![Command::Unknown; 4]
    );
}

#[test]
fn test_parse_rejects_overflowing_time() {
    let mut parser = CommandParser::new();
    assert_eq!(
        feed(&mut parser, b"TM99999999999999999999999;"),
        vec![Command::Unknown]
    );
}

#[test]
fn test_parse_epoch_range() {
    let mut parser = CommandParser::new();
    assert_eq!(
        feed(&mut parser, b"TM4294967295;TM4294967296;TM18446744073709551615;"),
        vec![Command::SetTime(MAX_EPOCH_SECS), Command::Unknown, Command::Unknown]
    );
}

#[test]
fn test_overlong_input_discarded() {
    let mut parser = CommandParser::new();
    let mut junk = vec![b'X'; MAX_CMD_LEN + 3];
    junk.extend_from_slice(b";ST;");
    // The overflow clears the buffer; the tail before ';' is still junk
    assert_eq!(
        feed(&mut parser, &junk),
        vec![Command::Unknown, Command::ReadStatus]
    );
}

// ============================================================================
// Response Tests
// ============================================================================

#[test]
fn test_reply_read_time() {
    let mut response = Response::new();
    response.reply(Command::ReadTime, &idle_at(Some(1_700_000_123)));
    assert_eq!(response.as_str(), "TM1700000123;");
}

#[test]
fn test_reply_read_time_unsynced() {
    let mut response = Response::new();
    response.reply(Command::ReadTime, &idle_at(None));
    assert_eq!(response.as_str(), "TM?;");
}

#[test]
fn test_reply_set_time_echoes() {
    let mut response = Response::new();
    response.reply(Command::SetTime(42), &idle_at(None));
    assert_eq!(response.as_bytes(), b"TM0000000042;");
}

#[test]
fn test_reply_status() {
    let mut response = Response::new();
    let snapshot = StatusSnapshot {
        mode: Mode::Wspr,
        time: Some(UtcTime::from_epoch(1_700_000_000)),
        progress: Some(Progress { done: 7, total: 162 }),
    };
    response.reply(Command::ReadStatus, &snapshot);
    assert_eq!(response.as_str(), "ST1007162;");

    response.reply(Command::ReadStatus, &idle_at(None));
    assert_eq!(response.as_str(), "ST0000000;");
}

#[test]
fn test_reply_unknown() {
    let mut response = Response::default();
    response.reply(Command::Unknown, &idle_at(None));
    assert_eq!(response.as_str(), "?;");
    response.clear();
    assert_eq!(response.as_str(), "");
}
