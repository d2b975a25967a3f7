use std::fs;
use std::path::PathBuf;

use dugout_terminal::api::{parse_analysis_json, parse_ask_reply_json};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_ask_answer_fixture() {
    let raw = read_fixture("ask_reply_answer.json");
    let reply = parse_ask_reply_json(&raw).expect("fixture should parse");
    assert!(reply.error.is_none());
    assert_eq!(
        reply.answer.as_deref(),
        Some("Mike Trout hit 45 home runs in 2019 and won the AL MVP.")
    );
}

#[test]
fn parses_ask_error_fixture() {
    let raw = read_fixture("ask_reply_error.json");
    let reply = parse_ask_reply_json(&raw).expect("fixture should parse");
    assert!(reply.answer.is_none());
    assert_eq!(
        reply.error.as_deref(),
        Some("Question answering is temporarily unavailable")
    );
}

#[test]
fn parses_analysis_fixture_ignoring_extra_fields() {
    let raw = read_fixture("analysis_error.json");
    let reply = parse_analysis_json(&raw).expect("fixture should parse");
    assert_eq!(
        reply.error.as_deref(),
        Some("No analysis available for this video")
    );
}

#[test]
fn ask_reply_null_is_empty() {
    let reply = parse_ask_reply_json("null").expect("null should parse");
    assert!(reply.answer.is_none());
    assert!(reply.error.is_none());
}

#[test]
fn malformed_ask_reply_is_an_error() {
    assert!(parse_ask_reply_json("<html>502 Bad Gateway</html>").is_err());
}

#[test]
fn malformed_analysis_is_an_error() {
    assert!(parse_analysis_json("{not json").is_err());
}
