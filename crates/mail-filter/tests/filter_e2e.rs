//! End-to-end tests for the filter compiler.
//!
//! These drive the full pipeline a CLI invocation would: parse a raw filter
//! string, then render the resulting tree through the canonical printer. The
//! printed strings are load-bearing - `mbx explain` shows them to users and
//! this suite pins them exactly.

use chrono::{Local, TimeZone};
use mailbox_filter::{describe, FilterError, FilterParser, SearchTerm};

fn compile(input: &str) -> String {
    let term = FilterParser::parse(input).unwrap();
    describe(&term)
}

// ============================================================================
// Canonical Output
// ============================================================================

#[test]
fn test_e2e_and_or_mixed() {
    assert_eq!(
        compile("subject:hello+from:test@gmail.com|size_le:4kb"),
        "((subject contains \"hello\" and sender is \"test@gmail.com\") or size less than \"4096\" bytes)"
    );
}

#[test]
fn test_e2e_flag_states() {
    assert_eq!(
        compile("flag:starred|flag:!seen"),
        "(flag \"starred\" set or flag \"Seen\" not set)"
    );
}

#[test]
fn test_e2e_negated_text_term() {
    assert_eq!(compile("subject:!Work"), "not subject contains \"Work\"");
}

#[test]
fn test_e2e_personal_name_fallback() {
    assert_eq!(
        compile("from:John Smith+subject:lunch"),
        "(sender is \"John Smith\" and subject contains \"lunch\")"
    );
}

#[test]
fn test_e2e_three_way_or_parenthesization() {
    assert_eq!(
        compile("subject:a|subject:b|subject:c"),
        "((subject contains \"a\" or subject contains \"b\") or subject contains \"c\")"
    );
}

#[test]
fn test_e2e_date_round_trip() {
    let date = Local.with_ymd_and_hms(2024, 1, 3, 10, 15, 30).unwrap();
    assert_eq!(
        compile("received_before:2024-01-03T10.15.30"),
        format!("received before date \"{date}\"")
    );
}

#[test]
fn test_e2e_recipient_descriptions() {
    assert_eq!(
        compile("to:dev@example.com+cc:qa@example.com+bcc:boss@example.com"),
        "((recipient is \"dev@example.com\" and cc sent to \"qa@example.com\") and bcc sent to \"boss@example.com\")"
    );
}

// ============================================================================
// Error Surface
// ============================================================================

#[test]
fn test_e2e_structural_error() {
    let err = FilterParser::parse("subject-hello").unwrap_err();
    assert!(matches!(err, FilterError::InvalidExpression { .. }));
    assert_eq!(
        err.to_string(),
        "invalid filter expression: subject-hello"
    );
}

#[test]
fn test_e2e_unknown_field_error() {
    let err = FilterParser::parse("bogus:x").unwrap_err();
    assert_eq!(err.to_string(), "unknown filter field: bogus");
}

#[test]
fn test_e2e_invalid_value_error() {
    let err = FilterParser::parse("subject:ok+number:abc").unwrap_err();
    assert_eq!(err.to_string(), "invalid value for number: abc");
}

// ============================================================================
// Tree Shape
// ============================================================================

#[test]
fn test_e2e_precedence_shape() {
    let term = FilterParser::parse("flag:seen+subject:x|body:y").unwrap();
    let SearchTerm::Or(left, right) = term else {
        panic!("expected Or at the root");
    };
    assert!(matches!(*left, SearchTerm::And(_, _)));
    assert!(matches!(*right, SearchTerm::Body(_)));
}
