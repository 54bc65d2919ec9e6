use crate::event::{ParseError, RawLine, is_success_status, parse_line};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[test]
fn parses_well_formed_line() {
    // Act
    let event = parse_line("2024-09-29 18:47:32 cust_24 /api/v1/resource1 500 0.772").unwrap();

    // Assert
    assert_eq!(
        event.timestamp(),
        Utc.with_ymd_and_hms(2024, 9, 29, 18, 47, 32).unwrap()
    );
    assert_eq!(event.customer_id(), "cust_24");
    assert_eq!(event.request_path(), "/api/v1/resource1");
    assert_eq!(event.status_code(), 500);
    assert_eq!(event.duration_seconds(), 0.772);
    assert!(!event.success());
}

#[test]
fn tolerates_repeated_whitespace_and_extra_fields() {
    let event =
        parse_line("2024-09-29   18:47:32\tcust_1  /a  201  1.5  trailing junk").unwrap();

    assert_eq!(event.customer_id(), "cust_1");
    assert_eq!(event.status_code(), 201);
    assert!(event.success());
}

#[test]
fn rejects_short_line() {
    let err = parse_line("2024-09-29 18:47:32 cust_1 /a 200").unwrap_err();

    assert_eq!(
        err,
        ParseError::MissingFields {
            expected: 6,
            found: 5
        }
    );
}

#[test]
fn rejects_empty_line() {
    let err = parse_line("   ").unwrap_err();

    assert_eq!(
        err,
        ParseError::MissingFields {
            expected: 6,
            found: 0
        }
    );
}

#[test]
fn rejects_unpadded_or_impossible_timestamps() {
    for line in [
        "2024-9-29 18:47:32 c /a 200 0.1",
        "2024-09-29 8:47:32 c /a 200 0.1",
        "2024-02-30 18:47:32 c /a 200 0.1",
        "2024-09-29 25:00:00 c /a 200 0.1",
        "2024/09/29 18:47:32 c /a 200 0.1",
    ] {
        let err = parse_line(line).unwrap_err();
        assert!(
            matches!(err, ParseError::InvalidTimestamp { .. }),
            "{line}: {err:?}"
        );
    }
}

#[test]
fn rejects_bad_status_codes() {
    assert_eq!(
        parse_line("2024-09-29 18:47:32 c /a abc 0.1").unwrap_err(),
        ParseError::InvalidStatus {
            value: "abc".to_string()
        }
    );
    assert_eq!(
        parse_line("2024-09-29 18:47:32 c /a 99 0.1").unwrap_err(),
        ParseError::StatusOutOfRange { status: 99 }
    );
    assert_eq!(
        parse_line("2024-09-29 18:47:32 c /a 600 0.1").unwrap_err(),
        ParseError::StatusOutOfRange { status: 600 }
    );
    assert_eq!(
        parse_line("2024-09-29 18:47:32 c /a -200 0.1").unwrap_err(),
        ParseError::StatusOutOfRange { status: -200 }
    );
}

#[test]
fn rejects_negative_and_non_finite_durations() {
    for duration in ["-0.5", "NaN", "inf", "fast"] {
        let line = format!("2024-09-29 18:47:32 c /a 200 {duration}");
        let err = parse_line(&line).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidDuration {
                value: duration.to_string()
            }
        );
    }
}

#[test]
fn accepts_zero_duration() {
    let event = parse_line("2024-09-29 18:47:32 c /a 200 0").unwrap();

    assert_eq!(event.duration_seconds(), 0.0);
}

#[test]
fn success_covers_2xx_and_3xx_only() {
    assert!(!is_success_status(199));
    assert!(is_success_status(200));
    assert!(is_success_status(302));
    assert!(is_success_status(399));
    assert!(!is_success_status(400));
    assert!(!is_success_status(503));
}

#[test]
fn raw_line_parses_its_text() {
    // Arrange
    let line = RawLine::new(
        Arc::from("/var/log/api.log"),
        "2024-09-29 18:47:32 cust_2 /b 404 0.25",
    );

    // Act
    let event = line.parse().unwrap();

    // Assert
    assert_eq!(event.customer_id(), "cust_2");
    assert!(!event.success());
}
