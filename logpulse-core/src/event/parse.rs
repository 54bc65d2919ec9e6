use crate::event::{ParseError, RequestEvent};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Wall-clock layout of the first two fields of an access-log line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const FIELD_COUNT: usize = 6;

/// Parse one access-log line.
///
/// Layout (whitespace separated):
/// `YYYY-MM-DD HH:MM:SS <customer_id> <request_path> <status_code> <duration_seconds>`
///
/// Fields past the sixth are ignored. Timestamps carry no zone and are read as UTC.
pub fn parse_line(line: &str) -> Result<RequestEvent, ParseError> {
    let mut fields = [""; FIELD_COUNT];
    let mut found = 0;
    for (slot, field) in fields.iter_mut().zip(line.split_whitespace()) {
        *slot = field;
        found += 1;
    }

    if found < FIELD_COUNT {
        return Err(ParseError::MissingFields {
            expected: FIELD_COUNT,
            found,
        });
    }

    let [date, time, customer_id, request_path, status, duration] = fields;

    let timestamp = parse_timestamp(date, time)?;
    let status_code = parse_status(status)?;
    let duration_seconds = parse_duration(duration)?;

    RequestEvent::new(
        timestamp,
        customer_id,
        request_path,
        status_code,
        duration_seconds,
    )
}

fn parse_timestamp(date: &str, time: &str) -> Result<DateTime<Utc>, ParseError> {
    let invalid = || ParseError::InvalidTimestamp {
        value: format!("{date} {time}"),
    };

    // chrono accepts unpadded fields; the log format does not.
    if !has_shape(date, "dddd-dd-dd") || !has_shape(time, "dd:dd:dd") {
        return Err(invalid());
    }

    NaiveDateTime::parse_from_str(&format!("{date} {time}"), TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| invalid())
}

fn parse_status(value: &str) -> Result<u16, ParseError> {
    let status: i64 = value.parse().map_err(|_| ParseError::InvalidStatus {
        value: value.to_string(),
    })?;

    match u16::try_from(status) {
        Ok(code) if (100..=599).contains(&code) => Ok(code),
        _ => Err(ParseError::StatusOutOfRange { status }),
    }
}

fn parse_duration(value: &str) -> Result<f64, ParseError> {
    let invalid = || ParseError::InvalidDuration {
        value: value.to_string(),
    };

    let duration: f64 = value.parse().map_err(|_| invalid())?;
    if !duration.is_finite() || duration < 0.0 {
        return Err(invalid());
    }

    Ok(duration)
}

/// `d` in `shape` matches one ASCII digit, any other byte matches itself.
pub(crate) fn has_shape(value: &str, shape: &str) -> bool {
    value.len() == shape.len()
        && value
            .bytes()
            .zip(shape.bytes())
            .all(|(actual, expected)| match expected {
                b'd' => actual.is_ascii_digit(),
                other => actual == other,
            })
}
