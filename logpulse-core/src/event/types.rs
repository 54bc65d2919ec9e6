use crate::event::ParseError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// A status code counts as a success when it is a 2xx or 3xx.
pub fn is_success_status(status: u16) -> bool {
    (200..400).contains(&status)
}

/// One newline-terminated line read from a source, newline removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// Routing key of the source the line came from.
    pub source: Arc<str>,
    pub text: String,
}

impl RawLine {
    pub fn new(source: Arc<str>, text: impl Into<String>) -> Self {
        Self {
            source,
            text: text.into(),
        }
    }

    pub fn parse(&self) -> Result<RequestEvent, ParseError> {
        super::parse_line(&self.text)
    }
}

/// A validated API request observation.
///
/// Fields are private so an event can only be built through [`RequestEvent::new`],
/// which enforces the status range and a finite, non-negative duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestEvent {
    timestamp: DateTime<Utc>,
    customer_id: String,
    request_path: String,
    status_code: u16,
    duration_seconds: f64,
}

impl RequestEvent {
    pub fn new(
        timestamp: DateTime<Utc>,
        customer_id: impl Into<String>,
        request_path: impl Into<String>,
        status_code: u16,
        duration_seconds: f64,
    ) -> Result<Self, ParseError> {
        let customer_id = customer_id.into();
        let request_path = request_path.into();

        if customer_id.is_empty() {
            return Err(ParseError::EmptyCustomer);
        }
        if request_path.is_empty() {
            return Err(ParseError::EmptyPath);
        }
        if !(100..=599).contains(&status_code) {
            return Err(ParseError::StatusOutOfRange {
                status: i64::from(status_code),
            });
        }
        if !duration_seconds.is_finite() || duration_seconds < 0.0 {
            return Err(ParseError::InvalidDuration {
                value: duration_seconds.to_string(),
            });
        }

        Ok(Self {
            timestamp,
            customer_id,
            request_path,
            status_code,
            // Normalizes -0.0.
            duration_seconds: duration_seconds.abs(),
        })
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn request_path(&self) -> &str {
        &self.request_path
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn success(&self) -> bool {
        is_success_status(self.status_code)
    }
}
