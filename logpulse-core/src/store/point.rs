use crate::event::{RequestEvent, is_success_status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_MEASUREMENT: &str = "api_requests";

/// Tag and field names used by [`Point::from_event`].
pub mod keys {
    pub const CUSTOMER_ID: &str = "customer_id";
    pub const SUCCESS: &str = "success";
    pub const STATUS_CODE: &str = "status_code";
    pub const REQUEST_PATH: &str = "request_path";
    pub const DURATION: &str = "duration";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    String(String),
}

/// One time-series record: measurement, string tags, typed fields and a timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub measurement: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, FieldValue>,
    pub timestamp: DateTime<Utc>,
}

impl Point {
    pub fn from_event(measurement: &str, event: &RequestEvent) -> Self {
        let status = event.status_code();

        let tags = BTreeMap::from([
            (keys::CUSTOMER_ID.to_string(), event.customer_id().to_string()),
            (
                keys::SUCCESS.to_string(),
                if event.success() { "1" } else { "0" }.to_string(),
            ),
            (keys::STATUS_CODE.to_string(), status.to_string()),
            (
                keys::REQUEST_PATH.to_string(),
                event.request_path().to_string(),
            ),
        ]);

        let fields = BTreeMap::from([
            (
                keys::DURATION.to_string(),
                FieldValue::Float(event.duration_seconds()),
            ),
            (
                keys::STATUS_CODE.to_string(),
                FieldValue::Integer(i64::from(status)),
            ),
            (
                keys::REQUEST_PATH.to_string(),
                FieldValue::String(event.request_path().to_string()),
            ),
        ]);

        Self {
            measurement: measurement.to_string(),
            tags,
            fields,
            timestamp: event.timestamp(),
        }
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.tags.get(keys::CUSTOMER_ID).map(String::as_str)
    }

    /// Read the point back as a request observation.
    ///
    /// Returns `None` when the point has no customer tag. Fields win over tags
    /// when both carry the same value.
    pub fn to_stored_event(&self) -> Option<StoredEvent> {
        let customer_id = self.customer_id()?.to_string();

        let status_code = match self.fields.get(keys::STATUS_CODE) {
            Some(FieldValue::Integer(code)) => u16::try_from(*code).ok(),
            _ => self
                .tags
                .get(keys::STATUS_CODE)
                .and_then(|code| code.parse().ok()),
        };

        let success = match status_code {
            Some(code) => is_success_status(code),
            None => self.tags.get(keys::SUCCESS).is_some_and(|flag| flag == "1"),
        };

        let request_path = match self.fields.get(keys::REQUEST_PATH) {
            Some(FieldValue::String(path)) => Some(path.clone()),
            _ => self.tags.get(keys::REQUEST_PATH).cloned(),
        };

        let duration = match self.fields.get(keys::DURATION) {
            Some(FieldValue::Float(value)) => Some(*value),
            Some(FieldValue::Integer(value)) => Some(*value as f64),
            _ => None,
        }
        .filter(|value| value.is_finite());

        Some(StoredEvent {
            timestamp: self.timestamp,
            customer_id,
            request_path,
            status_code,
            success,
            duration,
        })
    }
}

/// What the stats engine sees of a stored point.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEvent {
    pub timestamp: DateTime<Utc>,
    pub customer_id: String,
    pub request_path: Option<String>,
    pub status_code: Option<u16>,
    pub success: bool,
    pub duration: Option<f64>,
}

impl From<&RequestEvent> for StoredEvent {
    fn from(event: &RequestEvent) -> Self {
        Self {
            timestamp: event.timestamp(),
            customer_id: event.customer_id().to_string(),
            request_path: Some(event.request_path().to_string()),
            status_code: Some(event.status_code()),
            success: event.success(),
            duration: Some(event.duration_seconds()),
        }
    }
}
