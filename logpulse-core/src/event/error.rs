use thiserror::Error;

/// Why a raw line could not become a [`RequestEvent`](super::RequestEvent).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected at least {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },

    #[error("invalid timestamp '{value}', expected YYYY-MM-DD HH:MM:SS")]
    InvalidTimestamp { value: String },

    #[error("invalid status code '{value}'")]
    InvalidStatus { value: String },

    #[error("status code {status} is outside 100-599")]
    StatusOutOfRange { status: i64 },

    #[error("invalid duration '{value}'")]
    InvalidDuration { value: String },

    #[error("customer id is empty")]
    EmptyCustomer,

    #[error("request path is empty")]
    EmptyPath,
}
