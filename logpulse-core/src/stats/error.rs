use chrono::NaiveDate;
use thiserror::Error;

/// Reported to callers as "not found".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("invalid customer id '{input}'")]
    InvalidCustomer { input: String },

    #[error("invalid date '{input}', expected YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error("date {date} is in the future")]
    FutureDate { date: NaiveDate },
}
