use serde::Serialize;
use std::fmt;

/// Whose events a query covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CustomerSelector {
    All,
    Customer(String),
}

impl CustomerSelector {
    /// `None` for an empty id, one containing whitespace, or the `*` wildcard.
    pub fn customer(customer_id: &str) -> Option<Self> {
        if customer_id.is_empty()
            || customer_id == "*"
            || customer_id.chars().any(char::is_whitespace)
        {
            return None;
        }
        Some(Self::Customer(customer_id.to_string()))
    }

    /// `*` selects every customer; anything else must be a valid customer id.
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "*" => Some(Self::All),
            id => Self::customer(id),
        }
    }

    pub fn customer_id(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Customer(id) => Some(id),
        }
    }
}

impl fmt::Display for CustomerSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("*"),
            Self::Customer(id) => f.write_str(id),
        }
    }
}

/// Latencies are `None` when the window holds no events with a duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsResult {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub uptime_percent: f64,
    pub average_latency: Option<f64>,
    pub median_latency: Option<f64>,
    pub p99_latency: Option<f64>,
}

impl StatsResult {
    pub fn empty() -> Self {
        Self {
            total_requests: 0,
            successful_requests: 0,
            failed_requests: 0,
            uptime_percent: 0.0,
            average_latency: None,
            median_latency: None,
            p99_latency: None,
        }
    }
}

impl Default for StatsResult {
    fn default() -> Self {
        Self::empty()
    }
}
