//! Per-customer and global request statistics over a date window.

mod aggregate;
mod engine;
mod error;
mod types;
mod window;

#[cfg(test)]
mod tests;

pub use aggregate::{LatencySummary, aggregate, uptime_percent};
pub use engine::{StatsEngine, parse_from_date};
pub use error::LookupError;
pub use types::{CustomerSelector, StatsResult};
pub use window::{TimeRange, WindowPolicy};
