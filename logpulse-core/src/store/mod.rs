//! Time-series persistence behind the [`EventStore`] trait.

mod error;
mod file;
mod memory;
mod point;

#[cfg(test)]
mod tests;

pub use error::StoreError;
pub use file::FileEventStore;
pub use memory::MemoryEventStore;
pub use point::{DEFAULT_MEASUREMENT, FieldValue, Point, StoredEvent, keys};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A time-bounded read over one measurement, optionally narrowed to one customer.
///
/// Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    pub measurement: String,
    pub customer_id: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl RangeQuery {
    pub fn matches(&self, point: &Point) -> bool {
        point.measurement == self.measurement
            && point.timestamp >= self.start
            && point.timestamp <= self.end
            && self
                .customer_id
                .as_deref()
                .is_none_or(|customer| point.customer_id() == Some(customer))
    }
}

#[async_trait]
pub trait EventStore: Send + Sync + 'static {
    /// Persist a chunk of points. A failed call may have persisted a prefix of them.
    async fn write_points(&self, points: &[Point]) -> Result<(), StoreError>;

    /// Return every stored point matching `query`, duplicates included.
    async fn read_range(&self, query: &RangeQuery) -> Result<Vec<StoredEvent>, StoreError>;

    /// Make previously acknowledged writes durable.
    async fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
