use async_trait::async_trait;
use logpulse_core::store::{EventStore, Point, RangeQuery, StoreError, StoredEvent};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A store that never accepts a write.
#[derive(Default)]
pub struct UnreachableStore {
    attempts: AtomicUsize,
}

impl UnreachableStore {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventStore for UnreachableStore {
    async fn write_points(&self, _points: &[Point]) -> Result<(), StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable {
            message: "connection refused".to_string(),
        })
    }

    async fn read_range(&self, _query: &RangeQuery) -> Result<Vec<StoredEvent>, StoreError> {
        Err(StoreError::Unavailable {
            message: "connection refused".to_string(),
        })
    }
}
