use crate::event::RequestEvent;
use crate::store::{EventStore, MemoryEventStore, Point, RangeQuery, StoreError, StoredEvent};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

pub(crate) fn event(customer: &str, second: u32) -> RequestEvent {
    RequestEvent::new(
        Utc.with_ymd_and_hms(2024, 9, 29, 12, 0, second).unwrap(),
        customer,
        "/api/v1/resource1",
        200,
        0.5,
    )
    .unwrap()
}

pub(crate) fn events(count: u32) -> Vec<RequestEvent> {
    (0..count).map(|i| event("cust_1", i % 60)).collect()
}

pub(crate) fn line(customer: &str, second: u32) -> String {
    format!("2024-09-29 12:00:{second:02} {customer} /api/v1/resource1 200 0.5")
}

/// Fails the first `failures` write calls, then behaves like a memory store.
pub(crate) struct FlakyStore {
    pub inner: MemoryEventStore,
    failures_left: AtomicU32,
    transient: bool,
    calls: AtomicU32,
}

impl FlakyStore {
    pub fn failing(failures: u32) -> Self {
        Self {
            inner: MemoryEventStore::new(),
            failures_left: AtomicU32::new(failures),
            transient: true,
            calls: AtomicU32::new(0),
        }
    }

    pub fn always_unavailable() -> Self {
        Self::failing(u32::MAX)
    }

    pub fn always_rejecting() -> Self {
        Self::rejecting(u32::MAX)
    }

    pub fn rejecting(failures: u32) -> Self {
        Self {
            transient: false,
            ..Self::failing(failures)
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventStore for FlakyStore {
    async fn write_points(&self, points: &[Point]) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();

        match (failed, self.transient) {
            (false, _) => self.inner.write_points(points).await,
            (true, true) => Err(StoreError::Unavailable {
                message: "connection refused".to_string(),
            }),
            (true, false) => Err(StoreError::Rejected {
                message: "bad point".to_string(),
            }),
        }
    }

    async fn read_range(&self, query: &RangeQuery) -> Result<Vec<StoredEvent>, StoreError> {
        self.inner.read_range(query).await
    }
}

/// Never completes a write.
pub(crate) struct HangingStore;

#[async_trait]
impl EventStore for HangingStore {
    async fn write_points(&self, _points: &[Point]) -> Result<(), StoreError> {
        tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
        Ok(())
    }

    async fn read_range(&self, _query: &RangeQuery) -> Result<Vec<StoredEvent>, StoreError> {
        Ok(Vec::new())
    }
}

/// Panics inside every write.
pub(crate) struct PanickingStore;

#[async_trait]
impl EventStore for PanickingStore {
    async fn write_points(&self, _points: &[Point]) -> Result<(), StoreError> {
        panic!("store client crashed");
    }

    async fn read_range(&self, _query: &RangeQuery) -> Result<Vec<StoredEvent>, StoreError> {
        Ok(Vec::new())
    }
}

/// Wraps a [`FlakyStore`], holding each write for 10ms and recording the
/// highest number of writes in progress at once.
pub(crate) struct PeakTrackingStore {
    pub inner: FlakyStore,
    active: AtomicU32,
    peak: AtomicU32,
}

impl PeakTrackingStore {
    pub fn new(inner: FlakyStore) -> Self {
        Self {
            inner,
            active: AtomicU32::new(0),
            peak: AtomicU32::new(0),
        }
    }

    pub fn peak(&self) -> u32 {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventStore for PeakTrackingStore {
    async fn write_points(&self, points: &[Point]) -> Result<(), StoreError> {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(active, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(10)).await;
        let result = self.inner.write_points(points).await;

        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn read_range(&self, query: &RangeQuery) -> Result<Vec<StoredEvent>, StoreError> {
        self.inner.read_range(query).await
    }
}
