use super::support::{FlakyStore, HangingStore, events};
use crate::ingest::{Batch, RetryPolicy, WriteError, Writer};
use crate::store::{DEFAULT_MEASUREMENT, EventStore};
use std::sync::Arc;
use std::time::Duration;

fn quick_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 2,
        base_backoff: Duration::from_millis(10),
        max_backoff: Duration::from_millis(20),
        max_total_wait: Duration::from_secs(1),
        jitter: 0.0,
    }
}

fn writer(store: Arc<dyn EventStore>, chunk_size: usize) -> Writer {
    Writer::new(
        store,
        DEFAULT_MEASUREMENT,
        chunk_size,
        Duration::from_secs(1),
        quick_retry(),
    )
}

#[tokio::test(start_paused = true)]
async fn splits_batches_into_chunks() {
    // Arrange
    let store = Arc::new(FlakyStore::failing(0));
    let writer = writer(store.clone(), 2);

    // Act
    let outcome = writer.write(Batch::new(events(5))).await;

    // Assert
    assert!(outcome.is_success());
    assert_eq!(outcome.chunks, 3);
    assert_eq!(outcome.written, 5);
    assert_eq!(store.calls(), 3);
    assert_eq!(store.inner.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn retries_transient_chunk_failures() {
    let store = Arc::new(FlakyStore::failing(2));
    let writer = writer(store.clone(), 10);

    let outcome = writer.write(Batch::new(events(4))).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.retries, 2);
    assert_eq!(store.inner.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn permanent_failures_fail_each_chunk_once() {
    // Arrange
    let store = Arc::new(FlakyStore::always_rejecting());
    let writer = writer(store.clone(), 2);

    // Act
    let outcome = writer.write(Batch::new(events(3))).await;

    // Assert
    assert_eq!(store.calls(), 2);
    assert_eq!(outcome.written, 0);
    assert_eq!(outcome.failed.len(), 2);
    assert_eq!(outcome.failed_events(), 3);
    assert!(matches!(
        outcome.failed[0].error,
        WriteError::Permanent { .. }
    ));
    assert_eq!(outcome.failed[1].index, 1);
}

#[tokio::test(start_paused = true)]
async fn exhausted_chunk_reports_attempts() {
    let store = Arc::new(FlakyStore::always_unavailable());
    let writer = writer(store.clone(), 10);

    let outcome = writer.write(Batch::new(events(2))).await;

    assert_eq!(store.calls(), 3);
    match &outcome.failed[0].error {
        WriteError::Exhausted { attempts, .. } => assert_eq!(*attempts, 3),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn times_out_hung_writes() {
    let writer = Writer::new(
        Arc::new(HangingStore),
        DEFAULT_MEASUREMENT,
        10,
        Duration::from_millis(50),
        RetryPolicy::no_retries(),
    );

    let outcome = writer.write(Batch::new(events(1))).await;

    match &outcome.failed[0].error {
        WriteError::Exhausted { attempts: 1, last } => assert!(last.is_transient()),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn empty_batch_writes_nothing() {
    let store = Arc::new(FlakyStore::failing(0));
    let writer = writer(store.clone(), 10);

    let outcome = writer.write(Batch::new(Vec::new())).await;

    assert_eq!(outcome.chunks, 0);
    assert!(outcome.is_success());
    assert_eq!(store.calls(), 0);
}
