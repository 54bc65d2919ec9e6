use super::support::{event, events};
use crate::ingest::{Batch, BatchBuffer};
use std::time::Duration;
use tokio::time::Instant;

#[test]
fn seals_when_full() {
    // Arrange
    let mut buffer = BatchBuffer::new(3, Duration::from_secs(60));
    let now = Instant::now();

    // Act
    let first = buffer.push(event("cust_1", 1), now);
    let second = buffer.push(event("cust_1", 2), now);
    let third = buffer.push(event("cust_1", 3), now);

    // Assert
    assert!(first.is_none());
    assert!(second.is_none());
    let batch = third.unwrap();
    assert_eq!(batch.len(), 3);
    assert_eq!(batch.generation, 0);
    assert!(buffer.is_empty());
    assert_eq!(buffer.deadline(), None);
}

#[test]
fn deadline_starts_at_first_event() {
    let mut buffer = BatchBuffer::new(10, Duration::from_millis(500));
    let start = Instant::now();

    buffer.push(event("cust_1", 1), start);
    buffer.push(event("cust_1", 2), start + Duration::from_millis(400));

    assert_eq!(buffer.deadline(), Some(start + Duration::from_millis(500)));
    assert!(!buffer.is_expired(start + Duration::from_millis(499)));
    assert!(buffer.is_expired(start + Duration::from_millis(500)));
}

#[test]
fn never_seals_empty() {
    let mut buffer = BatchBuffer::new(10, Duration::from_millis(500));

    assert!(buffer.seal().is_none());
    assert!(!buffer.is_expired(Instant::now()));
}

#[test]
fn zero_max_size_behaves_as_one() {
    let mut buffer = BatchBuffer::new(0, Duration::from_secs(1));

    let batch = buffer.push(event("cust_1", 1), Instant::now());

    assert_eq!(batch.map(|b| b.len()), Some(1));
}

#[test]
fn requeued_batches_get_fresh_ids() {
    let original = Batch::new(events(2));
    let requeued = Batch::requeued(events(2), 1);

    assert_ne!(original.id, requeued.id);
    assert_eq!(requeued.generation, 1);
}
