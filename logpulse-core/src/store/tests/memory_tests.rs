use super::event;
use crate::store::{
    DEFAULT_MEASUREMENT, EventStore, MemoryEventStore, Point, RangeQuery, StoreError, keys,
};
use chrono::{TimeZone, Utc};

fn points() -> Vec<Point> {
    [
        event("cust_1", 1, 200, 0.1),
        event("cust_1", 2, 500, 0.2),
        event("cust_2", 3, 200, 0.3),
        event("cust_1", 40, 200, 0.4),
    ]
    .iter()
    .map(|e| Point::from_event(DEFAULT_MEASUREMENT, e))
    .collect()
}

fn query(customer: Option<&str>, end_second: u32) -> RangeQuery {
    RangeQuery {
        measurement: DEFAULT_MEASUREMENT.to_string(),
        customer_id: customer.map(str::to_string),
        start: Utc.with_ymd_and_hms(2024, 9, 29, 12, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2024, 9, 29, 12, 0, end_second).unwrap(),
    }
}

#[tokio::test]
async fn reads_back_per_customer_within_range() {
    // Arrange
    let store = MemoryEventStore::new();
    store.write_points(&points()).await.unwrap();

    // Act
    let events = store.read_range(&query(Some("cust_1"), 30)).await.unwrap();

    // Assert
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.customer_id == "cust_1"));
}

#[tokio::test]
async fn reads_all_customers_without_filter() {
    let store = MemoryEventStore::new();
    store.write_points(&points()).await.unwrap();

    let events = store.read_range(&query(None, 59)).await.unwrap();

    assert_eq!(events.len(), 4);
    assert_eq!(store.len(), 4);
}

#[tokio::test]
async fn range_bounds_are_inclusive() {
    let store = MemoryEventStore::new();
    store.write_points(&points()).await.unwrap();

    let events = store.read_range(&query(Some("cust_1"), 40)).await.unwrap();

    assert_eq!(events.len(), 3);
}

#[tokio::test]
async fn keeps_duplicates() {
    let store = MemoryEventStore::new();
    let points = points();
    store.write_points(&points[..1]).await.unwrap();
    store.write_points(&points[..1]).await.unwrap();

    let events = store.read_range(&query(Some("cust_1"), 59)).await.unwrap();

    assert_eq!(events.len(), 2);
}

#[tokio::test]
async fn ignores_other_measurements() {
    let store = MemoryEventStore::new();
    store.write_points(&points()).await.unwrap();

    let mut query = query(None, 59);
    query.measurement = "other".to_string();

    assert!(store.read_range(&query).await.unwrap().is_empty());
}

#[tokio::test]
async fn rejects_points_without_customer() {
    // Arrange
    let store = MemoryEventStore::new();
    let mut points = points();
    points[2].tags.remove(keys::CUSTOMER_ID);

    // Act
    let err = store.write_points(&points).await.unwrap_err();

    // Assert
    assert!(matches!(err, StoreError::Rejected { .. }));
    assert!(!err.is_transient());
    assert!(store.is_empty());
}
