use crate::stats::{LatencySummary, StatsResult, aggregate, uptime_percent};
use crate::store::StoredEvent;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

fn stored(second: u32, status: u16, duration: Option<f64>) -> StoredEvent {
    StoredEvent {
        timestamp: Utc.with_ymd_and_hms(2024, 9, 29, 10, 0, second).unwrap(),
        customer_id: "cust_1".to_string(),
        request_path: Some("/api/v1/resource1".to_string()),
        status_code: Some(status),
        success: (200..400).contains(&status),
        duration,
    }
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.unwrap();
    assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
}

#[test]
fn computes_counts_latency_and_uptime() {
    // Arrange
    let events = [
        (200, 0.5),
        (201, 0.6),
        (500, 0.9),
        (404, 0.7),
        (200, 1.5),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (status, duration))| stored(i as u32, status, Some(duration)));

    // Act
    let result = aggregate(events);

    // Assert
    assert_eq!(result.total_requests, 5);
    assert_eq!(result.successful_requests, 3);
    assert_eq!(result.failed_requests, 2);
    assert_eq!(result.uptime_percent, 60.0);
    assert_close(result.average_latency, 0.84);
    assert_eq!(result.median_latency, Some(0.7));
    assert_eq!(result.p99_latency, Some(1.5));
}

#[test]
fn empty_input_is_zeroed() {
    let result = aggregate(Vec::new());

    assert_eq!(result, StatsResult::empty());
    assert_eq!(result.uptime_percent, 0.0);
    assert_eq!(result.average_latency, None);
}

#[test]
fn deduplicates_identical_requests() {
    // Arrange
    let once = vec![stored(1, 200, Some(0.5)), stored(2, 500, Some(0.7))];
    let mut twice = once.clone();
    twice.extend(once.clone());

    // Act
    let single = aggregate(once);
    let doubled = aggregate(twice);

    // Assert
    assert_eq!(doubled, single);
    assert_eq!(doubled.total_requests, 2);
}

#[test]
fn same_second_different_status_is_not_a_duplicate() {
    let result = aggregate(vec![stored(1, 200, Some(0.5)), stored(1, 500, Some(0.5))]);

    assert_eq!(result.total_requests, 2);
}

#[test]
fn single_event_percentiles_use_the_only_value() {
    let summary = LatencySummary::from_durations(vec![0.42]).unwrap();

    assert_eq!(summary.median, 0.42);
    assert_eq!(summary.p99, 0.42);
    assert_eq!(summary.average, 0.42);
}

#[test]
fn p99_uses_floor_rank() {
    // Arrange
    let durations: Vec<f64> = (1..=200).rev().map(f64::from).collect();

    // Act
    let summary = LatencySummary::from_durations(durations).unwrap();

    // Assert
    // floor(0.99 * 200) = 198, floor(200 / 2) = 100 (0-indexed, sorted ascending)
    assert_eq!(summary.p99, 199.0);
    assert_eq!(summary.median, 101.0);
}

#[test]
fn events_without_duration_count_but_have_no_latency() {
    let result = aggregate(vec![stored(1, 200, None), stored(2, 503, None)]);

    assert_eq!(result.total_requests, 2);
    assert_eq!(result.uptime_percent, 50.0);
    assert_eq!(result.median_latency, None);
    assert_eq!(result.p99_latency, None);
}

#[test]
fn uptime_rounds_to_five_decimals() {
    assert_eq!(uptime_percent(1, 3), 33.33333);
    assert_eq!(uptime_percent(2, 3), 66.66667);
    assert_eq!(uptime_percent(0, 0), 0.0);
    assert_eq!(uptime_percent(7, 7), 100.0);
}
