use crate::stats::StatsResult;
use crate::store::StoredEvent;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Two stored events with the same key are one logical request.
#[derive(Debug, PartialEq, Eq, Hash)]
struct DedupKey {
    timestamp: DateTime<Utc>,
    customer_id: String,
    request_path: Option<String>,
    status_code: Option<u16>,
}

impl DedupKey {
    fn of(event: &StoredEvent) -> Self {
        Self {
            timestamp: event.timestamp,
            customer_id: event.customer_id.clone(),
            request_path: event.request_path.clone(),
            status_code: event.status_code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencySummary {
    pub average: f64,
    pub median: f64,
    pub p99: f64,
}

impl LatencySummary {
    /// Median is the element at `n / 2` of the sorted list; p99 the element at
    /// `floor(0.99 * n)`, or the single element when `n == 1`.
    pub fn from_durations(mut durations: Vec<f64>) -> Option<Self> {
        if durations.is_empty() {
            return None;
        }

        durations.sort_by(f64::total_cmp);
        let n = durations.len();

        let average = durations.iter().sum::<f64>() / n as f64;
        let median = durations[n / 2];
        let p99 = if n > 1 {
            durations[((0.99 * n as f64) as usize).min(n - 1)]
        } else {
            durations[0]
        };

        Some(Self {
            average,
            median,
            p99,
        })
    }
}

/// Percentage of successful requests, rounded to 5 decimal places. 0 when empty.
pub fn uptime_percent(successful: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = successful as f64 / total as f64 * 100.0;
    (percent * 1e5).round() / 1e5
}

/// Deduplicate, count and summarize latencies.
pub fn aggregate(events: impl IntoIterator<Item = StoredEvent>) -> StatsResult {
    let mut seen = HashSet::new();
    let mut successful = 0u64;
    let mut failed = 0u64;
    let mut durations = Vec::new();

    for event in events {
        if !seen.insert(DedupKey::of(&event)) {
            continue;
        }

        if event.success {
            successful += 1;
        } else {
            failed += 1;
        }
        durations.extend(event.duration);
    }

    let total = successful + failed;
    let latency = LatencySummary::from_durations(durations);

    StatsResult {
        total_requests: total,
        successful_requests: successful,
        failed_requests: failed,
        uptime_percent: uptime_percent(successful, total),
        average_latency: latency.map(|l| l.average),
        median_latency: latency.map(|l| l.median),
        p99_latency: latency.map(|l| l.p99),
    }
}
