use crate::cli::stats::render;
use crate::stats::StatsResult;
use serde_json::{Value, json};

#[test]
fn empty_result_renders_null_latencies() {
    let rendered = render(&StatsResult::empty()).unwrap();

    let value: Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(
        value,
        json!({
            "total_requests": 0,
            "successful_requests": 0,
            "failed_requests": 0,
            "uptime_percent": 0.0,
            "average_latency": null,
            "median_latency": null,
            "p99_latency": null,
        })
    );
}

#[test]
fn populated_result_renders_every_field() {
    let stats = StatsResult {
        total_requests: 5,
        successful_requests: 3,
        failed_requests: 2,
        uptime_percent: 60.0,
        average_latency: Some(0.84),
        median_latency: Some(0.7),
        p99_latency: Some(1.5),
    };

    let value: Value = serde_json::from_str(&render(&stats).unwrap()).unwrap();

    assert_eq!(value["uptime_percent"], json!(60.0));
    assert_eq!(value["p99_latency"], json!(1.5));
}
