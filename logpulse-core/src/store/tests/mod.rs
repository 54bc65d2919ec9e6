mod memory_tests;

use crate::event::RequestEvent;
use chrono::{TimeZone, Utc};

pub(crate) fn event(customer: &str, second: u32, status: u16, duration: f64) -> RequestEvent {
    RequestEvent::new(
        Utc.with_ymd_and_hms(2024, 9, 29, 12, 0, second).unwrap(),
        customer,
        "/api/v1/resource1",
        status,
        duration,
    )
    .unwrap()
}
