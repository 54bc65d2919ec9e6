use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// An inclusive time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// How a `from_date` turns into a query range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// From midnight of the date up to now.
    #[default]
    UpToNow,
    /// The single day, midnight to 23:59:59.
    CalendarDay,
}

impl WindowPolicy {
    /// `None` when `date` starts after `now`.
    pub fn range(self, date: NaiveDate, now: DateTime<Utc>) -> Option<TimeRange> {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        if start > now {
            return None;
        }

        let end = match self {
            Self::UpToNow => now,
            Self::CalendarDay => start + TimeDelta::days(1) - TimeDelta::seconds(1),
        };

        Some(TimeRange { start, end })
    }
}
