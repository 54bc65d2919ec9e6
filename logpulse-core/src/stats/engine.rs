use crate::event::has_shape;
use crate::stats::{CustomerSelector, LookupError, StatsResult, WindowPolicy, aggregate};
use crate::store::{EventStore, RangeQuery};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, error};

/// Parse a `YYYY-MM-DD` query date, rejecting dates after `today`.
pub fn parse_from_date(input: &str, today: NaiveDate) -> Result<NaiveDate, LookupError> {
    let invalid = || LookupError::InvalidDate {
        input: input.to_string(),
    };

    if !has_shape(input, "dddd-dd-dd") {
        return Err(invalid());
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| invalid())?;
    if date > today {
        return Err(LookupError::FutureDate { date });
    }

    Ok(date)
}

/// Answers statistics queries against an [`EventStore`].
pub struct StatsEngine {
    store: Arc<dyn EventStore>,
    measurement: String,
    window: WindowPolicy,
}

impl StatsEngine {
    pub fn new(store: Arc<dyn EventStore>, measurement: impl Into<String>, window: WindowPolicy) -> Self {
        Self {
            store,
            measurement: measurement.into(),
            window,
        }
    }

    pub fn window(&self) -> WindowPolicy {
        self.window
    }

    pub async fn compute(&self, selector: &CustomerSelector, date: NaiveDate) -> StatsResult {
        self.compute_at(selector, date, Utc::now()).await
    }

    /// [`compute`](Self::compute) with an explicit clock.
    ///
    /// Never fails: a store error is logged and yields the empty result.
    pub async fn compute_at(
        &self,
        selector: &CustomerSelector,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> StatsResult {
        let Some(range) = self.window.range(date, now) else {
            debug!(%selector, %date, "window starts in the future");
            return StatsResult::empty();
        };

        let query = RangeQuery {
            measurement: self.measurement.clone(),
            customer_id: selector.customer_id().map(str::to_string),
            start: range.start,
            end: range.end,
        };

        match self.store.read_range(&query).await {
            Ok(events) => {
                debug!(%selector, %date, events = events.len(), "stats query");
                aggregate(events)
            }
            Err(err) => {
                error!(%selector, %date, error = %err, "stats query failed; returning empty result");
                StatsResult::empty()
            }
        }
    }

    pub async fn get_stats(
        &self,
        customer_id: &str,
        from_date: NaiveDate,
    ) -> Result<StatsResult, LookupError> {
        let selector =
            CustomerSelector::customer(customer_id).ok_or_else(|| LookupError::InvalidCustomer {
                input: customer_id.to_string(),
            })?;
        self.lookup(&selector, from_date, Utc::now()).await
    }

    pub async fn get_all_stats(&self, from_date: NaiveDate) -> Result<StatsResult, LookupError> {
        self.lookup(&CustomerSelector::All, from_date, Utc::now())
            .await
    }

    pub(crate) async fn lookup(
        &self,
        selector: &CustomerSelector,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<StatsResult, LookupError> {
        if self.window.range(date, now).is_none() {
            return Err(LookupError::FutureDate { date });
        }
        Ok(self.compute_at(selector, date, now).await)
    }
}
