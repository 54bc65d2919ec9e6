use crate::store::{EventStore, Point, RangeQuery, StoreError, StoredEvent};
use async_trait::async_trait;
use dashmap::DashMap;

/// In-process store keyed by customer. Used by tests and `store { kind = "memory" }`.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    points: DashMap<String, Vec<Point>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored points, duplicates included.
    pub fn len(&self) -> usize {
        self.points.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn points_for(&self, customer_id: &str) -> Vec<Point> {
        self.points
            .get(customer_id)
            .map(|points| points.value().clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn write_points(&self, points: &[Point]) -> Result<(), StoreError> {
        if points.iter().any(|point| point.customer_id().is_none()) {
            return Err(StoreError::Rejected {
                message: "point without customer_id tag".to_string(),
            });
        }

        for point in points {
            if let Some(customer) = point.customer_id() {
                self.points
                    .entry(customer.to_string())
                    .or_default()
                    .push(point.clone());
            }
        }

        Ok(())
    }

    async fn read_range(&self, query: &RangeQuery) -> Result<Vec<StoredEvent>, StoreError> {
        let collect = |points: &Vec<Point>| -> Vec<StoredEvent> {
            points
                .iter()
                .filter(|point| query.matches(point))
                .filter_map(Point::to_stored_event)
                .collect()
        };

        let events = match &query.customer_id {
            Some(customer) => self
                .points
                .get(customer)
                .map(|points| collect(points.value()))
                .unwrap_or_default(),
            None => self
                .points
                .iter()
                .flat_map(|entry| collect(entry.value()))
                .collect(),
        };

        Ok(events)
    }
}
