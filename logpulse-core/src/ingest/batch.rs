use crate::event::RequestEvent;
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

/// A sealed, immutable group of events handed to the writer pool.
#[derive(Debug)]
pub struct Batch {
    pub id: Uuid,
    pub events: Vec<RequestEvent>,
    /// How many times these events have been requeued after a failed write.
    pub generation: u32,
}

impl Batch {
    pub fn new(events: Vec<RequestEvent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            events,
            generation: 0,
        }
    }

    pub fn requeued(events: Vec<RequestEvent>, generation: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            events,
            generation,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// The batcher's open buffer.
///
/// Seals when it holds `max_size` events, or once `max_latency` has passed since
/// the first event of the current buffer arrived. Never seals empty.
#[derive(Debug)]
pub struct BatchBuffer {
    events: Vec<RequestEvent>,
    opened_at: Option<Instant>,
    max_size: usize,
    max_latency: Duration,
}

impl BatchBuffer {
    pub fn new(max_size: usize, max_latency: Duration) -> Self {
        Self {
            events: Vec::new(),
            opened_at: None,
            max_size: max_size.max(1),
            max_latency,
        }
    }

    /// Add an event; returns the sealed batch if this push filled the buffer.
    pub fn push(&mut self, event: RequestEvent, now: Instant) -> Option<Batch> {
        self.opened_at.get_or_insert(now);
        self.events.push(event);

        if self.events.len() >= self.max_size {
            return self.seal();
        }
        None
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn max_latency(&self) -> Duration {
        self.max_latency
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.opened_at.map(|opened| opened + self.max_latency)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.deadline().is_some_and(|deadline| now >= deadline)
    }

    pub fn seal(&mut self) -> Option<Batch> {
        self.opened_at = None;
        if self.events.is_empty() {
            return None;
        }
        Some(Batch::new(std::mem::take(&mut self.events)))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
