use crate::event::RequestEvent;
use crate::ingest::{Batch, RetryPolicy, retry_with_jittered_backoff};
use crate::store::{EventStore, Point, StoreError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: StoreError,
    },

    #[error("store rejected write: {source}")]
    Permanent {
        #[source]
        source: StoreError,
    },
}

#[derive(Debug)]
pub struct FailedChunk {
    pub index: usize,
    pub events: Vec<RequestEvent>,
    pub error: WriteError,
}

/// Result of writing one batch. Chunks are independent: a failed chunk does
/// not undo the ones written before it.
#[derive(Debug)]
pub struct WriteOutcome {
    pub batch_id: Uuid,
    pub generation: u32,
    pub chunks: usize,
    pub written: usize,
    pub retries: u32,
    pub failed: Vec<FailedChunk>,
}

impl WriteOutcome {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_events(&self) -> usize {
        self.failed.iter().map(|chunk| chunk.events.len()).sum()
    }

    pub fn into_failed_events(self) -> Vec<RequestEvent> {
        self.failed
            .into_iter()
            .flat_map(|chunk| chunk.events)
            .collect()
    }
}

/// Converts batches into points and writes them chunk by chunk.
#[derive(Clone)]
pub struct Writer {
    store: Arc<dyn EventStore>,
    measurement: Arc<str>,
    chunk_size: usize,
    write_timeout: Duration,
    retry: RetryPolicy,
}

impl Writer {
    pub fn new(
        store: Arc<dyn EventStore>,
        measurement: impl Into<Arc<str>>,
        chunk_size: usize,
        write_timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            store,
            measurement: measurement.into(),
            chunk_size: chunk_size.max(1),
            write_timeout,
            retry,
        }
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }

    pub async fn write(&self, batch: Batch) -> WriteOutcome {
        let Batch {
            id,
            events,
            generation,
        } = batch;

        let mut outcome = WriteOutcome {
            batch_id: id,
            generation,
            chunks: events.len().div_ceil(self.chunk_size),
            written: 0,
            retries: 0,
            failed: Vec::new(),
        };

        let mut remaining = events.into_iter();
        for index in 0..outcome.chunks {
            let chunk: Vec<RequestEvent> = remaining.by_ref().take(self.chunk_size).collect();
            let points: Vec<Point> = chunk
                .iter()
                .map(|event| Point::from_event(&self.measurement, event))
                .collect();

            let mut last_attempt = 0;
            let result = retry_with_jittered_backoff(&self.retry, |attempt| {
                last_attempt = attempt;
                self.write_chunk(&points)
            })
            .await;
            outcome.retries += last_attempt;

            match result {
                Ok(()) => {
                    outcome.written += chunk.len();
                    debug!(batch_id = %id, chunk = index, points = points.len(), "chunk written");
                }
                Err(error) => {
                    warn!(
                        batch_id = %id,
                        chunk = index,
                        events = chunk.len(),
                        error = %error,
                        "chunk write failed"
                    );
                    outcome.failed.push(FailedChunk {
                        index,
                        events: chunk,
                        error,
                    });
                }
            }
        }

        outcome
    }

    async fn write_chunk(&self, points: &[Point]) -> Result<(), StoreError> {
        match timeout(self.write_timeout, self.store.write_points(points)).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                elapsed: self.write_timeout,
            }),
        }
    }
}
