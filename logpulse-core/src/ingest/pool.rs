use crate::ingest::{Batch, IngestCounters, WriteOutcome, Writer, wait_for};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{self, JoinSet};
use tokio::time::{Instant, sleep};
use tracing::{debug, error, info, warn};

/// What to do with events whose chunk write failed for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Submit the events again as a new batch after `delay`, at most `max_requeues` times.
    Requeue { max_requeues: u32, delay: Duration },
    /// Log and count them as dropped.
    Drop,
}

/// Runs up to `concurrency` batch writes at a time, requeued batches included.
///
/// Stops taking new batches once the batch channel closes, then waits up to
/// `shutdown_timeout` for in-flight writes (requeues included) before aborting
/// them and counting their events as dropped. A write task that panics has
/// its events counted as dropped too.
pub struct WriterPool {
    writer: Writer,
    concurrency: usize,
    failure_policy: FailurePolicy,
    shutdown_timeout: Duration,
    counters: Arc<IngestCounters>,
}

impl WriterPool {
    pub fn new(
        writer: Writer,
        concurrency: usize,
        failure_policy: FailurePolicy,
        shutdown_timeout: Duration,
        counters: Arc<IngestCounters>,
    ) -> Self {
        Self {
            writer,
            concurrency: concurrency.max(1),
            failure_policy,
            shutdown_timeout,
            counters,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn writer(&self) -> &Writer {
        &self.writer
    }

    pub fn counters(&self) -> &Arc<IngestCounters> {
        &self.counters
    }

    pub async fn run(self, mut batches: mpsc::Receiver<Batch>) {
        let mut tasks: JoinSet<WriteOutcome> = JoinSet::new();
        let mut task_events: HashMap<task::Id, usize> = HashMap::new();
        let mut requeued: VecDeque<Batch> = VecDeque::new();
        let mut in_flight_events = 0usize;
        let mut accepting = true;
        let mut drain_deadline: Option<Instant> = None;

        loop {
            // Requeued batches take free slots before new batches do.
            while tasks.len() < self.concurrency
                && let Some(batch) = requeued.pop_front()
            {
                let delay = self.requeue_delay();
                self.spawn_write(&mut tasks, &mut task_events, batch, delay);
            }

            if !accepting && tasks.is_empty() && requeued.is_empty() {
                break;
            }

            tokio::select! {
                batch = batches.recv(), if accepting && requeued.is_empty() && tasks.len() < self.concurrency => {
                    match batch {
                        Some(batch) => {
                            in_flight_events += batch.len();
                            self.spawn_write(&mut tasks, &mut task_events, batch, None);
                        }
                        None => {
                            accepting = false;
                            drain_deadline = Some(Instant::now() + self.shutdown_timeout);
                            debug!(in_flight = tasks.len(), "batch queue closed; draining writers");
                        }
                    }
                }

                joined = tasks.join_next_with_id(), if !tasks.is_empty() => {
                    match joined {
                        Some(Ok((id, outcome))) => {
                            task_events.remove(&id);
                            in_flight_events = in_flight_events
                                .saturating_sub(outcome.written + outcome.failed_events());
                            self.handle_outcome(outcome, &mut requeued, &mut in_flight_events);
                        }
                        Some(Err(err)) => {
                            let events = task_events.remove(&err.id()).unwrap_or(0);
                            in_flight_events = in_flight_events.saturating_sub(events);
                            self.counters.record_dropped(events);
                            error!(error = %err, events, "writer task failed; dropping its events");
                        }
                        None => {}
                    }
                }

                _ = wait_for(drain_deadline) => {
                    tasks.abort_all();
                    self.counters.record_dropped(in_flight_events);
                    error!(
                        events = in_flight_events,
                        timeout_ms = self.shutdown_timeout.as_millis() as u64,
                        "shutdown timeout elapsed; dropping in-flight events"
                    );
                    break;
                }
            }
        }

        info!("writer pool stopped");
    }

    fn requeue_delay(&self) -> Option<Duration> {
        match self.failure_policy {
            FailurePolicy::Requeue { delay, .. } => Some(delay),
            FailurePolicy::Drop => None,
        }
    }

    fn spawn_write(
        &self,
        tasks: &mut JoinSet<WriteOutcome>,
        task_events: &mut HashMap<task::Id, usize>,
        batch: Batch,
        delay: Option<Duration>,
    ) {
        let writer = self.writer.clone();
        let events = batch.len();
        let handle = tasks.spawn(async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            writer.write(batch).await
        });
        task_events.insert(handle.id(), events);
    }

    fn handle_outcome(
        &self,
        outcome: WriteOutcome,
        requeued: &mut VecDeque<Batch>,
        in_flight_events: &mut usize,
    ) {
        self.counters.record_written(outcome.written);
        self.counters.record_retries(outcome.retries);

        if outcome.is_success() {
            debug!(
                batch_id = %outcome.batch_id,
                events = outcome.written,
                chunks = outcome.chunks,
                "batch written"
            );
            return;
        }

        let batch_id = outcome.batch_id;
        let generation = outcome.generation;
        let failed = outcome.into_failed_events();

        match self.failure_policy {
            FailurePolicy::Requeue {
                max_requeues,
                delay,
            } if generation < max_requeues => {
                let batch = Batch::requeued(failed, generation + 1);
                self.counters.record_requeue();
                warn!(
                    batch_id = %batch_id,
                    requeued_as = %batch.id,
                    events = batch.len(),
                    generation = batch.generation,
                    delay_ms = delay.as_millis() as u64,
                    "requeueing events from failed chunks"
                );
                *in_flight_events += batch.len();
                requeued.push_back(batch);
            }
            _ => {
                self.counters.record_dropped(failed.len());
                error!(
                    batch_id = %batch_id,
                    events = failed.len(),
                    generation,
                    "dropping events after failed writes"
                );
            }
        }
    }
}
