use crate::event::RawLine;
use crate::ingest::{Batch, BatchBuffer, IngestCounters, wait_for};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error};

/// Parse lines into events and seal them into batches.
///
/// Runs until the line channel closes, then seals whatever is buffered and
/// returns, which closes the batch channel.
pub async fn run_batcher(
    mut lines: mpsc::Receiver<RawLine>,
    batches: mpsc::Sender<Batch>,
    mut buffer: BatchBuffer,
    counters: Arc<IngestCounters>,
) {
    loop {
        let deadline = buffer.deadline();

        tokio::select! {
            biased;

            line = lines.recv() => {
                let Some(line) = line else {
                    break;
                };

                let now = Instant::now();
                let sealed = match line.parse() {
                    Ok(event) => buffer.push(event, now).map(|batch| (batch, "size")),
                    Err(err) => {
                        counters.record_malformed();
                        debug!(source = %line.source, line = %line.text, error = %err, "dropping malformed line");
                        None
                    }
                };

                // A steady stream of lines, valid or not, can keep the timer branch from firing.
                let sealed = match sealed {
                    Some(sealed) => Some(sealed),
                    None if buffer.is_expired(now) => buffer.seal().map(|batch| (batch, "latency")),
                    None => None,
                };

                if let Some((batch, trigger)) = sealed
                    && !forward(&batches, batch, trigger, &counters).await
                {
                    return;
                }
            }

            _ = wait_for(deadline) => {
                if let Some(batch) = buffer.seal()
                    && !forward(&batches, batch, "latency", &counters).await
                {
                    return;
                }
            }
        }
    }

    if let Some(batch) = buffer.seal() {
        forward(&batches, batch, "shutdown", &counters).await;
    }

    debug!("batcher stopped");
}

async fn forward(
    batches: &mpsc::Sender<Batch>,
    batch: Batch,
    trigger: &'static str,
    counters: &IngestCounters,
) -> bool {
    counters.record_batch();
    debug!(batch_id = %batch.id, events = batch.len(), trigger, "batch sealed");

    let events = batch.len();
    if batches.send(batch).await.is_err() {
        counters.record_dropped(events);
        error!(events, "writer pool is gone; dropping sealed batch");
        return false;
    }
    true
}
