//! Tailer -> batcher -> writer pool -> store.
//!
//! Each stage runs in its own task and hands work forward over a bounded
//! channel, so a slow store pushes back on the tailer instead of growing memory.

mod batch;
mod batcher;
mod constants;
mod counters;
mod pipeline;
mod pool;
mod retry;
mod tailer;
mod writer;

#[cfg(test)]
mod tests;

pub use batch::{Batch, BatchBuffer};
pub use batcher::run_batcher;
pub use constants::*;
pub use counters::{IngestCounters, IngestReport};
pub use pipeline::{Pipeline, PipelineError, RunningPipeline};
pub use pool::{FailurePolicy, WriterPool};
pub use retry::{RetryPolicy, retry_with_jittered_backoff};
pub use tailer::{TailError, TailNext, Tailer, TailerParams};
pub use writer::{FailedChunk, WriteError, WriteOutcome, Writer};

use std::future;
use tokio::time::{Instant, sleep_until};

/// Resolve at `deadline`, or never when there is none.
pub(crate) async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}
