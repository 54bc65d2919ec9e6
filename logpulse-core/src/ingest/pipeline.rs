use crate::conf::{FailureMode, LogpulseConfig};
use crate::ingest::{
    BatchBuffer, FailurePolicy, IngestCounters, IngestReport, RetryPolicy, Tailer, TailerParams,
    Writer, WriterPool, run_batcher,
};
use crate::store::{EventStore, StoreError};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} task failed: {source}")]
    Task {
        stage: &'static str,
        #[source]
        source: JoinError,
    },

    #[error("failed to flush store: {source}")]
    Flush {
        #[source]
        source: StoreError,
    },
}

/// A fully wired ingestion pipeline, not yet started.
pub struct Pipeline {
    source: PathBuf,
    tailer: TailerParams,
    line_capacity: usize,
    buffer: BatchBuffer,
    pool: WriterPool,
    store: Arc<dyn EventStore>,
    counters: Arc<IngestCounters>,
}

impl Pipeline {
    pub fn new(
        source: impl Into<PathBuf>,
        tailer: TailerParams,
        line_capacity: usize,
        buffer: BatchBuffer,
        pool: WriterPool,
    ) -> Self {
        Self {
            source: source.into(),
            tailer,
            line_capacity: line_capacity.max(1),
            buffer,
            store: pool.writer().store().clone(),
            counters: pool.counters().clone(),
            pool,
        }
    }

    pub fn from_config(config: &LogpulseConfig, store: Arc<dyn EventStore>) -> Self {
        let counters = Arc::new(IngestCounters::new());

        let retry = &config.writer.retry;
        let writer = Writer::new(
            store,
            config.store.measurement.as_str(),
            config.writer.chunk_size,
            config.writer.write_timeout(),
            RetryPolicy {
                max_retries: retry.max_retries,
                base_backoff: retry.base_backoff(),
                max_backoff: retry.max_backoff(),
                max_total_wait: retry.max_total_wait(),
                jitter: retry.jitter,
            },
        );

        let failure_policy = match config.writer.on_failure {
            FailureMode::Requeue => FailurePolicy::Requeue {
                max_requeues: config.writer.max_requeues,
                delay: config.writer.requeue_delay(),
            },
            FailureMode::Drop => FailurePolicy::Drop,
        };

        let pool = WriterPool::new(
            writer,
            config.writer.concurrency,
            failure_policy,
            config.writer.shutdown_timeout(),
            counters.clone(),
        );

        Self::new(
            &config.source.path,
            TailerParams {
                poll_interval: config.source.poll_interval(),
                max_reopen_backoff: config.source.max_reopen_backoff(),
            },
            config.source.channel_capacity,
            BatchBuffer::new(config.batch.max_size, config.batch.max_latency()),
            pool,
        )
    }

    pub fn counters(&self) -> Arc<IngestCounters> {
        self.counters.clone()
    }

    /// Position the tailer at the end of the source and spawn every stage.
    ///
    /// Cancelling `ct` stops the tailer; the rest of the pipeline then drains.
    pub async fn start(self, ct: CancellationToken) -> RunningPipeline {
        let (line_tx, line_rx) = mpsc::channel(self.line_capacity);
        let (batch_tx, batch_rx) = mpsc::channel(self.pool.concurrency());
        let max_batch_size = self.buffer.max_size();
        let max_batch_latency = self.buffer.max_latency();

        let tailer = Tailer::open_at_end(&self.source, self.tailer).await;

        let tailer = tokio::spawn(tailer.run(line_tx, ct, self.counters.clone()));
        let batcher = tokio::spawn(run_batcher(
            line_rx,
            batch_tx,
            self.buffer,
            self.counters.clone(),
        ));
        let writers = tokio::spawn(self.pool.run(batch_rx));

        info!(
            source = %self.source.display(),
            max_batch_size,
            max_batch_latency_ms = max_batch_latency.as_millis() as u64,
            "ingestion pipeline started"
        );

        RunningPipeline {
            tailer,
            batcher,
            writers,
            store: self.store,
            counters: self.counters,
        }
    }

    pub async fn run(self, ct: CancellationToken) -> Result<IngestReport, PipelineError> {
        self.start(ct).await.wait().await
    }
}

pub struct RunningPipeline {
    tailer: JoinHandle<()>,
    batcher: JoinHandle<()>,
    writers: JoinHandle<()>,
    store: Arc<dyn EventStore>,
    counters: Arc<IngestCounters>,
}

impl RunningPipeline {
    pub fn counters(&self) -> &Arc<IngestCounters> {
        &self.counters
    }

    /// Wait for every stage to finish, then flush the store.
    pub async fn wait(self) -> Result<IngestReport, PipelineError> {
        self.tailer.await.map_err(task_failed("tailer"))?;
        self.batcher.await.map_err(task_failed("batcher"))?;
        self.writers.await.map_err(task_failed("writer pool"))?;

        self.store
            .flush()
            .await
            .map_err(|source| PipelineError::Flush { source })?;

        let report = self.counters.snapshot();
        info!(
            lines_read = report.lines_read,
            lines_malformed = report.lines_malformed,
            batches_sealed = report.batches_sealed,
            events_written = report.events_written,
            events_dropped = report.events_dropped,
            write_retries = report.write_retries,
            requeues = report.requeues,
            "ingestion pipeline stopped"
        );
        Ok(report)
    }
}

fn task_failed(stage: &'static str) -> impl FnOnce(JoinError) -> PipelineError {
    move |source| PipelineError::Task { stage, source }
}
