use crate::conf::LoggingConfig;
use crate::event::TIMESTAMP_FORMAT;
use crate::logging::{LogTarget, init_logging};
use crate::runtime::build_runtime;
use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use clap::Args;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

const CUSTOMERS: u32 = 50;
const RESOURCES: u32 = 4;
const STATUS_CODES: [u16; 7] = [200, 201, 400, 401, 403, 404, 500];
const HISTORY_SECONDS: i64 = 30 * 24 * 60 * 60;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Log file to append to
    #[arg(long, default_value = "/log_generator/api_requests.log")]
    pub output: PathBuf,

    /// Lines written per tick
    #[arg(long, default_value_t = 100)]
    pub batch_size: usize,

    /// Seconds between ticks
    #[arg(long, default_value_t = 1)]
    pub interval_secs: u64,

    /// Stop after this many lines
    #[arg(long, default_value_t = 1000)]
    pub max_logs: usize,

    /// RNG seed; the same seed and start time give the same lines
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Synthetic access-log lines in the ingest wire format.
pub struct LogGenerator {
    rng: StdRng,
    now: DateTime<Utc>,
}

impl LogGenerator {
    /// Timestamps fall within the 30 days before `now`.
    pub fn new(seed: u64, now: DateTime<Utc>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            now,
        }
    }

    pub fn next_line(&mut self) -> String {
        let age = TimeDelta::seconds(self.rng.random_range(0..HISTORY_SECONDS));
        let timestamp = self.now - age;
        let customer = self.rng.random_range(1..=CUSTOMERS);
        let resource = self.rng.random_range(1..=RESOURCES);
        let status = STATUS_CODES[self.rng.random_range(0..STATUS_CODES.len())];
        let duration: f64 = self.rng.random_range(0.1..2.0);

        format!(
            "{} cust_{customer} /api/v1/resource{resource} {status} {duration:.3}",
            timestamp.format(TIMESTAMP_FORMAT)
        )
    }

    pub fn lines(&mut self, count: usize) -> Vec<String> {
        (0..count).map(|_| self.next_line()).collect()
    }
}

pub fn generate(args: GenerateArgs) -> Result<()> {
    let _guard = init_logging(&LoggingConfig::default(), LogTarget::Stdout)?;

    let runtime = build_runtime().context("failed to build Tokio runtime")?;
    let written = runtime.block_on(generate_logs(&args))?;

    tracing::info!(written, path = %args.output.display(), "log generation finished");
    Ok(())
}

/// Append `batch_size` lines every `interval_secs` until `max_logs` lines
/// are written. Returns the number of lines written.
pub async fn generate_logs(args: &GenerateArgs) -> Result<usize> {
    let mut generator = LogGenerator::new(args.seed, Utc::now());
    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval_secs.max(1)));
    let batch_size = args.batch_size.max(1);
    let mut written = 0;

    while written < args.max_logs {
        ticker.tick().await;

        let count = batch_size.min(args.max_logs - written);
        append_lines(&args.output, &generator.lines(count)).await?;
        written += count;

        tracing::debug!(count, written, "appended log lines");
    }

    Ok(written)
}

async fn append_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut buf = lines.join("\n");
    buf.push('\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.write_all(buf.as_bytes())
        .await
        .with_context(|| format!("failed to append to {}", path.display()))?;
    file.flush().await?;

    Ok(())
}
