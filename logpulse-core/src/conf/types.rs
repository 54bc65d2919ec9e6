use crate::stats::WindowPolicy;
use crate::store::DEFAULT_MEASUREMENT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogpulseConfig {
    pub version: u32,
    pub source: SourceConfig,
    pub batch: BatchConfig,
    pub writer: WriterConfig,
    pub store: StoreConfig,
    pub stats: StatsConfig,
    pub logging: LoggingConfig,
}

impl Default for LogpulseConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            source: SourceConfig::default(),
            batch: BatchConfig::default(),
            writer: WriterConfig::default(),
            store: StoreConfig::default(),
            stats: StatsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

//-----------------------------------------------------------------------------
// Source
//-----------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub path: PathBuf,
    pub poll_interval_ms: u64,
    pub max_reopen_backoff_ms: u64,
    /// Capacity of the line queue between tailer and batcher.
    pub channel_capacity: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/log_generator/api_requests.log"),
            poll_interval_ms: 100,
            max_reopen_backoff_ms: 5_000,
            channel_capacity: 10_000,
        }
    }
}

impl SourceConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn max_reopen_backoff(&self) -> Duration {
        Duration::from_millis(self.max_reopen_backoff_ms)
    }
}

//-----------------------------------------------------------------------------
// Batch
//-----------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    pub max_size: usize,
    pub max_latency_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_size: 100_000,
            max_latency_ms: 1_000,
        }
    }
}

impl BatchConfig {
    pub fn max_latency(&self) -> Duration {
        Duration::from_millis(self.max_latency_ms)
    }
}

//-----------------------------------------------------------------------------
// Writer
//-----------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    #[default]
    Requeue,
    Drop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriterConfig {
    pub chunk_size: usize,
    pub concurrency: usize,
    pub write_timeout_ms: u64,
    pub on_failure: FailureMode,
    pub max_requeues: u32,
    pub requeue_delay_ms: u64,
    pub shutdown_timeout_ms: u64,
    pub retry: RetryConfig,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 10_000,
            concurrency: 4,
            write_timeout_ms: 10_000,
            on_failure: FailureMode::Requeue,
            max_requeues: 3,
            requeue_delay_ms: 1_000,
            shutdown_timeout_ms: 10_000,
            retry: RetryConfig::default(),
        }
    }
}

impl WriterConfig {
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn requeue_delay(&self) -> Duration {
        Duration::from_millis(self.requeue_delay_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub max_total_wait_ms: u64,
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_backoff_ms: 100,
            max_backoff_ms: 10_000,
            max_total_wait_ms: 30_000,
            jitter: 0.25,
        }
    }
}

impl RetryConfig {
    pub fn base_backoff(&self) -> Duration {
        Duration::from_millis(self.base_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    pub fn max_total_wait(&self) -> Duration {
        Duration::from_millis(self.max_total_wait_ms)
    }
}

//-----------------------------------------------------------------------------
// Store
//-----------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub kind: StoreKind,
    pub path: Option<PathBuf>,
    pub measurement: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::File,
            path: Some(PathBuf::from("data/api_requests.jsonl")),
            measurement: DEFAULT_MEASUREMENT.to_string(),
        }
    }
}

//-----------------------------------------------------------------------------
// Stats
//-----------------------------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatsConfig {
    pub window: WindowPolicy,
}

//-----------------------------------------------------------------------------
// Logging
//-----------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    pub level: String,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
            file: None,
        }
    }
}
