use crate::conf::{CONFIG_VERSION, LogpulseConfig, StoreKind, ValidationReport};
use tracing_subscriber::EnvFilter;

/// Collect every semantic problem in `config`; nothing short-circuits.
pub fn validate_config(config: &LogpulseConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if config.version != CONFIG_VERSION {
        report.error(
            "version",
            format!("unsupported config version: {}", config.version),
            Some(format!("Set `version = {CONFIG_VERSION}`.")),
        );
    }

    validate_source(config, &mut report);
    validate_batch(config, &mut report);
    validate_writer(config, &mut report);
    validate_store(config, &mut report);
    validate_logging(config, &mut report);

    report
}

fn validate_source(config: &LogpulseConfig, report: &mut ValidationReport) {
    let source = &config.source;

    if source.path.as_os_str().is_empty() {
        report.error("source.path", "log file path is empty".to_string(), None);
    }
    if source.poll_interval_ms == 0 {
        report.error(
            "source.poll_interval_ms",
            "poll interval must be greater than zero".to_string(),
            None,
        );
    }
    if source.channel_capacity == 0 {
        report.error(
            "source.channel_capacity",
            "line queue capacity must be greater than zero".to_string(),
            None,
        );
    }
    if source.max_reopen_backoff_ms < source.poll_interval_ms {
        report.warning(
            "source.max_reopen_backoff_ms",
            format!(
                "reopen backoff cap ({} ms) is below the poll interval ({} ms)",
                source.max_reopen_backoff_ms, source.poll_interval_ms
            ),
            Some("The poll interval is used as the cap instead.".to_string()),
        );
    }
}

fn validate_batch(config: &LogpulseConfig, report: &mut ValidationReport) {
    if config.batch.max_size == 0 {
        report.error(
            "batch.max_size",
            "batch size must be greater than zero".to_string(),
            None,
        );
    }
    if config.batch.max_latency_ms == 0 {
        report.error(
            "batch.max_latency_ms",
            "batch latency must be greater than zero".to_string(),
            None,
        );
    }
}

fn validate_writer(config: &LogpulseConfig, report: &mut ValidationReport) {
    let writer = &config.writer;
    let retry = &writer.retry;

    if writer.chunk_size == 0 {
        report.error(
            "writer.chunk_size",
            "chunk size must be greater than zero".to_string(),
            None,
        );
    } else if writer.chunk_size > config.batch.max_size && config.batch.max_size > 0 {
        report.warning(
            "writer.chunk_size",
            format!(
                "chunk size {} exceeds batch max size {}; batches are never split",
                writer.chunk_size, config.batch.max_size
            ),
            None,
        );
    }
    if writer.concurrency == 0 {
        report.error(
            "writer.concurrency",
            "writer concurrency must be greater than zero".to_string(),
            None,
        );
    }
    if writer.write_timeout_ms == 0 {
        report.error(
            "writer.write_timeout_ms",
            "write timeout must be greater than zero".to_string(),
            None,
        );
    }
    if !(0.0..=1.0).contains(&retry.jitter) {
        report.error(
            "writer.retry.jitter",
            format!("jitter {} is outside [0, 1]", retry.jitter),
            Some("Use a fraction such as 0.25 for +/-25%.".to_string()),
        );
    }
    if retry.base_backoff_ms > retry.max_backoff_ms {
        report.error(
            "writer.retry.base_backoff_ms",
            format!(
                "base backoff ({} ms) is greater than max backoff ({} ms)",
                retry.base_backoff_ms, retry.max_backoff_ms
            ),
            None,
        );
    }
}

fn validate_store(config: &LogpulseConfig, report: &mut ValidationReport) {
    let store = &config.store;

    if store.kind == StoreKind::File
        && store
            .path
            .as_ref()
            .is_none_or(|path| path.as_os_str().is_empty())
    {
        report.error(
            "store.path",
            "file store requires a path".to_string(),
            Some("Set `path` in the `store` block or use `kind = \"memory\"`.".to_string()),
        );
    }
    if store.measurement.trim().is_empty() {
        report.error(
            "store.measurement",
            "measurement name is empty".to_string(),
            None,
        );
    }
    if store.kind == StoreKind::Memory {
        report.warning(
            "store.kind",
            "memory store loses all events on exit".to_string(),
            None,
        );
    }
}

fn validate_logging(config: &LogpulseConfig, report: &mut ValidationReport) {
    if let Err(err) = EnvFilter::try_new(&config.logging.level) {
        report.error(
            "logging.level",
            format!("invalid log filter '{}': {err}", config.logging.level),
            Some("Use a level such as \"info\" or a directive like \"logpulse_core=debug\".".to_string()),
        );
    }
}
