use crate::conf::{LogpulseConfig, Severity, StoreKind, validate_config};

fn error_fields(config: &LogpulseConfig) -> Vec<String> {
    validate_config(config)
        .errors
        .into_iter()
        .map(|issue| issue.field)
        .collect()
}

#[test]
fn defaults_are_valid() {
    let report = validate_config(&LogpulseConfig::default());

    assert!(!report.has_violations(), "{}", report.render_plain());
}

#[test]
fn flags_unsupported_version() {
    let mut config = LogpulseConfig::default();
    config.version = 2;

    assert_eq!(error_fields(&config), vec!["version"]);
}

#[test]
fn flags_retry_settings() {
    // Arrange
    let mut config = LogpulseConfig::default();
    config.writer.retry.jitter = 1.5;
    config.writer.retry.base_backoff_ms = 20_000;

    // Act
    let fields = error_fields(&config);

    // Assert
    assert_eq!(
        fields,
        vec!["writer.retry.jitter", "writer.retry.base_backoff_ms"]
    );
}

#[test]
fn nan_jitter_is_rejected() {
    let mut config = LogpulseConfig::default();
    config.writer.retry.jitter = f64::NAN;

    assert_eq!(error_fields(&config), vec!["writer.retry.jitter"]);
}

#[test]
fn file_store_needs_a_path() {
    let mut config = LogpulseConfig::default();
    config.store.path = None;

    assert_eq!(error_fields(&config), vec!["store.path"]);

    config.store.kind = StoreKind::Memory;
    let report = validate_config(&config);
    assert!(report.errors.is_empty());
    assert_eq!(report.warnings[0].field, "store.kind");
    assert_eq!(report.warnings[0].severity, Severity::Warning);
}

#[test]
fn flags_bad_log_filter() {
    let mut config = LogpulseConfig::default();
    config.logging.level = "logpulse=loud".to_string();

    assert_eq!(error_fields(&config), vec!["logging.level"]);
}

#[test]
fn warns_when_chunks_exceed_batches() {
    let mut config = LogpulseConfig::default();
    config.batch.max_size = 10;

    let report = validate_config(&config);

    assert!(report.errors.is_empty());
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].field, "writer.chunk_size");
}

#[test]
fn pretty_report_lists_every_issue() {
    let mut config = LogpulseConfig::default();
    config.source.channel_capacity = 0;
    config.writer.chunk_size = 0;

    let rendered = validate_config(&config).render_plain();

    assert!(rendered.contains("source.channel_capacity: error"));
    assert!(rendered.contains("writer.chunk_size: error"));
}
