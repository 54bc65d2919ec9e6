use crate::cli::conf::{config_error_hint, write_template};
use crate::conf::{LogpulseConfig, load_config};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

#[test]
fn init_writes_a_loadable_template() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("conf/logpulse.hcl");

    // Act
    write_template(&path).unwrap();

    // Assert
    let config = load_config(&path).unwrap();
    assert_eq!(config, LogpulseConfig::default());
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("# logpulse configuration"));
}

#[test]
fn init_refuses_to_overwrite() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("logpulse.hcl");
    fs::write(&path, "version = 1\n").unwrap();

    let err = write_template(&path).unwrap_err();

    assert!(err.to_string().contains("already exists"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "version = 1\n");
}

#[test]
fn missing_file_hints_at_init() {
    let dir = tempdir().unwrap();

    let err = load_config(&dir.path().join("missing.hcl")).unwrap_err();

    let hint = config_error_hint(&err).unwrap();
    assert!(hint.contains("logpulse config init"));
}

#[test]
fn dump_includes_defaults() {
    use crate::cli::conf::{DumpFormat, render_config};
    use serde_json::Value;

    let mut config = LogpulseConfig::default();
    config.writer.concurrency = 8;

    let json: Value =
        serde_json::from_str(&render_config(&config, DumpFormat::Json).unwrap()).unwrap();
    let yaml = render_config(&config, DumpFormat::Yaml).unwrap();

    assert_eq!(json["writer"]["concurrency"], 8);
    assert_eq!(json["writer"]["on_failure"], "requeue");
    assert_eq!(json["stats"]["window"], "up_to_now");
    assert!(yaml.contains("chunk_size: 10000"));
}
