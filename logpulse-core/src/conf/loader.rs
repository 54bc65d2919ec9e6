use crate::conf::{ConfigError, LogpulseConfig, validate_config};
use std::fs;
use std::path::Path;

/// Read, parse and validate a config file. Warnings do not fail the load.
pub fn load_config(path: &Path) -> Result<LogpulseConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let config = parse_config(path, &raw)?;

    let report = validate_config(&config);
    if !report.errors.is_empty() {
        return Err(ConfigError::Validation { report });
    }

    Ok(config)
}

/// Parse HCL into a config without semantic validation.
pub fn parse_config(path: &Path, raw: &str) -> Result<LogpulseConfig, ConfigError> {
    hcl::from_str(raw).map_err(|e| ConfigError::parse(path, e))
}
