mod error;
mod loader;
mod report;
mod types;
mod validate;

#[cfg(test)]
mod tests;

pub use error::ConfigError;
pub use loader::{load_config, parse_config};
pub use report::{Severity, ValidationIssue, ValidationReport};
pub use types::*;
pub use validate::validate_config;
