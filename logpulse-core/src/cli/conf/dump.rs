use crate::conf::{LogpulseConfig, load_config};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    Json,
    Yaml,
}

/// JSON unless `--yaml` is given.
pub fn dump(path: PathBuf, json: bool, yaml: bool) -> anyhow::Result<()> {
    let format = if yaml && !json {
        DumpFormat::Yaml
    } else {
        DumpFormat::Json
    };

    let cfg = load_config(&path)?;
    println!("{}", render_config(&cfg, format)?);
    Ok(())
}

/// The resolved config, defaults filled in.
pub fn render_config(cfg: &LogpulseConfig, format: DumpFormat) -> anyhow::Result<String> {
    let rendered = match format {
        DumpFormat::Json => serde_json::to_string_pretty(cfg)?,
        DumpFormat::Yaml => serde_yaml::to_string(cfg)?,
    };
    Ok(rendered)
}
