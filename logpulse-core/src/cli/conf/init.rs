use anyhow::{Context, Result, bail};
use rust_embed::RustEmbed;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(RustEmbed)]
#[folder = "config-templates/"]
pub struct ConfigTemplates;

pub fn init(path: PathBuf) -> Result<()> {
    write_template(&path)?;

    println!("✔ Wrote {}", path.display());
    println!();
    println!("Next steps:");
    println!("  logpulse config check {}", path.display());
    println!("  logpulse run --config {}", path.display());

    Ok(())
}

/// Write the embedded template to `path`, refusing to overwrite anything.
pub fn write_template(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    write_file(path, &template("logpulse.hcl")?)
}

/// Fetch an embedded config template as UTF-8 text
fn template(path: &str) -> Result<String> {
    let file = ConfigTemplates::get(path)
        .with_context(|| format!("missing embedded config template: {path}"))?;

    let s =
        std::str::from_utf8(file.data.as_ref()).context("config template is not valid UTF-8")?;

    Ok(s.to_owned())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    let mut f = fs::File::create_new(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    f.write_all(contents.trim_start().as_bytes())?;
    Ok(())
}
