use crate::conf::{ConfigError, LogpulseConfig, load_config, validate_config};
use crate::ingest::{IngestReport, Pipeline};
use crate::logging::{LogTarget, init_logging};
use crate::runtime::{build_runtime, install_shutdown_handler, open_store};
use anyhow::{Context, Result};
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Run the ingestion pipeline until SIGINT or SIGTERM.
pub fn run(config_path: &Path) -> Result<()> {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(ConfigError::Validation { report }) => {
            eprint!("{}", report.render_pretty());
            anyhow::bail!("invalid configuration in {}", config_path.display());
        }
        Err(err) => return Err(err.into()),
    };

    // Held until exit so the file appender flushes.
    let _guard = init_logging(&config.logging, LogTarget::Stdout)?;

    for issue in validate_config(&config).warnings {
        tracing::warn!(field = %issue.field, "{}", issue.message);
    }

    let runtime = build_runtime().context("failed to build Tokio runtime")?;
    runtime.block_on(run_pipeline(config))?;

    Ok(())
}

pub async fn run_pipeline(config: LogpulseConfig) -> Result<IngestReport> {
    let store = open_store(&config.store)?;
    let pipeline = Pipeline::from_config(&config, store);

    let ct = CancellationToken::new();
    let signals = tokio::spawn({
        let ct = ct.clone();
        async move {
            if let Err(e) = install_shutdown_handler(ct).await {
                tracing::error!(error = %e, "failed to install signal handlers");
            }
        }
    });

    tracing::info!(
        path = %config.source.path.display(),
        store = ?config.store.kind,
        "ingestion started"
    );

    let result = pipeline.run(ct.clone()).await;

    // Release the signal task if the pipeline stopped on its own.
    ct.cancel();
    let _ = signals.await;

    Ok(result?)
}
