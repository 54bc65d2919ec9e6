use crate::conf::{LogFormat, LoggingConfig};
use anyhow::{Context, Result, anyhow};
use std::io::{self, IsTerminal};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Where console log output goes.
///
/// Commands that print results on stdout (like `stats`) log to stderr so the
/// two streams never interleave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    Stderr,
}

/// Install the global subscriber.
///
/// - `RUST_LOG` wins over the configured level.
/// - JSON output flattens event fields into the top-level object.
/// - With `logging.file` set, events are also written to that file through a
///   non-blocking appender. Keep the returned guard alive until exit or
///   buffered lines are lost.
/// - With `TOKIO_CONSOLE` set, the console subscriber is installed instead.
pub fn init_logging(config: &LoggingConfig, target: LogTarget) -> Result<Option<WorkerGuard>> {
    // tokio-console owns the global subscriber when enabled.
    if std::env::var("TOKIO_CONSOLE").is_ok() {
        console_subscriber::init();
        return Ok(None);
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .with_context(|| format!("invalid log level '{}'", config.level))?,
    };

    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
    match target {
        LogTarget::Stdout => {
            let ansi = io::stdout().is_terminal();
            layers.push(format_layer(config.format, io::stdout, ansi));
        }
        LogTarget::Stderr => {
            let ansi = io::stderr().is_terminal();
            layers.push(format_layer(config.format, io::stderr, ansi));
        }
    }

    let guard = match &config.file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            layers.push(format_layer(config.format, writer, false));
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}

fn format_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed(),
    }
}

fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("log file path has no file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .with_context(|| format!("failed to open log file {}", path.display()))
}
