use tokio_util::sync::CancellationToken;

/// The signal that triggered shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

/// Cancel `ct` on the first SIGINT or SIGTERM.
///
/// Runs until a signal arrives or `ct` is cancelled elsewhere. A second
/// signal is not handled here; the default disposition applies once this
/// returns.
pub async fn install_shutdown_handler(ct: CancellationToken) -> anyhow::Result<Option<ShutdownSignal>> {
    let signal = tokio::select! {
        _ = ct.cancelled() => return Ok(None),
        signal = wait_for_signal() => signal?,
    };

    tracing::info!(?signal, "shutdown requested");
    ct.cancel();
    Ok(Some(signal))
}

#[cfg(unix)]
async fn wait_for_signal() -> anyhow::Result<ShutdownSignal> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut term = signal(SignalKind::terminate())?;
    let mut int = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = int.recv() => Ok(ShutdownSignal::Interrupt),
        _ = term.recv() => Ok(ShutdownSignal::Terminate),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> anyhow::Result<ShutdownSignal> {
    tokio::signal::ctrl_c().await?;
    Ok(ShutdownSignal::Interrupt)
}
