//! Graceful shutdown signal handling

use std::io;

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum ShutdownSignalError {
    #[error("failed to install Ctrl+C handler: {0}")]
    CtrlC(#[source] io::Error),

    #[cfg(unix)]
    #[error("failed to install SIGTERM handler: {0}")]
    SigTerm(#[source] io::Error),
}

#[cfg(unix)]
async fn terminate() -> Result<(), ShutdownSignalError> {
    signal::unix::signal(signal::unix::SignalKind::terminate())
        .map_err(ShutdownSignalError::SigTerm)?
        .recv()
        .await;

    Ok(())
}

#[cfg(not(unix))]
async fn terminate() -> Result<(), ShutdownSignalError> {
    std::future::pending().await
}

/// Wait for Ctrl+C or SIGTERM, then drain in-flight requests and stop.
pub(crate) async fn listen(
    handle: ServerHandle,
    service: &'static str,
) -> Result<(), ShutdownSignalError> {
    tokio::select! {
        result = signal::ctrl_c() => {
            result.map_err(ShutdownSignalError::CtrlC)?;
            info!(service, "ctrl_c signal received");
        }
        result = terminate() => {
            result?;
            info!(service, "terminate signal received");
        }
    };

    handle.stop_graceful(None);

    Ok(())
}
