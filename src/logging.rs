//! File logging setup for the embedding application.

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;

/// Initialise non-blocking file logging and return the guard that keeps the
/// writer alive. Call once at startup and hold the guard for the process
/// lifetime.
pub fn init_file_logging(log_file: &str) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(".", log_file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to init logging: {e}"))?;
    tracing::info!("logging to {}", log_file);
    Ok(guard)
}
