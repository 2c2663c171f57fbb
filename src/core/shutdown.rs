//! OS signal handling for ending a run early.
//!
//! The supervisor normally stops when the configured run duration elapses;
//! [`wait_for_shutdown_signal`] lets an operator end the simulation sooner
//! through the same cooperative path (SIGINT/SIGTERM on Unix, Ctrl-C
//! elsewhere).

/// Completes when the process receives a termination signal.
///
/// Each call creates independent signal listeners. Returns `Err` only if
/// signal registration fails.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
    }
    Ok(())
}

/// Completes when the process receives Ctrl-C.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
