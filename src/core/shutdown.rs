//! Termination-signal wait for the supervisor's shutdown arm.
//!
//! The supervisor treats an interrupt (Ctrl-C in a terminal) or a terminate
//! signal (the default `kill`, what service managers send on stop) as a
//! request to shut the worker graph down. Non-unix builds listen for Ctrl-C
//! only.

use std::future::pending;

use tracing::error;

/// Completes when the process is asked to terminate.
///
/// If the signal listeners cannot be registered, the failure is logged once
/// and this future never completes: the graph then runs to natural
/// completion rather than shutting down spuriously.
pub(crate) async fn termination_signal() {
    if let Err(err) = signal_wait().await {
        error!(error = %err, "termination-signal listener unavailable");
        pending::<()>().await;
    }
}

#[cfg(unix)]
async fn signal_wait() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn signal_wait() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
