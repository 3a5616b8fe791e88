//! # Cross-platform OS termination signal handling.
//!
//! [`wait_for_shutdown_signal`] completes when the process receives a
//! termination signal and reports which one, so the shutdown path can log it.
//!
//! ## Signals
//! **Unix:** SIGHUP, SIGTERM, SIGINT.
//! **Other platforms:** Ctrl-C only, reported as [`SignalKind::Interrupt`].

use std::fmt;

/// The termination signal kinds the runtime reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// SIGHUP: controlling terminal closed or daemon reload convention.
    Hangup,
    /// SIGINT: Ctrl-C in a terminal.
    Interrupt,
    /// SIGTERM: default kill signal, used by systemd/Kubernetes.
    Terminate,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalKind::Hangup => "SIGHUP",
            SignalKind::Interrupt => "SIGINT",
            SignalKind::Terminate => "SIGTERM",
        };
        f.write_str(name)
    }
}

/// Waits for a termination signal and returns its kind.
///
/// Each call creates independent signal listeners. Returns `Err` only if
/// listener registration fails.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<SignalKind> {
    use tokio::signal::unix::{signal, SignalKind as Unix};

    let mut sighup = signal(Unix::hangup())?;
    let mut sigint = signal(Unix::interrupt())?;
    let mut sigterm = signal(Unix::terminate())?;

    let kind = tokio::select! {
        _ = sighup.recv() => SignalKind::Hangup,
        _ = sigint.recv() => SignalKind::Interrupt,
        _ = sigterm.recv() => SignalKind::Terminate,
    };
    Ok(kind)
}

/// Waits for a termination signal and returns its kind.
///
/// Non-unix platforms only expose Ctrl-C.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<SignalKind> {
    tokio::signal::ctrl_c().await?;
    Ok(SignalKind::Interrupt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_kinds_display_as_posix_names() {
        assert_eq!(SignalKind::Hangup.to_string(), "SIGHUP");
        assert_eq!(SignalKind::Interrupt.to_string(), "SIGINT");
        assert_eq!(SignalKind::Terminate.to_string(), "SIGTERM");
    }
}
