//! # OS termination signals.
//!
//! [`ShutdownSignal`] registers its listeners up front so a registration
//! failure surfaces at startup, then [`ShutdownSignal::recv`] completes on the
//! first termination signal.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd/Kubernetes)
//!
//! **Windows platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]

/// Registered termination-signal listeners.
#[cfg(unix)]
pub struct ShutdownSignal {
    sigint: tokio::signal::unix::Signal,
    sigterm: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl ShutdownSignal {
    /// Registers SIGINT and SIGTERM listeners.
    pub fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
        })
    }

    /// Completes when either signal is received.
    pub async fn recv(&mut self) {
        tokio::select! {
            _ = self.sigint.recv()  => {},
            _ = self.sigterm.recv() => {},
        }
    }
}

/// Registered termination-signal listeners.
#[cfg(not(unix))]
pub struct ShutdownSignal;

#[cfg(not(unix))]
impl ShutdownSignal {
    /// Nothing to register ahead of time on this platform.
    pub fn install() -> std::io::Result<Self> {
        Ok(Self)
    }

    /// Completes on Ctrl-C.
    pub async fn recv(&mut self) {
        let _ = tokio::signal::ctrl_c().await;
    }
}
