//! # OS signal handling.
//!
//! [`install`] registers listeners for termination requests and flips a [`Shutdown`] when one arrives.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by docker/systemd)
//!
//! **Windows platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::{Shutdown, error::SignalError};

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Termination request kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Interrupt,
    Terminate,
}

impl Signal {
    pub fn name(&self) -> &'static str {
        match self {
            Signal::Interrupt => "SIGINT",
            Signal::Terminate => "SIGTERM",
        }
    }

    pub fn number(&self) -> i32 {
        match self {
            Signal::Interrupt => 2,
            Signal::Terminate => 15,
        }
    }
}

/// Register signal listeners once per process and forward them into `shutdown`.
///
/// Must be called from within a tokio runtime. Registration happens before this function returns,
/// so a failure surfaces here rather than inside the spawned listener.
pub fn install(shutdown: &Shutdown) -> Result<JoinHandle<()>, SignalError> {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Err(SignalError::AlreadyInstalled);
    }

    let mut listener = match Listener::register() {
        Ok(l) => l,
        Err(e) => {
            INSTALLED.store(false, Ordering::SeqCst);
            return Err(SignalError::Register(e));
        }
    };

    let shutdown = shutdown.clone();
    Ok(tokio::spawn(async move {
        while let Some(signal) = listener.recv().await {
            on_signal(&shutdown, signal);
        }
        debug!(target: "rcb.core.signals", "signal listener closed");
    }))
}

/// Record a received signal; repeated signals only log.
pub fn on_signal(shutdown: &Shutdown, signal: Signal) {
    if shutdown.request() {
        info!(
            target: "rcb.core.signals",
            signal = signal.name(),
            signum = signal.number(),
            "received signal, shutting down gracefully"
        );
    } else {
        debug!(target: "rcb.core.signals", signal = signal.name(), "shutdown already requested");
    }
}

#[cfg(unix)]
struct Listener {
    sigint: tokio::signal::unix::Signal,
    sigterm: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Listener {
    fn register() -> std::io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
        })
    }

    async fn recv(&mut self) -> Option<Signal> {
        tokio::select! {
            s = self.sigint.recv() => s.map(|_| Signal::Interrupt),
            s = self.sigterm.recv() => s.map(|_| Signal::Terminate),
        }
    }
}

#[cfg(not(unix))]
struct Listener;

#[cfg(not(unix))]
impl Listener {
    fn register() -> std::io::Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) -> Option<Signal> {
        tokio::signal::ctrl_c().await.ok().map(|_| Signal::Interrupt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_signal_sets_flag_once() {
        let s = Shutdown::new();
        on_signal(&s, Signal::Terminate);
        assert!(s.is_requested());

        on_signal(&s, Signal::Interrupt);
        assert!(s.is_requested());
    }

    #[test]
    fn signal_numbers() {
        assert_eq!(Signal::Terminate.number(), 15);
        assert_eq!(Signal::Interrupt.number(), 2);
        assert_eq!(128 + Signal::Terminate.number(), rcb_model::SIGNALED_EXIT_STATUS);
    }

    #[tokio::test]
    async fn second_install_is_rejected() {
        let s = Shutdown::new();
        let listener = install(&s).expect("first install");
        assert!(matches!(install(&s), Err(SignalError::AlreadyInstalled)));
        assert!(!s.is_requested());
        listener.abort();
    }
}
