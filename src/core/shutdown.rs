//! # Termination signal sources.
//!
//! The supervisor only needs "the next termination signal". [`SignalSource`]
//! abstracts where it comes from:
//!
//! - [`OsSignals`]: process signals. **Unix**: `SIGINT` (Ctrl-C) and `SIGTERM`
//!   (`kill <pid>`, systemd, Kubernetes). **Other platforms**: Ctrl-C only.
//! - [`ChannelSignals`]: signals injected through a [`SignalSender`], for
//!   embedding the supervisor in a larger program and for tests.
//!
//! OS handlers are installed only from the primary thread (named `main`).
//! Elsewhere [`OsSignals::install`] returns a source that never fires.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

/// Termination signal recognized by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// `SIGINT` / Ctrl-C.
    Interrupt,
    /// `SIGTERM`.
    Terminate,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Interrupt => f.write_str("SIGINT"),
            Signal::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Stream of termination signals.
#[async_trait]
pub trait SignalSource: Send {
    /// Waits for the next signal. `None` means no further signal will ever arrive.
    async fn recv(&mut self) -> Option<Signal>;
}

/// Returns `true` when called from the process's primary thread.
///
/// Detection is by thread name: the standard library names the thread that
/// runs `fn main` `"main"`, and there is no portable way to ask for the
/// process's first thread. Any other thread explicitly named `"main"` also
/// passes, and an unnamed thread never does. Callers that need a different
/// policy pass their own [`SignalSource`] to
/// [`Supervisor::run_with_signals`](crate::Supervisor::run_with_signals).
pub fn is_primary_thread() -> bool {
    std::thread::current().name() == Some("main")
}

/// Process signal listeners.
pub struct OsSignals {
    inner: Option<imp::Listeners>,
}

impl OsSignals {
    /// Installs interrupt and terminate listeners.
    ///
    /// Off the primary thread this is a silent no-op: the returned source never fires.
    pub fn install() -> std::io::Result<Self> {
        if !is_primary_thread() {
            debug!("not on the primary thread; signal handling not installed");
            return Ok(Self::disabled());
        }
        Ok(Self {
            inner: Some(imp::Listeners::new()?),
        })
    }

    /// A source that never fires.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    /// Returns `true` if OS listeners are installed.
    pub fn is_installed(&self) -> bool {
        self.inner.is_some()
    }
}

#[async_trait]
impl SignalSource for OsSignals {
    async fn recv(&mut self) -> Option<Signal> {
        match self.inner.as_mut() {
            Some(listeners) => listeners.recv().await,
            None => std::future::pending().await,
        }
    }
}

#[cfg(unix)]
mod imp {
    use tokio::signal::unix::{SignalKind, signal};

    use super::Signal;

    pub(super) struct Listeners {
        sigint: tokio::signal::unix::Signal,
        sigterm: tokio::signal::unix::Signal,
    }

    impl Listeners {
        pub(super) fn new() -> std::io::Result<Self> {
            Ok(Self {
                sigint: signal(SignalKind::interrupt())?,
                sigterm: signal(SignalKind::terminate())?,
            })
        }

        pub(super) async fn recv(&mut self) -> Option<Signal> {
            tokio::select! {
                got = self.sigint.recv() => got.map(|()| Signal::Interrupt),
                got = self.sigterm.recv() => got.map(|()| Signal::Terminate),
            }
        }
    }
}

#[cfg(not(unix))]
mod imp {
    use super::Signal;

    pub(super) struct Listeners;

    impl Listeners {
        pub(super) fn new() -> std::io::Result<Self> {
            Ok(Self)
        }

        pub(super) async fn recv(&mut self) -> Option<Signal> {
            tokio::signal::ctrl_c().await.ok().map(|()| Signal::Interrupt)
        }
    }
}

/// Creates a connected sender / source pair.
pub fn signal_channel() -> (SignalSender, ChannelSignals) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SignalSender { tx }, ChannelSignals { rx })
}

/// Sending half of [`signal_channel`].
#[derive(Clone, Debug)]
pub struct SignalSender {
    tx: mpsc::UnboundedSender<Signal>,
}

impl SignalSender {
    /// Delivers `signal`. Returns `false` if the source was dropped.
    pub fn send(&self, signal: Signal) -> bool {
        self.tx.send(signal).is_ok()
    }
}

/// Receiving half of [`signal_channel`]; ends when every sender is dropped.
#[derive(Debug)]
pub struct ChannelSignals {
    rx: mpsc::UnboundedReceiver<Signal>,
}

#[async_trait]
impl SignalSource for ChannelSignals {
    async fn recv(&mut self) -> Option<Signal> {
        self.rx.recv().await
    }
}
