//! # Runtime events emitted by the supervisor.
//!
//! The [`EventKind`] enum follows the supervisor state machine:
//! - **Startup events**: configuration resolved, workers constructing/constructed
//! - **Run events**: workers started, exited, failed
//! - **Shutdown events**: signal received/ignored, worker stopped, all stopped
//!
//! The [`Event`] struct carries the worker name, error text and signal where relevant.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use workvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::WorkerFailed)
//!     .with_worker("billing")
//!     .with_error("connection reset");
//!
//! assert_eq!(ev.kind, EventKind::WorkerFailed);
//! assert_eq!(ev.worker.as_deref(), Some("billing"));
//! assert_eq!(ev.error.as_deref(), Some("connection reset"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::core::Signal;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Startup events ===
    /// Every worker entry resolved into a spec.
    ///
    /// Sets:
    /// - `count`: number of resolved workers
    ConfigResolved,

    /// Resolution or construction failed; nothing was started.
    ///
    /// Sets:
    /// - `worker`: offending worker, when known
    /// - `error`: failure message
    StartupFailed,

    /// Worker construction is about to begin (published in input order).
    ///
    /// Sets:
    /// - `worker`: worker name
    WorkerConstructing,

    /// Worker constructed (not running yet).
    ///
    /// Sets:
    /// - `worker`: worker name
    WorkerConstructed,

    // === Run events ===
    /// Every constructed worker was started.
    ///
    /// Sets:
    /// - `count`: number of running workers
    WorkersStarted,

    /// A worker's run future resolved successfully.
    ///
    /// Sets:
    /// - `worker`: worker name
    WorkerExited,

    /// A worker's run future failed or panicked.
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `error`: failure message
    WorkerFailed,

    // === Shutdown events ===
    /// A termination signal triggered the stop sequence.
    ///
    /// Sets:
    /// - `signal`: the signal
    ShutdownRequested,

    /// A signal arrived while already stopping and was ignored.
    ///
    /// Sets:
    /// - `signal`: the signal
    SignalIgnored,

    /// A worker's shutdown future resolved successfully.
    ///
    /// Sets:
    /// - `worker`: worker name
    WorkerStopped,

    /// A worker's shutdown future failed or panicked.
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `error`: failure message
    ShutdownFailed,

    /// Every run and shutdown future resolved; the supervisor is stopped.
    AllStopped,
}

/// Runtime event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the worker, if applicable.
    pub worker: Option<Arc<str>>,
    /// Human-readable error.
    pub error: Option<Arc<str>>,
    /// Signal that caused the event.
    pub signal: Option<Signal>,
    /// Number of workers involved.
    pub count: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker: None,
            error: None,
            signal: None,
            count: None,
        }
    }

    /// Attaches a worker name.
    #[inline]
    pub fn with_worker(mut self, worker: impl Into<Arc<str>>) -> Self {
        self.worker = Some(worker.into());
        self
    }

    /// Attaches an error message.
    #[inline]
    pub fn with_error(mut self, error: impl Into<Arc<str>>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Attaches the triggering signal.
    #[inline]
    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Attaches a worker count.
    #[inline]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}
