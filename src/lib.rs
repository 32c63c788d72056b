//! # workvisor
//!
//! **Workvisor** runs a set of workflow workers side by side in one process.
//!
//! It turns a two-tier configuration (global defaults plus per-worker
//! overrides) into resolved worker specs, constructs every worker, runs them
//! concurrently, and stops them together on `SIGINT` / `SIGTERM`. Polling
//! queues and executing workflows is the job of an external
//! [`WorkerRuntime`]; this crate only supervises.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌───────────────┐  ┌─────────────────┐  ┌─────────────────┐
//!   │ GlobalConfig  │  │ WorkerConfigRaw │  │ WorkerConfigRaw │   (YAML via ConfigDocument,
//!   │  (defaults)   │  │    (worker 1)   │  │    (worker N)   │    or built in code)
//!   └──────┬────────┘  └────────┬────────┘  └────────┬────────┘
//!          └────────────────────┼────────────────────┘
//!                               ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  ConfigResolver                                                   │
//! │  - merge / isolated field policy per worker                       │
//! │  - named references ──► Loader (Registry) ──► Artifact            │
//! │  - all-or-nothing: any error leaves every worker unresolved       │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//!                  Vec<WorkerSpec>  (input order, unique names)
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor                                                       │
//! │  - WorkerFactory::new_worker() for all specs, join barrier        │
//! │  - Worker::run() for all workers                                  │
//! │  - first signal ──► Worker::shutdown() for all workers            │
//! │  - Bus (broadcast events), watch::Receiver<State>                 │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!   ┌──────────┐       ┌──────────┐       ┌──────────┐
//!   │  Worker  │       │  Worker  │       │  Worker  │   (provided by the WorkerRuntime)
//!   └──────────┘       └──────────┘       └──────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Idle ──► Loading ──► Starting ──► Running ──► Stopping ──► Stopped
//!             │            │           │                        ▲
//!             │            │           └── all runs resolved ───┘
//!             └────────────┴──► Failed  (exit code 3)
//!
//! Stopped with no failures          ─► exit code 0
//! Stopped with run/shutdown failure ─► exit code 1
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                           |
//! |-------------------|---------------------------------------------------------------|----------------------------------------------|
//! | **Configuration** | Two-tier worker configuration, YAML document, overrides.      | [`Config`], [`ConfigDocument`], [`Overrides`] |
//! | **Resolution**    | Merge policy and name → artifact loading, all-or-nothing.     | [`ConfigResolver`], [`Loader`], [`Registry`] |
//! | **Supervision**   | Construct, run and stop workers; one-shot signal handling.    | [`Supervisor`], [`SignalSource`]             |
//! | **Runtime seam**  | What an execution engine provides.                            | [`WorkerRuntime`], [`Worker`], [`WorkerFactory`] |
//! | **Events**        | Broadcast of every lifecycle transition.                      | [`Event`], [`EventKind`]                     |
//! | **Errors**        | Typed errors and exit codes.                                  | [`ResolveError`], [`RuntimeError`]           |
//! | **Logging**       | `tracing-subscriber` setup from configuration.                | [`logging::init`]                            |
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use workvisor::{ConfigDocument, Registry, Supervisor, WorkerRuntime, exit_code, logging};
//!
//! async fn serve(runtime: Arc<dyn WorkerRuntime>) -> i32 {
//!     let doc = match ConfigDocument::from_path("workers.yaml") {
//!         Ok(doc) => doc,
//!         Err(e) => {
//!             eprintln!("{e}");
//!             return workvisor::EXIT_STARTUP_FAILURE;
//!         }
//!     };
//!     let config = doc.into_config();
//!     let _ = logging::init(&config.global.logging);
//!
//!     let registry = Registry::with_runtime(runtime);
//!     // registry.register_workflow("billing.workflows:Invoice", ...);
//!     let mut sup = Supervisor::new(config, Arc::new(registry));
//!     exit_code(&sup.run().await)
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
pub mod logging;
mod resolve;
mod runtime;

#[cfg(test)]
mod test_support;

// ---- Public re-exports ----

pub use config::{
    Behavior, ConcurrencyLimits, Config, ConfigDocument, DEFAULT_ENDPOINT, DEFAULT_NAMESPACE,
    DEFAULT_QUEUE, DEFAULT_WORKER_NAME, GlobalConfig, Overrides, Reference, WorkerConfigRaw,
};
pub use crate::core::{
    ChannelSignals, DEFAULT_BUS_CAPACITY, OsSignals, RunReport, Signal, SignalSender,
    SignalSource, State, StopCause, Supervisor, SupervisorBuilder, exit_code, is_primary_thread,
    signal_channel,
};
pub use error::{
    ArtifactKind, ConfigError, EXIT_OK, EXIT_STARTUP_FAILURE, EXIT_WORKER_FAILURE, FailurePhase,
    LoadError, ResolveError, RuntimeError, WorkerError, WorkerFailure,
};
pub use events::{Bus, Event, EventKind};
pub use resolve::{ConfigResolver, Loader, Registry, WorkerSpec};
pub use runtime::{
    Activity, ActivityRef, Artifact, Client, ClientRef, ConnectOptions, ConverterRef,
    DataConverter, FactoryRef, HookFn, HookRef, Interceptor, InterceptorRef, PreInitHook,
    STANDARD_FACTORY, StandardFactory, Worker, WorkerFactory, WorkerOptions, WorkerRef,
    WorkerRuntime, Workflow, WorkflowRef,
};
