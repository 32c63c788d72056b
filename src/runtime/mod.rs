//! # Worker Runtime contract.
//!
//! The execution engine that actually polls queues and runs workflows lives
//! outside this crate. This module defines the seam the supervisor needs:
//!
//! - [`WorkerRuntime`]: connects clients and builds workers;
//! - [`Worker`]: a constructed worker that can run and be asked to stop;
//! - [`WorkerFactory`]: turns a resolved [`WorkerSpec`] into a [`Worker`];
//! - [`StandardFactory`]: the default factory (hooks → connect → build).
//!
//! ```text
//! WorkerSpec ──► WorkerFactory::new_worker()
//!                  ├─► PreInitHook::call()           (in list order, synchronous)
//!                  ├─► WorkerRuntime::connect()      (endpoint, namespace, converter, metrics)
//!                  └─► WorkerRuntime::build_worker() (queue, workflows, activities, limits)
//!                            └─► WorkerRef ──► Worker::run() / Worker::shutdown()
//! ```

mod artifact;
mod factory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ConcurrencyLimits;
use crate::error::WorkerError;
use crate::resolve::WorkerSpec;

pub use artifact::{
    Activity, ActivityRef, Artifact, ConverterRef, DataConverter, FactoryRef, HookFn, HookRef,
    Interceptor, InterceptorRef, PreInitHook, Workflow, WorkflowRef,
};
pub use factory::{STANDARD_FACTORY, StandardFactory};

/// Shared worker handle.
pub type WorkerRef = Arc<dyn Worker>;

/// Shared client handle.
pub type ClientRef = Arc<dyn Client>;

/// # A constructed worker.
///
/// `run` and `shutdown` are called concurrently: `shutdown` asks a running
/// worker to drain and must make the pending `run` future resolve.
#[async_trait]
pub trait Worker: Send + Sync + 'static {
    /// Runs until natural completion or until [`shutdown`](Worker::shutdown) is requested.
    async fn run(&self) -> Result<(), WorkerError>;

    /// Requests a graceful stop; resolves once the worker stopped.
    ///
    /// Any stop timeout is the runtime's business.
    async fn shutdown(&self) -> Result<(), WorkerError>;
}

/// Connected client, as returned by [`WorkerRuntime::connect`].
pub trait Client: Send + Sync + 'static {
    /// Endpoint the client is connected to.
    fn endpoint(&self) -> &str;

    /// Namespace the client is bound to.
    fn namespace(&self) -> &str;
}

/// Parameters of [`WorkerRuntime::connect`].
#[derive(Clone)]
pub struct ConnectOptions {
    /// Server endpoint (`host:port`).
    pub endpoint: String,
    /// Namespace to bind the client to.
    pub namespace: String,
    /// Payload converter; `None` keeps the runtime default.
    pub converter: Option<ConverterRef>,
    /// Bind address of a metrics exporter; `None` disables it.
    pub metrics_bind_address: Option<String>,
}

/// Parameters of [`WorkerRuntime::build_worker`].
#[derive(Clone)]
pub struct WorkerOptions {
    /// Worker name, for the runtime's own logs.
    pub name: String,
    /// Task queue the worker polls.
    pub queue: String,
    /// Workflows served by the worker.
    pub workflows: Vec<WorkflowRef>,
    /// Activities served by the worker.
    pub activities: Vec<ActivityRef>,
    /// Interceptors, in order.
    pub interceptors: Vec<InterceptorRef>,
    /// Concurrency limits (`0` = runtime default).
    pub limits: ConcurrencyLimits,
}

/// # External execution engine.
#[async_trait]
pub trait WorkerRuntime: Send + Sync + 'static {
    /// Establishes a client connection.
    async fn connect(&self, opts: ConnectOptions) -> Result<ClientRef, WorkerError>;

    /// Builds a worker bound to `client`.
    async fn build_worker(
        &self,
        client: ClientRef,
        opts: WorkerOptions,
    ) -> Result<WorkerRef, WorkerError>;
}

/// # Turns a resolved spec into a constructed worker.
///
/// Custom factories can be registered in the [`Registry`](crate::Registry) and
/// referenced by name from configuration.
#[async_trait]
pub trait WorkerFactory: Send + Sync + 'static {
    /// Stable factory name.
    fn name(&self) -> &str;

    /// Constructs (but does not run) the worker described by `spec`.
    async fn new_worker(&self, spec: &WorkerSpec) -> Result<WorkerRef, WorkerError>;
}
