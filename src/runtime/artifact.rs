//! # Code artifacts a worker is assembled from.
//!
//! Workflows, activities, interceptors and data converters are opaque to the
//! supervisor: it only needs their names for logging and hands them to the
//! [`WorkerRuntime`](crate::WorkerRuntime) untouched. Pre-init hooks are the one
//! artifact the supervisor side executes itself.
//!
//! [`Artifact`] is the tagged union a [`Loader`](crate::Loader) returns for a name;
//! the resolver checks the tag against the field being resolved.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::error::{ArtifactKind, WorkerError};
use crate::runtime::WorkerFactory;

/// Workflow definition understood by the worker runtime.
pub trait Workflow: Send + Sync + 'static {
    /// Stable workflow name.
    fn name(&self) -> &str;

    /// Escape hatch for runtimes to recover their concrete type.
    fn as_any(&self) -> &dyn Any;
}

/// Activity definition understood by the worker runtime.
pub trait Activity: Send + Sync + 'static {
    /// Stable activity name.
    fn name(&self) -> &str;

    /// Escape hatch for runtimes to recover their concrete type.
    fn as_any(&self) -> &dyn Any;
}

/// Interceptor attached to a worker.
pub trait Interceptor: Send + Sync + 'static {
    /// Stable interceptor name.
    fn name(&self) -> &str;

    /// Escape hatch for runtimes to recover their concrete type.
    fn as_any(&self) -> &dyn Any;
}

/// Payload converter attached to the client connection.
pub trait DataConverter: Send + Sync + 'static {
    /// Stable converter name.
    fn name(&self) -> &str;

    /// Escape hatch for runtimes to recover their concrete type.
    fn as_any(&self) -> &dyn Any;
}

/// Synchronous hook executed before a worker's client connects.
pub trait PreInitHook: Send + Sync + 'static {
    /// Stable hook name.
    fn name(&self) -> &str;

    /// Runs the hook. An error aborts construction of the worker.
    fn call(&self) -> Result<(), WorkerError>;
}

/// Shared workflow handle.
pub type WorkflowRef = Arc<dyn Workflow>;
/// Shared activity handle.
pub type ActivityRef = Arc<dyn Activity>;
/// Shared interceptor handle.
pub type InterceptorRef = Arc<dyn Interceptor>;
/// Shared converter handle.
pub type ConverterRef = Arc<dyn DataConverter>;
/// Shared pre-init hook handle.
pub type HookRef = Arc<dyn PreInitHook>;
/// Shared worker factory handle.
pub type FactoryRef = Arc<dyn WorkerFactory>;

/// Anything a reference name can resolve to.
#[derive(Clone)]
pub enum Artifact {
    /// Worker factory.
    Factory(FactoryRef),
    /// Data converter.
    Converter(ConverterRef),
    /// Workflow definition.
    Workflow(WorkflowRef),
    /// Activity definition.
    Activity(ActivityRef),
    /// Worker interceptor.
    Interceptor(InterceptorRef),
    /// Pre-init hook.
    Hook(HookRef),
}

impl Artifact {
    /// Kind tag of the artifact.
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Artifact::Factory(_) => ArtifactKind::Factory,
            Artifact::Converter(_) => ArtifactKind::Converter,
            Artifact::Workflow(_) => ArtifactKind::Workflow,
            Artifact::Activity(_) => ArtifactKind::Activity,
            Artifact::Interceptor(_) => ArtifactKind::Interceptor,
            Artifact::Hook(_) => ArtifactKind::Hook,
        }
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Artifact::Factory(x) => x.name(),
            Artifact::Converter(x) => x.name(),
            Artifact::Workflow(x) => x.name(),
            Artifact::Activity(x) => x.name(),
            Artifact::Interceptor(x) => x.name(),
            Artifact::Hook(x) => x.name(),
        };
        f.debug_tuple("Artifact")
            .field(&self.kind())
            .field(&name)
            .finish()
    }
}

/// Function-backed pre-init hook.
///
/// ## Example
/// ```rust
/// use workvisor::{HookFn, PreInitHook};
///
/// let hook = HookFn::arc("warm-cache", || Ok(()));
/// assert_eq!(hook.name(), "warm-cache");
/// assert!(hook.call().is_ok());
/// ```
pub struct HookFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HookFn<F>
where
    F: Fn() -> Result<(), WorkerError> + Send + Sync + 'static,
{
    /// Creates a new function-backed hook.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the hook and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> PreInitHook for HookFn<F>
where
    F: Fn() -> Result<(), WorkerError> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self) -> Result<(), WorkerError> {
        (self.f)()
    }
}
