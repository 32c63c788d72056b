//! # Name-based artifact lookup.
//!
//! Configuration refers to code by qualified name (`"billing:charge"`). A
//! [`Loader`] turns such a name into an [`Artifact`]. [`Registry`] is the
//! provided implementation: artifacts are registered ahead of time, lookup is
//! an exact-name match.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::LoadError;
use crate::runtime::{
    ActivityRef, Artifact, ConverterRef, FactoryRef, HookRef, InterceptorRef, STANDARD_FACTORY,
    StandardFactory, WorkerRuntime, WorkflowRef,
};

/// Resolves a qualified name to an artifact.
pub trait Loader: Send + Sync + 'static {
    /// Looks `name` up.
    fn load(&self, name: &str) -> Result<Artifact, LoadError>;
}

/// Explicit name → artifact table.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use workvisor::{HookFn, Loader, Registry};
///
/// let mut registry = Registry::new();
/// registry.register_hook("hooks:noop", HookFn::arc("noop", || Ok(())));
///
/// assert!(registry.load("hooks:noop").is_ok());
/// assert!(registry.load("hooks:missing").is_err());
/// ```
#[derive(Default)]
pub struct Registry {
    entries: HashMap<String, Artifact>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with [`StandardFactory`] registered as [`STANDARD_FACTORY`].
    pub fn with_runtime(runtime: Arc<dyn WorkerRuntime>) -> Self {
        let mut registry = Self::new();
        registry.register_factory(STANDARD_FACTORY, StandardFactory::arc(runtime));
        registry
    }

    /// Registers `artifact` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, artifact: Artifact) -> &mut Self {
        self.entries.insert(name.into(), artifact);
        self
    }

    /// Registers a worker factory.
    pub fn register_factory(&mut self, name: impl Into<String>, f: FactoryRef) -> &mut Self {
        self.register(name, Artifact::Factory(f))
    }

    /// Registers a data converter.
    pub fn register_converter(&mut self, name: impl Into<String>, c: ConverterRef) -> &mut Self {
        self.register(name, Artifact::Converter(c))
    }

    /// Registers a workflow.
    pub fn register_workflow(&mut self, name: impl Into<String>, w: WorkflowRef) -> &mut Self {
        self.register(name, Artifact::Workflow(w))
    }

    /// Registers an activity.
    pub fn register_activity(&mut self, name: impl Into<String>, a: ActivityRef) -> &mut Self {
        self.register(name, Artifact::Activity(a))
    }

    /// Registers an interceptor.
    pub fn register_interceptor(
        &mut self,
        name: impl Into<String>,
        i: InterceptorRef,
    ) -> &mut Self {
        self.register(name, Artifact::Interceptor(i))
    }

    /// Registers a pre-init hook.
    pub fn register_hook(&mut self, name: impl Into<String>, h: HookRef) -> &mut Self {
        self.register(name, Artifact::Hook(h))
    }

    /// Returns sorted list of registered names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Loader for Registry {
    fn load(&self, name: &str) -> Result<Artifact, LoadError> {
        if name.trim().is_empty() {
            return Err(LoadError::EmptyName);
        }
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                name: name.to_string(),
            })
    }
}
