//! # Resolved worker description.
//!
//! A [`WorkerSpec`] is produced only by [`ConfigResolver::resolve`](crate::ConfigResolver::resolve):
//! every reference is an artifact handle and every scalar holds its effective
//! value. It is immutable; cloning shares the artifact handles.

use std::fmt;

use crate::config::{Behavior, ConcurrencyLimits};
use crate::runtime::{
    ActivityRef, ConverterRef, FactoryRef, HookRef, InterceptorRef, WorkflowRef,
};

/// Fully resolved, immutable description of one worker.
#[derive(Clone)]
pub struct WorkerSpec {
    pub(crate) name: String,
    pub(crate) queue: String,
    pub(crate) endpoint: String,
    pub(crate) namespace: String,
    pub(crate) factory: FactoryRef,
    pub(crate) converter: Option<ConverterRef>,
    pub(crate) workflows: Vec<WorkflowRef>,
    pub(crate) activities: Vec<ActivityRef>,
    pub(crate) interceptors: Vec<InterceptorRef>,
    pub(crate) pre_init: Vec<HookRef>,
    pub(crate) limits: ConcurrencyLimits,
    pub(crate) metrics_bind_address: Option<String>,
    pub(crate) behavior: Behavior,
}

impl WorkerSpec {
    /// Worker name (unique within one configuration).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Task queue.
    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Effective endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Effective namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Factory that constructs the worker.
    pub fn factory(&self) -> &FactoryRef {
        &self.factory
    }

    /// Data converter, if any.
    pub fn converter(&self) -> Option<&ConverterRef> {
        self.converter.as_ref()
    }

    /// Workflows, in configuration order.
    pub fn workflows(&self) -> &[WorkflowRef] {
        &self.workflows
    }

    /// Activities, in configuration order.
    pub fn activities(&self) -> &[ActivityRef] {
        &self.activities
    }

    /// Interceptors, in configuration order.
    pub fn interceptors(&self) -> &[InterceptorRef] {
        &self.interceptors
    }

    /// Pre-init hooks, in execution order.
    pub fn pre_init(&self) -> &[HookRef] {
        &self.pre_init
    }

    /// Effective concurrency limits.
    pub fn limits(&self) -> ConcurrencyLimits {
        self.limits
    }

    /// Metrics exporter bind address, if any.
    pub fn metrics_bind_address(&self) -> Option<&str> {
        self.metrics_bind_address.as_deref()
    }

    /// Merge policy the spec was resolved with.
    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    /// Workflow names, for logging.
    pub fn workflow_names(&self) -> Vec<&str> {
        self.workflows.iter().map(|w| w.name()).collect()
    }

    /// Activity names, for logging.
    pub fn activity_names(&self) -> Vec<&str> {
        self.activities.iter().map(|a| a.name()).collect()
    }
}

impl fmt::Debug for WorkerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerSpec")
            .field("name", &self.name)
            .field("queue", &self.queue)
            .field("endpoint", &self.endpoint)
            .field("namespace", &self.namespace)
            .field("factory", &self.factory.name())
            .field("converter", &self.converter.as_ref().map(|c| c.name()))
            .field("workflows", &self.workflow_names())
            .field("activities", &self.activity_names())
            .field(
                "interceptors",
                &self.interceptors.iter().map(|i| i.name()).collect::<Vec<_>>(),
            )
            .field(
                "pre_init",
                &self.pre_init.iter().map(|h| h.name()).collect::<Vec<_>>(),
            )
            .field("limits", &self.limits)
            .field("metrics_bind_address", &self.metrics_bind_address)
            .field("behavior", &self.behavior)
            .finish()
    }
}
