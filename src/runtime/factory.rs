//! # Default worker factory.
//!
//! [`StandardFactory`] is what a worker gets when neither it nor the global
//! section names a factory. Construction order:
//!
//! 1. pre-init hooks, in list order, synchronously;
//! 2. client connection (endpoint, namespace, converter, metrics exporter);
//! 3. worker build (queue, workflows, activities, interceptors, limits).
//!
//! A failing step aborts the remaining ones.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::WorkerError;
use crate::resolve::WorkerSpec;
use crate::runtime::{ConnectOptions, WorkerFactory, WorkerOptions, WorkerRef, WorkerRuntime};

/// Registry name of the built-in factory.
pub const STANDARD_FACTORY: &str = "standard";

/// Factory that delegates connect/build to a [`WorkerRuntime`].
pub struct StandardFactory {
    runtime: Arc<dyn WorkerRuntime>,
}

impl StandardFactory {
    /// Creates the factory on top of `runtime`.
    pub fn new(runtime: Arc<dyn WorkerRuntime>) -> Self {
        Self { runtime }
    }

    /// Creates the factory and returns it as a shared handle.
    pub fn arc(runtime: Arc<dyn WorkerRuntime>) -> Arc<Self> {
        Arc::new(Self::new(runtime))
    }

    fn execute_pre_init(spec: &WorkerSpec) -> Result<(), WorkerError> {
        for hook in spec.pre_init() {
            debug!(worker = %spec.name(), hook = %hook.name(), "executing pre-init hook");
            hook.call()?;
        }
        Ok(())
    }
}

#[async_trait]
impl WorkerFactory for StandardFactory {
    fn name(&self) -> &str {
        STANDARD_FACTORY
    }

    async fn new_worker(&self, spec: &WorkerSpec) -> Result<WorkerRef, WorkerError> {
        Self::execute_pre_init(spec)?;

        let client = self
            .runtime
            .connect(ConnectOptions {
                endpoint: spec.endpoint().to_string(),
                namespace: spec.namespace().to_string(),
                converter: spec.converter().cloned(),
                metrics_bind_address: spec.metrics_bind_address().map(str::to_string),
            })
            .await?;

        info!(
            worker = %spec.name(),
            queue = %spec.queue(),
            workflows = ?spec.workflow_names(),
            activities = ?spec.activity_names(),
            "building worker"
        );

        self.runtime
            .build_worker(
                client,
                WorkerOptions {
                    name: spec.name().to_string(),
                    queue: spec.queue().to_string(),
                    workflows: spec.workflows().to_vec(),
                    activities: spec.activities().to_vec(),
                    interceptors: spec.interceptors().to_vec(),
                    limits: spec.limits(),
                },
            )
            .await
    }
}
