//! # Configuration resolution.
//!
//! [`ConfigResolver::resolve`] turns `(GlobalConfig, [WorkerConfigRaw])` into
//! `[WorkerSpec]` in one all-or-nothing pass.
//!
//! ## Flow
//! ```text
//! check_workers()              consumed? empty name? duplicate name?
//!   └─► for raw in workers (input order)
//!         ├─► merge()          Behavior::Merge    → unset fields ← GlobalConfig
//!         │   isolate()        Behavior::Isolated → unset fields ← type defaults
//!         ├─► load()           Reference::Named   → Loader::load → typed artifact
//!         └─► WorkerSpec
//!   └─► mark every raw consumed (only if every worker resolved)
//! ```
//!
//! ## Rules
//! - The first load failure aborts the whole pass; no spec is returned.
//! - Explicitly set, non-empty fields are never overwritten, in either behavior.
//! - Under `Merge`, an empty string, list or reference name and a zero limit
//!   count as unset. Under `Isolated` they are kept as given.
//! - An empty queue falls back to [`DEFAULT_QUEUE`].
//! - List references keep their order.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::config::{
    Behavior, ConcurrencyLimits, DEFAULT_QUEUE, GlobalConfig, Reference, WorkerConfigRaw,
};
use crate::error::{ArtifactKind, ConfigError, LoadError, ResolveError};
use crate::resolve::{Loader, WorkerSpec};
use crate::runtime::{
    ActivityRef, Artifact, ConverterRef, FactoryRef, HookRef, InterceptorRef, STANDARD_FACTORY,
    WorkflowRef,
};

/// Typed extraction of an [`Artifact`].
trait FromArtifact: Clone {
    const KIND: ArtifactKind;

    fn from_artifact(artifact: Artifact) -> Option<Self>;
}

macro_rules! from_artifact {
    ($ty:ty, $variant:ident) => {
        impl FromArtifact for $ty {
            const KIND: ArtifactKind = ArtifactKind::$variant;

            fn from_artifact(artifact: Artifact) -> Option<Self> {
                match artifact {
                    Artifact::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

from_artifact!(FactoryRef, Factory);
from_artifact!(ConverterRef, Converter);
from_artifact!(WorkflowRef, Workflow);
from_artifact!(ActivityRef, Activity);
from_artifact!(InterceptorRef, Interceptor);
from_artifact!(HookRef, Hook);

/// Effective (still unloaded) values of one worker after merge.
struct Merged {
    endpoint: String,
    namespace: String,
    factory: Reference<FactoryRef>,
    converter: Option<Reference<ConverterRef>>,
    interceptors: Vec<Reference<InterceptorRef>>,
    pre_init: Vec<Reference<HookRef>>,
    limits: ConcurrencyLimits,
    metrics_bind_address: Option<String>,
}

impl Merged {
    /// Unset fields inherit from `global`.
    ///
    /// Empty strings, empty lists, empty reference names and zero limits
    /// count as unset here.
    fn merge(raw: &WorkerConfigRaw, global: &GlobalConfig) -> Self {
        Self {
            endpoint: non_empty(&raw.endpoint)
                .unwrap_or(&global.endpoint)
                .clone(),
            namespace: non_empty(&raw.namespace)
                .unwrap_or(&global.namespace)
                .clone(),
            factory: named(&raw.factory).unwrap_or(&global.factory).clone(),
            converter: named(&raw.converter)
                .or(global.converter.as_ref())
                .cloned(),
            interceptors: non_empty_list(&raw.interceptors)
                .unwrap_or(&global.interceptors)
                .clone(),
            pre_init: non_empty_list(&raw.pre_init)
                .unwrap_or(&global.pre_init)
                .clone(),
            limits: ConcurrencyLimits {
                max_concurrent_workflow_tasks: non_zero(raw.max_concurrent_workflow_tasks)
                    .unwrap_or(global.limits.max_concurrent_workflow_tasks),
                max_concurrent_activities: non_zero(raw.max_concurrent_activities)
                    .unwrap_or(global.limits.max_concurrent_activities),
            },
            metrics_bind_address: non_empty(&raw.metrics_bind_address)
                .or(global.metrics_bind_address.as_ref())
                .cloned(),
        }
    }

    /// Unset fields take their type default.
    fn isolate(raw: &WorkerConfigRaw) -> Self {
        Self {
            endpoint: raw.endpoint.clone().unwrap_or_default(),
            namespace: raw.namespace.clone().unwrap_or_default(),
            factory: raw
                .factory
                .clone()
                .unwrap_or_else(|| Reference::named(STANDARD_FACTORY)),
            converter: raw.converter.clone(),
            interceptors: raw.interceptors.clone().unwrap_or_default(),
            pre_init: raw.pre_init.clone().unwrap_or_default(),
            limits: ConcurrencyLimits {
                max_concurrent_workflow_tasks: raw.max_concurrent_workflow_tasks.unwrap_or(0),
                max_concurrent_activities: raw.max_concurrent_activities.unwrap_or(0),
            },
            metrics_bind_address: raw.metrics_bind_address.clone(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&String> {
    value.as_ref().filter(|s| !s.is_empty())
}

fn non_empty_list<T>(value: &Option<Vec<T>>) -> Option<&Vec<T>> {
    value.as_ref().filter(|l| !l.is_empty())
}

fn named<T>(value: &Option<Reference<T>>) -> Option<&Reference<T>> {
    value.as_ref().filter(|r| r.name() != Some(""))
}

fn non_zero(value: Option<usize>) -> Option<usize> {
    value.filter(|n| *n != 0)
}

/// Resolves raw worker entries through an injected [`Loader`].
#[derive(Clone)]
pub struct ConfigResolver {
    loader: Arc<dyn Loader>,
}

impl ConfigResolver {
    /// Creates a resolver using `loader` for every named reference.
    pub fn new(loader: Arc<dyn Loader>) -> Self {
        Self { loader }
    }

    /// Resolves `workers` against `global`.
    ///
    /// On success every entry of `workers` is marked consumed; resolving any of
    /// them again fails with [`ConfigError::AlreadyResolved`]. On failure no
    /// entry is marked and no spec is returned.
    pub fn resolve(
        &self,
        global: &GlobalConfig,
        workers: &mut [WorkerConfigRaw],
    ) -> Result<Vec<WorkerSpec>, ResolveError> {
        check_workers(workers).inspect_err(|e| {
            error!(error = %e, label = e.as_label(), "invalid worker configuration");
        })?;

        let mut specs = Vec::with_capacity(workers.len());
        for raw in workers.iter() {
            let spec = self.resolve_one(global, raw)?;
            debug!(worker = %spec.name(), spec = ?spec, "worker resolved");
            specs.push(spec);
        }

        for raw in workers.iter_mut() {
            raw.consumed = true;
        }
        info!(workers = specs.len(), "configuration resolved");
        Ok(specs)
    }

    fn resolve_one(
        &self,
        global: &GlobalConfig,
        raw: &WorkerConfigRaw,
    ) -> Result<WorkerSpec, ResolveError> {
        let merged = match raw.behavior {
            Behavior::Merge => Merged::merge(raw, global),
            Behavior::Isolated => Merged::isolate(raw),
        };
        let worker = raw.name.as_str();

        Ok(WorkerSpec {
            name: raw.name.clone(),
            queue: match raw.queue.as_str() {
                "" => DEFAULT_QUEUE.to_string(),
                queue => queue.to_string(),
            },
            endpoint: merged.endpoint,
            namespace: merged.namespace,
            activities: self.load_all(worker, "activities", &raw.activities)?,
            workflows: self.load_all(worker, "workflows", &raw.workflows)?,
            interceptors: self.load_all(worker, "interceptors", &merged.interceptors)?,
            pre_init: self.load_all(worker, "pre_init", &merged.pre_init)?,
            converter: merged
                .converter
                .as_ref()
                .map(|c| self.load(worker, "converter", c))
                .transpose()?,
            factory: self.load(worker, "factory", &merged.factory)?,
            limits: merged.limits,
            metrics_bind_address: merged.metrics_bind_address,
            behavior: raw.behavior,
        })
    }

    fn load<T: FromArtifact>(
        &self,
        worker: &str,
        field: &'static str,
        reference: &Reference<T>,
    ) -> Result<T, ResolveError> {
        let name = match reference {
            Reference::Resolved(artifact) => return Ok(artifact.clone()),
            Reference::Named(name) => name,
        };

        self.loader
            .load(name)
            .and_then(|artifact| {
                let found = artifact.kind();
                T::from_artifact(artifact).ok_or_else(|| LoadError::KindMismatch {
                    name: name.clone(),
                    expected: T::KIND,
                    found,
                })
            })
            .map_err(|source| {
                error!(
                    worker = %worker,
                    field,
                    reference = %name,
                    error = %source,
                    "failed to load reference"
                );
                ResolveError::Load {
                    worker: worker.to_string(),
                    field,
                    reference: name.clone(),
                    source,
                }
            })
    }

    fn load_all<T: FromArtifact>(
        &self,
        worker: &str,
        field: &'static str,
        references: &[Reference<T>],
    ) -> Result<Vec<T>, ResolveError> {
        references
            .iter()
            .map(|r| self.load(worker, field, r))
            .collect()
    }
}

/// Structural checks that must pass before anything is loaded.
fn check_workers(workers: &[WorkerConfigRaw]) -> Result<(), ConfigError> {
    let mut seen = HashSet::with_capacity(workers.len());
    for (index, raw) in workers.iter().enumerate() {
        if raw.consumed {
            return Err(ConfigError::AlreadyResolved {
                worker: Some(raw.name.clone()),
            });
        }
        if raw.name.is_empty() {
            return Err(ConfigError::EmptyName { index });
        }
        if !seen.insert(raw.name.as_str()) {
            return Err(ConfigError::DuplicateName {
                name: raw.name.clone(),
            });
        }
    }
    Ok(())
}
