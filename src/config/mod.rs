//! # Two-tier worker configuration.
//!
//! A [`Config`] holds one [`GlobalConfig`] (process-wide defaults) and a list
//! of [`WorkerConfigRaw`] entries (per-worker overrides). Neither can run as-is:
//! references are still names, unset fields are still unset. The
//! [`ConfigResolver`](crate::ConfigResolver) turns them into
//! [`WorkerSpec`](crate::WorkerSpec)s exactly once.
//!
//! ## Sentinel values
//! - `ConcurrencyLimits { .. = 0 }` → runtime default
//! - `None` on a [`WorkerConfigRaw`] field → unset (inherited under [`Behavior::Merge`])
//!
//! ## Example
//! ```rust
//! use workvisor::{Config, GlobalConfig, WorkerConfigRaw};
//!
//! let mut global = GlobalConfig::default();
//! global.endpoint = "temporal.internal:7233".into();
//!
//! let mut w2 = WorkerConfigRaw::new("w2");
//! w2.endpoint = Some("other:7233".into());
//!
//! let cfg = Config::new(global, vec![WorkerConfigRaw::new("w1"), w2]);
//! assert!(!cfg.is_resolved());
//! assert_eq!(cfg.workers().len(), 2);
//! ```

mod document;
mod global;
mod worker;

use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::error::{ConfigError, ResolveError};
use crate::resolve::{ConfigResolver, WorkerSpec};

pub use document::{ConfigDocument, Overrides};
pub use global::{DEFAULT_ENDPOINT, DEFAULT_NAMESPACE, GlobalConfig};
pub use worker::{DEFAULT_QUEUE, DEFAULT_WORKER_NAME, WorkerConfigRaw};

/// Reference to a code artifact: a name still to be loaded, or the artifact itself.
///
/// Deserializes from a plain string into [`Reference::Named`].
#[derive(Clone)]
pub enum Reference<T> {
    /// Qualified name resolved through a [`Loader`](crate::Loader).
    Named(String),
    /// Already-resolved artifact; passes through resolution unchanged.
    Resolved(T),
}

impl<T> Reference<T> {
    /// Shorthand for [`Reference::Named`].
    pub fn named(name: impl Into<String>) -> Self {
        Reference::Named(name.into())
    }

    /// Returns the name for [`Reference::Named`], `None` otherwise.
    pub fn name(&self) -> Option<&str> {
        match self {
            Reference::Named(name) => Some(name),
            Reference::Resolved(_) => None,
        }
    }
}

impl<T> fmt::Debug for Reference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Reference::Resolved(_) => f.write_str("Resolved(..)"),
        }
    }
}

impl<'de, T> Deserialize<'de> for Reference<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Reference::Named)
    }
}

/// Per-worker merge policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    /// Unset fields inherit the global value.
    #[default]
    Merge,
    /// Unset fields keep their type default; the global section is ignored.
    Isolated,
}

/// Worker concurrency limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConcurrencyLimits {
    /// Maximum concurrent workflow tasks (`0` = runtime default).
    pub max_concurrent_workflow_tasks: usize,
    /// Maximum concurrent activities (`0` = runtime default).
    pub max_concurrent_activities: usize,
}

impl ConcurrencyLimits {
    /// Returns the workflow task limit as an `Option` (`None` = runtime default).
    #[inline]
    pub fn workflow_task_limit(&self) -> Option<usize> {
        match self.max_concurrent_workflow_tasks {
            0 => None,
            n => Some(n),
        }
    }

    /// Returns the activity limit as an `Option` (`None` = runtime default).
    #[inline]
    pub fn activity_limit(&self) -> Option<usize> {
        match self.max_concurrent_activities {
            0 => None,
            n => Some(n),
        }
    }
}

/// Global section plus the worker list, before and after resolution.
pub struct Config {
    /// Process-wide defaults. Treat as read-only once resolution started.
    pub global: GlobalConfig,
    workers: Vec<WorkerConfigRaw>,
    resolved: Option<Vec<WorkerSpec>>,
}

impl Config {
    /// Creates an unresolved configuration.
    pub fn new(global: GlobalConfig, workers: Vec<WorkerConfigRaw>) -> Self {
        Self {
            global,
            workers,
            resolved: None,
        }
    }

    /// Configuration with a single worker named [`DEFAULT_WORKER_NAME`].
    ///
    /// This is the setup used when no configuration document is provided.
    pub fn single_worker(global: GlobalConfig, worker: WorkerConfigRaw) -> Self {
        Self::new(global, vec![worker.with_name(DEFAULT_WORKER_NAME)])
    }

    /// Raw worker entries, in input order.
    pub fn workers(&self) -> &[WorkerConfigRaw] {
        &self.workers
    }

    /// Returns `true` once [`Config::resolve`] succeeded.
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Resolved specs, if resolution already ran.
    pub fn specs(&self) -> Option<&[WorkerSpec]> {
        self.resolved.as_deref()
    }

    /// Resolves every raw worker with `resolver`.
    ///
    /// Fails with [`ConfigError::AlreadyResolved`] when called a second time.
    pub fn resolve(&mut self, resolver: &ConfigResolver) -> Result<&[WorkerSpec], ResolveError> {
        if self.resolved.is_some() {
            return Err(ConfigError::AlreadyResolved { worker: None }.into());
        }
        let specs = resolver.resolve(&self.global, &mut self.workers)?;
        Ok(self.resolved.insert(specs))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("global", &self.global)
            .field("workers", &self.workers)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
