use serde::{Deserialize, Deserializer};

use crate::config::{Behavior, Reference};
use crate::runtime::{ActivityRef, ConverterRef, FactoryRef, HookRef, InterceptorRef, WorkflowRef};

/// Default task queue of a worker.
pub const DEFAULT_QUEUE: &str = "default-queue";
/// Name given to the worker built by [`Config::single_worker`](crate::Config::single_worker).
pub const DEFAULT_WORKER_NAME: &str = "default-worker";

/// One worker entry before resolution.
///
/// Every `Option` field is an override: `None` means "unset", and under
/// [`Behavior::Merge`] the global value is used instead. Under `Merge` an
/// empty list or string and a zero limit are treated the same as `None`.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkerConfigRaw {
    /// Unique, non-empty worker name.
    pub name: String,
    /// Task queue.
    #[serde(default = "default_queue")]
    pub queue: String,
    /// Endpoint override.
    #[serde(default, alias = "host")]
    pub endpoint: Option<String>,
    /// Namespace override.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Factory override.
    #[serde(default)]
    pub factory: Option<Reference<FactoryRef>>,
    /// Converter override.
    #[serde(default)]
    pub converter: Option<Reference<ConverterRef>>,
    /// Workflows served by this worker.
    #[serde(default, deserialize_with = "nullable_list")]
    pub workflows: Vec<Reference<WorkflowRef>>,
    /// Activities served by this worker.
    #[serde(default, deserialize_with = "nullable_list")]
    pub activities: Vec<Reference<ActivityRef>>,
    /// Interceptor override.
    #[serde(default)]
    pub interceptors: Option<Vec<Reference<InterceptorRef>>>,
    /// Pre-init hook override.
    #[serde(default)]
    pub pre_init: Option<Vec<Reference<HookRef>>>,
    /// Workflow task limit override.
    #[serde(default)]
    pub max_concurrent_workflow_tasks: Option<usize>,
    /// Activity limit override.
    #[serde(default)]
    pub max_concurrent_activities: Option<usize>,
    /// Metrics bind address override.
    #[serde(default)]
    pub metrics_bind_address: Option<String>,
    /// Merge policy.
    #[serde(default)]
    pub behavior: Behavior,

    #[serde(skip)]
    pub(crate) consumed: bool,
}

fn default_queue() -> String {
    DEFAULT_QUEUE.to_string()
}

/// Reads an explicit `null` list as empty.
fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl WorkerConfigRaw {
    /// Creates an entry with only a name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            queue: default_queue(),
            endpoint: None,
            namespace: None,
            factory: None,
            converter: None,
            workflows: Vec::new(),
            activities: Vec::new(),
            interceptors: None,
            pre_init: None,
            max_concurrent_workflow_tasks: None,
            max_concurrent_activities: None,
            metrics_bind_address: None,
            behavior: Behavior::default(),
            consumed: false,
        }
    }

    /// Returns the entry renamed.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the entry with the given merge policy.
    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Returns `true` once a resolution pass consumed this entry.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}
