use serde::Deserialize;

use crate::config::{ConcurrencyLimits, Reference};
use crate::logging::LoggingConfig;
use crate::runtime::{ConverterRef, FactoryRef, HookRef, InterceptorRef, STANDARD_FACTORY};

/// Default server endpoint.
pub const DEFAULT_ENDPOINT: &str = "localhost:7233";
/// Default namespace.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Process-wide defaults every merging worker inherits from.
///
/// ## Field semantics
/// - `endpoint`, `namespace`: connection target
/// - `factory`: worker factory (defaults to the built-in [`STANDARD_FACTORY`])
/// - `converter`: payload converter (`None` = runtime default)
/// - `interceptors`, `pre_init`: ordered default lists
/// - `limits`: default concurrency limits (`0` = runtime default)
/// - `metrics_bind_address`: metrics exporter address (`None` = disabled)
/// - `logging`: consumed by [`logging::init`](crate::logging::init), never inherited
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Server endpoint (`host:port`).
    #[serde(alias = "host")]
    pub endpoint: String,
    /// Namespace.
    pub namespace: String,
    /// Default worker factory.
    #[serde(alias = "default_factory")]
    pub factory: Reference<FactoryRef>,
    /// Default data converter.
    pub converter: Option<Reference<ConverterRef>>,
    /// Default interceptors.
    pub interceptors: Vec<Reference<InterceptorRef>>,
    /// Default pre-init hooks.
    pub pre_init: Vec<Reference<HookRef>>,
    /// Default concurrency limits.
    pub limits: ConcurrencyLimits,
    /// Default metrics bind address.
    pub metrics_bind_address: Option<String>,
    /// Logging setup.
    pub logging: LoggingConfig,
}

impl Default for GlobalConfig {
    /// - `endpoint = "localhost:7233"`
    /// - `namespace = "default"`
    /// - `factory = "standard"`
    /// - no converter, interceptors, hooks or metrics exporter
    /// - limits left to the runtime
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            factory: Reference::named(STANDARD_FACTORY),
            converter: None,
            interceptors: Vec::new(),
            pre_init: Vec::new(),
            limits: ConcurrencyLimits::default(),
            metrics_bind_address: None,
            logging: LoggingConfig::default(),
        }
    }
}
