//! # Declarative configuration document.
//!
//! YAML layout:
//!
//! ```yaml
//! global:
//!   endpoint: "localhost:7233"      # alias: host
//!   namespace: default
//!   factory: standard               # alias: default_factory
//!   converter: converters:json
//!   interceptors: [tracing:interceptor]
//!   pre_init: [hooks:migrate]
//!   limits:
//!     max_concurrent_workflow_tasks: 100
//!     max_concurrent_activities: 50
//!   metrics_bind_address: "0.0.0.0:9464"
//!   logging:
//!     level: info
//!     use_colors: false
//!     format: compact
//! workers:
//!   - name: billing
//!     queue: billing-queue
//!     workflows: [billing:Invoice]
//!     activities: [billing:charge]
//!   - name: reports
//!     behavior: isolated
//!     endpoint: "reports:7233"
//! ```
//!
//! Every field is optional except `name` on workers.
//!
//! ## Flat layout
//! Documents may instead put the global settings at the top level:
//!
//! ```yaml
//! temporalio:
//!   host: "localhost:7233"
//!   namespace: default
//! interceptors: [tracing:interceptor]
//! converter: converters:json
//! default_factory: standard
//! logging:
//!   level: INFO
//!   use_colors: true
//!   log_config: logging.yaml
//! workers:
//!   - name: billing
//! ```
//!
//! Top-level keys are applied over the `global:` section when both appear.

use std::path::Path;

use serde::Deserialize;

use crate::config::{Config, GlobalConfig, Reference, WorkerConfigRaw};
use crate::error::ConfigError;
use crate::logging::{LogLevel, LoggingConfig};
use crate::runtime::{ConverterRef, FactoryRef, InterceptorRef};

/// Parsed configuration document.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(from = "DocumentRepr")]
pub struct ConfigDocument {
    /// Global section.
    pub global: GlobalConfig,
    /// Worker list.
    pub workers: Vec<WorkerConfigRaw>,
}

impl ConfigDocument {
    /// Parses a document from YAML text. An empty document yields the defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|source| ConfigError::Parse { source })
    }

    /// Reads and parses a YAML document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Applies command-line style overrides to the global section.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        overrides.apply(&mut self.global);
        self
    }

    /// Converts the document into an unresolved [`Config`].
    pub fn into_config(self) -> Config {
        Config::new(self.global, self.workers)
    }
}

/// On-disk shape accepting both the `global:` and the flat layout.
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DocumentRepr {
    global: Option<GlobalConfig>,
    workers: Vec<WorkerConfigRaw>,
    temporalio: Option<ConnectionSection>,
    interceptors: Option<Vec<Reference<InterceptorRef>>>,
    converter: Option<Reference<ConverterRef>>,
    default_factory: Option<Reference<FactoryRef>>,
    logging: Option<LoggingConfig>,
}

#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConnectionSection {
    #[serde(alias = "endpoint")]
    host: Option<String>,
    namespace: Option<String>,
}

impl From<DocumentRepr> for ConfigDocument {
    fn from(repr: DocumentRepr) -> Self {
        let mut global = repr.global.unwrap_or_default();
        if let Some(connection) = repr.temporalio {
            if let Some(host) = connection.host {
                global.endpoint = host;
            }
            if let Some(namespace) = connection.namespace {
                global.namespace = namespace;
            }
        }
        if let Some(interceptors) = repr.interceptors {
            global.interceptors = interceptors;
        }
        if let Some(converter) = repr.converter {
            global.converter = Some(converter);
        }
        if let Some(factory) = repr.default_factory {
            global.factory = factory;
        }
        if let Some(logging) = repr.logging {
            global.logging = logging;
        }
        Self {
            global,
            workers: repr.workers,
        }
    }
}

/// Values that take precedence over the document's global section.
///
/// Each `Some` replaces the corresponding global value; `None` leaves it alone.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    /// Endpoint override.
    pub endpoint: Option<String>,
    /// Namespace override.
    pub namespace: Option<String>,
    /// Log level override.
    pub log_level: Option<LogLevel>,
    /// ANSI colors override.
    pub use_colors: Option<bool>,
}

impl Overrides {
    /// Writes every set override into `global`.
    pub fn apply(&self, global: &mut GlobalConfig) {
        if let Some(endpoint) = &self.endpoint {
            global.endpoint.clone_from(endpoint);
        }
        if let Some(namespace) = &self.namespace {
            global.namespace.clone_from(namespace);
        }
        if let Some(level) = self.log_level {
            global.logging.level = level;
        }
        if let Some(use_colors) = self.use_colors {
            global.logging.use_colors = Some(use_colors);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::config::{Behavior, DEFAULT_QUEUE};
    use crate::logging::LogFormat;

    const DOC: &str = r#"
global:
  host: "frontend:7233"
  namespace: prod
  converter: converters:json
  interceptors: [tracing:interceptor]
  limits:
    max_concurrent_workflow_tasks: 100
    max_concurrent_activities: 50
  logging:
    level: warning
    use_colors: false
    format: json
workers:
  - name: w1
    workflows: [billing:Invoice]
    activities: [billing:charge, billing:refund]
  - name: w2
    host: "E2"
    queue: reports
    behavior: isolated
    interceptors: []
    max_concurrent_activities: 5
"#;

    #[test]
    fn test_parse_full_document() {
        let doc = ConfigDocument::from_yaml_str(DOC).expect("parse");

        assert_eq!(doc.global.endpoint, "frontend:7233");
        assert_eq!(doc.global.namespace, "prod");
        assert_eq!(
            doc.global.converter.as_ref().and_then(|c| c.name()),
            Some("converters:json")
        );
        assert_eq!(doc.global.limits.max_concurrent_workflow_tasks, 100);
        assert_eq!(doc.global.limits.max_concurrent_activities, 50);
        assert_eq!(doc.global.logging.level, LogLevel::Warning);
        assert_eq!(doc.global.logging.use_colors, Some(false));
        assert_eq!(doc.global.logging.format, LogFormat::Json);
        assert_eq!(doc.global.factory.name(), Some("standard"));

        assert_eq!(doc.workers.len(), 2);
        let w1 = &doc.workers[0];
        assert_eq!(w1.name, "w1");
        assert_eq!(w1.queue, DEFAULT_QUEUE);
        assert_eq!(w1.behavior, Behavior::Merge);
        assert!(w1.endpoint.is_none());
        assert!(w1.interceptors.is_none());
        let activities: Vec<_> = w1.activities.iter().filter_map(|a| a.name()).collect();
        assert_eq!(activities, vec!["billing:charge", "billing:refund"]);

        let w2 = &doc.workers[1];
        assert_eq!(w2.endpoint.as_deref(), Some("E2"));
        assert_eq!(w2.queue, "reports");
        assert_eq!(w2.behavior, Behavior::Isolated);
        assert_eq!(w2.interceptors.as_ref().map(Vec::len), Some(0));
        assert_eq!(w2.max_concurrent_activities, Some(5));
        assert_eq!(w2.max_concurrent_workflow_tasks, None);
    }

    #[test]
    fn test_parse_flat_layout() {
        let doc = ConfigDocument::from_yaml_str(
            r#"
temporalio:
  host: "legacy:7233"
  namespace: legacy-ns
interceptors: [tracing:interceptor]
converter: converters:json
default_factory: factories:custom
logging:
  level: INFO
  use_colors: false
  log_config: /etc/workvisor/logging.yaml
workers:
  - name: w1
    queue: ""
    activities: null
    workflows: [billing:Invoice]
    factory: null
"#,
        )
        .expect("parse");

        assert_eq!(doc.global.endpoint, "legacy:7233");
        assert_eq!(doc.global.namespace, "legacy-ns");
        assert_eq!(doc.global.interceptors.len(), 1);
        assert_eq!(
            doc.global.converter.as_ref().and_then(|c| c.name()),
            Some("converters:json")
        );
        assert_eq!(doc.global.factory.name(), Some("factories:custom"));
        assert_eq!(doc.global.logging.level, LogLevel::Info);
        assert_eq!(doc.global.logging.use_colors, Some(false));
        assert_eq!(
            doc.global.logging.log_config.as_deref(),
            Some(Path::new("/etc/workvisor/logging.yaml"))
        );

        let w1 = &doc.workers[0];
        assert!(w1.activities.is_empty());
        assert_eq!(w1.workflows.len(), 1);
        assert!(w1.factory.is_none());
    }

    #[test]
    fn test_flat_keys_override_global_section() {
        let doc = ConfigDocument::from_yaml_str(
            "global:\n  endpoint: a:1\n  namespace: ns\ntemporalio:\n  host: b:2\n",
        )
        .expect("parse");
        assert_eq!(doc.global.endpoint, "b:2");
        assert_eq!(doc.global.namespace, "ns");
    }

    #[test]
    fn test_unknown_top_level_key_is_rejected() {
        let err = ConfigDocument::from_yaml_str("temporal:\n  host: x\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let doc = ConfigDocument::from_yaml_str("  \n").expect("parse");
        assert_eq!(doc.global.endpoint, "localhost:7233");
        assert_eq!(doc.global.namespace, "default");
        assert!(doc.workers.is_empty());
    }

    #[test]
    fn test_worker_without_name_is_rejected() {
        let err = ConfigDocument::from_yaml_str("workers:\n  - queue: q\n").unwrap_err();
        assert_eq!(err.as_label(), "config_parse");
    }

    #[test]
    fn test_unknown_behavior_is_rejected() {
        let err =
            ConfigDocument::from_yaml_str("workers:\n  - name: w\n    behavior: merged\n")
                .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let err = ConfigDocument::from_yaml_str("global:\n  logging:\n    level: loud\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_overrides_replace_global_values() {
        let overrides = Overrides {
            endpoint: Some("cli:7233".into()),
            namespace: None,
            log_level: Some(LogLevel::Debug),
            use_colors: Some(true),
        };
        let doc = ConfigDocument::from_yaml_str(DOC)
            .expect("parse")
            .with_overrides(&overrides);

        assert_eq!(doc.global.endpoint, "cli:7233");
        assert_eq!(doc.global.namespace, "prod");
        assert_eq!(doc.global.logging.level, LogLevel::Debug);
        assert_eq!(doc.global.logging.use_colors, Some(true));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(DOC.as_bytes()).expect("write");

        let cfg = ConfigDocument::from_path(file.path())
            .expect("load")
            .into_config();
        assert_eq!(cfg.workers().len(), 2);
        assert!(!cfg.is_resolved());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ConfigDocument::from_path("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }
}
