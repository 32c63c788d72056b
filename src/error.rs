//! Error types used by the resolver, the supervisor and worker runtimes.
//!
//! The taxonomy follows the lifecycle of one supervisor run:
//!
//! - [`ConfigError`]: structurally invalid or ambiguous configuration.
//! - [`LoadError`]: a named reference could not be resolved to an artifact.
//! - [`ResolveError`]: either of the two above, raised by the resolver.
//! - [`WorkerError`]: failures reported by a worker runtime (connect, build, run, shutdown).
//! - [`RuntimeError`]: the overall outcome of [`Supervisor::run`](crate::Supervisor::run).
//!
//! Every enum provides `as_label` (stable snake_case label for logs).

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Exit code for a clean run, including a signal-driven stop.
pub const EXIT_OK: i32 = 0;
/// Exit code when at least one worker failed while running or stopping.
pub const EXIT_WORKER_FAILURE: i32 = 1;
/// Exit code when configuration resolution or worker construction failed.
pub const EXIT_STARTUP_FAILURE: i32 = 3;

/// # Structurally invalid or ambiguous configuration.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Two workers share the same name.
    #[error("duplicate worker name {name:?}")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },

    /// A worker entry has an empty name.
    #[error("worker at position {index} has an empty name")]
    EmptyName {
        /// Position of the entry in the worker list.
        index: usize,
    },

    /// Resolution already ran for this configuration or worker.
    #[error("configuration already resolved{}", for_worker(worker))]
    AlreadyResolved {
        /// First worker found already consumed, if resolution was per-worker.
        worker: Option<String>,
    },

    /// The configuration document could not be read.
    #[error("failed to read configuration from {path}: {source}")]
    Read {
        /// Location of the document.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid YAML for the expected schema.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Underlying deserialization error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Unknown log level name.
    #[error("unknown log level {level:?} (expected one of critical, error, warning, info, debug, trace)")]
    InvalidLogLevel {
        /// The rejected value.
        level: String,
    },

    /// The logging subscriber could not be installed.
    #[error("failed to initialize logging: {error}")]
    Logging {
        /// Underlying error message.
        error: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::DuplicateName { .. } => "config_duplicate_name",
            ConfigError::EmptyName { .. } => "config_empty_name",
            ConfigError::AlreadyResolved { .. } => "config_already_resolved",
            ConfigError::Read { .. } => "config_read",
            ConfigError::Parse { .. } => "config_parse",
            ConfigError::InvalidLogLevel { .. } => "config_invalid_log_level",
            ConfigError::Logging { .. } => "config_logging",
        }
    }
}

/// # A named reference could not be turned into a usable artifact.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The reference is an empty string.
    #[error("empty reference name")]
    EmptyName,

    /// Nothing is registered under the name.
    #[error("no artifact registered under {name:?}")]
    NotFound {
        /// The requested name.
        name: String,
    },

    /// The name resolves, but to the wrong kind of artifact.
    #[error("{name:?} is a {found}, expected a {expected}")]
    KindMismatch {
        /// The requested name.
        name: String,
        /// Kind required by the field being resolved.
        expected: ArtifactKind,
        /// Kind actually registered.
        found: ArtifactKind,
    },
}

impl LoadError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            LoadError::EmptyName => "load_empty_name",
            LoadError::NotFound { .. } => "load_not_found",
            LoadError::KindMismatch { .. } => "load_kind_mismatch",
        }
    }
}

/// Kind of artifact a reference can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Worker factory.
    Factory,
    /// Payload data converter.
    Converter,
    /// Workflow definition.
    Workflow,
    /// Activity definition.
    Activity,
    /// Worker interceptor.
    Interceptor,
    /// Pre-init hook.
    Hook,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArtifactKind::Factory => "factory",
            ArtifactKind::Converter => "converter",
            ArtifactKind::Workflow => "workflow",
            ArtifactKind::Activity => "activity",
            ArtifactKind::Interceptor => "interceptor",
            ArtifactKind::Hook => "pre-init hook",
        };
        f.write_str(s)
    }
}

/// # Errors raised while resolving raw worker configuration.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The worker list itself is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A reference of one worker failed to load.
    #[error("worker {worker:?}: cannot load {field} {reference:?}: {source}")]
    Load {
        /// Name of the worker owning the reference.
        worker: String,
        /// Configuration field holding the reference.
        field: &'static str,
        /// The reference name.
        reference: String,
        /// Loader failure.
        #[source]
        source: LoadError,
    },
}

impl ResolveError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ResolveError::Config(e) => e.as_label(),
            ResolveError::Load { source, .. } => source.as_label(),
        }
    }
}

/// # Errors reported by a worker runtime.
///
/// Runtimes describe failures with a message; the supervisor adds the worker name.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// A pre-init hook failed before the client connected.
    #[error("pre-init hook {hook:?} failed: {error}")]
    PreInit {
        /// Hook name.
        hook: String,
        /// Underlying error message.
        error: String,
    },

    /// The client could not connect to the endpoint.
    #[error("connection to {endpoint} failed: {error}")]
    Connection {
        /// Endpoint the connection was attempted against.
        endpoint: String,
        /// Underlying error message.
        error: String,
    },

    /// The runtime refused to build the worker.
    #[error("worker build failed: {error}")]
    Build {
        /// Underlying error message.
        error: String,
    },

    /// The worker terminated abnormally after it started.
    #[error("worker run failed: {error}")]
    Run {
        /// Underlying error message.
        error: String,
    },

    /// The worker did not stop gracefully.
    #[error("worker shutdown failed: {error}")]
    Shutdown {
        /// Underlying error message.
        error: String,
    },
}

impl WorkerError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerError::PreInit { .. } => "worker_pre_init",
            WorkerError::Connection { .. } => "worker_connection",
            WorkerError::Build { .. } => "worker_build",
            WorkerError::Run { .. } => "worker_run",
            WorkerError::Shutdown { .. } => "worker_shutdown",
        }
    }
}

/// Phase of the worker lifecycle a recorded failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePhase {
    /// `Worker::run` returned an error or panicked.
    Run,
    /// `Worker::shutdown` returned an error or panicked.
    Shutdown,
}

/// A per-worker failure collected while running or stopping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerFailure {
    /// Worker name.
    pub worker: String,
    /// Lifecycle phase that failed.
    pub phase: FailurePhase,
    /// Error reported for the worker.
    pub error: WorkerError,
}

impl fmt::Display for WorkerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.worker, self.error)
    }
}

/// # Errors produced by a supervisor run.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration resolution failed; no worker was constructed.
    #[error("configuration loading failed: {0}")]
    Resolve(#[from] ResolveError),

    /// One worker could not be constructed; no worker was started.
    #[error("worker {worker:?} failed to start: {source}")]
    Startup {
        /// Name of the first worker whose construction failed.
        worker: String,
        /// Construction failure.
        #[source]
        source: WorkerError,
    },

    /// Some workers failed while running or stopping.
    #[error("{} worker failure(s): {}", failures.len(), join_failures(failures))]
    WorkersFailed {
        /// Every recorded failure, in completion order.
        failures: Vec<WorkerFailure>,
    },

    /// The supervisor already ran; a supervisor drives one run only.
    #[error("supervisor already ran")]
    AlreadyRan,
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Resolve(_) => "runtime_resolve_failed",
            RuntimeError::Startup { .. } => "runtime_startup_failed",
            RuntimeError::WorkersFailed { .. } => "runtime_workers_failed",
            RuntimeError::AlreadyRan => "runtime_already_ran",
        }
    }

    /// Returns `true` when the error happened before any worker started.
    pub fn is_startup_failure(&self) -> bool {
        matches!(self, RuntimeError::Resolve(_) | RuntimeError::Startup { .. })
    }

    /// Process exit code for this error.
    ///
    /// - startup failures (resolution, construction) → [`EXIT_STARTUP_FAILURE`]
    /// - everything else → [`EXIT_WORKER_FAILURE`]
    pub fn exit_code(&self) -> i32 {
        if self.is_startup_failure() {
            EXIT_STARTUP_FAILURE
        } else {
            EXIT_WORKER_FAILURE
        }
    }
}

fn for_worker(worker: &Option<String>) -> String {
    match worker {
        Some(name) => format!(" (worker {name:?})"),
        None => String::new(),
    }
}

fn join_failures(failures: &[WorkerFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
