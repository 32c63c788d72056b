//! # Logging setup.
//!
//! Logging configuration is a plain value ([`LoggingConfig`]) that the caller
//! passes to [`init`] once at startup; the library itself only emits
//! `tracing` records and never touches subscriber state.
//!
//! `RUST_LOG`, when set, takes precedence over the configured level and
//! directives.
//!
//! `log_config` points at a separate YAML or JSON file holding the same keys
//! as the logging section. Its `format`, `directives` and `use_colors` replace
//! the inline ones; `level` always comes from the inline section so that an
//! [`Overrides`](crate::Overrides) level still applies.

use std::fmt;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

use crate::error::ConfigError;

/// Log verbosity, using the level names of the configuration document.
///
/// Names are case-insensitive in documents as well as in [`FromStr`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Only unrecoverable errors (maps to `error`).
    Critical,
    /// Errors.
    Error,
    /// Warnings and above.
    Warning,
    /// Informational messages and above.
    #[default]
    Info,
    /// Debug output.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    /// The `tracing` filter this level maps to.
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Critical | LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Ok(LogLevel::Critical),
            "error" => Ok(LogLevel::Error),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(ConfigError::InvalidLogLevel {
                level: s.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Critical => "critical",
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(s)
    }
}

/// Output format of the fmt subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Default multi-field format.
    #[default]
    Full,
    /// Single-line compact format.
    Compact,
    /// Newline-delimited JSON.
    Json,
}

/// Logging section of the global configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Base level.
    pub level: LogLevel,
    /// ANSI colors; `None` enables them when stdout is a terminal.
    pub use_colors: Option<bool>,
    /// Output format.
    pub format: LogFormat,
    /// Extra `EnvFilter` directives, e.g. `"workvisor=debug"`.
    pub directives: Vec<String>,
    /// External file with format, directives and colors.
    pub log_config: Option<PathBuf>,
}

impl LoggingConfig {
    /// Returns the settings [`init`] applies, reading `log_config` if set.
    ///
    /// A `log_config` key inside the external file is ignored.
    pub fn effective(&self) -> Result<LoggingConfig, ConfigError> {
        let Some(path) = &self.log_config else {
            return Ok(self.clone());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let external: LoggingConfig = if text.trim().is_empty() {
            LoggingConfig::default()
        } else {
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse { source })?
        };
        Ok(LoggingConfig {
            level: self.level,
            use_colors: external.use_colors.or(self.use_colors),
            format: external.format,
            directives: external.directives,
            log_config: None,
        })
    }

    /// Builds the filter from the configured level and directives (ignores `RUST_LOG`).
    pub fn filter(&self) -> Result<EnvFilter, ConfigError> {
        let mut filter = EnvFilter::default().add_directive(self.level.as_filter().into());
        for raw in &self.directives {
            let directive: Directive = raw.parse().map_err(|e| ConfigError::Logging {
                error: format!("invalid directive {raw:?}: {e}"),
            })?;
            filter = filter.add_directive(directive);
        }
        Ok(filter)
    }

    fn ansi(&self) -> bool {
        self.use_colors
            .unwrap_or_else(|| std::io::stdout().is_terminal())
    }
}

/// Installs the global `tracing` subscriber described by `cfg`.
///
/// Fails with [`ConfigError::Logging`] if a subscriber is already installed
/// or a directive does not parse, and with [`ConfigError::Read`] or
/// [`ConfigError::Parse`] if `log_config` cannot be loaded.
pub fn init(cfg: &LoggingConfig) -> Result<(), ConfigError> {
    let cfg = cfg.effective()?;
    let filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => cfg.filter()?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(cfg.ansi())
        .with_target(true);

    let installed = match cfg.format {
        LogFormat::Full => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| ConfigError::Logging {
        error: e.to_string(),
    })
}
