use crate::domain::Severity;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Environment error: {0}")]
    EnvError(String),
    #[error("Tracing subscriber error: {0}")]
    SubscriberInit(String),
}

/// When the console mirror writes records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleMode {
    /// Only in builds with debug assertions
    #[default]
    Auto,
    Always,
    Never,
}

impl ConsoleMode {
    pub fn is_enabled(self) -> bool {
        match self {
            ConsoleMode::Auto => cfg!(debug_assertions),
            ConsoleMode::Always => true,
            ConsoleMode::Never => false,
        }
    }
}

impl std::str::FromStr for ConsoleMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ConsoleMode::Auto),
            "always" => Ok(ConsoleMode::Always),
            "never" => Ok(ConsoleMode::Never),
            _ => Err(ConfigError::EnvError(format!(
                "Invalid console mode: {s}. Valid values: auto, always, never"
            ))),
        }
    }
}

/// Engine settings.
///
/// Handlers always receive every record; the mirror settings only affect the
/// `tracing` and console copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on emits that are enqueued but not yet processed.
    /// `None` accepts an unbounded backlog.
    pub max_pending: Option<usize>,
    /// Mirror every record as a `tracing` event.
    pub mirror_tracing: bool,
    pub console: ConsoleMode,
    /// Records below this severity are not mirrored.
    pub mirror_min_severity: Severity,
    /// Name of the worker thread.
    pub worker_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_pending: None,
            mirror_tracing: true,
            console: ConsoleMode::Auto,
            mirror_min_severity: Severity::Debug,
            worker_name: "rask-log-engine".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `RASK_LOG_CONFIG` (inline TOML) when set, then applies the
    /// individual `RASK_LOG_*` overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("RASK_LOG_CONFIG") {
            Ok(inline) => toml::from_str(&inline)?,
            Err(_) => EngineConfig::default(),
        };

        if let Ok(value) = std::env::var("RASK_LOG_MAX_PENDING") {
            config.max_pending = match value.trim() {
                "" | "none" | "unbounded" => None,
                limit => Some(limit.parse().map_err(|e| {
                    ConfigError::EnvError(format!("Invalid RASK_LOG_MAX_PENDING: {e}"))
                })?),
            };
        }
        load_env_var("RASK_LOG_MIRROR_TRACING", &mut config.mirror_tracing)?;
        load_env_var("RASK_LOG_CONSOLE", &mut config.console)?;
        load_env_var("RASK_LOG_MIRROR_MIN_SEVERITY", &mut config.mirror_min_severity)?;
        if let Ok(name) = std::env::var("RASK_LOG_WORKER_NAME") {
            config.worker_name = name;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pending == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "max_pending must be greater than 0 (omit it for an unbounded backlog)"
                    .to_string(),
            ));
        }

        if self.worker_name.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "worker_name must not be empty".to_string(),
            ));
        }

        // Thread names are passed to the OS as C strings
        if self.worker_name.contains('\0') {
            return Err(ConfigError::InvalidConfig(
                "worker_name must not contain NUL bytes".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parses an environment variable into `target`; a missing variable keeps the default.
fn load_env_var<T>(name: &str, target: &mut T) -> Result<(), ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(value) = std::env::var(name) {
        *target = value
            .parse()
            .map_err(|e| ConfigError::EnvError(format!("Invalid {name}: {e}")))?;
    }
    Ok(())
}
