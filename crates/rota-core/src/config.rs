//! Runtime configuration loaded from TOML.
//!
//! Lookup order: an explicit path, then `$XDG_CONFIG_HOME/rota/config.toml`,
//! then built-in defaults. Every key is optional.
//!
//! ```toml
//! [generation]
//! default_duration_minutes = 15
//! default_break_minutes = 0
//! default_capacity = 1
//! open_exception_policy = "fallback"   # or "reject"
//!
//! [storage]
//! busy_timeout_ms = 5000
//! max_retries = 3
//! retry_backoff_ms = 25
//! ```

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub generation: GenerationConfig,
    pub storage: StorageConfig,
}

/// Defaults used when a caller omits slot-shape arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    pub default_duration_minutes: i64,
    pub default_break_minutes: i64,
    pub default_capacity: i64,
    /// How an open exception without replacement hours is treated on write
    pub open_exception_policy: OpenExceptionPolicy,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: 15,
            default_break_minutes: 0,
            default_capacity: 1,
            open_exception_policy: OpenExceptionPolicy::Fallback,
        }
    }
}

/// Treatment of `available = true` exceptions that carry no hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenExceptionPolicy {
    /// Accept them; the weekly pattern supplies the day's hours
    #[default]
    Fallback,
    /// Refuse them when the exception is added
    Reject,
}

/// SQLite contention handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// How long SQLite waits on a locked database before reporting busy
    pub busy_timeout_ms: u64,
    /// Extra attempts for a slot write that still hits a busy database
    pub max_retries: u32,
    /// Linear backoff step between attempts
    pub retry_backoff_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5000,
            max_retries: 3,
            retry_backoff_ms: 25,
        }
    }
}

impl StorageConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(u64::from(attempt)))
    }
}

impl Config {
    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| SchedulerError::Configuration {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SchedulerError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Loads from `explicit` if given, else from the XDG config location if
    /// present, else returns defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            info!("Loading config from {}", path.display());
            return Self::from_file(path);
        }

        match Self::default_config_path() {
            Some(path) => {
                info!("Loading config from {}", path.display());
                Self::from_file(path)
            }
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix("rota").find_config_file("config.toml")
    }

    fn validate(&self) -> Result<()> {
        let generation = &self.generation;
        let checks = [
            ("generation.default_duration_minutes", generation.default_duration_minutes, 1),
            ("generation.default_break_minutes", generation.default_break_minutes, 0),
            ("generation.default_capacity", generation.default_capacity, 1),
        ];
        for (key, value, min) in checks {
            if value < min {
                return Err(SchedulerError::Configuration {
                    message: format!("{key} must be at least {min}, got {value}"),
                });
            }
        }
        Ok(())
    }
}
