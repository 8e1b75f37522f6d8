//! Builder for creating and configuring Scheduler instances.

use std::path::{Path, PathBuf};

use log::debug;

use super::Scheduler;
use crate::{
    config::Config,
    error::{Result, SchedulerError},
};

/// Builder for creating and configuring Scheduler instances.
#[derive(Debug, Clone, Default)]
pub struct SchedulerBuilder {
    database_path: Option<PathBuf>,
    config: Option<Config>,
}

impl SchedulerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/rota/rota.db` or `~/.local/share/rota/rota.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses an already-loaded configuration instead of the defaults.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the scheduler, creating the database and its schema if needed.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::FileSystem` if the database directory cannot
    /// be created, `SchedulerError::XdgDirectory` if no default location is
    /// available, and `SchedulerError::Database` if initialization fails.
    pub async fn build(self) -> Result<Scheduler> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| SchedulerError::FileSystem {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        debug!("Using database {}", db_path.display());
        let scheduler = Scheduler::new(db_path, self.config.unwrap_or_default());
        scheduler.with_database(|_| Ok(())).await?;
        Ok(scheduler)
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("rota")
            .place_data_file("rota.db")
            .map_err(|e| SchedulerError::XdgDirectory(e.to_string()))
    }
}
