//! Builder for creating and configuring Planner instances.

use std::path::{Path, PathBuf};

use super::Planner;
use crate::{config::Config, error::Result};

/// Builder for creating and configuring Planner instances.
#[derive(Debug, Clone, Default)]
pub struct PlannerBuilder {
    config: Option<Config>,
    config_path: Option<PathBuf>,
    archive_dir: Option<PathBuf>,
}

impl PlannerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `config` as is instead of reading a config file.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Reads configuration from a custom file path.
    ///
    /// If not specified, uses the XDG Base Directory specification:
    /// `$XDG_CONFIG_HOME/riotplan/config.json` or
    /// `~/.config/riotplan/config.json`, falling back to defaults when
    /// neither exists.
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.config_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Overrides the configured archive directory.
    pub fn with_archive_dir<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.archive_dir = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Builds the configured planner instance.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::Configuration` if the config file cannot be read,
    /// parsed, or holds invalid values
    pub fn build(self) -> Result<Planner> {
        let mut config = match self.config {
            Some(config) => config,
            None => Config::load(self.config_path.as_deref())?,
        };
        if let Some(archive_dir) = self.archive_dir {
            config.archive_dir = Some(archive_dir);
        }
        config.validate()?;

        Ok(Planner::new(config))
    }
}
