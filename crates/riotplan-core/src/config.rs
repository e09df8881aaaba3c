//! User configuration.
//!
//! Read from `$XDG_CONFIG_HOME/riotplan/config.json` (usually
//! `~/.config/riotplan/config.json`) unless an explicit path is given:
//!
//! ```json
//! {
//!   "archive_dir": "/home/me/plans/archive",
//!   "participant": { "name": "Sam", "type": "human" }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{PlanError, Result, ResultExt},
    models::Participant,
};

const CONFIG_FILE: &str = "config.json";

/// Feedback participant when none is configured.
const DEFAULT_PARTICIPANT: &str = "User";

/// Settings shared by every plan operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where archived plans go when no target is given
    pub archive_dir: Option<PathBuf>,
    /// Recorded as the participant of new feedback that names none
    pub participant: Option<Participant>,
}

impl Config {
    /// Loads configuration.
    ///
    /// An explicit path must exist. Without one, the XDG config file is used
    /// when present and defaults otherwise.
    ///
    /// # Errors
    ///
    /// [`PlanError::Configuration`] when the file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };
        Self::from_file(&path)
    }

    /// Parses the config file at `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(format!("Invalid config file {}", path.display()))?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// The XDG config file, if one exists.
    pub fn default_path() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix("riotplan").find_config_file(CONFIG_FILE)
    }

    /// Participants to record on feedback that names none: the configured
    /// participant, or a human named "User".
    pub fn default_participants(&self) -> Vec<Participant> {
        vec![self
            .participant
            .clone()
            .unwrap_or_else(|| Participant::human(DEFAULT_PARTICIPANT))]
    }

    /// Checks values that parse but make no sense.
    pub fn validate(&self) -> Result<()> {
        if let Some(participant) = &self.participant {
            if participant.name.trim().is_empty() {
                return Err(PlanError::Configuration {
                    message: "participant name cannot be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}
