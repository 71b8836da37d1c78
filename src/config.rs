//! User configuration file

use crate::error::{Result, SweepError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Optional defaults read from `~/.config/depsweep/config.json`.
///
/// The file is only ever read; nothing is written back.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct UserConfig {
    /// Directory name to search for
    pub target: Option<String>,
    /// Delete without the confirmation dialog
    pub skip_confirm: Option<bool>,
    /// Log filter used when `DEPSWEEP_LOG` is unset
    pub log_level: Option<String>,
}

impl UserConfig {
    /// Get the config file path (~/.config/depsweep/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("depsweep").join("config.json"))
    }

    /// Load config from the default location, or defaults if there is none
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            SweepError::Config(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            SweepError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }
}
