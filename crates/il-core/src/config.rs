//! Configuration file handling.
//!
//! Resolution order: an explicit `--config` path, then `$IL_HOME/config.json`,
//! then built-in defaults. The database path falls back to
//! [`il_local_db::Database::default_path`].

use std::path::{Path, PathBuf};

use il_api_contract::{parse_time_of_day, UploadWindow, DEFAULT_ALLOWED_EXTENSIONS};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cohort::CohortCalendar;
use crate::upload::{UploadPolicy, RECENT_SCHEDULES};
use crate::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploadConfig {
    /// `HH:MM`
    pub window_start: String,
    /// `HH:MM`
    pub window_end: String,
    pub allowed_extensions: Vec<String>,
    pub recent_schedules: u32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            window_start: "19:30".to_string(),
            window_end: "20:30".to_string(),
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            recent_schedules: RECENT_SCHEDULES,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    pub upload: UploadConfig,
    pub cohorts: CohortCalendar,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {e}", path.display())))?;
        let config = serde_json::from_str(&text)
            .map_err(|e| Error::config(format!("invalid {}: {e}", path.display())))?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load `explicit` if given, else `$IL_HOME/config.json` when present,
    /// else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Some(home) = std::env::var_os("IL_HOME") {
            let candidate = PathBuf::from(home).join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Self::load(&candidate);
            }
        }
        Ok(Self::default())
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(il_local_db::Database::default_path()?),
        }
    }

    pub fn upload_policy(&self) -> Result<UploadPolicy> {
        let window = UploadWindow::new(
            parse_time_of_day(&self.upload.window_start)?,
            parse_time_of_day(&self.upload.window_end)?,
        )?;
        if self.upload.recent_schedules == 0 {
            return Err(Error::config("upload.recentSchedules must be at least 1"));
        }
        Ok(UploadPolicy {
            window,
            allowed_extensions: self.upload.allowed_extensions.clone(),
            recent_schedules: self.upload.recent_schedules,
        })
    }
}
