//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`
//! so a partial JSON file only overrides the keys it names.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};
use crate::loader::tasker_home;

/// Root settings type.
///
/// Loaded from `~/.tasker/settings.json` with defaults applied for missing
/// fields. Example:
///
/// ```json
/// {
///   "storage": { "dataDir": "/tmp/tasker" },
///   "view": { "defaultSort": "due-asc" }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskerSettings {
    /// Where the task list is persisted.
    pub storage: StorageSettings,
    /// Empty-state message feed.
    pub messages: MessagesSettings,
    /// List view defaults.
    pub view: ViewSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl TaskerSettings {
    /// Reject values that would make the store unusable.
    pub fn validate(&self) -> Result<()> {
        let key = self.storage.key.trim();
        if key.is_empty() {
            return Err(SettingsError::InvalidValue("storage key is empty".into()));
        }
        if key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(SettingsError::InvalidValue(format!(
                "storage key {key:?} must be a plain name"
            )));
        }
        Ok(())
    }
}

/// Persistence location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    /// Directory holding the key-value slots. Empty means `~/.tasker/data`.
    pub data_dir: String,
    /// Slot name for the task list.
    pub key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            key: "tasks".to_string(),
        }
    }
}

impl StorageSettings {
    /// The data directory with the empty default resolved.
    pub fn resolved_data_dir(&self) -> PathBuf {
        if self.data_dir.trim().is_empty() {
            tasker_home().join("data")
        } else {
            PathBuf::from(self.data_dir.trim())
        }
    }
}

/// Empty-state message feed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessagesSettings {
    /// Path to a `{"noTasksMessages": [...]}` file. `None` uses the built-in set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// List view defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewSettings {
    /// Sort key used when `list` is run without `--sort`.
    pub default_sort: String,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            default_sort: "default".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level (or `EnvFilter` directive) written to stderr.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
