//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`TaskerSettings::default()`]
//! 2. If `~/.tasker/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `TASKER_*` environment overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::TaskerSettings;

/// Sort keys the list view understands; anything else is ignored as an override.
const KNOWN_SORT_KEYS: &[&str] = &[
    "default",
    "priority-asc",
    "priority-desc",
    "name-asc",
    "name-desc",
    "due-asc",
    "due-desc",
];

/// Resolve the Tasker home directory (`~/.tasker`).
pub fn tasker_home() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".tasker")
}

/// Resolve the path to the settings file (`~/.tasker/settings.json`).
pub fn settings_path() -> PathBuf {
    tasker_home().join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<TaskerSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON or an invalid value, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<TaskerSettings> {
    let mut settings = load_file_layer(path)?;
    apply_overrides(&mut settings, |name| std::env::var(name).ok());
    settings.validate()?;
    Ok(settings)
}

/// Defaults merged with the settings file, without env overrides.
pub fn load_file_layer(path: &Path) -> Result<TaskerSettings> {
    let defaults = serde_json::to_value(TaskerSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `TASKER_*` overrides using `lookup` to read variables.
///
/// Empty values are treated as unset. An unknown sort key is ignored with a
/// warning and the file/default value is kept.
pub fn apply_overrides(settings: &mut TaskerSettings, lookup: impl Fn(&str) -> Option<String>) {
    let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = read("TASKER_DATA_DIR") {
        settings.storage.data_dir = v;
    }
    if let Some(v) = read("TASKER_STORAGE_KEY") {
        settings.storage.key = v;
    }
    if let Some(v) = read("TASKER_MESSAGES_PATH") {
        settings.messages.path = Some(v);
    }
    if let Some(v) = read("TASKER_DEFAULT_SORT") {
        if is_known_sort_key(&v) {
            settings.view.default_sort = v;
        } else {
            warn!(key = "TASKER_DEFAULT_SORT", value = %v, "unknown sort key env var, ignoring");
        }
    }
    if let Some(v) = read("TASKER_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

/// Whether `value` names a sort key the list view understands.
pub fn is_known_sort_key(value: &str) -> bool {
    KNOWN_SORT_KEYS.contains(&value)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
