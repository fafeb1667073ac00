//! # tasker-settings
//!
//! Configuration for the Tasker task tracker.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`TaskerSettings::default()`]
//! 2. **User file**: `~/.tasker/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `TASKER_*` overrides (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use tasker_settings::load_settings;
//!
//! let settings = load_settings().unwrap_or_default();
//! println!("tasks live in {}", settings.storage.resolved_data_dir().display());
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_overrides, deep_merge, is_known_sort_key, load_settings, load_settings_from_path,
    settings_path, tasker_home,
};
pub use types::*;
