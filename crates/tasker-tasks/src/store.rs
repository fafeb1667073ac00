//! Task persistence over a key-value slot.
//!
//! The whole task list lives in a single slot as a JSON array. [`TaskStore::load`]
//! never fails: a missing, unreadable, or malformed slot is an empty list.
//! [`TaskStore::save`] overwrites the slot unconditionally.

use std::collections::HashMap;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::TaskError;
use crate::types::Task;

/// Default slot name for the task list.
pub const DEFAULT_KEY: &str = "tasks";

/// A named-value persistence backend, the analogue of browser local storage.
pub trait KeyValueSlot {
    /// Read the value stored under `key`, `Ok(None)` if nothing is stored.
    fn read(&self, key: &str) -> io::Result<Option<String>>;

    /// Replace the value stored under `key`.
    fn write(&mut self, key: &str, value: &str) -> io::Result<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Slots
// ─────────────────────────────────────────────────────────────────────────────

/// Slot backed by one `<key>.json` file per key inside a directory.
///
/// Writes go through a temp file in the same directory and a rename, so a
/// crash mid-write leaves the previous value intact.
#[derive(Clone, Debug)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Slot rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the slot files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueSlot for FileSlot {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        let _ = tmp.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }
}

/// In-memory slot.
#[derive(Clone, Debug, Default)]
pub struct MemorySlot {
    values: HashMap<String, String>,
}

impl MemorySlot {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-seeded with one value.
    pub fn with_value(key: &str, value: impl Into<String>) -> Self {
        let mut slot = Self::new();
        let _ = slot.values.insert(key.to_string(), value.into());
        slot
    }

    /// Raw stored value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl KeyValueSlot for MemorySlot {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        let _ = self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TaskStore
// ─────────────────────────────────────────────────────────────────────────────

/// Loads and saves the task list in one slot.
#[derive(Debug)]
pub struct TaskStore<S> {
    slot: S,
    key: String,
}

impl<S: KeyValueSlot> TaskStore<S> {
    /// Store using the [`DEFAULT_KEY`] slot.
    pub fn new(slot: S) -> Self {
        Self::with_key(slot, DEFAULT_KEY)
    }

    /// Store using a custom slot name.
    pub fn with_key(slot: S, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    /// The slot name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying slot.
    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Load the task list. Never fails; problems are logged and yield an
    /// empty (or partial) list.
    pub fn load(&self) -> Vec<Task> {
        match self.slot.read(&self.key) {
            Ok(Some(raw)) => decode_tasks(&raw),
            Ok(None) => {
                debug!(key = %self.key, "no stored tasks");
                Vec::new()
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read stored tasks, starting empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the slot with `tasks`.
    pub fn save(&mut self, tasks: &[Task]) -> Result<(), TaskError> {
        let raw = serde_json::to_string(tasks)?;
        self.slot.write(&self.key, &raw)?;
        debug!(key = %self.key, count = tasks.len(), "saved tasks");
        Ok(())
    }
}

/// Decode a stored task list, skipping records that are not objects or
/// have no name.
pub fn decode_tasks(raw: &str) -> Vec<Task> {
    let records = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(records)) => records,
        Ok(Value::Null) => return Vec::new(),
        Ok(_) => {
            warn!("stored tasks are not a JSON array, starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "stored tasks are not valid JSON, starting empty");
            return Vec::new();
        }
    };

    let total = records.len();
    let tasks: Vec<Task> = records
        .into_iter()
        .enumerate()
        .filter_map(|(position, record)| {
            if !record.is_object() {
                warn!(position, "skipping stored task that is not an object");
                return None;
            }
            match serde_json::from_value::<Task>(record) {
                Ok(task) if task.has_blank_name() => {
                    warn!(position, "skipping stored task without a name");
                    None
                }
                Ok(mut task) => {
                    if task.normalize_completion(Utc::now()) {
                        debug!(position, done = task.done, "repaired stored completion time");
                    }
                    Some(task)
                }
                Err(e) => {
                    warn!(position, error = %e, "skipping unreadable stored task");
                    None
                }
            }
        })
        .collect();
    debug!(loaded = tasks.len(), total, "loaded stored tasks");
    tasks
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
