//! Task record and its field types.
//!
//! The JSON form is camelCase and tolerant on the way in: unknown fields are
//! ignored, missing fields take their defaults, and values of the wrong shape
//! (a numeric priority, a garbage deadline) degrade to "none" instead of
//! failing the whole record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

use crate::deadline::Deadline;

/// Rank used for tasks without a recognised priority.
pub const UNRANKED: u8 = 99;

// ─────────────────────────────────────────────────────────────────────────────
// Priority
// ─────────────────────────────────────────────────────────────────────────────

/// Task priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Rank 1.
    High,
    /// Rank 2.
    Medium,
    /// Rank 3.
    Low,
}

impl Priority {
    /// Wire string (`"high"`, `"medium"`, `"low"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Sort rank: high=1, medium=2, low=3.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Case-insensitive parse; `None` for empty or unrecognised input.
    pub fn parse_lossy(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Sort rank of an optional priority, [`UNRANKED`] when absent.
pub fn priority_rank(priority: Option<Priority>) -> u8 {
    priority.map_or(UNRANKED, Priority::rank)
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repeat
// ─────────────────────────────────────────────────────────────────────────────

/// Recurrence policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    /// No follow-up task.
    #[default]
    None,
    /// Follow-up due one day later.
    Daily,
    /// Follow-up due seven days later.
    Weekly,
}

impl Repeat {
    /// Wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    /// Days between occurrences, `None` for [`Repeat::None`].
    pub fn interval_days(self) -> Option<u64> {
        match self {
            Self::None => None,
            Self::Daily => Some(1),
            Self::Weekly => Some(7),
        }
    }
}

impl FromStr for Repeat {
    type Err = std::convert::Infallible;

    /// Case-insensitive; anything unrecognised is [`Repeat::None`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            _ => Self::None,
        })
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Task
// ─────────────────────────────────────────────────────────────────────────────

/// A task record. Its identity is its position in the store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Display name; never blank for tasks created through the board.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// Free-form grouping label, possibly empty.
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    /// When the task falls due.
    #[serde(default, deserialize_with = "lenient_deadline")]
    pub deadline: Option<Deadline>,
    /// Priority, `None` when unset.
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Option<Priority>,
    /// Recurrence policy.
    #[serde(default, deserialize_with = "lenient_repeat")]
    pub repeat: Repeat,
    /// Completion state.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub done: bool,
    /// When the task was last completed; set iff `done`.
    #[serde(
        default,
        serialize_with = "serialize_done_at",
        deserialize_with = "lenient_done_at"
    )]
    pub done_at: Option<DateTime<Utc>>,
}

impl Task {
    /// A fresh, not-done task from a validated draft.
    pub fn from_draft(draft: TaskDraft) -> Self {
        Self {
            name: draft.name,
            category: draft.category,
            deadline: draft.deadline,
            priority: draft.priority,
            repeat: draft.repeat,
            done: false,
            done_at: None,
        }
    }

    /// Overwrite the user-editable fields, leaving completion state alone.
    pub fn apply_draft(&mut self, draft: TaskDraft) {
        self.name = draft.name;
        self.category = draft.category;
        self.deadline = draft.deadline;
        self.priority = draft.priority;
        self.repeat = draft.repeat;
    }

    /// Sort rank of this task's priority.
    pub fn priority_rank(&self) -> u8 {
        priority_rank(self.priority)
    }

    /// Restore `done_at.is_some() == done` on a decoded record.
    ///
    /// An open task loses any stale `done_at`. A done task without one is
    /// stamped with `fallback`, keeping it done. Returns whether anything
    /// changed.
    pub fn normalize_completion(&mut self, fallback: DateTime<Utc>) -> bool {
        match (self.done, self.done_at) {
            (false, Some(_)) => {
                self.done_at = None;
                true
            }
            (true, None) => {
                self.done_at = Some(fallback);
                true
            }
            _ => false,
        }
    }

    /// The name is empty or whitespace.
    pub fn has_blank_name(&self) -> bool {
        self.name.trim().is_empty()
    }
}

/// The add/edit form payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Required name.
    pub name: String,
    /// Optional category (empty for none).
    pub category: String,
    /// Optional deadline.
    pub deadline: Option<Deadline>,
    /// Optional priority.
    pub priority: Option<Priority>,
    /// Recurrence policy.
    pub repeat: Repeat,
}

impl TaskDraft {
    /// A draft with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Trim text fields; `None` when the name is blank.
    pub fn normalized(self) -> Option<Self> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            category: self.category.trim().to_string(),
            ..self
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lenient field codecs
// ─────────────────────────────────────────────────────────────────────────────

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(
        Option::<Value>::deserialize(deserializer)?,
        Some(Value::Bool(true))
    ))
}

fn lenient_deadline<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Deadline>, D::Error> {
    let Some(Value::String(raw)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    match raw.parse() {
        Ok(deadline) => Ok(Some(deadline)),
        Err(_) => {
            warn!(value = %raw, "unparseable deadline, treating as none");
            Ok(None)
        }
    }
}

fn lenient_priority<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Priority>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Priority::parse_lossy(&s),
        _ => None,
    })
}

fn lenient_repeat<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Repeat, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s.parse().unwrap_or_default(),
        _ => Repeat::None,
    })
}

fn lenient_done_at<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let Some(Value::String(raw)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc)))
}

// Millisecond precision with a `Z` suffix, e.g. `2024-01-31T09:00:00.000Z`.
#[allow(clippy::ref_option)]
fn serialize_done_at<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(t) => serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => serializer.serialize_none(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
