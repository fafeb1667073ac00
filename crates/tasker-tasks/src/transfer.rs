//! Export and import of the whole task list.
//!
//! Exports always cover the store in store order, never the current view.
//! Import is two-phase: [`parse_import`] validates a payload into a
//! [`PendingImport`] without touching anything, and the caller applies it
//! only after the user confirms.

use chrono::Utc;
use serde_json::Value;

use crate::errors::TaskError;
use crate::types::Task;

/// Line closing each task block in the text export.
pub const TEXT_DIVIDER: &str = "--------------------------";

/// Fields dropped from every imported record.
const LEGACY_FIELDS: &[&str] = &["repeat"];

/// Plain-text export: one `Label: value` block per task.
pub fn export_text(tasks: &[Task]) -> Result<String, TaskError> {
    if tasks.is_empty() {
        return Err(TaskError::NothingToExport);
    }
    let blocks: Vec<String> = tasks.iter().map(text_block).collect();
    Ok(blocks.join("\n\n"))
}

fn text_block(task: &Task) -> String {
    let or_none = |s: String| if s.is_empty() { "None".to_string() } else { s };
    [
        format!("Task: {}", task.name),
        format!("Category: {}", or_none(task.category.clone())),
        format!(
            "Deadline: {}",
            or_none(task.deadline.map(|d| d.to_string()).unwrap_or_default())
        ),
        format!(
            "Priority: {}",
            or_none(task.priority.map(|p| p.to_string()).unwrap_or_default())
        ),
        format!("Status: {}", if task.done { "Done" } else { "Not done" }),
        TEXT_DIVIDER.to_string(),
    ]
    .join("\n")
}

/// Pretty-printed JSON export of the store.
pub fn export_json(tasks: &[Task]) -> Result<String, TaskError> {
    if tasks.is_empty() {
        return Err(TaskError::NothingToExport);
    }
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// A validated import waiting for confirmation.
///
/// Dropping it cancels the import.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use = "an import has no effect until it is applied"]
pub struct PendingImport {
    tasks: Vec<Task>,
    stripped: usize,
}

impl PendingImport {
    /// Tasks that will replace the store.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks that will replace the store.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// The payload was an empty array.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// How many records had legacy fields removed.
    pub fn stripped(&self) -> usize {
        self.stripped
    }

    pub(crate) fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}

/// Validate an import payload.
///
/// The payload must be a JSON array of named objects. Legacy fields are
/// stripped from each record before it is decoded, and completion state is
/// normalised the same way a stored list is on load.
pub fn parse_import(payload: &str) -> Result<PendingImport, TaskError> {
    let imported_at = Utc::now();
    let value: Value =
        serde_json::from_str(payload).map_err(|e| TaskError::InvalidImport(e.to_string()))?;
    let Value::Array(records) = value else {
        return Err(TaskError::InvalidImport("Invalid format".to_string()));
    };

    let mut stripped = 0;
    let mut tasks = Vec::with_capacity(records.len());
    for (position, record) in records.into_iter().enumerate() {
        let Value::Object(mut fields) = record else {
            return Err(TaskError::InvalidImport(format!(
                "record {position} is not an object"
            )));
        };
        let before = fields.len();
        for legacy in LEGACY_FIELDS {
            let _ = fields.remove(*legacy);
        }
        if fields.len() != before {
            stripped += 1;
        }
        let mut task: Task = serde_json::from_value(Value::Object(fields))
            .map_err(|e| TaskError::InvalidImport(format!("record {position}: {e}")))?;
        if task.has_blank_name() {
            return Err(TaskError::InvalidImport(format!(
                "record {position} has no name"
            )));
        }
        let _ = task.normalize_completion(imported_at);
        tasks.push(task);
    }

    Ok(PendingImport { tasks, stripped })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::{Priority, Repeat, TaskDraft};

    fn sample() -> Vec<Task> {
        vec![
            Task::from_draft(TaskDraft {
                name: "Essay".into(),
                category: "School".into(),
                deadline: Some("2024-01-31T09:00".parse().unwrap()),
                priority: Some(Priority::High),
                repeat: Repeat::Weekly,
            }),
            Task {
                done: true,
                done_at: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
                ..Task::from_draft(TaskDraft::named("Gym"))
            },
        ]
    }

    // ── text ────────────────────────────────────────────────────────

    #[test]
    fn text_export_layout() {
        insta::assert_snapshot!(export_text(&sample()).unwrap(), @r"
        Task: Essay
        Category: School
        Deadline: 2024-01-31T09:00
        Priority: high
        Status: Not done
        --------------------------

        Task: Gym
        Category: None
        Deadline: None
        Priority: None
        Status: Done
        --------------------------
        ");
    }

    #[test]
    fn text_export_rejects_empty_store() {
        assert_matches!(export_text(&[]), Err(TaskError::NothingToExport));
    }

    // ── json ────────────────────────────────────────────────────────

    #[test]
    fn json_export_is_pretty_array() {
        let json = export_json(&sample()).unwrap();
        assert!(json.starts_with("[\n  {\n    \"name\": \"Essay\""));
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1]["doneAt"], "2024-01-02T03:04:05.000Z");
    }

    #[test]
    fn json_export_rejects_empty_store() {
        assert_matches!(export_json(&[]), Err(TaskError::NothingToExport));
    }

    // ── import ──────────────────────────────────────────────────────

    #[test]
    fn import_rejects_non_array() {
        let err = parse_import(r#"{"a":1}"#).unwrap_err();
        assert_matches!(err, TaskError::InvalidImport(ref msg) if msg == "Invalid format");
    }

    #[test]
    fn import_rejects_bad_json() {
        assert_matches!(parse_import("[{"), Err(TaskError::InvalidImport(_)));
        assert_matches!(parse_import(""), Err(TaskError::InvalidImport(_)));
    }

    #[test]
    fn import_rejects_non_object_record() {
        let err = parse_import(r#"[{"name": "ok"}, 3]"#).unwrap_err();
        assert_matches!(err, TaskError::InvalidImport(ref msg) if msg.contains("record 1"));
    }

    #[test]
    fn import_rejects_nameless_record() {
        let err = parse_import(r#"[{"name": "ok"}, {"category": "Work"}]"#).unwrap_err();
        assert_matches!(err, TaskError::InvalidImport(ref msg) if msg == "record 1 has no name");
        assert_matches!(parse_import(r#"[{"name": " "}]"#), Err(TaskError::InvalidImport(_)));
    }

    #[test]
    fn import_normalizes_completion_state() {
        let pending = parse_import(
            r#"[{"name": "a", "done": false, "doneAt": "2024-01-01T00:00:00.000Z"},
                {"name": "b", "done": true}]"#,
        )
        .unwrap();
        for task in pending.tasks() {
            assert_eq!(task.done, task.done_at.is_some(), "{}", task.name);
        }
        assert!(pending.tasks()[1].done);
    }

    #[test]
    fn fractional_deadline_survives_round_trip() {
        let stored = crate::store::decode_tasks(
            r#"[{"name": "Precise", "deadline": "2024-01-31T09:00:30.500"}]"#,
        );
        let exported = export_json(&stored).unwrap();
        assert!(exported.contains("\"2024-01-31T09:00:30.500\""));
        assert_eq!(parse_import(&exported).unwrap().into_tasks(), stored);
    }

    #[test]
    fn import_strips_repeat() {
        let pending = parse_import(
            r#"[{"name": "Daily", "deadline": "2024-01-01T08:00", "repeat": "daily"},
                {"name": "Plain"}]"#,
        )
        .unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending.stripped(), 1);
        assert!(pending.tasks().iter().all(|t| t.repeat == Repeat::None));
    }

    #[test]
    fn import_accepts_empty_array() {
        let pending = parse_import("[]").unwrap();
        assert!(pending.is_empty());
    }

    #[test]
    fn export_then_import_round_trips_modulo_repeat() {
        let original = sample();
        let pending = parse_import(&export_json(&original).unwrap()).unwrap();

        let expected: Vec<Task> = original
            .into_iter()
            .map(|t| Task {
                repeat: Repeat::None,
                ..t
            })
            .collect();
        assert_eq!(pending.into_tasks(), expected);
    }
}
