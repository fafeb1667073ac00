//! The command interface over the task list.
//!
//! [`TaskBoard`] owns the in-memory list and its [`TaskStore`]. Every mutation
//! is addressed by store index and flushes the whole list before returning.
//! Presentation layers (the CLI, tests, a future web front end) only talk to
//! the board.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::errors::TaskError;
use crate::query::{self, TaskQuery, View};
use crate::recurrence::{self, ToggleOutcome};
use crate::store::{KeyValueSlot, TaskStore};
use crate::transfer::{self, PendingImport};
use crate::types::{Task, TaskDraft};

/// The task list plus the store it persists to.
#[derive(Debug)]
pub struct TaskBoard<S> {
    store: TaskStore<S>,
    tasks: Vec<Task>,
}

impl<S: KeyValueSlot> TaskBoard<S> {
    /// Load the list from `store`.
    pub fn open(store: TaskStore<S>) -> Self {
        let tasks = store.load();
        debug!(count = tasks.len(), key = store.key(), "opened task board");
        Self { store, tasks }
    }

    /// All tasks in store order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The task at `index`.
    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// The store holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The backing store.
    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    /// Append a task. Returns its index, or `None` when the name is blank.
    pub fn add(&mut self, draft: TaskDraft) -> Result<Option<usize>, TaskError> {
        let Some(draft) = draft.normalized() else {
            debug!("ignoring add with blank name");
            return Ok(None);
        };
        self.tasks.push(Task::from_draft(draft));
        let index = self.tasks.len() - 1;
        self.flush()?;
        info!(index, name = %self.tasks[index].name, "added task");
        Ok(Some(index))
    }

    /// Replace the editable fields of the task at `index`. Returns `false`
    /// (and changes nothing) when the name is blank.
    pub fn edit(&mut self, index: usize, draft: TaskDraft) -> Result<bool, TaskError> {
        let len = self.tasks.len();
        let task = self
            .tasks
            .get_mut(index)
            .ok_or_else(|| TaskError::not_found(index, len))?;
        let Some(draft) = draft.normalized() else {
            debug!(index, "ignoring edit with blank name");
            return Ok(false);
        };
        task.apply_draft(draft);
        self.flush()?;
        info!(index, "edited task");
        Ok(true)
    }

    /// Toggle completion of the task at `index`, spawning its next
    /// occurrence when it becomes done.
    pub fn toggle(&mut self, index: usize, now: DateTime<Utc>) -> Result<ToggleOutcome, TaskError> {
        let outcome = recurrence::complete_task(&mut self.tasks, index, now)?;
        self.flush()?;
        info!(index, done = outcome.done, "toggled task");
        Ok(outcome)
    }

    /// Remove and return the task at `index`. Later tasks shift down by one.
    pub fn delete(&mut self, index: usize) -> Result<Task, TaskError> {
        if index >= self.tasks.len() {
            return Err(TaskError::not_found(index, self.tasks.len()));
        }
        let removed = self.tasks.remove(index);
        self.flush()?;
        info!(index, name = %removed.name, "deleted task");
        Ok(removed)
    }

    /// The filtered, sorted view for `query`.
    pub fn query(&self, query: &TaskQuery) -> View<'_> {
        query::view(&self.tasks, query)
    }

    /// Plain-text export of the whole store.
    pub fn export_text(&self) -> Result<String, TaskError> {
        transfer::export_text(&self.tasks)
    }

    /// JSON export of the whole store.
    pub fn export_json(&self) -> Result<String, TaskError> {
        transfer::export_json(&self.tasks)
    }

    /// Validate an import payload without changing anything.
    pub fn stage_import(&self, payload: &str) -> Result<PendingImport, TaskError> {
        transfer::parse_import(payload)
    }

    /// Replace the store with a confirmed import. Returns the new task count.
    pub fn apply_import(&mut self, pending: PendingImport) -> Result<usize, TaskError> {
        let stripped = pending.stripped();
        self.tasks = pending.into_tasks();
        self.flush()?;
        info!(count = self.tasks.len(), stripped, "imported tasks");
        Ok(self.tasks.len())
    }

    fn flush(&mut self) -> Result<(), TaskError> {
        self.store.save(&self.tasks)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;
    use crate::query::SortKey;
    use crate::store::{DEFAULT_KEY, MemorySlot};
    use crate::types::{Priority, Repeat};

    fn board() -> TaskBoard<MemorySlot> {
        TaskBoard::open(TaskStore::new(MemorySlot::new()))
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn persisted(board: &TaskBoard<MemorySlot>) -> Vec<Task> {
        board.store().load()
    }

    // ── add / edit ──────────────────────────────────────────────────

    #[test]
    fn add_defaults_and_persists() {
        let mut board = board();
        let index = board.add(TaskDraft::named(" Homework ")).unwrap();
        assert_eq!(index, Some(0));

        let task = board.get(0).unwrap();
        assert_eq!(task.name, "Homework");
        assert!(!task.done);
        assert_eq!(task.done_at, None);
        assert_eq!(persisted(&board), board.tasks());
    }

    #[test]
    fn add_blank_name_is_noop() {
        let mut board = board();
        assert_eq!(board.add(TaskDraft::named("   ")).unwrap(), None);
        assert!(board.is_empty());
        assert_eq!(board.store().slot().get(DEFAULT_KEY), None);
    }

    #[test]
    fn edit_updates_fields_in_place() {
        let mut board = board();
        let _ = board.add(TaskDraft::named("Draft")).unwrap();
        let _ = board.toggle(0, now()).unwrap();

        let changed = board
            .edit(
                0,
                TaskDraft {
                    name: "Final".into(),
                    category: "School".into(),
                    priority: Some(Priority::Medium),
                    ..TaskDraft::default()
                },
            )
            .unwrap();
        assert!(changed);

        let task = board.get(0).unwrap();
        assert_eq!(task.name, "Final");
        assert_eq!(task.category, "School");
        assert!(task.done);
        assert_eq!(persisted(&board)[0], *task);
    }

    #[test]
    fn edit_blank_name_is_noop() {
        let mut board = board();
        let _ = board.add(TaskDraft::named("Keep")).unwrap();
        assert!(!board.edit(0, TaskDraft::named("")).unwrap());
        assert_eq!(board.get(0).unwrap().name, "Keep");
    }

    #[test]
    fn edit_out_of_range() {
        let mut board = board();
        assert_matches!(
            board.edit(3, TaskDraft::named("x")),
            Err(TaskError::NotFound { index: 3, len: 0 })
        );
    }

    // ── toggle / delete ─────────────────────────────────────────────

    #[test]
    fn toggle_spawns_and_persists() {
        let mut board = board();
        let _ = board
            .add(TaskDraft {
                deadline: Some("2024-01-31T09:00".parse().unwrap()),
                repeat: Repeat::Daily,
                ..TaskDraft::named("Standup")
            })
            .unwrap();

        let outcome = board.toggle(0, now()).unwrap();
        assert_eq!(outcome.spawned, Some(1));

        let stored = persisted(&board);
        assert_eq!(stored.len(), 2);
        assert!(stored[0].done);
        assert_eq!(stored[1].deadline.unwrap().to_string(), "2024-02-01T09:00");
    }

    #[test]
    fn delete_shifts_indices() {
        let mut board = board();
        for name in ["a", "b", "c"] {
            let _ = board.add(TaskDraft::named(name)).unwrap();
        }
        let removed = board.delete(1).unwrap();
        assert_eq!(removed.name, "b");
        let names: Vec<_> = persisted(&board).into_iter().map(|t| t.name).collect();
        assert_eq!(names, ["a", "c"]);
        assert_matches!(board.delete(2), Err(TaskError::NotFound { index: 2, len: 2 }));
    }

    #[test]
    fn view_indices_address_the_store() {
        let mut board = board();
        let _ = board.add(TaskDraft::named("zebra")).unwrap();
        let _ = board.add(TaskDraft::named("apple")).unwrap();

        let query = TaskQuery {
            sort: SortKey::NameAsc,
            ..TaskQuery::default()
        };
        let first = board.query(&query).entries[0].index;
        assert_eq!(first, 1);

        let _ = board.toggle(first, now()).unwrap();
        assert!(board.get(1).unwrap().done);
        assert!(!board.get(0).unwrap().done);
    }

    // ── export / import ─────────────────────────────────────────────

    #[test]
    fn export_empty_board_is_rejected() {
        let board = board();
        assert_matches!(board.export_text(), Err(TaskError::NothingToExport));
        assert_matches!(board.export_json(), Err(TaskError::NothingToExport));
    }

    #[test]
    fn bad_import_leaves_store_unchanged() {
        let mut board = board();
        let _ = board.add(TaskDraft::named("Existing")).unwrap();
        assert_matches!(board.stage_import(r#"{"a":1}"#), Err(TaskError::InvalidImport(_)));
        assert_eq!(board.len(), 1);
        assert_eq!(persisted(&board).len(), 1);
    }

    #[test]
    fn staged_import_waits_for_apply() {
        let mut board = board();
        let _ = board.add(TaskDraft::named("Existing")).unwrap();

        let pending = board
            .stage_import(r#"[{"name": "One"}, {"name": "Two", "repeat": "weekly"}]"#)
            .unwrap();
        assert_eq!(board.get(0).unwrap().name, "Existing");

        assert_eq!(board.apply_import(pending).unwrap(), 2);
        let names: Vec<_> = persisted(&board).into_iter().map(|t| t.name).collect();
        assert_eq!(names, ["One", "Two"]);
        assert_eq!(board.get(1).unwrap().repeat, Repeat::None);
    }

    #[test]
    fn reopen_sees_persisted_state() {
        let mut board = board();
        let _ = board.add(TaskDraft::named("Persist me")).unwrap();
        let raw = board.store().slot().get(DEFAULT_KEY).unwrap().to_string();

        let reopened = TaskBoard::open(TaskStore::new(MemorySlot::with_value(DEFAULT_KEY, raw)));
        assert_eq!(reopened.tasks(), board.tasks());
    }
}
