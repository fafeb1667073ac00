//! The sort/filter pipeline that turns the store into a view.
//!
//! Sorting is stable and always partitions open tasks before done ones; the
//! requested [`SortKey`] only orders within each partition. Filtering keeps a
//! task when the search text appears in its name or category
//! (case-insensitive) and, if a category filter is set, its category matches
//! exactly. Each [`ViewEntry`] carries the task's store index so mutations
//! act on the store, never on the sorted position.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::types::Task;

/// Requested ordering within each completion partition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Store order.
    #[default]
    StoreOrder,
    /// High priority first, unranked last.
    PriorityAsc,
    /// Unranked first, high priority last.
    PriorityDesc,
    /// A to Z.
    NameAsc,
    /// Z to A.
    NameDesc,
    /// Earliest deadline first, undated last.
    DueAsc,
    /// Undated first, then latest deadline first.
    DueDesc,
}

impl SortKey {
    /// Wire string, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StoreOrder => "default",
            Self::PriorityAsc => "priority-asc",
            Self::PriorityDesc => "priority-desc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::DueAsc => "due-asc",
            Self::DueDesc => "due-desc",
        }
    }

    /// Order two tasks by this key alone (no done partition).
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::StoreOrder => Ordering::Equal,
            Self::PriorityAsc => a.priority_rank().cmp(&b.priority_rank()),
            Self::PriorityDesc => b.priority_rank().cmp(&a.priority_rank()),
            Self::NameAsc => compare_names(&a.name, &b.name),
            Self::NameDesc => compare_names(&b.name, &a.name),
            Self::DueAsc => compare_due(a, b),
            Self::DueDesc => compare_due(b, a),
        }
    }
}

impl FromStr for SortKey {
    type Err = Infallible;

    /// Unrecognised keys fall back to [`SortKey::StoreOrder`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "priority-asc" => Self::PriorityAsc,
            "priority-desc" => Self::PriorityDesc,
            "name-asc" => Self::NameAsc,
            "name-desc" => Self::NameDesc,
            "due-asc" => Self::DueAsc,
            "due-desc" => Self::DueDesc,
            _ => Self::StoreOrder,
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name comparison approximating browser collation: case-insensitive first,
/// then lowercase before uppercase.
///
/// Lowercased names compare by code point, so accented or other non-ASCII
/// letters do not sort beside their base letter (`"éclair"` lands after
/// `"fig"`).
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

// Missing deadlines are infinitely late.
fn compare_due(a: &Task, b: &Task) -> Ordering {
    match (&a.deadline, &b.deadline) {
        (Some(x), Some(y)) => x.datetime().cmp(&y.datetime()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Query and view
// ─────────────────────────────────────────────────────────────────────────────

/// Search text, category filter, and sort key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Substring matched against name and category, case-insensitive.
    pub search: String,
    /// Exact category to keep; empty keeps all.
    pub category: String,
    /// Ordering within each completion partition.
    pub sort: SortKey,
}

impl TaskQuery {
    /// Whether `task` passes the search and category filters.
    pub fn matches(&self, task: &Task) -> bool {
        let needle = self.search.to_lowercase();
        let searched = needle.is_empty()
            || task.name.to_lowercase().contains(&needle)
            || task.category.to_lowercase().contains(&needle);
        let in_category = self.category.is_empty() || task.category == self.category;
        searched && in_category
    }
}

/// A task in the view, tagged with its store index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewEntry<'a> {
    /// Position in the unsorted store.
    pub index: usize,
    /// The task.
    pub task: &'a Task,
}

/// The filtered, sorted projection of the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct View<'a> {
    /// Visible tasks in display order.
    pub entries: Vec<ViewEntry<'a>>,
    /// Distinct non-empty categories across the whole store.
    pub categories: BTreeSet<String>,
    /// Number of tasks in the store.
    pub total: usize,
}

impl View<'_> {
    /// No task passed the filters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store indices in display order.
    pub fn indices(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.index).collect()
    }
}

/// Distinct non-empty categories.
pub fn categories(tasks: &[Task]) -> BTreeSet<String> {
    tasks
        .iter()
        .filter(|t| !t.category.is_empty())
        .map(|t| t.category.clone())
        .collect()
}

/// Stable sort: open before done, then `key`, then store order.
pub fn sort_entries(entries: &mut [ViewEntry<'_>], key: SortKey) {
    entries.sort_by(|a, b| {
        a.task
            .done
            .cmp(&b.task.done)
            .then_with(|| key.compare(a.task, b.task))
    });
}

/// Build the view of `tasks` for `query`.
pub fn view<'a>(tasks: &'a [Task], query: &TaskQuery) -> View<'a> {
    let mut entries: Vec<ViewEntry<'a>> = tasks
        .iter()
        .enumerate()
        .map(|(index, task)| ViewEntry { index, task })
        .collect();
    sort_entries(&mut entries, query.sort);
    entries.retain(|e| query.matches(e.task));

    View {
        entries,
        categories: categories(tasks),
        total: tasks.len(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
