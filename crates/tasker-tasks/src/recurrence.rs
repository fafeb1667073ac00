//! Completion toggling and recurrence expansion.
//!
//! Completing a task with a daily or weekly repeat and a deadline appends a
//! new, open copy of it due one cycle later. The source task is never
//! modified beyond its own completion state. Only the open → done edge
//! spawns; reopening a task leaves earlier spawns in place.
//!
//! Each completion advances exactly one cycle from the source deadline, even
//! if that deadline is several cycles in the past.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::deadline::Deadline;
use crate::errors::TaskError;
use crate::types::{Repeat, Task};

/// Result of toggling a task's completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Completion state after the toggle.
    pub done: bool,
    /// Store position of the spawned follow-up, if one was created.
    pub spawned: Option<usize>,
}

/// The deadline one `repeat` cycle after `deadline`, `None` for
/// [`Repeat::None`] or on calendar overflow.
pub fn next_deadline(deadline: Deadline, repeat: Repeat) -> Option<Deadline> {
    deadline.checked_add_days(repeat.interval_days()?)
}

/// The follow-up a completed task spawns, if any.
pub fn next_occurrence(task: &Task) -> Option<Task> {
    let deadline = task.deadline?;
    let next = match next_deadline(deadline, task.repeat) {
        Some(next) => next,
        None if task.repeat == Repeat::None => return None,
        None => {
            warn!(deadline = %deadline, "next occurrence is out of calendar range, not spawning");
            return None;
        }
    };
    Some(Task {
        deadline: Some(next),
        done: false,
        done_at: None,
        ..task.clone()
    })
}

/// Flip completion of the task at `index`, spawning its next occurrence when
/// it becomes done.
pub fn complete_task(
    tasks: &mut Vec<Task>,
    index: usize,
    now: DateTime<Utc>,
) -> Result<ToggleOutcome, TaskError> {
    let len = tasks.len();
    let task = tasks
        .get_mut(index)
        .ok_or_else(|| TaskError::not_found(index, len))?;

    task.done = !task.done;
    task.done_at = task.done.then_some(now);

    if !task.done {
        return Ok(ToggleOutcome {
            done: false,
            spawned: None,
        });
    }

    let spawned = next_occurrence(task).map(|next| {
        info!(
            name = %next.name,
            repeat = %next.repeat,
            deadline = %next.deadline.map(|d| d.to_string()).unwrap_or_default(),
            "spawned next occurrence"
        );
        tasks.push(next);
        tasks.len() - 1
    });

    Ok(ToggleOutcome {
        done: true,
        spawned,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
