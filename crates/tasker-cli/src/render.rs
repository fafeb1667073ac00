//! Terminal rendering of a task view.

use std::fmt::Write;

use chrono::{Local, NaiveDateTime};
use tasker_tasks::{Task, View, describe_deadline};

/// Render every entry of `view` followed by `footer`.
pub fn render_view(view: &View<'_>, now: NaiveDateTime, footer: &str) -> String {
    let mut out = String::new();
    for entry in &view.entries {
        out.push_str(&render_task(entry.index, entry.task, now));
        out.push('\n');
    }
    out.push_str(footer);
    out
}

/// One task block, headed by its store index.
pub fn render_task(index: usize, task: &Task, now: NaiveDateTime) -> String {
    let mark = if task.done { 'x' } else { ' ' };
    let category = if task.category.is_empty() {
        "No category"
    } else {
        task.category.as_str()
    };

    let mut out = format!("[{index}] [{mark}] {}  ({category})\n", task.name);
    let _ = writeln!(
        out,
        "      Due: {}",
        describe_deadline(task.deadline.as_ref(), task.done, now)
    );
    let _ = writeln!(out, "      Priority: {}", priority_label(task));
    if let (true, Some(done_at)) = (task.done, task.done_at) {
        let local = done_at.with_timezone(&Local);
        let _ = writeln!(out, "      Completed: {}", local.format("%b %-d, %Y, %-I:%M %p"));
    }
    out
}

fn priority_label(task: &Task) -> String {
    let Some(priority) = task.priority else {
        return "None".to_string();
    };
    let raw = priority.as_str();
    let mut chars = raw.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
