//! # tasker-tasks
//!
//! The task list core: an insertion-ordered store persisted to a key-value
//! slot, recurrence expansion on completion, and the sort/filter pipeline
//! that turns the store into a view.
//!
//! Everything is synchronous. [`TaskBoard`] is the command interface a
//! presentation layer drives; the free functions in [`query`],
//! [`recurrence`], and [`transfer`] operate on plain task slices.

#![deny(unsafe_code)]

pub mod board;
pub mod deadline;
pub mod errors;
pub mod messages;
pub mod query;
pub mod recurrence;
pub mod store;
pub mod transfer;
pub mod types;

pub use board::TaskBoard;
pub use deadline::{Deadline, DueDistance, DueUnit, describe_deadline};
pub use errors::{Result, TaskError};
pub use messages::EmptyStateMessages;
pub use query::{SortKey, TaskQuery, View, ViewEntry};
pub use recurrence::ToggleOutcome;
pub use store::{FileSlot, KeyValueSlot, MemorySlot, TaskStore};
pub use transfer::PendingImport;
pub use types::{Priority, Repeat, Task, TaskDraft};
