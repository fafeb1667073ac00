//! Task error types.

use thiserror::Error;

/// Errors from task store operations.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The persistence slot could not be written.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the task list failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No task at the given store position.
    #[error("no task at index {index} (store holds {len})")]
    NotFound {
        /// Requested store position.
        index: usize,
        /// Number of tasks in the store.
        len: usize,
    },

    /// An import payload was rejected; the store is unchanged.
    #[error("Failed to import tasks: {0}")]
    InvalidImport(String),

    /// Export was requested on an empty store.
    #[error("No tasks to export!")]
    NothingToExport,

    /// A deadline string could not be parsed.
    #[error("invalid deadline: {0:?}")]
    InvalidDeadline(String),
}

impl TaskError {
    /// Convenience constructor for [`TaskError::NotFound`].
    pub fn not_found(index: usize, len: usize) -> Self {
        Self::NotFound { index, len }
    }
}

/// Result type for task operations.
pub type Result<T> = std::result::Result<T, TaskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = TaskError::not_found(4, 2);
        assert_eq!(err.to_string(), "no task at index 4 (store holds 2)");
    }

    #[test]
    fn import_error_display() {
        let err = TaskError::InvalidImport("Invalid format".into());
        assert_eq!(err.to_string(), "Failed to import tasks: Invalid format");
    }

    #[test]
    fn nothing_to_export_display() {
        assert_eq!(TaskError::NothingToExport.to_string(), "No tasks to export!");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: TaskError = io_err.into();
        assert!(matches!(err, TaskError::Io(_)));
    }
}
