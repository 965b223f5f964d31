use thiserror::Error;

/// Failures of task collection operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("Task '{0}' not found. Use list() to see available tasks.")]
    TaskNotFound(String),

    #[error("Task ID '{0}' already exists. Please use a unique ID.")]
    DuplicateTaskId(String),

    #[error("Subtask '{subtask_id}' not found in task '{task_id}'")]
    SubtaskNotFound { task_id: String, subtask_id: String },

    #[error("Filter '{0}' not found. Use filters() to see saved filters.")]
    FilterNotFound(String),

    #[error("Title must not be empty")]
    EmptyTitle,

    #[error("Filter name and query must not be empty")]
    EmptyFilter,

    #[error("Invalid backup file: {0}")]
    InvalidBackup(String),
}

pub type TaskResult<T> = Result<T, TaskError>;
