// Error types for task store operations

use std::path::PathBuf;

/// Errors returned by [`TaskStore`](crate::TaskStore) operations.
///
/// All of these are recoverable at the call site; a session can keep going
/// after any of them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A display index did not resolve to a task.
    #[error("No task #{index} (there are {len} tasks)")]
    NotFound { index: usize, len: usize },

    /// An unrecognized sort key.
    #[error("Invalid sort option: {0} (expected deadline, priority or name)")]
    InvalidOption(String),

    /// Reading or writing the backing file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but does not hold a task list.
    #[error("Malformed task file {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
