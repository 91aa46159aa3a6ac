use thiserror::Error;

/// Errors raised by the storage layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Query or insert failed inside SQLite.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The insert went through but the row could not be read back.
    #[error("message save failed: no message found with id {0}")]
    NotFound(String),

    /// The blocking task running the query panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::Task(err.to_string())
    }
}
