use std::io;

use thiserror::Error;

use crate::models::TaskId;

/// Errors raised by the task store and its persistence helpers.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize '{key}': {source}")]
    Serde {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;
