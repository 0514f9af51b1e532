//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::TreeError;

/// Application errors wrap domain errors and add file and config context.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("invalid input in {path}: {message}")]
    InvalidInput { path: PathBuf, message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type AppResult<T> = Result<T, AppError>;
