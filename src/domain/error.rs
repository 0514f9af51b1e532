//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::node::NodeId;

/// Domain errors represent violations of the hierarchy rules.
/// These are independent of how records were obtained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node not found: {0}")]
    NotFound(NodeId),

    #[error("malformed record at position {index}: {message}")]
    MalformedInput { index: usize, message: String },

    #[error("cycle detected in hierarchy: {0} never reaches a root")]
    CycleDetected(NodeId),
}

impl TreeError {
    pub(crate) fn malformed(index: usize, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            index,
            message: message.into(),
        }
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
