//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::AppError;
use crate::domain::TreeError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    App(#[from] AppError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<TreeError> for CliError {
    fn from(e: TreeError) -> Self {
        CliError::App(AppError::Tree(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::App(e) => match e {
                AppError::Tree(TreeError::NotFound(_)) => crate::exitcode::NOINPUT,
                AppError::Tree(_) | AppError::InvalidInput { .. } => crate::exitcode::DATAERR,
                AppError::Config { .. } => crate::exitcode::CONFIG,
                AppError::OperationFailed { .. } => crate::exitcode::IOERR,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeId;

    #[test]
    fn given_domain_errors_when_mapping_exit_code_then_uses_sysexits() {
        let not_found: CliError = TreeError::NotFound(NodeId::Int(1)).into();
        let malformed: CliError = TreeError::MalformedInput {
            index: 0,
            message: "x".into(),
        }
        .into();
        assert_eq!(not_found.exit_code(), crate::exitcode::NOINPUT);
        assert_eq!(malformed.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(CliError::Usage("u".into()).exit_code(), crate::exitcode::USAGE);
    }
}
