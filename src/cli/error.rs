//! CLI-level errors (wraps application errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),

    #[error("serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{failed} of {total} documents failed")]
    Partial { failed: usize, total: usize },
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Serialize(_) => crate::exitcode::SOFTWARE,
            CliError::Io { .. } => crate::exitcode::IOERR,
            CliError::Write { .. } => crate::exitcode::CANTCREAT,
            CliError::Partial { .. } => crate::exitcode::PARTIAL,
            CliError::Application(e) => match e {
                ApplicationError::Domain(DomainError::Config(_)) => crate::exitcode::CONFIG,
                ApplicationError::Domain(DomainError::Structure(_)) => crate::exitcode::DATAERR,
                ApplicationError::NotFound(_) => crate::exitcode::NOINPUT,
                ApplicationError::UnsupportedDocument { .. } => crate::exitcode::DATAERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
            },
        }
    }
}
