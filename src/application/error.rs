//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::application::source::DocumentKind;
use crate::domain::{ConfigError, DomainError, StructureError};

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported document type {kind} for {path}: extract the text first")]
    UnsupportedDocument { path: PathBuf, kind: DocumentKind },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for ApplicationError {
    fn from(e: ConfigError) -> Self {
        Self::Domain(e.into())
    }
}

impl From<StructureError> for ApplicationError {
    fn from(e: StructureError) -> Self {
        Self::Domain(e.into())
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
