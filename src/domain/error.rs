//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Problems with a level hierarchy definition.
///
/// Raised while building a [`crate::domain::LevelHierarchy`], never while structuring text.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid pattern for level '{level}': {source}")]
    InvalidPattern {
        level: String,
        #[source]
        source: regex::Error,
    },

    #[error("level '{0}' has an empty title field")]
    MissingTitleField(String),

    #[error("duplicate level name: {0}")]
    DuplicateLevel(String),

    #[error("level '{level}' uses output field '{field}' more than once")]
    FieldCollision { level: String, field: String },

    #[error("level '{0}' captures content but declares no description or paragraph field")]
    UnplacedCapture(String),

    #[error("level '{level}' references unknown parent '{parent}'")]
    UnknownParent { level: String, parent: String },

    #[error("cycle detected in parent chain of level: {0}")]
    ParentCycle(String),

    #[error("expected exactly one leaf level, found {}: [{}]", candidates.len(), candidates.join(", "))]
    AmbiguousLeaf { candidates: Vec<String> },
}

/// Problems found while structuring a document against a valid hierarchy.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StructureError {
    #[error("input text contains no non-blank lines")]
    EmptyInput,

    #[error("line {line}: free text cannot be placed under level '{level}' (no description or paragraph field)")]
    UnroutableText { line: usize, level: String },
}

/// Domain errors represent business logic violations.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Structure(#[from] StructureError),
}
