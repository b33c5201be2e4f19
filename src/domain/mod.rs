//! Domain layer: hierarchy model and structuring engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod gardener;
pub mod hierarchy;
pub mod level;
pub mod node;

pub use error::{ConfigError, DomainError, StructureError};
pub use gardener::{prune, Gardener};
pub use hierarchy::{Level, LevelHierarchy};
pub use level::{
    HierarchyDefinition, LevelDefinition, RootDefinition, DEFAULT_ROOT_NAME,
    DEFAULT_SECTIONS_FIELD,
};
pub use node::{Node, NodeIterator, NodeShape, Paragraph, Tree};

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
///
/// Returns the input unchanged if expansion fails.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
