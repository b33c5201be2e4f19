//! Hierarchy definition files
//!
//! A definition is a `root` table plus an ordered `levels` array, written in
//! TOML or JSON. Arrays keep declaration order, which becomes the level rank.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, ResultPathExt};
use crate::domain::{HierarchyDefinition, LevelHierarchy};
use crate::infrastructure::traits::FileSystem;

/// Serialization format of a hierarchy definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyFormat {
    Toml,
    Json,
}

impl HierarchyFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn parse(&self, content: &str) -> ApplicationResult<HierarchyDefinition> {
        let parsed = match self {
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ApplicationError::Config {
            message: format!("parse hierarchy ({self:?}): {message}"),
        })
    }

    pub fn render(&self, definition: &HierarchyDefinition) -> ApplicationResult<String> {
        let rendered = match self {
            Self::Toml => toml::to_string_pretty(definition).map_err(|e| e.to_string()),
            Self::Json => serde_json::to_string_pretty(definition).map_err(|e| e.to_string()),
        };
        rendered.map_err(|message| ApplicationError::Config {
            message: format!("serialize hierarchy ({self:?}): {message}"),
        })
    }
}

/// Reads and validates hierarchy definition files.
pub struct HierarchyLoader {
    fs: Arc<dyn FileSystem>,
}

impl HierarchyLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Parse `path` without validating the levels.
    pub fn read_definition(&self, path: &Path) -> ApplicationResult<HierarchyDefinition> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::NotFound(path.to_path_buf()));
        }
        let format = HierarchyFormat::from_path(path).ok_or_else(|| ApplicationError::Config {
            message: format!(
                "unknown hierarchy format for {} (expected .toml or .json)",
                path.display()
            ),
        })?;
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read hierarchy", path)?;
        format.parse(&content)
    }

    /// Parse and validate `path`.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<LevelHierarchy> {
        let definition = self.read_definition(path)?;
        debug!(
            "loaded {} level definitions from {}",
            definition.levels.len(),
            path.display()
        );
        Ok(LevelHierarchy::build(definition)?)
    }
}
