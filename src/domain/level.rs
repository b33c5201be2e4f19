//! Declarative level definitions, as written by the document author.

use serde::{Deserialize, Serialize};

/// Field name used for child lists when a level (or the root) does not declare one.
pub const DEFAULT_SECTIONS_FIELD: &str = "sections";

/// Name given to the root when the definition does not set one.
pub const DEFAULT_ROOT_NAME: &str = "document";

/// One rule of the hierarchy: how to recognise a structural unit and how to materialise it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Regular expression matched against the start of each trimmed line
    pub pattern: String,
    /// Unique level identifier, e.g. "chapter"
    pub name: String,
    /// Output field receiving the title
    pub title_field: String,
    /// Output field accumulating free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_field: Option<String>,
    /// Output field holding nested sections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections_field: Option<String>,
    /// Output field holding leaf nodes or raw text fragments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_field: Option<String>,
    /// Name of the parent level, `None` for top-level levels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl LevelDefinition {
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        title_field: impl Into<String>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            name: name.into(),
            title_field: title_field.into(),
            description_field: None,
            sections_field: None,
            paragraph_field: None,
            parent: None,
        }
    }

    pub fn with_description(mut self, field: impl Into<String>) -> Self {
        self.description_field = Some(field.into());
        self
    }

    pub fn with_sections(mut self, field: impl Into<String>) -> Self {
        self.sections_field = Some(field.into());
        self
    }

    pub fn with_paragraphs(mut self, field: impl Into<String>) -> Self {
        self.paragraph_field = Some(field.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// Settings for the synthetic root node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootDefinition {
    /// Label of the document type, used when wrapping output
    pub name: String,
    /// Field name of the root's top-level list
    pub sections_field: String,
}

impl Default for RootDefinition {
    fn default() -> Self {
        Self {
            name: DEFAULT_ROOT_NAME.to_string(),
            sections_field: DEFAULT_SECTIONS_FIELD.to_string(),
        }
    }
}

/// A complete hierarchy description: root settings plus levels in declaration order.
///
/// Declaration order is significant: it becomes the rank used for nesting decisions,
/// so root-most levels come first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyDefinition {
    #[serde(default)]
    pub root: RootDefinition,
    #[serde(default)]
    pub levels: Vec<LevelDefinition>,
}

impl HierarchyDefinition {
    pub fn from_levels(levels: Vec<LevelDefinition>) -> Self {
        Self {
            root: RootDefinition::default(),
            levels,
        }
    }
}
