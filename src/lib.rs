//! doctree: turn flat extracted document text into a hierarchical record tree.
//!
//! A [`LevelHierarchy`] declares the levels of a document (book, title,
//! chapter, article, ...) as anchored line patterns with parent links.
//! [`prune`] walks the text line by line and grows a [`Tree`] from it.
//!
//! ```
//! use doctree::{prune, LevelDefinition, LevelHierarchy};
//!
//! let hierarchy = LevelHierarchy::from_levels(vec![
//!     LevelDefinition::new("title", r"TITLE (\w+)", "title").with_sections("articles"),
//!     LevelDefinition::new("article", r"Art\. (\d+)", "article")
//!         .with_paragraphs("text")
//!         .with_parent("title"),
//! ])
//! .unwrap();
//!
//! let tree = prune(&hierarchy, "TITLE I\nArt. 1\nEverybody is equal.").unwrap();
//! assert_eq!(tree.node_count(), 2);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{
    prune, ConfigError, DomainError, Gardener, HierarchyDefinition, Level, LevelDefinition,
    LevelHierarchy, Node, Paragraph, RootDefinition, StructureError, Tree,
};
