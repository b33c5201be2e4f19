//! Validated level hierarchy: compiled patterns, ranks and the leaf level.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use regex::{Captures, Regex};
use tracing::{debug, instrument};

use crate::domain::error::ConfigError;
use crate::domain::level::{HierarchyDefinition, LevelDefinition, RootDefinition};
use crate::domain::node::NodeShape;

/// A level definition after validation.
///
/// Rank is fixed at build time and equals the declaration index.
#[derive(Debug, Clone)]
pub struct Level {
    definition: LevelDefinition,
    rank: usize,
    regex: Regex,
    shape: Arc<NodeShape>,
}

impl Level {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn parent(&self) -> Option<&str> {
        self.definition.parent.as_deref()
    }

    /// The pattern as written in the definition.
    pub fn pattern(&self) -> &str {
        &self.definition.pattern
    }

    pub fn definition(&self) -> &LevelDefinition {
        &self.definition
    }

    pub fn shape(&self) -> &Arc<NodeShape> {
        &self.shape
    }

    /// Match at the start of `line`, like a prefix match.
    ///
    /// Leftmost-first search returns a match at offset 0 whenever one exists,
    /// so this equals anchoring the pattern without rewriting it.
    pub fn captures<'t>(&self, line: &'t str) -> Option<Captures<'t>> {
        self.regex
            .captures(line)
            .filter(|caps| caps.get(0).is_some_and(|m| m.start() == 0))
    }
}

/// Ordered, immutable collection of levels.
///
/// Built once and shared read-only between any number of structuring runs.
#[derive(Debug, Clone)]
pub struct LevelHierarchy {
    root: RootDefinition,
    levels: Vec<Level>,
    index: HashMap<String, usize>,
    leaf: usize,
}

impl LevelHierarchy {
    /// Validate `definition` and derive ranks and the leaf level.
    #[instrument(level = "debug", skip(definition), fields(levels = definition.levels.len()))]
    pub fn build(definition: HierarchyDefinition) -> Result<Self, ConfigError> {
        let HierarchyDefinition { root, levels: definitions } = definition;

        let mut levels = Vec::with_capacity(definitions.len());
        let mut index = HashMap::new();

        for (rank, definition) in definitions.into_iter().enumerate() {
            let regex =
                Regex::new(&definition.pattern).map_err(|source| ConfigError::InvalidPattern {
                    level: definition.name.clone(),
                    source,
                })?;
            if definition.title_field.trim().is_empty() {
                return Err(ConfigError::MissingTitleField(definition.name));
            }
            if index.insert(definition.name.clone(), rank).is_some() {
                return Err(ConfigError::DuplicateLevel(definition.name));
            }
            let shape = Arc::new(NodeShape::from_definition(&definition));
            check_distinct_fields(&shape)?;
            // group 0 plus title plus at least one content group
            if regex.captures_len() > 2
                && shape.description_field.is_none()
                && shape.paragraph_field.is_none()
            {
                return Err(ConfigError::UnplacedCapture(definition.name));
            }
            levels.push(Level {
                definition,
                rank,
                regex,
                shape,
            });
        }

        for level in &levels {
            if let Some(parent) = level.parent() {
                if !index.contains_key(parent) {
                    return Err(ConfigError::UnknownParent {
                        level: level.name().to_string(),
                        parent: parent.to_string(),
                    });
                }
            }
        }

        let leaf = find_leaf(&levels)?;
        check_acyclic(&levels, &index)?;

        debug!(
            "hierarchy built: {} levels, leaf '{}'",
            levels.len(),
            levels[leaf].name()
        );
        Ok(Self {
            root,
            levels,
            index,
            leaf,
        })
    }

    /// Build with the default root settings.
    pub fn from_levels(levels: Vec<LevelDefinition>) -> Result<Self, ConfigError> {
        Self::build(HierarchyDefinition::from_levels(levels))
    }

    pub fn root(&self) -> &RootDefinition {
        &self.root
    }

    /// Levels in rank (declaration) order.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn get(&self, name: &str) -> Option<&Level> {
        self.index.get(name).map(|&rank| &self.levels[rank])
    }

    pub fn rank(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn leaf(&self) -> &Level {
        &self.levels[self.leaf]
    }

    pub fn is_leaf(&self, level: &Level) -> bool {
        level.rank == self.leaf
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// First level (in rank order) whose pattern matches `line`.
    pub fn match_line<'t>(&self, line: &'t str) -> Option<(&Level, Captures<'t>)> {
        self.levels
            .iter()
            .find_map(|level| level.captures(line).map(|caps| (level, caps)))
    }

    /// Reconstruct the definition this hierarchy was built from.
    pub fn to_definition(&self) -> HierarchyDefinition {
        HierarchyDefinition {
            root: self.root.clone(),
            levels: self.levels.iter().map(|l| l.definition.clone()).collect(),
        }
    }
}

/// Every output key of a node must be unique, including the implicit
/// `sections` list created when a child attaches to a level without one.
fn check_distinct_fields(shape: &NodeShape) -> Result<(), ConfigError> {
    let fields = [
        Some(shape.title_field.as_str()),
        shape.description_field.as_deref(),
        Some(shape.sections_field_name()),
        shape.paragraph_field.as_deref(),
    ];
    let mut seen = HashSet::new();
    for field in fields.into_iter().flatten() {
        if !seen.insert(field) {
            return Err(ConfigError::FieldCollision {
                level: shape.level.clone(),
                field: field.to_string(),
            });
        }
    }
    Ok(())
}

/// The leaf is the only level never named as a parent.
fn find_leaf(levels: &[Level]) -> Result<usize, ConfigError> {
    let parents: HashSet<&str> = levels.iter().filter_map(|l| l.parent()).collect();
    let candidates: Vec<&Level> = levels
        .iter()
        .filter(|l| !parents.contains(l.name()))
        .collect();

    match candidates.as_slice() {
        [leaf] => Ok(leaf.rank),
        _ => Err(ConfigError::AmbiguousLeaf {
            candidates: candidates.iter().map(|l| l.name().to_string()).collect(),
        }),
    }
}

fn check_acyclic(levels: &[Level], index: &HashMap<String, usize>) -> Result<(), ConfigError> {
    for level in levels {
        let mut visited = HashSet::new();
        let mut current = Some(level);
        while let Some(l) = current {
            if !visited.insert(l.rank) {
                return Err(ConfigError::ParentCycle(level.name().to_string()));
            }
            current = l.parent().and_then(|p| index.get(p)).map(|&r| &levels[r]);
        }
    }
    Ok(())
}
