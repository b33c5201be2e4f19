//! Line-by-line structuring engine.
//!
//! Every non-blank line either opens a node (it matches a level pattern) or is
//! free text routed to the deepest open node. Nesting is decided purely by rank:
//! opening a level closes every open node of the same or a deeper rank.

use std::sync::Arc;

use itertools::Itertools;
use regex::Captures;
use tracing::{debug, instrument, trace};

use crate::domain::error::StructureError;
use crate::domain::hierarchy::{Level, LevelHierarchy};
use crate::domain::node::{Node, Paragraph, Tree};

/// Structure `text` according to `hierarchy`.
///
/// Either the whole document fits and a tree is returned, or the first offending
/// line is reported; there are no partial results.
pub fn prune(hierarchy: &LevelHierarchy, text: &str) -> Result<Tree, StructureError> {
    Gardener::new(hierarchy).prune(text)
}

/// Applies a [`LevelHierarchy`] to documents.
///
/// Holds no per-document state, so one gardener can prune many documents,
/// also from several threads.
#[derive(Debug, Clone, Copy)]
pub struct Gardener<'h> {
    hierarchy: &'h LevelHierarchy,
}

impl<'h> Gardener<'h> {
    pub fn new(hierarchy: &'h LevelHierarchy) -> Self {
        Self { hierarchy }
    }

    #[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
    pub fn prune(&self, text: &str) -> Result<Tree, StructureError> {
        if split_lines(text).all(|line| line.trim().is_empty()) {
            return Err(StructureError::EmptyInput);
        }

        let mut stack = WorkingStack::new(self.hierarchy);

        for (idx, raw) in split_lines(text).enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let line_number = idx + 1;

            match self.hierarchy.match_line(line) {
                Some((level, caps)) => {
                    let node = self.build_node(level, &caps);
                    stack.open(level, node);
                }
                None => stack.route_text(line, line_number)?,
            }
        }

        let tree = stack.finish();
        debug!("pruned {} nodes, depth {}", tree.node_count(), tree.depth());
        Ok(tree)
    }

    /// Materialise a node from the capture groups of its pattern.
    ///
    /// - no groups: the whole match is the title
    /// - one group: group 1 is the title
    /// - more groups: group 1 is the title, the rest (space-joined) is the content
    fn build_node(&self, level: &Level, caps: &Captures<'_>) -> Node {
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());

        let (title, content) = match caps.len() - 1 {
            0 => (group(0), None),
            1 => (group(1), None),
            _ => {
                let content = caps.iter().skip(2).flatten().map(|m| m.as_str()).join(" ");
                (group(1), Some(content))
            }
        };

        let mut node = Node::new(Arc::clone(level.shape()), title);
        if let Some(content) = content {
            self.seed_content(level, &mut node, content);
        }
        node
    }

    /// Place pattern-captured content where free text for this level would go.
    ///
    /// Levels capturing content declare at least one content field, checked
    /// when the hierarchy is built.
    fn seed_content(&self, level: &Level, node: &mut Node, content: String) {
        let shape = level.shape();
        let is_leaf = self.hierarchy.is_leaf(level);

        if shape.paragraph_field.is_some() && (is_leaf || shape.description_field.is_none()) {
            if !content.is_empty() {
                let _ = node.push_paragraph(Paragraph::Text(content));
            }
        } else {
            node.append_description(&content);
        }
    }
}

/// Lines ending in `\n`, `\r\n` or a lone `\r`.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_terminator('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .flat_map(|line| line.split('\r'))
}

/// Where a node is stored in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Sections,
    Paragraphs,
}

#[derive(Debug)]
struct OpenNode<'h> {
    level: &'h Level,
    slot: Slot,
    node: Node,
}

/// Open path from the root to the most recently opened node.
///
/// Ranks strictly increase from bottom to top. A node is moved into its
/// parent's list when it is closed, so children never alias their parents.
#[derive(Debug)]
struct WorkingStack<'h> {
    hierarchy: &'h LevelHierarchy,
    root: Tree,
    open: Vec<OpenNode<'h>>,
}

impl<'h> WorkingStack<'h> {
    fn new(hierarchy: &'h LevelHierarchy) -> Self {
        Self {
            hierarchy,
            root: Tree::new(hierarchy.root().sections_field.clone()),
            open: Vec::new(),
        }
    }

    fn open(&mut self, level: &'h Level, node: Node) {
        while self
            .open
            .last()
            .is_some_and(|top| top.level.rank() >= level.rank())
        {
            self.close_top();
        }

        let slot = match self.open.last() {
            Some(top)
                if self.hierarchy.is_leaf(level)
                    && top.level.shape().paragraph_field.is_some() =>
            {
                Slot::Paragraphs
            }
            _ => Slot::Sections,
        };

        debug!(
            "open {} '{}' (rank {}) as {:?} of {}",
            level.name(),
            node.title(),
            level.rank(),
            slot,
            self.open.last().map_or("root", |top| top.level.name())
        );
        self.open.push(OpenNode { level, slot, node });
    }

    fn close_top(&mut self) {
        let Some(closed) = self.open.pop() else {
            return;
        };
        match self.open.last_mut() {
            Some(parent) => match closed.slot {
                Slot::Paragraphs => {
                    if let Err(Paragraph::Node(node)) =
                        parent.node.push_paragraph(Paragraph::Node(closed.node))
                    {
                        parent.node.push_section(node);
                    }
                }
                Slot::Sections => parent.node.push_section(closed.node),
            },
            None => self.root.push_section(closed.node),
        }
    }

    /// Attach a non-matching line to the deepest open node, or the root.
    fn route_text(&mut self, line: &str, line_number: usize) -> Result<(), StructureError> {
        let Some(top) = self.open.last_mut() else {
            trace!("line {line_number}: root description");
            self.root.append_description(line);
            return Ok(());
        };

        if self.hierarchy.is_leaf(top.level)
            && top
                .node
                .push_paragraph(Paragraph::Text(line.to_string()))
                .is_ok()
        {
            trace!("line {line_number}: paragraph of {}", top.level.name());
            return Ok(());
        }
        if top.node.append_description(line) {
            trace!("line {line_number}: description of {}", top.level.name());
            return Ok(());
        }

        Err(StructureError::UnroutableText {
            line: line_number,
            level: top.level.name().to_string(),
        })
    }

    fn finish(mut self) -> Tree {
        while !self.open.is_empty() {
            self.close_top();
        }
        self.root
    }
}
