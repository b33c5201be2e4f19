//! Output records: dynamically shaped nodes and the synthetic root.

use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::domain::level::{LevelDefinition, DEFAULT_SECTIONS_FIELD};

/// Field layout shared by every node of one level.
///
/// Built once per level when the hierarchy is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeShape {
    pub level: String,
    pub title_field: String,
    pub description_field: Option<String>,
    pub sections_field: Option<String>,
    pub paragraph_field: Option<String>,
}

impl NodeShape {
    pub fn from_definition(definition: &LevelDefinition) -> Self {
        Self {
            level: definition.name.clone(),
            title_field: definition.title_field.clone(),
            description_field: definition.description_field.clone(),
            sections_field: definition.sections_field.clone(),
            paragraph_field: definition.paragraph_field.clone(),
        }
    }

    /// Name of the child list, falling back to "sections" when undeclared.
    pub fn sections_field_name(&self) -> &str {
        self.sections_field
            .as_deref()
            .unwrap_or(DEFAULT_SECTIONS_FIELD)
    }
}

/// Entry of a paragraph list: a leaf node or a raw line of text.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum Paragraph {
    Node(Node),
    Text(String),
}

/// One materialised unit of output, e.g. a chapter.
///
/// Only the fields declared by the node's level are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    shape: Arc<NodeShape>,
    title: String,
    description: Option<String>,
    sections: Option<Vec<Node>>,
    paragraphs: Option<Vec<Paragraph>>,
}

impl Node {
    pub fn new(shape: Arc<NodeShape>, title: impl Into<String>) -> Self {
        let description = shape.description_field.as_ref().map(|_| String::new());
        let sections = shape.sections_field.as_ref().map(|_| Vec::new());
        let paragraphs = shape.paragraph_field.as_ref().map(|_| Vec::new());
        Self {
            shape,
            title: title.into(),
            description,
            sections,
            paragraphs,
        }
    }

    pub fn level(&self) -> &str {
        &self.shape.level
    }

    pub fn shape(&self) -> &NodeShape {
        &self.shape
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// `None` when the level declares no description field.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn sections(&self) -> &[Node] {
        self.sections.as_deref().unwrap_or_default()
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        self.paragraphs.as_deref().unwrap_or_default()
    }

    /// Leaf nodes held in the paragraph list, skipping raw text.
    pub fn paragraph_nodes(&self) -> impl Iterator<Item = &Node> {
        self.paragraphs().iter().filter_map(|p| match p {
            Paragraph::Node(node) => Some(node),
            Paragraph::Text(_) => None,
        })
    }

    /// Raw text fragments held in the paragraph list.
    pub fn paragraph_texts(&self) -> impl Iterator<Item = &str> {
        self.paragraphs().iter().filter_map(|p| match p {
            Paragraph::Text(text) => Some(text.as_str()),
            Paragraph::Node(_) => None,
        })
    }

    /// Child nodes in output order: sections first, then paragraph nodes.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.sections().iter().chain(self.paragraph_nodes())
    }

    /// Append to the description with a single separating space.
    ///
    /// Returns `false` if the level declares no description field.
    pub(crate) fn append_description(&mut self, text: &str) -> bool {
        match self.description.as_mut() {
            Some(description) => {
                append_spaced(description, text);
                true
            }
            None => false,
        }
    }

    /// Hands the entry back if the level declares no paragraph field.
    pub(crate) fn push_paragraph(&mut self, paragraph: Paragraph) -> Result<(), Paragraph> {
        match self.paragraphs.as_mut() {
            Some(paragraphs) => {
                paragraphs.push(paragraph);
                Ok(())
            }
            None => Err(paragraph),
        }
    }

    /// Add a child section, creating the default list if the level declares none.
    pub(crate) fn push_section(&mut self, node: Node) {
        self.sections.get_or_insert_with(Vec::new).push(node);
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1
            + usize::from(self.description.is_some())
            + usize::from(self.sections.is_some())
            + usize::from(self.paragraphs.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(&self.shape.title_field, &self.title)?;
        if let (Some(field), Some(description)) = (&self.shape.description_field, &self.description) {
            map.serialize_entry(field, description)?;
        }
        if let Some(sections) = &self.sections {
            map.serialize_entry(self.shape.sections_field_name(), sections)?;
        }
        if let (Some(field), Some(paragraphs)) = (&self.shape.paragraph_field, &self.paragraphs) {
            map.serialize_entry(field, paragraphs)?;
        }
        map.end()
    }
}

/// The synthetic root of a structured document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    title: String,
    description: String,
    sections_field: String,
    sections: Vec<Node>,
}

impl Tree {
    pub fn new(sections_field: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            sections_field: sections_field.into(),
            sections: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn sections_field(&self) -> &str {
        &self.sections_field
    }

    pub fn sections(&self) -> &[Node] {
        &self.sections
    }

    pub(crate) fn append_description(&mut self, text: &str) {
        append_spaced(&mut self.description, text);
    }

    pub(crate) fn push_section(&mut self, node: Node) {
        self.sections.push(node);
    }

    /// Pre-order traversal over all nodes, root excluded.
    pub fn iter(&self) -> NodeIterator<'_> {
        NodeIterator::new(self)
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Number of node levels below the root; 0 for a tree without sections.
    pub fn depth(&self) -> usize {
        self.sections
            .iter()
            .map(calculate_depth)
            .max()
            .unwrap_or(0)
    }

    /// Titles as a printable tree, the root labelled `label`.
    pub fn to_termtree(&self, label: &str) -> termtree::Tree<String> {
        let mut root = termtree::Tree::new(label.to_string());
        for node in &self.sections {
            root.push(node_termtree(node));
        }
        root
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("title", &self.title)?;
        map.serialize_entry("description", &self.description)?;
        map.serialize_entry(&self.sections_field, &self.sections)?;
        map.end()
    }
}

fn append_spaced(target: &mut String, text: &str) {
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

fn calculate_depth(node: &Node) -> usize {
    1 + node.children().map(calculate_depth).max().unwrap_or(0)
}

fn node_termtree(node: &Node) -> termtree::Tree<String> {
    let mut tree = termtree::Tree::new(format!("{} [{}]", node.title(), node.level()));
    for child in node.children() {
        tree.push(node_termtree(child));
    }
    tree
}

/// Pre-order iterator over the nodes of a [`Tree`].
pub struct NodeIterator<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> NodeIterator<'a> {
    fn new(tree: &'a Tree) -> Self {
        Self {
            stack: tree.sections.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for NodeIterator<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        let children: Vec<&'a Node> = node.children().collect();
        self.stack.extend(children.into_iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shape(definition: LevelDefinition) -> Arc<NodeShape> {
        Arc::new(NodeShape::from_definition(&definition))
    }

    #[test]
    fn given_declared_fields_when_serializing_then_only_declared_fields_appear() {
        let node = Node::new(
            shape(LevelDefinition::new("chapter", "CHAPTER", "name").with_description("text")),
            "I",
        );

        let value = serde_json::to_value(&node).unwrap();

        assert_eq!(value, json!({ "name": "I", "text": "" }));
    }

    #[test]
    fn given_undeclared_sections_when_pushing_child_then_default_list_is_created() {
        let mut parent = Node::new(shape(LevelDefinition::new("part", "PART", "title")), "1");
        let child = Node::new(shape(LevelDefinition::new("item", "ITEM", "title")), "a");

        parent.push_section(child);

        let value = serde_json::to_value(&parent).unwrap();
        assert_eq!(value, json!({ "title": "1", "sections": [{ "title": "a" }] }));
    }

    #[test]
    fn given_repeated_appends_when_building_description_then_fragments_are_space_joined() {
        let mut tree = Tree::new("sections");

        tree.append_description("first");
        tree.append_description("second");

        assert_eq!(tree.description(), "first second");
    }

    #[test]
    fn given_mixed_paragraphs_when_serializing_then_text_and_nodes_are_untagged() {
        let mut title = Node::new(
            shape(LevelDefinition::new("title", "TITLE", "title").with_paragraphs("articles")),
            "A",
        );
        let article = Node::new(shape(LevelDefinition::new("article", "ART", "title")), "1");
        title.push_paragraph(Paragraph::Text("intro".into())).unwrap();
        title.push_paragraph(Paragraph::Node(article)).unwrap();

        let value = serde_json::to_value(&title).unwrap();

        assert_eq!(value, json!({ "title": "A", "articles": ["intro", { "title": "1" }] }));
    }
}
