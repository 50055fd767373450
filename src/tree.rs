//! Node tree built from one scan.
//!
//! The tree mirrors the iterator's levels rather than the markup's real
//! nesting: before each tag the open-ancestor stack is cut back to the tag's
//! level, so elements outside the level-accounting set never hold children
//! across a following tag's level. Close tags create no nodes.

use std::fmt;

use serde::Serialize;

use crate::attributes::{parse_attributes, Attributes};
use crate::patterns::WHITESPACE_NORMALIZE;
use crate::scanner::{Item, TagIter, TagKind};
use crate::Options;

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    /// Unique entry point of a tree.
    Root,
    /// An element with its parsed attributes.
    Element { name: String, attributes: Attributes },
    /// Raw text between tags.
    Text { content: String },
}

/// One node of the tree. A parent owns its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
    /// Position in document order; `None` for the root.
    pub index: Option<usize>,
}

/// Criteria for `Node::matches`.
///
/// Names compare case-insensitively. An attribute with `None` only has to be
/// present; with `Some(v)` its value must equal `v`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeQuery {
    pub names: Vec<String>,
    pub attributes: Vec<(String, Option<String>)>,
}

impl NodeQuery {
    /// Match any element.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Match elements named `name`.
    #[must_use]
    pub fn name(name: &str) -> Self {
        Self {
            names: vec![name.to_string()],
            ..Self::default()
        }
    }

    /// Also accept elements named `name`.
    #[must_use]
    pub fn or_name(mut self, name: &str) -> Self {
        self.names.push(name.to_string());
        self
    }

    /// Require attribute `name`, with `value` when given.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: Option<&str>) -> Self {
        self.attributes.push((name.to_string(), value.map(str::to_string)));
        self
    }
}

impl Node {
    #[must_use]
    pub fn root() -> Self {
        Self { kind: NodeKind::Root, children: Vec::new(), index: None }
    }

    #[must_use]
    pub fn element(name: &str, attributes: Attributes, index: usize) -> Self {
        Self {
            kind: NodeKind::Element { name: name.to_string(), attributes },
            children: Vec::new(),
            index: Some(index),
        }
    }

    #[must_use]
    pub fn text_node(content: &str, index: usize) -> Self {
        Self {
            kind: NodeKind::Text { content: content.to_string() },
            children: Vec::new(),
            index: Some(index),
        }
    }

    /// Element name, if this is an element.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn attributes(&self) -> Option<&Attributes> {
        match &self.kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    /// Text content, if this is a text node.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { content } => Some(content),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { .. })
    }

    #[must_use]
    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    /// Whether this node is an element satisfying `query`.
    #[must_use]
    pub fn matches(&self, query: &NodeQuery) -> bool {
        let NodeKind::Element { name, attributes } = &self.kind else {
            return false;
        };
        if !query.names.is_empty() && !query.names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            return false;
        }
        query.attributes.iter().all(|(attr, expected)| match (attributes.get(attr), expected) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == Some(expected.as_str()),
        })
    }

    /// Direct children matching `query`.
    pub fn filter<'n>(&'n self, query: &'n NodeQuery) -> impl Iterator<Item = &'n Node> + 'n {
        self.children.iter().filter(move |c| c.matches(query))
    }

    /// This node and all its descendants in document order.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// This node or any descendant matching `query`, in document order.
    #[must_use]
    pub fn find_all(&self, query: &NodeQuery) -> Vec<&Node> {
        self.descendants().filter(|n| n.matches(query)).collect()
    }

    /// First node matching `query` in document order.
    #[must_use]
    pub fn find(&self, query: &NodeQuery) -> Option<&Node> {
        self.descendants().find(|n| n.matches(query))
    }

    /// Concatenated text of all descendant text nodes.
    #[must_use]
    pub fn text(&self) -> String {
        self.descendants().filter_map(Node::content).collect()
    }

    /// Approximate markup for this node.
    ///
    /// Text has whitespace runs collapsed; childless elements are written as
    /// `<name attrs/>`. Not a faithful reproduction of the source.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text { content } => out.push_str(&WHITESPACE_NORMALIZE.replace_all(content, " ")),
            NodeKind::Root => self.children.iter().for_each(|c| c.write_html(out)),
            NodeKind::Element { name, attributes } => {
                out.push('<');
                out.push_str(name);
                if !attributes.is_empty() {
                    out.push(' ');
                    out.push_str(&attributes.to_html());
                }
                if self.children.is_empty() {
                    out.push_str("/>");
                } else {
                    out.push('>');
                    self.children.iter().for_each(|c| c.write_html(out));
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
            }
        }
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let index = self.index.map(|i| i.to_string()).unwrap_or_default();
        write!(f, "{index:<4}{}", "| ".repeat(depth))?;
        match &self.kind {
            NodeKind::Root => writeln!(f, "#root")?,
            NodeKind::Text { content } => writeln!(f, "#text:{content:?}")?,
            NodeKind::Element { name, attributes } if attributes.is_empty() => writeln!(f, "{name}")?,
            NodeKind::Element { name, attributes } => writeln!(f, "{name}: {attributes}")?,
        }
        self.children.iter().try_for_each(|c| c.write_outline(f, depth + 1))
    }
}

/// Outline dump: one line per node with its index and depth bars.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f, 0)
    }
}

/// Pre-order traversal returned by `Node::descendants`.
pub struct Descendants<'n> {
    stack: Vec<&'n Node>,
}

impl<'n> Iterator for Descendants<'n> {
    type Item = &'n Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

fn attach_top(stack: &mut Vec<Node>) {
    if stack.len() > 1 {
        if let Some(node) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.children.push(node);
            }
        }
    }
}

/// Build the node tree for `html`.
///
/// # Example
///
/// ```rust
/// use rs_tagscrape::{build_tree, NodeQuery, Options};
///
/// let root = build_tree("<div id=a>x<div id=b>y</div></div>", &Options::default());
/// let inner = root.find(&NodeQuery::name("div").with_attr("id", Some("b"))).unwrap();
/// assert_eq!(inner.text(), "y");
/// assert_eq!(root.text(), "xy");
/// ```
#[must_use]
pub fn build_tree(html: &str, options: &Options) -> Node {
    // stack[0] is the root; stack.len() - 1 mirrors the iterator level.
    let mut stack = vec![Node::root()];
    let mut counter = 0;

    for item in TagIter::new(html, options) {
        match item {
            Item::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    top.children.push(Node::text_node(text, counter));
                }
                counter += 1;
            }
            Item::Tag(tag) => {
                while stack.len() > tag.level + 1 {
                    attach_top(&mut stack);
                }
                if tag.kind == TagKind::Close {
                    continue;
                }
                let attributes = parse_attributes(tag.attributes_text(html));
                let node = Node::element(tag.name, attributes, counter);
                counter += 1;
                if tag.kind == TagKind::Open {
                    stack.push(node);
                } else if let Some(top) = stack.last_mut() {
                    top.children.push(node);
                }
            }
        }
    }

    while stack.len() > 1 {
        attach_top(&mut stack);
    }
    stack.pop().unwrap_or_else(Node::root)
}
