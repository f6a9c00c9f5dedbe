//! Content tree types.
//!
//! A content tree is what an editor surface displays: text leaves and
//! elements with a closed set of kinds. Elements carry their parameters
//! (link targets, image sources, code languages) as attributes, the same
//! way an HTML DOM does, so trees produced by any renderer can be read back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A node in the content tree.
///
/// In JSON a text leaf is a plain string and an element is an object with
/// `tag`, `attrs` and `children` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentNode {
    /// Raw text, serialized verbatim.
    Text(String),
    /// A structural or inline element.
    Element(Element),
}

/// An element node: kind, attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "tag")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContentNode>,
}

/// Parts of a table. None of them are reconstructed on write-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TablePart {
    Table,
    Head,
    Body,
    Row,
    HeaderCell,
    Cell,
}

/// The closed set of element kinds the serializer understands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    /// Editor root; its children are the top-level blocks.
    Root,
    /// Heading with level 1-6.
    Heading(u8),
    Paragraph,
    Strong,
    Emphasis,
    InlineCode,
    CodeBlock,
    UnorderedList,
    OrderedList,
    ListItem,
    Blockquote,
    /// Link; target in the `href` attribute.
    Link,
    /// Image; `src` and `alt` attributes.
    Image,
    HorizontalRule,
    LineBreak,
    Table(TablePart),
    /// Anything else, keyed by its original tag name.
    Unknown(String),
}

impl NodeKind {
    /// Map an HTML-like tag name to a kind. Matching is ASCII case-insensitive.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "root" => Self::Root,
            "h1" => Self::Heading(1),
            "h2" => Self::Heading(2),
            "h3" => Self::Heading(3),
            "h4" => Self::Heading(4),
            "h5" => Self::Heading(5),
            "h6" => Self::Heading(6),
            "p" => Self::Paragraph,
            "strong" | "b" => Self::Strong,
            "em" | "i" => Self::Emphasis,
            "code" => Self::InlineCode,
            "pre" => Self::CodeBlock,
            "ul" => Self::UnorderedList,
            "ol" => Self::OrderedList,
            "li" => Self::ListItem,
            "blockquote" => Self::Blockquote,
            "a" => Self::Link,
            "img" => Self::Image,
            "hr" => Self::HorizontalRule,
            "br" => Self::LineBreak,
            "table" => Self::Table(TablePart::Table),
            "thead" => Self::Table(TablePart::Head),
            "tbody" => Self::Table(TablePart::Body),
            "tr" => Self::Table(TablePart::Row),
            "th" => Self::Table(TablePart::HeaderCell),
            "td" => Self::Table(TablePart::Cell),
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The canonical tag name for this kind.
    pub fn tag(&self) -> &str {
        match self {
            Self::Root => "root",
            Self::Heading(level) => match level {
                1 => "h1",
                2 => "h2",
                3 => "h3",
                4 => "h4",
                5 => "h5",
                _ => "h6",
            },
            Self::Paragraph => "p",
            Self::Strong => "strong",
            Self::Emphasis => "em",
            Self::InlineCode => "code",
            Self::CodeBlock => "pre",
            Self::UnorderedList => "ul",
            Self::OrderedList => "ol",
            Self::ListItem => "li",
            Self::Blockquote => "blockquote",
            Self::Link => "a",
            Self::Image => "img",
            Self::HorizontalRule => "hr",
            Self::LineBreak => "br",
            Self::Table(part) => match part {
                TablePart::Table => "table",
                TablePart::Head => "thead",
                TablePart::Body => "tbody",
                TablePart::Row => "tr",
                TablePart::HeaderCell => "th",
                TablePart::Cell => "td",
            },
            Self::Unknown(tag) => tag,
        }
    }

}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.tag().to_string()
    }
}

impl Element {
    /// Create an element with no attributes or children.
    pub const fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder: set an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Builder: append a child.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<ContentNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Builder: append several children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = ContentNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Attribute value, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Iterate over element children, skipping text leaves.
    pub fn element_children(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(ContentNode::as_element)
    }
}

impl ContentNode {
    /// An empty editor root.
    pub const fn empty_root() -> Self {
        Self::Element(Element::new(NodeKind::Root))
    }

    /// An editor root holding the given top-level blocks.
    pub fn root(children: impl IntoIterator<Item = Self>) -> Self {
        Self::Element(Element::new(NodeKind::Root).with_children(children))
    }

    /// A text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    pub const fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// Concatenated text of every leaf below this node, like DOM `textContent`.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Text(_) => 1,
            Self::Element(element) => {
                1 + element
                    .children
                    .iter()
                    .map(Self::node_count)
                    .sum::<usize>()
            }
        }
    }
}

impl From<Element> for ContentNode {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for ContentNode {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ContentNode {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

fn collect_text(node: &ContentNode, out: &mut String) {
    match node {
        ContentNode::Text(text) => out.push_str(text),
        ContentNode::Element(element) => {
            for child in &element.children {
                collect_text(child, out);
            }
        }
    }
}
