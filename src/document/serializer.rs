//! Content tree → Markdown serialization.
//!
//! Every node is serialized bottom-up: children first, concatenated in
//! order, then the node's own markup is wrapped around them. Block kinds
//! end in a blank line so fragments compose by plain concatenation.

use super::types::{ContentNode, Element, NodeKind};

/// Where a node sits relative to its parent.
#[derive(Debug, Clone, Copy)]
struct Position<'a> {
    parent: Option<&'a Element>,
    /// Zero-based index among the parent's element children.
    element_index: usize,
}

impl Position<'_> {
    const TOP: Self = Self {
        parent: None,
        element_index: 0,
    };

    fn parent_kind(&self) -> Option<&NodeKind> {
        self.parent.map(|parent| &parent.kind)
    }
}

/// Serialize a single node to a Markdown fragment.
///
/// Total over every tree: kinds without a Markdown form degrade to their
/// serialized children.
pub fn serialize(node: &ContentNode) -> String {
    serialize_at(node, Position::TOP)
}

/// Serialize an editor root to canonical Markdown.
///
/// Top-level fragments are concatenated and the result is trimmed.
///
/// # Example
///
/// ```
/// use marksync::document::{serialize_document, ContentNode, Element, NodeKind};
///
/// let root = ContentNode::root([
///     ContentNode::from(Element::new(NodeKind::Heading(1)).with_child("Title")),
///     ContentNode::from(Element::new(NodeKind::Paragraph).with_child("Body text")),
/// ]);
/// assert_eq!(serialize_document(&root), "# Title\n\nBody text");
/// ```
pub fn serialize_document(root: &ContentNode) -> String {
    serialize(root).trim().to_string()
}

fn serialize_at(node: &ContentNode, position: Position<'_>) -> String {
    match node {
        ContentNode::Text(text) => text.clone(),
        ContentNode::Element(element) => serialize_element(element, position),
    }
}

fn serialize_children(element: &Element) -> String {
    let mut out = String::new();
    let mut element_index = 0;
    for child in &element.children {
        let position = Position {
            parent: Some(element),
            element_index,
        };
        out.push_str(&serialize_at(child, position));
        if matches!(child, ContentNode::Element(_)) {
            element_index += 1;
        }
    }
    out
}

fn serialize_element(element: &Element, position: Position<'_>) -> String {
    let children = || serialize_children(element);
    match &element.kind {
        NodeKind::Heading(level) => {
            let level = (*level).clamp(1, 6) as usize;
            format!("{} {}\n\n", "#".repeat(level), children())
        }
        NodeKind::Paragraph => format!("{}\n\n", children()),
        NodeKind::Strong => format!("**{}**", children()),
        NodeKind::Emphasis => format!("*{}*", children()),
        NodeKind::InlineCode => {
            if position.parent_kind() == Some(&NodeKind::CodeBlock) {
                children()
            } else {
                format!("`{}`", children())
            }
        }
        NodeKind::CodeBlock => serialize_code_block(element),
        NodeKind::UnorderedList | NodeKind::OrderedList => format!("{}\n", children()),
        NodeKind::ListItem => {
            if position.parent_kind() == Some(&NodeKind::OrderedList) {
                format!("{}. {}\n", position.element_index + 1, children())
            } else {
                format!("- {}\n", children())
            }
        }
        NodeKind::Blockquote => {
            let quoted = children()
                .split('\n')
                .map(|line| format!("> {line}"))
                .collect::<Vec<_>>()
                .join("\n");
            format!("{quoted}\n\n")
        }
        NodeKind::Link => {
            let href = element.attr("href").unwrap_or_default();
            format!("[{}]({href})", children())
        }
        NodeKind::Image => {
            let alt = element.attr("alt").unwrap_or_default();
            let src = element.attr("src").unwrap_or_default();
            format!("![{alt}]({src})")
        }
        NodeKind::HorizontalRule => "---\n\n".to_string(),
        NodeKind::LineBreak => "\n".to_string(),
        // Table structure is not reconstructed.
        NodeKind::Table(_) | NodeKind::Root => children(),
        NodeKind::Unknown(tag) => {
            tracing::debug!(tag = %tag, "no markdown form for element; keeping children only");
            children()
        }
    }
}

fn serialize_code_block(element: &Element) -> String {
    let code = element
        .element_children()
        .find(|child| child.kind == NodeKind::InlineCode);
    match code {
        Some(code) => {
            let language = code
                .attr("class")
                .and_then(language_from_class)
                .or_else(|| element.attr("class").and_then(language_from_class))
                .unwrap_or_default();
            let raw: String = code
                .children
                .iter()
                .map(ContentNode::text_content)
                .collect();
            format!("```{language}\n{raw}\n```\n\n")
        }
        None => {
            let language = element
                .attr("class")
                .and_then(language_from_class)
                .unwrap_or_default();
            let children = serialize_children(element);
            format!("```{language}\n{children}\n```\n\n")
        }
    }
}

/// Find the `language-<id>` token in a class attribute.
pub fn language_from_class(class: &str) -> Option<&str> {
    class
        .split_whitespace()
        .find_map(|token| token.strip_prefix("language-"))
        .filter(|language| !language.is_empty())
}
