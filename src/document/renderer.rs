//! Markdown → content tree rendering with comrak.
//!
//! The tree mirrors what an HTML renderer hands to an editable surface:
//! paragraphs inside tight list items are unwrapped, code blocks become a
//! `pre` holding a `code` child whose class carries `language-<id>`, and
//! links and images keep their targets as attributes.

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{Arena, Options, parse_document};
use thiserror::Error;

use super::types::{ContentNode, Element, NodeKind, TablePart};

/// Why a renderer could not produce a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("document is {len} bytes, above the {limit} byte render limit")]
    TooLarge { len: usize, limit: usize },
    #[error("renderer rejected input: {0}")]
    Rejected(String),
}

/// Turns Markdown text into a content tree.
pub trait MarkdownRenderer {
    /// Render `markdown` into an editor root.
    ///
    /// # Errors
    /// Returns a [`RenderError`] when the text cannot be rendered.
    fn render(&self, markdown: &str) -> Result<ContentNode, RenderError>;
}

/// comrak-backed renderer with GFM tables and autolinks.
#[derive(Debug, Clone, Default)]
pub struct ComrakRenderer {
    max_input_bytes: Option<usize>,
}

impl ComrakRenderer {
    pub const fn new() -> Self {
        Self {
            max_input_bytes: None,
        }
    }

    /// Refuse documents larger than `limit` bytes.
    #[must_use]
    pub const fn with_max_input_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_input_bytes = limit;
        self
    }
}

impl MarkdownRenderer for ComrakRenderer {
    fn render(&self, markdown: &str) -> Result<ContentNode, RenderError> {
        if let Some(limit) = self.max_input_bytes
            && markdown.len() > limit
        {
            return Err(RenderError::TooLarge {
                len: markdown.len(),
                limit,
            });
        }
        let _scope = crate::perf::scope("render.comrak");
        Ok(render_markdown(markdown))
    }
}

/// Render Markdown with the default comrak options.
pub fn render_markdown(markdown: &str) -> ContentNode {
    let arena = Arena::new();
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.autolink = true;

    let root = parse_document(&arena, markdown, &options);
    let mut children = Vec::new();
    for child in root.children() {
        push_node(child, false, &mut children);
    }
    ContentNode::root(children)
}

/// Convert `node` and append the result to `out`.
///
/// `tight` is set for the direct children of an item in a tight list.
fn push_node<'a>(node: &'a AstNode<'a>, tight: bool, out: &mut Vec<ContentNode>) {
    let mut element = match &node.data.borrow().value {
        NodeValue::Text(text) => {
            out.push(ContentNode::text(text.as_str()));
            return;
        }
        NodeValue::SoftBreak => {
            out.push(ContentNode::text("\n"));
            return;
        }
        NodeValue::HtmlInline(html) => {
            out.push(ContentNode::text(html.as_str()));
            return;
        }
        NodeValue::Paragraph if tight => {
            for child in node.children() {
                push_node(child, false, out);
            }
            if node.next_sibling().is_some() {
                out.push(ContentNode::text("\n"));
            }
            return;
        }
        NodeValue::Heading(heading) => Element::new(NodeKind::Heading(heading.level)),
        NodeValue::Paragraph => Element::new(NodeKind::Paragraph),
        NodeValue::Emph => Element::new(NodeKind::Emphasis),
        NodeValue::Strong => Element::new(NodeKind::Strong),
        NodeValue::Code(code) => {
            Element::new(NodeKind::InlineCode).with_child(code.literal.as_str())
        }
        NodeValue::CodeBlock(block) => {
            let literal = block.literal.strip_suffix('\n').unwrap_or(&block.literal);
            let mut code = Element::new(NodeKind::InlineCode).with_child(literal);
            if let Some(language) = block.info.split_whitespace().next() {
                code = code.with_attr("class", format!("language-{language}"));
            }
            Element::new(NodeKind::CodeBlock).with_child(code)
        }
        NodeValue::HtmlBlock(html) => {
            // Unknown kinds carry no block spacing of their own.
            let literal = html.literal.trim_end_matches('\n');
            Element::new(NodeKind::Unknown("div".to_string()))
                .with_child(literal)
                .with_child("\n\n")
        }
        NodeValue::List(list) => {
            let ordered = matches!(list.list_type, ListType::Ordered);
            let kind = if ordered {
                NodeKind::OrderedList
            } else {
                NodeKind::UnorderedList
            };
            let mut element = Element::new(kind);
            if ordered && list.start != 1 {
                element = element.with_attr("start", list.start.to_string());
            }
            for item in node.children() {
                element.children.push(item_element(item, list.tight).into());
            }
            out.push(element.into());
            return;
        }
        NodeValue::Item(list) => {
            out.push(item_element(node, list.tight).into());
            return;
        }
        NodeValue::BlockQuote => Element::new(NodeKind::Blockquote),
        NodeValue::ThematicBreak => Element::new(NodeKind::HorizontalRule),
        NodeValue::LineBreak => Element::new(NodeKind::LineBreak),
        NodeValue::Link(link) => {
            let mut element = Element::new(NodeKind::Link).with_attr("href", link.url.as_str());
            if !link.title.is_empty() {
                element = element.with_attr("title", link.title.as_str());
            }
            element
        }
        NodeValue::Image(image) => {
            let alt = ContentNode::root(collect_children(node)).text_content();
            out.push(
                Element::new(NodeKind::Image)
                    .with_attr("src", image.url.as_str())
                    .with_attr("alt", alt)
                    .into(),
            );
            return;
        }
        NodeValue::Table(_) => {
            out.push(table_element(node).into());
            return;
        }
        NodeValue::TableRow(_) => Element::new(NodeKind::Table(TablePart::Row)),
        NodeValue::TableCell => Element::new(NodeKind::Table(TablePart::Cell)),
        other => {
            tracing::debug!(kind = ?other, "no content kind for markdown node");
            Element::new(NodeKind::Unknown("span".to_string()))
        }
    };

    if element.children.is_empty() {
        element.children = collect_children(node);
    }
    out.push(element.into());
}

fn item_element<'a>(item: &'a AstNode<'a>, tight: bool) -> Element {
    let mut element = Element::new(NodeKind::ListItem);
    for child in item.children() {
        push_node(child, tight, &mut element.children);
    }
    element
}

fn collect_children<'a>(node: &'a AstNode<'a>) -> Vec<ContentNode> {
    let mut children = Vec::new();
    for child in node.children() {
        push_node(child, false, &mut children);
    }
    children
}

/// Split comrak's flat row list into `thead`/`tbody` with `th`/`td` cells.
fn table_element<'a>(node: &'a AstNode<'a>) -> Element {
    let mut head = Element::new(NodeKind::Table(TablePart::Head));
    let mut body = Element::new(NodeKind::Table(TablePart::Body));
    for row in node.children() {
        let is_header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
        let cell_kind = if is_header {
            TablePart::HeaderCell
        } else {
            TablePart::Cell
        };
        let mut row_element = Element::new(NodeKind::Table(TablePart::Row));
        for cell in row.children() {
            row_element.children.push(
                Element::new(NodeKind::Table(cell_kind))
                    .with_children(collect_children(cell))
                    .into(),
            );
        }
        if is_header {
            head.children.push(row_element.into());
        } else {
            body.children.push(row_element.into());
        }
    }

    let mut table = Element::new(NodeKind::Table(TablePart::Table));
    if !head.children.is_empty() {
        table.children.push(head.into());
    }
    if !body.children.is_empty() {
        table.children.push(body.into());
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(markdown: &str) -> Vec<ContentNode> {
        match render_markdown(markdown) {
            ContentNode::Element(root) => {
                assert_eq!(root.kind, NodeKind::Root);
                root.children
            }
            ContentNode::Text(_) => panic!("root must be an element"),
        }
    }

    fn kind_of(node: &ContentNode) -> &NodeKind {
        &node.as_element().expect("element").kind
    }

    #[test]
    fn test_empty_document_has_empty_root() {
        assert!(blocks("").is_empty());
    }

    #[test]
    fn test_heading_and_paragraph() {
        let nodes = blocks("# Title\n\nBody text");
        assert_eq!(nodes.len(), 2);
        assert_eq!(kind_of(&nodes[0]), &NodeKind::Heading(1));
        assert_eq!(nodes[0].text_content(), "Title");
        assert_eq!(kind_of(&nodes[1]), &NodeKind::Paragraph);
        assert_eq!(nodes[1].text_content(), "Body text");
    }

    #[test]
    fn test_fenced_code_keeps_language_as_class() {
        let nodes = blocks("```rust\nfn main() {}\n```");
        let pre = nodes[0].as_element().expect("pre");
        assert_eq!(pre.kind, NodeKind::CodeBlock);
        let code = pre.element_children().next().expect("code child");
        assert_eq!(code.kind, NodeKind::InlineCode);
        assert_eq!(code.attr("class"), Some("language-rust"));
        assert_eq!(nodes[0].text_content(), "fn main() {}");
    }

    #[test]
    fn test_fence_without_info_has_no_class() {
        let nodes = blocks("```\nplain\n```");
        let pre = nodes[0].as_element().expect("pre");
        let code = pre.element_children().next().expect("code child");
        assert_eq!(code.attr("class"), None);
    }

    #[test]
    fn test_tight_list_items_have_no_paragraphs() {
        let nodes = blocks("- one\n- two");
        let list = nodes[0].as_element().expect("list");
        assert_eq!(list.kind, NodeKind::UnorderedList);
        for item in list.element_children() {
            assert_eq!(item.kind, NodeKind::ListItem);
            assert!(item.element_children().next().is_none());
        }
    }

    #[test]
    fn test_loose_list_items_keep_paragraphs() {
        let nodes = blocks("- one\n\n- two");
        let list = nodes[0].as_element().expect("list");
        let item = list.element_children().next().expect("item");
        assert_eq!(
            item.element_children().next().map(|p| &p.kind),
            Some(&NodeKind::Paragraph)
        );
    }

    #[test]
    fn test_ordered_list_records_start() {
        let nodes = blocks("3. three\n4. four");
        let list = nodes[0].as_element().expect("list");
        assert_eq!(list.kind, NodeKind::OrderedList);
        assert_eq!(list.attr("start"), Some("3"));
    }

    #[test]
    fn test_link_and_image_attributes() {
        let nodes = blocks("[site](https://example.com \"Home\") ![A cat](cat.png)");
        let paragraph = nodes[0].as_element().expect("paragraph");
        let mut inline = paragraph.element_children();
        let link = inline.next().expect("link");
        assert_eq!(link.kind, NodeKind::Link);
        assert_eq!(link.attr("href"), Some("https://example.com"));
        assert_eq!(link.attr("title"), Some("Home"));
        let image = inline.next().expect("image");
        assert_eq!(image.kind, NodeKind::Image);
        assert_eq!(image.attr("src"), Some("cat.png"));
        assert_eq!(image.attr("alt"), Some("A cat"));
        assert!(image.children.is_empty());
    }

    #[test]
    fn test_table_builds_head_and_body() {
        let nodes = blocks("| A | B |\n|---|---|\n| 1 | 2 |");
        let table = nodes[0].as_element().expect("table");
        assert_eq!(table.kind, NodeKind::Table(TablePart::Table));
        let parts: Vec<_> = table.element_children().map(|part| part.kind.clone()).collect();
        assert_eq!(
            parts,
            vec![
                NodeKind::Table(TablePart::Head),
                NodeKind::Table(TablePart::Body)
            ]
        );
        assert_eq!(nodes[0].text_content(), "AB12");
    }

    #[test]
    fn test_soft_break_becomes_newline_text() {
        let nodes = blocks("line one\nline two");
        assert_eq!(nodes[0].text_content(), "line one\nline two");
    }

    #[test]
    fn test_render_limit_rejects_large_input() {
        let renderer = ComrakRenderer::new().with_max_input_bytes(Some(4));
        let err = renderer.render("# too long").unwrap_err();
        assert_eq!(err, RenderError::TooLarge { len: 10, limit: 4 });
        assert!(renderer.render("# ok").is_ok());
    }
}
