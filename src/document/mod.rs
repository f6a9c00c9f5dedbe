//! The document model.
//!
//! This module handles:
//! - The content tree an editor surface displays ([`ContentNode`])
//! - Rendering Markdown into a content tree with comrak
//! - Serializing a content tree back to canonical Markdown
//! - The canonical document state ([`DocumentState`])

mod renderer;
mod serializer;
mod state;
mod types;

pub use renderer::{ComrakRenderer, MarkdownRenderer, RenderError, render_markdown};
pub use serializer::{language_from_class, serialize, serialize_document};
pub use state::{DEFAULT_FILE_NAME, DocumentState, WELCOME_DOCUMENT};
pub use types::{ContentNode, Element, NodeKind, TablePart};

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(markdown: &str) -> String {
        serialize_document(&render_markdown(markdown))
    }

    fn assert_fixed_point(markdown: &str) {
        let once = round_trip(markdown);
        let twice = round_trip(&once);
        assert_eq!(once, twice, "not a fixed point for input {markdown:?}");
    }

    #[test]
    fn test_round_trip_heading_and_paragraph() {
        assert_eq!(round_trip("# Title\n\nBody text"), "# Title\n\nBody text");
        assert_fixed_point("# Title\n\nBody text");
    }

    #[test]
    fn test_round_trip_normalizes_emphasis_markers() {
        assert_eq!(round_trip("_a_ and __b__"), "*a* and **b**");
    }

    #[test]
    fn test_round_trip_code_fence_language() {
        let md = "```javascript\nconst hello = \"world\";\n```";
        assert_eq!(round_trip(md), md);
    }

    #[test]
    fn test_round_trip_lists() {
        assert_eq!(round_trip("- one\n- two"), "- one\n- two");
        assert_eq!(round_trip("1. one\n2. two\n3. three"), "1. one\n2. two\n3. three");
        assert_eq!(
            round_trip("Intro\n\n- a\n- b\n\nOutro"),
            "Intro\n\n- a\n- b\n\nOutro"
        );
    }

    #[test]
    fn test_round_trip_renumbers_ordered_list() {
        assert_eq!(round_trip("3. three\n4. four"), "1. three\n2. four");
    }

    #[test]
    fn test_round_trip_link_and_image() {
        let md = "See [docs](https://example.com) and ![logo](logo.png)";
        assert_eq!(round_trip(md), md);
    }

    #[test]
    fn test_round_trip_rule() {
        assert_eq!(round_trip("above\n\n***\n\nbelow"), "above\n\n---\n\nbelow");
    }

    #[test]
    fn test_html_block_keeps_following_block_separate() {
        assert_eq!(round_trip("<div>x</div>\n\nPara"), "<div>x</div>\n\nPara");
        assert_fixed_point("<div>x</div>\n\nPara");
    }

    #[test]
    fn test_html_comment_does_not_swallow_next_paragraph() {
        assert_eq!(round_trip("<!-- c -->\n\nText"), "<!-- c -->\n\nText");
        let blocks = match render_markdown(&round_trip("<!-- c -->\n\nText")) {
            ContentNode::Element(root) => root.children,
            ContentNode::Text(_) => Vec::new(),
        };
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].text_content(), "Text");
    }

    #[test]
    fn test_blockquote_reaches_fixed_point() {
        assert_fixed_point("> quoted text");
    }

    #[test]
    fn test_welcome_document_reaches_fixed_point() {
        assert_fixed_point(WELCOME_DOCUMENT);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_block() -> impl Strategy<Value = String> {
            let words = prop::collection::vec("[a-z]{1,8}", 1..6).prop_map(|w| w.join(" "));
            prop_oneof![
                (1..=6usize, words.clone())
                    .prop_map(|(level, text)| format!("{} {text}", "#".repeat(level))),
                words.clone(),
                words.clone().prop_map(|text| format!("**{text}**")),
                words.clone().prop_map(|text| format!("*{text}*")),
                prop::collection::vec(words.clone(), 1..4).prop_map(|items| {
                    items
                        .iter()
                        .map(|item| format!("- {item}"))
                        .collect::<Vec<_>>()
                        .join("\n")
                }),
                prop::collection::vec(words.clone(), 1..4).prop_map(|items| {
                    items
                        .iter()
                        .enumerate()
                        .map(|(idx, item)| format!("{}. {item}", idx + 1))
                        .collect::<Vec<_>>()
                        .join("\n")
                }),
                words.prop_map(|text| format!("```rust\n{text}\n```")),
            ]
        }

        proptest! {
            #[test]
            fn serialization_reaches_fixed_point(
                blocks in prop::collection::vec(arb_block(), 0..6),
            ) {
                let markdown = blocks.join("\n\n");
                let once = round_trip(&markdown);
                let twice = round_trip(&once);
                prop_assert_eq!(once, twice);
            }
        }
    }
}
