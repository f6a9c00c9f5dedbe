//! The editor-surface boundary.

use crate::document::{ContentNode, serialize_document};

/// An editable surface that owns the live content tree.
pub trait EditorSurface {
    /// The current tree.
    fn tree(&self) -> &ContentNode;

    /// Mutable access for user edits.
    fn tree_mut(&mut self) -> &mut ContentNode;

    /// Replace the whole tree.
    ///
    /// Returns true when the surface fires an update notification for the
    /// replacement, as contenteditable-style surfaces do.
    fn replace_tree(&mut self, tree: ContentNode) -> bool;

    /// The surface's own Markdown serialization of its tree.
    fn markdown(&self) -> String {
        serialize_document(self.tree())
    }
}

/// In-memory editor surface.
#[derive(Debug, Clone)]
pub struct TreeEditor {
    tree: ContentNode,
    echo_replacements: bool,
    replacements: usize,
}

impl Default for TreeEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeEditor {
    /// An empty surface that does not echo replacements.
    pub const fn new() -> Self {
        Self {
            tree: ContentNode::empty_root(),
            echo_replacements: false,
            replacements: 0,
        }
    }

    /// Fire an update notification after every programmatic replacement.
    #[must_use]
    pub const fn with_echo(mut self, echo: bool) -> Self {
        self.echo_replacements = echo;
        self
    }

    /// How many times the tree has been replaced.
    pub const fn replacements(&self) -> usize {
        self.replacements
    }
}

impl EditorSurface for TreeEditor {
    fn tree(&self) -> &ContentNode {
        &self.tree
    }

    fn tree_mut(&mut self) -> &mut ContentNode {
        &mut self.tree
    }

    fn replace_tree(&mut self, tree: ContentNode) -> bool {
        self.tree = tree;
        self.replacements += 1;
        self.echo_replacements
    }
}
