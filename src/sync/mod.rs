//! Two-way synchronization between the editor tree and document state.
//!
//! - [`DocumentSync::render`] pushes Markdown into the editor surface
//! - [`DocumentSync::extract`] pulls Markdown out of an edited tree
//! - [`ConversionGuard`] keeps the two from feeding each other

mod editor;
mod guard;

pub use editor::{EditorSurface, TreeEditor};
pub use guard::{ConversionGuard, GuardScope};

use crate::document::{
    ComrakRenderer, ContentNode, DocumentState, MarkdownRenderer, RenderError, serialize_document,
};

/// What happened to an update notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// The tree was serialized into the document state.
    Applied,
    /// The guard was active; state was left alone.
    Suppressed,
}

/// What a canonical-content change did to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// The editor already serializes to the same text; nothing was rendered.
    Unchanged,
    /// The editor tree was replaced.
    Rendered,
}

/// Owns the editor surface, the renderer and the conversion guard.
///
/// Document state is passed in by the caller on every call.
#[derive(Debug)]
pub struct DocumentSync<R = ComrakRenderer, E = TreeEditor> {
    renderer: R,
    editor: E,
    guard: ConversionGuard,
}

impl Default for DocumentSync {
    fn default() -> Self {
        Self::new(ComrakRenderer::new(), TreeEditor::new())
    }
}

impl<R: MarkdownRenderer, E: EditorSurface> DocumentSync<R, E> {
    pub const fn new(renderer: R, editor: E) -> Self {
        Self {
            renderer,
            editor,
            guard: ConversionGuard::new(),
        }
    }

    pub const fn editor(&self) -> &E {
        &self.editor
    }

    pub const fn guard(&self) -> &ConversionGuard {
        &self.guard
    }

    /// Replace the editor tree with the rendering of `markdown`.
    ///
    /// Runs inside the conversion guard. A notification the surface fires
    /// for the replacement is routed to extraction and suppressed there.
    ///
    /// # Errors
    /// Returns the renderer's error; the editor tree and `state` are left
    /// untouched in that case.
    pub fn render(&mut self, markdown: &str, state: &mut DocumentState) -> Result<(), RenderError> {
        let _perf = crate::perf::scope("sync.render");
        let _scope = self.guard.enter();
        let tree = self.renderer.render(markdown).inspect_err(|err| {
            tracing::warn!(error = %err, "render failed; keeping previous tree");
        })?;
        tracing::debug!(nodes = tree.node_count(), "replacing editor tree");
        if self.editor.replace_tree(tree) {
            let outcome = self.handle_update(state);
            debug_assert_eq!(outcome, ExtractOutcome::Suppressed);
        }
        Ok(())
    }

    /// Serialize `tree` into `state` unless a render is in progress.
    pub fn extract(&self, tree: &ContentNode, state: &mut DocumentState) -> ExtractOutcome {
        if self.guard.is_active() {
            tracing::debug!("update notification during render; ignoring");
            return ExtractOutcome::Suppressed;
        }
        let _perf = crate::perf::scope("sync.extract");
        state.set_content(serialize_document(tree));
        ExtractOutcome::Applied
    }

    /// Entry point for the surface's update notification.
    pub fn handle_update(&self, state: &mut DocumentState) -> ExtractOutcome {
        self.extract(self.editor.tree(), state)
    }

    /// Apply a user edit to the tree and deliver its update notification.
    pub fn apply_edit<F>(&mut self, state: &mut DocumentState, edit: F) -> ExtractOutcome
    where
        F: FnOnce(&mut ContentNode),
    {
        edit(self.editor.tree_mut());
        self.handle_update(state)
    }

    /// Bring the editor in line with externally changed canonical content.
    ///
    /// Skips the render when the editor already serializes to `canonical`,
    /// which keeps the surface's selection intact.
    ///
    /// # Errors
    /// Returns the renderer's error when a render was needed and failed.
    pub fn reconcile(
        &mut self,
        canonical: &str,
        state: &mut DocumentState,
    ) -> Result<Reconcile, RenderError> {
        if self.editor.markdown() == canonical {
            return Ok(Reconcile::Unchanged);
        }
        self.render(canonical, state)?;
        Ok(Reconcile::Rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Element, NodeKind};

    struct FailingRenderer;

    impl MarkdownRenderer for FailingRenderer {
        fn render(&self, _markdown: &str) -> Result<ContentNode, RenderError> {
            Err(RenderError::Rejected("unparseable".to_string()))
        }
    }

    fn echoing_sync() -> DocumentSync {
        DocumentSync::new(ComrakRenderer::new(), TreeEditor::new().with_echo(true))
    }

    #[test]
    fn test_render_replaces_tree_without_touching_state() {
        let mut sync = DocumentSync::default();
        let mut state = DocumentState::loaded("# Title", None);
        sync.render("# Title", &mut state).unwrap();

        assert_eq!(sync.editor().markdown(), "# Title");
        assert_eq!(state.content(), "# Title");
        assert!(!state.is_dirty());
        assert!(!sync.guard().is_active());
    }

    #[test]
    fn test_echoed_notification_during_render_is_suppressed() {
        let mut sync = echoing_sync();
        let mut state = DocumentState::loaded("# Loaded\n\ntext\n", None);
        sync.render(state.content().to_string().as_str(), &mut state)
            .unwrap();

        assert_eq!(state.content(), "# Loaded\n\ntext\n");
        assert!(!state.is_dirty(), "a load must stay clean");
        assert_eq!(sync.editor().replacements(), 1);
    }

    #[test]
    fn test_notification_while_guard_held_leaves_state() {
        let mut sync = DocumentSync::default();
        let mut state = DocumentState::loaded("original", None);
        sync.render("# Replaced", &mut state).unwrap();

        let scope = sync.guard().enter();
        assert_eq!(sync.handle_update(&mut state), ExtractOutcome::Suppressed);
        drop(scope);

        assert_eq!(state.content(), "original");
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_extract_applies_and_marks_dirty() {
        let sync = DocumentSync::default();
        let mut state = DocumentState::new();
        let tree = ContentNode::root([ContentNode::from(
            Element::new(NodeKind::Paragraph).with_child("typed"),
        )]);

        assert_eq!(sync.extract(&tree, &mut state), ExtractOutcome::Applied);
        assert_eq!(state.content(), "typed");
        assert!(state.is_dirty());
    }

    #[test]
    fn test_apply_edit_serializes_edited_tree() {
        let mut sync = DocumentSync::default();
        let mut state = DocumentState::loaded("# Title", None);
        sync.render("# Title", &mut state).unwrap();

        let outcome = sync.apply_edit(&mut state, |tree| {
            if let Some(root) = tree.as_element_mut() {
                root.children.push(
                    Element::new(NodeKind::Paragraph)
                        .with_child("New paragraph")
                        .into(),
                );
            }
        });

        assert_eq!(outcome, ExtractOutcome::Applied);
        assert_eq!(state.content(), "# Title\n\nNew paragraph");
        assert!(state.is_dirty());
    }

    #[test]
    fn test_render_failure_keeps_tree_and_state() {
        let mut sync = DocumentSync::new(FailingRenderer, TreeEditor::new());
        let mut state = DocumentState::loaded("keep me", None);

        let err = sync.render("anything", &mut state).unwrap_err();
        assert_eq!(err, RenderError::Rejected("unparseable".to_string()));
        assert_eq!(sync.editor().tree(), &ContentNode::empty_root());
        assert_eq!(state.content(), "keep me");
        assert!(!state.is_dirty());
        assert!(!sync.guard().is_active(), "guard must be released on failure");
    }

    #[test]
    fn test_reconcile_skips_equal_content() {
        let mut sync = DocumentSync::default();
        let mut state = DocumentState::loaded("# Title\n\nBody", None);
        assert_eq!(
            sync.reconcile("# Title\n\nBody", &mut state).unwrap(),
            Reconcile::Rendered
        );
        assert_eq!(
            sync.reconcile("# Title\n\nBody", &mut state).unwrap(),
            Reconcile::Unchanged
        );
        assert_eq!(sync.editor().replacements(), 1);
    }

    #[test]
    fn test_reconcile_renders_changed_content() {
        let mut sync = DocumentSync::default();
        let mut state = DocumentState::new();
        sync.reconcile("first", &mut state).unwrap();
        assert_eq!(
            sync.reconcile("second", &mut state).unwrap(),
            Reconcile::Rendered
        );
        assert_eq!(sync.editor().markdown(), "second");
    }

    #[test]
    fn test_user_edit_after_echoing_render_is_applied() {
        let mut sync = echoing_sync();
        let mut state = DocumentState::loaded("- a\n- b", None);
        sync.render("- a\n- b", &mut state).unwrap();
        assert!(!state.is_dirty());

        assert_eq!(sync.handle_update(&mut state), ExtractOutcome::Applied);
        assert_eq!(state.content(), "- a\n- b");
        assert!(state.is_dirty());
    }
}
