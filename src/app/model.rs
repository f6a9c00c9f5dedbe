use std::path::{Path, PathBuf};

use crate::document::{ComrakRenderer, DocumentState};
use crate::lifecycle::PendingAction;
use crate::sync::{DocumentSync, TreeEditor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Status {
    level: StatusLevel,
    message: String,
}

/// Content waiting on a confirmation before it replaces the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incoming {
    pub content: String,
    pub origin: Option<PathBuf>,
}

/// A destructive action held until the user answers the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub action: PendingAction,
    pub incoming: Option<Incoming>,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
#[derive(Debug)]
pub struct Model {
    pub state: DocumentState,
    pub sync: DocumentSync<ComrakRenderer, TreeEditor>,
    pub pending: Option<PendingConfirmation>,
    pub should_quit: bool,
    status: Option<Status>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(DocumentState::new(), DocumentSync::default())
    }
}

impl Model {
    /// Build a model and render `state` into the editor.
    pub fn new(state: DocumentState, sync: DocumentSync<ComrakRenderer, TreeEditor>) -> Self {
        let mut model = Self {
            state,
            sync,
            pending: None,
            should_quit: false,
            status: None,
        };
        let content = model.state.content().to_string();
        if let Err(err) = model.sync.render(&content, &mut model.state) {
            model.show_status(StatusLevel::Error, format!("Render failed: {err}"));
        }
        model
    }

    /// A model whose renderer rejects input above `limit` bytes.
    pub fn with_render_limit(limit: Option<usize>) -> Self {
        let renderer = ComrakRenderer::new().with_max_input_bytes(limit);
        Self::new(
            DocumentState::new(),
            DocumentSync::new(renderer, TreeEditor::new()),
        )
    }

    pub fn origin_path(&self) -> Option<&Path> {
        self.state.origin_path()
    }

    pub(super) fn show_status(&mut self, level: StatusLevel, message: impl Into<String>) {
        self.status = Some(Status {
            level,
            message: message.into(),
        });
    }

    pub(super) fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn active_status(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.message.as_str(), status.level))
    }

    pub const fn awaiting_confirmation(&self) -> bool {
        self.pending.is_some()
    }

    /// The prompt for the action waiting on confirmation.
    pub fn confirmation_prompt(&self) -> Option<&'static str> {
        self.pending.as_ref().map(|pending| pending.action.prompt())
    }
}
