//! Confirmation gating for actions that discard the current document.

use crate::document::DocumentState;

/// Whether discarding a document with this dirty flag needs confirmation.
pub const fn requires_confirmation(dirty: bool) -> bool {
    dirty
}

/// An action that replaces or discards the current document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    NewDocument,
    Open,
    Reload,
    Close,
}

impl PendingAction {
    /// The question shown before performing the action on a dirty document.
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::NewDocument => "Unsaved changes will be lost. Start a new document? (y/n)",
            Self::Open => "Unsaved changes will be lost. Open another file? (y/n)",
            Self::Reload => "File changed on disk. Discard unsaved changes and reload? (y/n)",
            Self::Close => "Unsaved changes will be lost. Quit anyway? (y/n)",
        }
    }
}

/// Result of gating an action against the document state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Proceed,
    Confirm(PendingAction),
}

pub const fn gate(state: &DocumentState, action: PendingAction) -> Gate {
    if requires_confirmation(state.is_dirty()) {
        Gate::Confirm(action)
    } else {
        Gate::Proceed
    }
}
