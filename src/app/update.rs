use std::path::PathBuf;

use crate::app::model::{Incoming, PendingConfirmation, StatusLevel};
use crate::app::Model;
use crate::document::ContentNode;
use crate::lifecycle::{Gate, PendingAction, gate};
use crate::sync::ExtractOutcome;

/// All possible events and actions in the application.
///
/// These represent user input, file system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Document lifecycle
    /// Replace the document with loaded content
    Open {
        content: String,
        origin: Option<PathBuf>,
    },
    /// The origin file changed on disk
    FileChanged(String),
    /// Start over with an empty document
    NewDocument,
    /// Quit the application
    Close,
    /// Answer to a pending confirmation prompt
    Confirm(bool),

    // Editing
    /// Canonical content was replaced from outside the editor
    ContentChanged(String),
    /// The editor surface fired an update notification
    EditorUpdated,
    /// The user replaced the editor tree
    TreeEdited(ContentNode),

    // Persistence (handled in effects)
    /// Save Markdown to a path
    Save(PathBuf),
    /// Export HTML to a path
    ExportHtml(PathBuf),
}

/// Pure function that updates the model based on a message.
///
/// All document state transitions happen here. File I/O for `Save` and
/// `ExportHtml` lives in the effects layer.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Any message other than an answer abandons the pending prompt.
    if !matches!(msg, Message::Confirm(_)) && model.pending.take().is_some() {
        tracing::debug!("pending confirmation dropped by {msg:?}");
    }

    match msg {
        Message::Open { content, origin } => {
            let incoming = Incoming { content, origin };
            request(&mut model, PendingAction::Open, Some(incoming));
        }
        Message::FileChanged(content) => {
            if content == model.state.content() {
                return model;
            }
            let incoming = Incoming {
                content,
                origin: model.state.origin_path().map(std::path::Path::to_path_buf),
            };
            request(&mut model, PendingAction::Reload, Some(incoming));
        }
        Message::NewDocument => request(&mut model, PendingAction::NewDocument, None),
        Message::Close => request(&mut model, PendingAction::Close, None),
        Message::Confirm(answer) => match model.pending.take() {
            Some(pending) if answer => perform(&mut model, pending.action, pending.incoming),
            Some(_) => model.show_status(StatusLevel::Info, "Cancelled"),
            None => {}
        },

        Message::ContentChanged(content) => {
            model.state.set_content(content);
            let canonical = model.state.content().to_string();
            if let Err(err) = model.sync.reconcile(&canonical, &mut model.state) {
                model.show_status(StatusLevel::Error, format!("Render failed: {err}"));
            }
        }
        Message::EditorUpdated => {
            if model.sync.handle_update(&mut model.state) == ExtractOutcome::Applied {
                model.clear_status();
            }
        }
        Message::TreeEdited(tree) => {
            model.sync.apply_edit(&mut model.state, |current| *current = tree);
            model.clear_status();
        }

        // Save/ExportHtml: handled in effects (side effect)
        Message::Save(_) | Message::ExportHtml(_) => {}
    }

    model
}

/// Run `action` now, or park it behind a confirmation prompt.
fn request(model: &mut Model, action: PendingAction, incoming: Option<Incoming>) {
    match gate(&model.state, action) {
        Gate::Proceed => perform(model, action, incoming),
        Gate::Confirm(action) => {
            model.show_status(StatusLevel::Warning, action.prompt());
            model.pending = Some(PendingConfirmation { action, incoming });
        }
    }
}

fn perform(model: &mut Model, action: PendingAction, incoming: Option<Incoming>) {
    match action {
        PendingAction::Open | PendingAction::Reload => {
            let Some(Incoming { content, origin }) = incoming else {
                return;
            };
            load(model, content, origin);
            if action == PendingAction::Reload {
                model.show_status(StatusLevel::Info, "Reloaded");
            }
        }
        PendingAction::NewDocument => {
            model.state.reset();
            model.clear_status();
            render_current(model);
        }
        PendingAction::Close => {
            model.should_quit = true;
        }
    }
}

fn load(model: &mut Model, content: String, origin: Option<PathBuf>) {
    model.state.load(content, origin);
    model.clear_status();
    render_current(model);
}

fn render_current(model: &mut Model) {
    let content = model.state.content().to_string();
    if let Err(err) = model.sync.render(&content, &mut model.state) {
        model.show_status(StatusLevel::Error, format!("Render failed: {err}"));
    }
}
