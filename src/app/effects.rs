use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::{App, Message, Model, StatusLevel, update};
use crate::persist;
use crate::watcher::FileWatcher;

impl App {
    pub(super) fn make_file_watcher(path: &Path) -> notify::Result<FileWatcher> {
        FileWatcher::new(path, Duration::from_millis(200))
    }

    /// Run `msg` through [`update`], then perform its side effects.
    pub(super) fn dispatch(model: &mut Model, msg: Message) {
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        Self::handle_message_side_effects(model, &side_msg);
    }

    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        match msg {
            Message::Save(path) => match persist::save(&mut model.state, path) {
                Ok(()) => model.show_status(StatusLevel::Info, format!("Saved {}", path.display())),
                Err(err) => {
                    tracing::warn!(error = %err, "save failed");
                    model.show_status(StatusLevel::Error, format!("Save failed: {err}"));
                }
            },
            Message::ExportHtml(path) => match persist::export_html(&mut model.state, path) {
                Ok(()) => {
                    model.show_status(StatusLevel::Info, format!("Exported {}", path.display()));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "html export failed");
                    model.show_status(StatusLevel::Error, format!("Export failed: {err}"));
                }
            },
            _ => {}
        }
    }

    /// Where an HTML export goes: next to the output, the origin, or the input.
    pub(super) fn export_target(&self, model: &Model) -> PathBuf {
        let base = self
            .output_path
            .as_deref()
            .or_else(|| model.origin_path())
            .unwrap_or(&self.file_path);
        persist::html_export_path(base)
    }
}
