//! Application state and main loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Load, sync, persist and optionally watch

mod effects;
mod event_loop;
mod model;
mod update;

pub use model::{Incoming, Model, PendingConfirmation, StatusLevel};
pub use update::{Message, update};

use std::path::PathBuf;

/// Main application struct that owns the run configuration.
#[derive(Debug)]
pub struct App {
    file_path: PathBuf,
    watch_enabled: bool,
    tree_output: bool,
    from_tree: bool,
    output_path: Option<PathBuf>,
    export_html: bool,
    render_limit: Option<usize>,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application for the given file.
    pub const fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            watch_enabled: false,
            tree_output: false,
            from_tree: false,
            output_path: None,
            export_html: false,
            render_limit: None,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Enable or disable file watching.
    #[must_use]
    pub const fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Print the content tree as JSON instead of Markdown.
    #[must_use]
    pub const fn with_tree_output(mut self, enabled: bool) -> Self {
        self.tree_output = enabled;
        self
    }

    /// Treat the input file as a JSON content tree edited by the user.
    #[must_use]
    pub const fn with_from_tree(mut self, enabled: bool) -> Self {
        self.from_tree = enabled;
        self
    }

    /// Save the extracted Markdown here after each sync.
    #[must_use]
    pub fn with_output(mut self, path: Option<PathBuf>) -> Self {
        self.output_path = path;
        self
    }

    #[must_use]
    pub const fn with_export_html(mut self, enabled: bool) -> Self {
        self.export_html = enabled;
        self
    }

    /// Reject Markdown inputs larger than `limit` bytes.
    #[must_use]
    pub const fn with_render_limit(mut self, limit: Option<usize>) -> Self {
        self.render_limit = limit;
        self
    }

    /// Set config paths to report at debug level.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}
