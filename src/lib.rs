#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. sync::DocumentSync)
    clippy::module_name_repetitions
)]

//! # marksync
//!
//! Two-way synchronization between Markdown text and an editable content
//! tree.
//!
//! marksync keeps one canonical Markdown document and an editor surface
//! showing it as a tree:
//! - Markdown is rendered into the tree with comrak
//! - Edits to the tree are serialized back to canonical Markdown
//! - A conversion guard keeps programmatic renders from marking the
//!   document dirty
//! - Discarding unsaved work asks for confirmation first
//!
//! ## Architecture
//!
//! The binary uses The Elm Architecture (TEA) pattern:
//! - **Model**: Document state plus the sync engine
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **Effects**: Saving and exporting
//!
//! ## Modules
//!
//! - [`document`]: Content tree, rendering, serialization and state
//! - [`sync`]: The conversion guard and render/extract orchestration
//! - [`lifecycle`]: Confirmation gating
//! - [`persist`]: Markdown save and HTML export
//! - [`app`]: Application model, messages and main loop
//! - [`config`]: Saved default flags
//! - [`watcher`]: File watching

pub mod app;
pub mod config;
pub mod document;
pub mod lifecycle;
pub mod perf;
pub mod persist;
pub mod sync;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::{ContentNode, DocumentState, Element, NodeKind};
    pub use crate::sync::{DocumentSync, EditorSurface, ExtractOutcome};
}
