//! Saving Markdown and exporting HTML.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::document::DocumentState;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } => path,
        }
    }
}

/// Write Markdown text to `path`, creating parent directories.
///
/// # Errors
/// Returns [`PersistError::Io`] when the directory or file cannot be written.
pub fn write_markdown(path: &Path, content: &str) -> Result<(), PersistError> {
    write_file(path, content)
}

/// Save the document and mark it clean.
///
/// On failure the dirty flag is left as it was.
///
/// # Errors
/// Returns [`PersistError::Io`] when the file cannot be written.
pub fn save(state: &mut DocumentState, path: &Path) -> Result<(), PersistError> {
    write_markdown(path, state.content())?;
    state.set_dirty(false);
    tracing::info!(path = %path.display(), "saved document");
    Ok(())
}

/// Write an HTML export of the document and mark it clean.
///
/// # Errors
/// Returns [`PersistError::Io`] when the file cannot be written.
pub fn export_html(state: &mut DocumentState, path: &Path) -> Result<(), PersistError> {
    write_file(path, &html_document(state))?;
    state.set_dirty(false);
    tracing::info!(path = %path.display(), "exported html");
    Ok(())
}

/// A standalone HTML page showing the document source.
pub fn html_document(state: &DocumentState) -> String {
    let title = escape_html(&state.display_name());
    let body = escape_html(state.content());
    format!(
        "<!DOCTYPE html>
<html>
<head>
  <meta charset=\"UTF-8\">
  <title>{title}</title>
  <style>
    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }}
    pre {{ white-space: pre-wrap; word-wrap: break-word; }}
  </style>
</head>
<body>
<pre>{body}</pre>
</body>
</html>
"
    )
}

/// `notes.md` becomes `notes.html`; other names get `.html` appended.
pub fn html_export_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.strip_suffix(".md").unwrap_or(&name);
    path.with_file_name(format!("{stem}.html"))
}

fn write_file(path: &Path, content: &str) -> Result<(), PersistError> {
    let io_err = |source: std::io::Error| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
