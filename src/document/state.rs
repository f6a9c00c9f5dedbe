//! Canonical document state: Markdown text, origin and dirty flag.

use std::path::{Path, PathBuf};

/// File name used when a document has no origin yet.
pub const DEFAULT_FILE_NAME: &str = "document.md";

/// Content of a fresh session.
pub const WELCOME_DOCUMENT: &str = "# Welcome to marksync

Start writing your document...

## Features

- **Bold text**
- *Italic text*
- `Inline code`

## Code blocks

```javascript
function hello() {
  console.log(\"Hello, World!\");
}
```

## Task lists

- [x] Finished task
- [ ] Open task

## Tables

| Feature | Status |
|------|------|
| Markdown | ✅ |
| Code highlighting | ✅ |
";

/// The single source of truth for the document being edited.
///
/// `dirty` is false only after a load, a reset or a successful save.
/// Every other content change marks the document dirty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentState {
    content: String,
    origin_path: Option<PathBuf>,
    dirty: bool,
}

impl Default for DocumentState {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentState {
    /// A clean state holding the welcome document.
    pub fn new() -> Self {
        Self {
            content: WELCOME_DOCUMENT.to_string(),
            origin_path: None,
            dirty: false,
        }
    }

    /// A clean state holding loaded content.
    pub fn loaded(content: impl Into<String>, origin: Option<PathBuf>) -> Self {
        Self {
            content: content.into(),
            origin_path: origin,
            dirty: false,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn origin_path(&self) -> Option<&Path> {
        self.origin_path.as_deref()
    }

    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Store edited content. Always marks the document dirty.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.dirty = true;
    }

    /// Change where the document came from. Leaves `dirty` alone.
    pub fn set_origin_path(&mut self, path: Option<PathBuf>) {
        self.origin_path = path;
    }

    /// Explicit override, used after saving or loading.
    pub const fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Start over with an empty, clean, unnamed document.
    pub fn reset(&mut self) {
        self.content.clear();
        self.origin_path = None;
        self.dirty = false;
    }

    /// Replace everything with freshly loaded content.
    pub fn load(&mut self, content: impl Into<String>, origin: Option<PathBuf>) {
        self.set_content(content);
        self.set_origin_path(origin);
        self.set_dirty(false);
    }

    /// Name shown to the user and used for downloads.
    pub fn display_name(&self) -> String {
        self.origin_path
            .as_deref()
            .and_then(Path::file_name)
            .map_or_else(
                || DEFAULT_FILE_NAME.to_string(),
                |name| name.to_string_lossy().into_owned(),
            )
    }

    /// Where a save should go: the origin, or the default name inside `dir`.
    pub fn save_path(&self, dir: &Path) -> PathBuf {
        self.origin_path
            .clone()
            .unwrap_or_else(|| dir.join(DEFAULT_FILE_NAME))
    }
}
