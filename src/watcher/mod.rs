//! Debounced change detection for the synced input file.
//!
//! Watches the file's parent directory with notify, since editors often save
//! by replacing the file rather than writing it in place.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

/// Event counts from one drain of the notify channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Drained {
    relevant: u32,
    ignored: u32,
    errors: u32,
}

/// Watches a single file and reports changes once they settle.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    watch_root: PathBuf,
    target_path: PathBuf,
    target_name: Option<OsString>,
    debounce: Duration,
    changed_at: Option<Instant>,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("target_path", &self.target_path)
            .field("watch_root", &self.watch_root)
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}

impl FileWatcher {
    /// Start watching `path`.
    ///
    /// # Errors
    /// Returns an error if the platform watcher cannot be created or the
    /// parent directory cannot be watched.
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        let path = path.as_ref();
        // OS events carry canonical paths.
        let target_path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let target_name = target_path.file_name().map(std::ffi::OsStr::to_os_string);
        let watch_root = watch_root_for(&target_path);

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&watch_root, RecursiveMode::NonRecursive)?;
        tracing::debug!(root = %watch_root.display(), "watcher started");

        Ok(Self {
            _watcher: watcher,
            rx,
            watch_root,
            target_path,
            target_name,
            debounce,
            changed_at: None,
        })
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// True once a change has been quiet for the debounce interval.
    pub fn take_change_ready(&mut self) -> bool {
        let drained = self.drain();
        if drained != Drained::default() {
            crate::perf::log_event(
                "watcher.poll",
                format!(
                    "relevant={} ignored={} errors={} target={}",
                    drained.relevant,
                    drained.ignored,
                    drained.errors,
                    self.target_path.display(),
                ),
            );
        }
        if drained.relevant > 0 {
            self.changed_at = Some(Instant::now());
        }
        self.settled(Instant::now())
    }

    fn drain(&self) -> Drained {
        let mut drained = Drained::default();
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(ev) if self.is_relevant(&ev) => drained.relevant += 1,
                Ok(ev) => {
                    drained.ignored += 1;
                    tracing::trace!(kind = ?ev.kind, paths = ?ev.paths, "ignoring fs event");
                }
                Err(err) => {
                    drained.errors += 1;
                    tracing::warn!(error = %err, "file watcher error");
                }
            }
        }
        drained
    }

    fn settled(&mut self, now: Instant) -> bool {
        match self.changed_at {
            Some(at) if now.duration_since(at) >= self.debounce => {
                self.changed_at = None;
                true
            }
            _ => false,
        }
    }

    fn is_relevant(&self, event: &Event) -> bool {
        event.paths.iter().any(|path| {
            path == &self.watch_root
                || path == &self.target_path
                || self
                    .target_name
                    .as_ref()
                    .is_some_and(|name| path.file_name().is_some_and(|f| f == name))
        })
    }
}

fn watch_root_for(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
