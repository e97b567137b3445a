//! External-change watching for the open document.
//!
//! Watches the document's parent directory (some platforms report events
//! at the directory level) and surfaces debounced change notifications.
//! The event loop treats a change both as a reload trigger and as a
//! document-changed activity signal.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

pub struct DocumentWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    target: PathBuf,
    target_name: Option<OsString>,
    watch_root: PathBuf,
    debounce: Duration,
    pending_since: Option<Instant>,
}

impl DocumentWatcher {
    /// Watch `path` for modifications, debounced by `debounce`.
    ///
    /// # Errors
    ///
    /// Returns an error when the OS watcher cannot be created or the parent
    /// directory cannot be watched.
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        // Canonicalize so OS-reported absolute paths compare equal to ours.
        let target = path
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| path.as_ref().to_path_buf());
        let target_name = target.file_name().map(std::ffi::OsStr::to_os_string);
        let watch_root = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&watch_root, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            rx,
            target,
            target_name,
            watch_root,
            debounce,
            pending_since: None,
        })
    }

    /// Drain pending OS events; returns true once a debounced change is due.
    pub fn take_change_ready(&mut self) -> bool {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(ev) if self.is_relevant(&ev) => {
                    self.pending_since = Some(Instant::now());
                }
                Ok(_) => {}
                Err(err) => tracing::debug!("watch error: {err}"),
            }
        }

        if self
            .pending_since
            .is_some_and(|since| since.elapsed() >= self.debounce)
        {
            self.pending_since = None;
            return true;
        }
        false
    }

    fn is_relevant(&self, event: &Event) -> bool {
        event.paths.iter().any(|path| {
            path == &self.watch_root
                || path == &self.target
                || self
                    .target_name
                    .as_ref()
                    .is_some_and(|name| path.file_name().is_some_and(|f| f == name))
        })
    }
}
