use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::config::Settings;
use crate::editor::EditorBuffer;
use crate::ui::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state. The idle scheduler
/// itself is owned by the event loop and re-synced from `settings` and
/// `auto_center_enabled` after every update.
pub struct Model {
    /// Path of the open file
    pub file_path: PathBuf,
    /// The text buffer being edited
    pub buffer: EditorBuffer,
    /// Viewport managing scroll position
    pub viewport: Viewport,
    /// Persisted settings (idle timeout)
    pub settings: Settings,
    /// Where settings are saved on change; `None` disables persistence
    pub settings_path: Option<PathBuf>,
    /// Whether idle auto-centering is active this session
    pub auto_center_enabled: bool,
    /// Whether external file changes are watched
    pub watch_enabled: bool,
    /// Whether the help overlay is visible
    pub help_visible: bool,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Set after a first quit attempt with unsaved changes; a second quit
    /// proceeds
    pub quit_confirmed: bool,
    toast: Option<Toast>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_path", &self.file_path)
            .field("auto_center_enabled", &self.auto_center_enabled)
            .field("watch_enabled", &self.watch_enabled)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(PathBuf::from("untitled.md"), EditorBuffer::empty(), (80, 24))
    }
}

impl Model {
    /// Create a model over `buffer` for a terminal of `terminal_size`.
    ///
    /// One row is reserved for the status bar; the rest is the text area.
    pub fn new(file_path: PathBuf, buffer: EditorBuffer, terminal_size: (u16, u16)) -> Self {
        let total_lines = buffer.line_count();
        Self {
            file_path,
            buffer,
            viewport: Viewport::new(
                terminal_size.0,
                terminal_size.1.saturating_sub(1),
                total_lines,
            ),
            settings: Settings::default(),
            settings_path: None,
            auto_center_enabled: true,
            watch_enabled: false,
            help_visible: false,
            should_quit: false,
            quit_confirmed: false,
            toast: None,
        }
    }

    pub(crate) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(crate) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// Re-center the viewport on the cursor's line.
    ///
    /// This is the idle callback's whole job; it cannot fail and does
    /// nothing surprising on degenerate buffers.
    pub fn center_cursor_line(&mut self) {
        self.viewport.center_on(self.buffer.cursor().line);
    }

    /// Keep the cursor visible after an edit or motion, scrolling the
    /// minimum amount.
    pub fn follow_cursor(&mut self) {
        self.viewport.scroll_into_view(self.buffer.cursor().line);
    }

    /// Propagate the buffer's line count into the viewport and keep the
    /// cursor visible. Called after any buffer mutation.
    pub fn after_edit(&mut self) {
        self.viewport.set_total_lines(self.buffer.line_count());
        self.follow_cursor();
    }

    /// Replace the buffer with the file's on-disk content, keeping the
    /// cursor near its old position.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read.
    pub fn reload_from_disk(&mut self) -> Result<()> {
        let text = std::fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        let old_cursor = self.buffer.cursor();
        self.buffer = EditorBuffer::from_text(&text);
        self.buffer.move_to(old_cursor.line, old_cursor.col);
        self.after_edit();
        Ok(())
    }

    /// Write the buffer back to its file and mark it clean.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn save_to_disk(&mut self) -> Result<()> {
        std::fs::write(&self.file_path, self.buffer.text())
            .with_context(|| format!("Failed to write {}", self.file_path.display()))?;
        self.buffer.mark_clean();
        Ok(())
    }
}
