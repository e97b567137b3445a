//! Application state and main event loop.
//!
//! The app follows The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! The event loop additionally owns the idle scheduler and the activity
//! coalescing that drive typewriter auto-centering.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::config::Settings;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: PathBuf,
    watch_enabled: bool,
    auto_center_enabled: bool,
    settings: Settings,
    settings_path: Option<PathBuf>,
}

impl App {
    /// Create a new application for the given file.
    ///
    /// The file does not need to exist yet; a missing file opens as an
    /// empty buffer and is created on the first save.
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            watch_enabled: false,
            auto_center_enabled: true,
            settings: Settings::default(),
            settings_path: None,
        }
    }

    /// Enable or disable external-change watching.
    pub fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Set the session default for idle auto-centering.
    pub fn with_auto_center(mut self, enabled: bool) -> Self {
        self.auto_center_enabled = enabled;
        self
    }

    /// Supply loaded settings and where to persist them on change.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings, settings_path: Option<PathBuf>) -> Self {
        self.settings = settings;
        self.settings_path = settings_path;
        self
    }
}
