use std::path::Path;
use std::time::Duration;

use crate::app::{App, Message, Model, ToastLevel};
use crate::commands::CommandId;
use crate::config::save_settings;
use crate::watch::DocumentWatcher;

impl App {
    pub(super) fn make_watcher(path: &Path) -> notify::Result<DocumentWatcher> {
        DocumentWatcher::new(path, Duration::from_millis(200))
    }

    /// Apply the side effects a message carries beyond its pure state
    /// transition: file and settings I/O and the watcher lifecycle.
    pub(super) fn handle_message_side_effects(
        model: &mut Model,
        watcher: &mut Option<DocumentWatcher>,
        msg: &Message,
    ) {
        match msg {
            Message::Save => match model.save_to_disk() {
                Ok(()) => model.show_toast(ToastLevel::Info, "Saved"),
                Err(err) => model.show_toast(ToastLevel::Error, format!("Save failed: {err}")),
            },
            Message::FileChanged => {
                if model.buffer.is_dirty() {
                    // Never clobber unsaved edits; just surface the conflict.
                    model.show_toast(
                        ToastLevel::Warning,
                        "File changed on disk; unsaved edits kept",
                    );
                } else if let Err(err) = model.reload_from_disk() {
                    model.show_toast(ToastLevel::Error, format!("Reload failed: {err}"));
                }
            }
            Message::ToggleWatch => {
                if model.watch_enabled {
                    match Self::make_watcher(&model.file_path) {
                        Ok(w) => {
                            *watcher = Some(w);
                            model.show_toast(ToastLevel::Info, "Watching file changes");
                        }
                        Err(err) => {
                            model.watch_enabled = false;
                            *watcher = None;
                            model.show_toast(
                                ToastLevel::Warning,
                                format!("Watch unavailable: {err}"),
                            );
                        }
                    }
                } else {
                    *watcher = None;
                    model.show_toast(ToastLevel::Info, "Watch disabled");
                }
            }
            // The timeout is the persisted setting; write it back on change.
            Message::Command(CommandId::IdleTimeoutUp | CommandId::IdleTimeoutDown) => {
                if let Some(path) = model.settings_path.clone()
                    && let Err(err) = save_settings(&path, &model.settings)
                {
                    model.show_toast(ToastLevel::Warning, format!("Settings not saved: {err}"));
                }
            }
            _ => {}
        }
    }
}
