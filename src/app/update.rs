use crate::app::{Model, ToastLevel};
use crate::commands::{AppAction, CommandAction, CommandId, command};
use crate::config::IDLE_TIMEOUT_STEP_MS;
use crate::editor::Direction;

/// All possible events and actions in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Insert a character at the cursor
    InsertChar(char),
    /// Delete character before cursor (Backspace)
    DeleteBack,
    /// Delete character at cursor (Delete)
    DeleteForward,
    /// Split line at cursor (Enter)
    SplitLine,

    // Cursor motion
    /// Move cursor in a direction
    MoveCursor(Direction),
    /// Move cursor to beginning of line (Home)
    MoveHome,
    /// Move cursor to end of line (End)
    MoveEnd,
    /// Move cursor one word left (Ctrl+Left)
    MoveWordLeft,
    /// Move cursor one word right (Ctrl+Right)
    MoveWordRight,
    /// Move cursor to start of buffer (Ctrl+Home)
    MoveToStart,
    /// Move cursor to end of buffer (Ctrl+End)
    MoveToEnd,
    /// Move cursor to absolute position (line, col) — e.g. from mouse click
    MoveTo(usize, usize),

    /// Run a registered command
    Command(CommandId),
    /// Drop the active selection (Esc)
    CancelSelection,

    // Scrolling (wheel; does not move the cursor)
    /// Scroll up by n lines
    ScrollUp(usize),
    /// Scroll down by n lines
    ScrollDown(usize),
    /// Scroll up one page
    PageUp,
    /// Scroll down one page
    PageDown,

    // File
    /// Save buffer to file (side effect)
    Save,
    /// File changed externally, reload (side effect)
    FileChanged,
    /// Toggle external-change watching
    ToggleWatch,

    // Help overlay
    ToggleHelp,
    HideHelp,

    // Window
    /// Terminal resized
    Resize(u16, u16),

    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// All state transitions happen here; side effects (file and settings I/O,
/// watcher lifecycle) live in `effects`.
pub fn update(mut model: Model, msg: Message) -> Model {
    // A pending quit confirmation survives only an immediate quit or save.
    if !matches!(msg, Message::Quit | Message::Save) {
        model.quit_confirmed = false;
    }

    match msg {
        // Editing
        Message::InsertChar(ch) => {
            model.buffer.insert_char(ch);
            model.after_edit();
        }
        Message::DeleteBack => {
            if model.buffer.delete_back() {
                model.after_edit();
            }
        }
        Message::DeleteForward => {
            if model.buffer.delete_forward() {
                model.after_edit();
            }
        }
        Message::SplitLine => {
            model.buffer.split_line();
            model.after_edit();
        }

        // Cursor motion
        Message::MoveCursor(direction) => {
            model.buffer.move_cursor(direction);
            model.follow_cursor();
        }
        Message::MoveHome => {
            model.buffer.move_home();
        }
        Message::MoveEnd => {
            model.buffer.move_end();
        }
        Message::MoveWordLeft => {
            model.buffer.move_word_left();
            model.follow_cursor();
        }
        Message::MoveWordRight => {
            model.buffer.move_word_right();
            model.follow_cursor();
        }
        Message::MoveToStart => {
            model.buffer.move_to_start();
            model.follow_cursor();
        }
        Message::MoveToEnd => {
            model.buffer.move_to_end();
            model.follow_cursor();
        }
        Message::MoveTo(line, col) => {
            model.buffer.move_to(line, col);
            model.follow_cursor();
        }

        // Commands
        Message::Command(id) => match command(id).action {
            CommandAction::Editor(run) => {
                run(&mut model.buffer);
                model.after_edit();
            }
            CommandAction::App(action) => apply_app_action(&mut model, action),
        },
        Message::CancelSelection => {
            model.buffer.clear_selection();
        }

        // Scrolling
        Message::ScrollUp(n) => {
            model.viewport.scroll_up(n);
        }
        Message::ScrollDown(n) => {
            model.viewport.scroll_down(n);
        }
        Message::PageUp => {
            model.viewport.page_up();
        }
        Message::PageDown => {
            model.viewport.page_down();
        }

        // File
        Message::ToggleWatch => {
            model.watch_enabled = !model.watch_enabled;
        }
        // Save/FileChanged: handled in effects
        Message::Save | Message::FileChanged => {}

        // Help overlay
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }

        // Window
        Message::Resize(width, height) => {
            model
                .viewport
                .resize(width, height.saturating_sub(1));
            model.follow_cursor();
        }

        Message::Quit => {
            if model.buffer.is_dirty() && !model.quit_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes! Press Ctrl+Q again to quit, or Ctrl+S to save",
                );
                model.quit_confirmed = true;
            } else {
                model.should_quit = true;
            }
        }
    }

    model
}

fn apply_app_action(model: &mut Model, action: AppAction) {
    match action {
        AppAction::ToggleAutoCenter => {
            model.auto_center_enabled = !model.auto_center_enabled;
            let notice = if model.auto_center_enabled {
                "Auto-center enabled"
            } else {
                "Auto-center disabled"
            };
            model.show_toast(ToastLevel::Info, notice);
        }
        AppAction::CenterCursorLine => {
            model.center_cursor_line();
        }
        AppAction::IdleTimeoutUp => {
            model.settings.idle_timeout_up();
            model.show_toast(ToastLevel::Info, timeout_notice(&model.settings));
        }
        AppAction::IdleTimeoutDown => {
            model.settings.idle_timeout_down();
            model.show_toast(ToastLevel::Info, timeout_notice(&model.settings));
        }
    }
}

fn timeout_notice(settings: &crate::config::Settings) -> String {
    if settings.idle_timeout_ms == 0 {
        "Idle timeout: off".to_string()
    } else {
        format!(
            "Idle timeout: {}s",
            settings.idle_timeout_ms / IDLE_TIMEOUT_STEP_MS
        )
    }
}
