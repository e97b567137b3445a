//! Command registry and the marker-aware line commands.
//!
//! Every user-invocable command is declared once in [`COMMANDS`], with a
//! stable id, a human-readable name (shown in the help overlay), a default
//! key binding, and its handler. Handlers come in two kinds, mirrored by
//! [`CommandAction`]: editor commands receive the active buffer directly,
//! application commands are resolved by the update loop.

use crossterm::event::{KeyCode, KeyModifiers};

use crate::editor::{Cursor, EditorBuffer};
use crate::marker::line_marker;

/// Stable identifier for a registered command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandId {
    EmptyLineKeepMarker,
    SelectLineOrCollapse,
    ClearLine,
    ToggleAutoCenter,
    CenterCursorLine,
    IdleTimeoutUp,
    IdleTimeoutDown,
}

/// Application-level actions, resolved by `app::update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    ToggleAutoCenter,
    CenterCursorLine,
    IdleTimeoutUp,
    IdleTimeoutDown,
}

/// A command's handler.
#[derive(Debug, Clone, Copy)]
pub enum CommandAction {
    /// Runs against the active editor buffer.
    Editor(fn(&mut EditorBuffer)),
    /// Handled by the application update loop.
    App(AppAction),
}

/// Default key binding for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub modifiers: KeyModifiers,
    pub code: KeyCode,
}

impl KeyBinding {
    const fn ctrl(ch: char) -> Self {
        Self {
            modifiers: KeyModifiers::CONTROL,
            code: KeyCode::Char(ch),
        }
    }

    const fn alt(code: KeyCode) -> Self {
        Self {
            modifiers: KeyModifiers::ALT,
            code,
        }
    }

    /// Human-readable form for the help overlay.
    pub fn label(&self) -> String {
        let key = match self.code {
            KeyCode::Char(c) => c.to_uppercase().to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            other => format!("{other:?}"),
        };
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{key}")
        } else if self.modifiers.contains(KeyModifiers::ALT) {
            format!("Alt+{key}")
        } else {
            key
        }
    }
}

/// A registered command.
#[derive(Debug, Clone, Copy)]
pub struct Command {
    pub id: CommandId,
    pub slug: &'static str,
    pub name: &'static str,
    pub binding: KeyBinding,
    pub action: CommandAction,
}

/// The full command registry.
pub const COMMANDS: &[Command] = &[
    Command {
        id: CommandId::EmptyLineKeepMarker,
        slug: "empty-line-keep-marker",
        name: "Empty line (keep marker)",
        binding: KeyBinding::ctrl('e'),
        action: CommandAction::Editor(empty_line_keep_marker),
    },
    Command {
        id: CommandId::SelectLineOrCollapse,
        slug: "select-line",
        name: "Select line / cancel selection",
        binding: KeyBinding::ctrl('a'),
        action: CommandAction::Editor(select_line_or_collapse),
    },
    Command {
        id: CommandId::ClearLine,
        slug: "clear-line",
        name: "Clear line",
        binding: KeyBinding::ctrl('k'),
        action: CommandAction::Editor(clear_line),
    },
    Command {
        id: CommandId::ToggleAutoCenter,
        slug: "toggle-auto-center",
        name: "Toggle auto-center",
        binding: KeyBinding::ctrl('t'),
        action: CommandAction::App(AppAction::ToggleAutoCenter),
    },
    Command {
        id: CommandId::CenterCursorLine,
        slug: "center-cursor-line",
        name: "Center cursor line",
        binding: KeyBinding::ctrl('l'),
        action: CommandAction::App(AppAction::CenterCursorLine),
    },
    Command {
        id: CommandId::IdleTimeoutUp,
        slug: "idle-timeout-up",
        name: "Idle timeout +1s",
        binding: KeyBinding::alt(KeyCode::Up),
        action: CommandAction::App(AppAction::IdleTimeoutUp),
    },
    Command {
        id: CommandId::IdleTimeoutDown,
        slug: "idle-timeout-down",
        name: "Idle timeout -1s",
        binding: KeyBinding::alt(KeyCode::Down),
        action: CommandAction::App(AppAction::IdleTimeoutDown),
    },
];

/// Look up a command by id.
///
/// # Panics
///
/// Panics if `id` is missing from [`COMMANDS`]; the registry declares every
/// `CommandId` variant.
pub fn command(id: CommandId) -> &'static Command {
    COMMANDS
        .iter()
        .find(|cmd| cmd.id == id)
        .unwrap_or_else(|| unreachable!("command {id:?} not registered"))
}

/// Resolve a key event against the registry's default bindings.
pub fn command_for_key(code: KeyCode, modifiers: KeyModifiers) -> Option<&'static Command> {
    let code = normalize_key(code);
    COMMANDS
        .iter()
        .find(|cmd| cmd.binding.code == code && cmd.binding.modifiers == modifiers)
}

/// Ctrl combinations may arrive with the shifted character; fold to lowercase
/// so `Ctrl+E` and `Ctrl+Shift+e` resolve alike.
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Truncate the current line to its marker.
///
/// With a marker and extra content, the line becomes just the marker and
/// the cursor lands right after it. A marker-only line is left completely
/// untouched, so repeated invocations never destroy list structure. Without
/// a marker the whole line is emptied.
pub fn empty_line_keep_marker(buf: &mut EditorBuffer) {
    let line_idx = buf.cursor().line;
    let Some(line) = buf.line_at(line_idx) else {
        return;
    };
    match line_marker(&line) {
        Some(marker) if marker.len() == line.len() => {}
        Some(marker) => {
            let marker = marker.to_string();
            buf.set_line(line_idx, &marker);
            buf.move_to(line_idx, marker.len());
        }
        None => {
            buf.set_line(line_idx, "");
            buf.move_to(line_idx, 0);
        }
    }
}

/// Select the current line's content, or cancel an active selection.
///
/// With a selection active, collapse it to its end point. Otherwise select
/// from just after the marker (column 0 when there is none) to the end of
/// the line.
pub fn select_line_or_collapse(buf: &mut EditorBuffer) {
    if buf.collapse_selection_to_end() {
        return;
    }
    let line_idx = buf.cursor().line;
    let Some(line) = buf.line_at(line_idx) else {
        return;
    };
    let start = line_marker(&line).map_or(0, str::len);
    buf.set_selection(Cursor::at(line_idx, start), Cursor::at(line_idx, line.len()));
}

/// Empty the current line unconditionally, marker included, leaving the
/// cursor at column 0 ready for a new format.
pub fn clear_line(buf: &mut EditorBuffer) {
    let line_idx = buf.cursor().line;
    if buf.set_line(line_idx, "") {
        buf.move_to(line_idx, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- empty_line_keep_marker ---

    #[test]
    fn test_empty_keeps_bullet_marker() {
        let mut buf = EditorBuffer::from_text("- done");
        empty_line_keep_marker(&mut buf);
        assert_eq!(buf.line_at(0), Some("- ".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_empty_keeps_heading_marker() {
        let mut buf = EditorBuffer::from_text("## Old title");
        buf.move_to(0, 5);
        empty_line_keep_marker(&mut buf);
        assert_eq!(buf.line_at(0), Some("## ".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 3));
    }

    #[test]
    fn test_empty_keeps_indented_marker() {
        let mut buf = EditorBuffer::from_text("  3. nested item");
        empty_line_keep_marker(&mut buf);
        assert_eq!(buf.line_at(0), Some("  3. ".to_string()));
        assert_eq!(buf.cursor().col, 5);
    }

    #[test]
    fn test_empty_on_marker_only_line_is_noop() {
        let mut buf = EditorBuffer::from_text("- ");
        buf.move_to(0, 1);
        empty_line_keep_marker(&mut buf);
        assert_eq!(buf.line_at(0), Some("- ".to_string()));
        // Cursor position untouched on the no-op path.
        assert_eq!(buf.cursor(), Cursor::at(0, 1));
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_empty_without_marker_clears_line() {
        let mut buf = EditorBuffer::from_text("plain");
        buf.move_to(0, 3);
        empty_line_keep_marker(&mut buf);
        assert_eq!(buf.line_at(0), Some(String::new()));
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    #[test]
    fn test_empty_only_touches_cursor_line() {
        let mut buf = EditorBuffer::from_text("- keep\n- done");
        buf.move_to(1, 4);
        empty_line_keep_marker(&mut buf);
        assert_eq!(buf.line_at(0), Some("- keep".to_string()));
        assert_eq!(buf.line_at(1), Some("- ".to_string()));
    }

    // --- select_line_or_collapse ---

    #[test]
    fn test_select_spans_content_after_marker() {
        let mut buf = EditorBuffer::from_text("- hello");
        select_line_or_collapse(&mut buf);
        let sel = buf.selection().unwrap();
        assert_eq!(sel.from, Cursor::at(0, 2));
        assert_eq!(sel.to, Cursor::at(0, 7));
    }

    #[test]
    fn test_select_without_marker_spans_whole_line() {
        let mut buf = EditorBuffer::from_text("plain text");
        select_line_or_collapse(&mut buf);
        let sel = buf.selection().unwrap();
        assert_eq!(sel.from, Cursor::at(0, 0));
        assert_eq!(sel.to, Cursor::at(0, 10));
    }

    #[test]
    fn test_select_again_collapses_to_end() {
        let mut buf = EditorBuffer::from_text("- hello");
        select_line_or_collapse(&mut buf);
        select_line_or_collapse(&mut buf);
        assert!(!buf.has_selection());
        assert_eq!(buf.cursor(), Cursor::at(0, 7));
    }

    #[test]
    fn test_select_collapses_any_active_selection() {
        let mut buf = EditorBuffer::from_text("one\ntwo three");
        buf.set_selection(Cursor::at(0, 0), Cursor::at(1, 3));
        select_line_or_collapse(&mut buf);
        assert!(!buf.has_selection());
        assert_eq!(buf.cursor(), Cursor::at(1, 3));
    }

    #[test]
    fn test_select_on_marker_only_line_selects_nothing() {
        let mut buf = EditorBuffer::from_text("- ");
        select_line_or_collapse(&mut buf);
        assert!(!buf.has_selection());
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    // --- clear_line ---

    #[test]
    fn test_clear_ignores_marker() {
        let mut buf = EditorBuffer::from_text("- done");
        buf.move_to(0, 4);
        clear_line(&mut buf);
        assert_eq!(buf.line_at(0), Some(String::new()));
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    #[test]
    fn test_clear_on_heading() {
        let mut buf = EditorBuffer::from_text("# Title\nbody");
        clear_line(&mut buf);
        assert_eq!(buf.text(), "\nbody");
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    #[test]
    fn test_clear_on_empty_line() {
        let mut buf = EditorBuffer::from_text("");
        clear_line(&mut buf);
        assert_eq!(buf.line_at(0), Some(String::new()));
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    // --- registry ---

    #[test]
    fn test_every_command_id_is_registered() {
        for id in [
            CommandId::EmptyLineKeepMarker,
            CommandId::SelectLineOrCollapse,
            CommandId::ClearLine,
            CommandId::ToggleAutoCenter,
            CommandId::CenterCursorLine,
            CommandId::IdleTimeoutUp,
            CommandId::IdleTimeoutDown,
        ] {
            assert_eq!(command(id).id, id);
        }
    }

    #[test]
    fn test_bindings_are_unique() {
        for (i, a) in COMMANDS.iter().enumerate() {
            for b in &COMMANDS[i + 1..] {
                assert_ne!(a.binding, b.binding, "{} and {}", a.slug, b.slug);
            }
        }
    }

    #[test]
    fn test_command_for_key_resolves_default_binding() {
        let cmd = command_for_key(KeyCode::Char('e'), KeyModifiers::CONTROL).unwrap();
        assert_eq!(cmd.id, CommandId::EmptyLineKeepMarker);
        assert!(command_for_key(KeyCode::Char('e'), KeyModifiers::NONE).is_none());
    }

    #[test]
    fn test_command_for_key_folds_case() {
        let cmd = command_for_key(KeyCode::Char('E'), KeyModifiers::CONTROL).unwrap();
        assert_eq!(cmd.id, CommandId::EmptyLineKeepMarker);
    }

    #[test]
    fn test_binding_labels() {
        assert_eq!(command(CommandId::ClearLine).binding.label(), "Ctrl+K");
        assert_eq!(command(CommandId::IdleTimeoutUp).binding.label(), "Alt+Up");
    }
}
