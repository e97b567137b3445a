use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, Message, Model};
use crate::commands::command_for_key;
use crate::editor::Direction;
use crate::ui::TEXT_LEFT_PADDING;

impl App {
    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        // Registered commands take precedence over the editing defaults.
        if let Some(cmd) = command_for_key(key.code, key.modifiers) {
            return Some(Message::Command(cmd.id));
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            // File / application
            KeyCode::Char('s') if ctrl => Some(Message::Save),
            KeyCode::Char('w') if ctrl => Some(Message::ToggleWatch),
            KeyCode::Char('q' | 'c') if ctrl => Some(Message::Quit),
            KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Esc => Some(Message::CancelSelection),

            // Editing
            KeyCode::Enter => Some(Message::SplitLine),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),

            // Motion
            KeyCode::Left if ctrl => Some(Message::MoveWordLeft),
            KeyCode::Right if ctrl => Some(Message::MoveWordRight),
            KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
            KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
            KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
            KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
            KeyCode::Home if ctrl => Some(Message::MoveToStart),
            KeyCode::End if ctrl => Some(Message::MoveToEnd),
            KeyCode::Home => Some(Message::MoveHome),
            KeyCode::End => Some(Message::MoveEnd),
            KeyCode::PageUp => Some(Message::PageUp),
            KeyCode::PageDown => Some(Message::PageDown),

            // Text input
            KeyCode::Char(ch)
                if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                Some(Message::InsertChar(ch))
            }

            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return None;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                position_from_click(model, mouse.column, mouse.row)
                    .map(|(line, col)| Message::MoveTo(line, col))
            }
            MouseEventKind::ScrollDown if model.viewport.can_scroll_down() => {
                Some(Message::ScrollDown(3))
            }
            MouseEventKind::ScrollUp if model.viewport.can_scroll_up() => {
                Some(Message::ScrollUp(3))
            }
            _ => None,
        }
    }
}

/// Map a click in the text area to a buffer position.
///
/// Returns `None` when the click lands outside the text area (status bar,
/// toast line). The column is translated from display cells to a byte
/// offset within the clicked line.
fn position_from_click(model: &Model, column: u16, row: u16) -> Option<(usize, usize)> {
    if row >= model.viewport.height() {
        return None;
    }
    let line = model.viewport.offset() + row as usize;
    if line >= model.buffer.line_count() {
        // Clicking past the end lands on the last line's end.
        let last = model.buffer.line_count().saturating_sub(1);
        return Some((last, model.buffer.line_len(last)));
    }
    let text = model.buffer.line_at(line)?;
    let target = column.saturating_sub(TEXT_LEFT_PADDING) as usize;
    Some((line, byte_col_at_display_col(&text, target)))
}

/// Byte offset of the character whose cell spans display column `target`.
fn byte_col_at_display_col(text: &str, target: usize) -> usize {
    let mut cells = 0;
    for (idx, ch) in text.char_indices() {
        let width = ch.width().unwrap_or(0);
        if target < cells + width {
            return idx;
        }
        cells += width;
    }
    text.len()
}
