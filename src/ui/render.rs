use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::app::Model;
use crate::commands::COMMANDS;
use crate::editor::{Cursor, Selection};
use crate::ui::{TEXT_LEFT_PADDING, status};

/// Render the whole frame: text area, status bar, optional toast line and
/// help overlay.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let toast_active = model.active_toast().is_some();
    let footer_rows = 1 + u16::from(toast_active);

    let text_area = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: area.height.saturating_sub(footer_rows),
    };
    render_text(model, frame, text_area);

    let bottom = area.y + area.height;
    let mut next_row = text_area.y + text_area.height;
    if toast_active && next_row < bottom {
        let toast_area = Rect::new(area.x, next_row, area.width, 1);
        status::render_toast_bar(model, frame, toast_area);
        next_row += 1;
    }
    if next_row < bottom {
        let status_area = Rect::new(area.x, next_row, area.width, 1);
        status::render_status_bar(model, frame, status_area);
    }

    if model.help_visible {
        render_help(frame, area);
    } else {
        place_cursor(model, frame, text_area);
    }
}

fn render_text(model: &Model, frame: &mut Frame, area: Rect) {
    if area.width <= TEXT_LEFT_PADDING || area.height == 0 {
        return;
    }
    let inner = Rect {
        x: area.x + TEXT_LEFT_PADDING,
        y: area.y,
        width: area.width - TEXT_LEFT_PADDING,
        height: area.height,
    };

    let selection = model.buffer.selection().map(normalize);
    let lines: Vec<Line<'_>> = model
        .viewport
        .visible_range()
        .map(|idx| {
            let text = model.buffer.line_at(idx).unwrap_or_default();
            styled_line(text, idx, selection)
        })
        .collect();

    frame.render_widget(Paragraph::new(Text::from(lines)), inner);
}

/// Order a selection span top-to-bottom so rendering can slice lines.
fn normalize(selection: Selection) -> (Cursor, Cursor) {
    let Selection { from, to } = selection;
    if (to.line, to.col) < (from.line, from.col) {
        (to, from)
    } else {
        (from, to)
    }
}

/// Build one display line, splitting out the selected byte range when the
/// selection touches this line.
fn styled_line(text: String, idx: usize, selection: Option<(Cursor, Cursor)>) -> Line<'static> {
    let selected = Style::default().add_modifier(Modifier::REVERSED);
    let Some((start, end)) = selection else {
        return Line::from(text);
    };
    if idx < start.line || idx > end.line {
        return Line::from(text);
    }

    let from = if idx == start.line { start.col } else { 0 };
    let to = if idx == end.line { end.col } else { text.len() };
    let from = from.min(text.len());
    let to = to.clamp(from, text.len());

    let head = text[..from].to_string();
    let body = text[from..to].to_string();
    let tail = text[to..].to_string();
    Line::from(vec![
        Span::raw(head),
        Span::styled(body, selected),
        Span::raw(tail),
    ])
}

/// Park the terminal cursor on the buffer cursor when it is in view.
fn place_cursor(model: &Model, frame: &mut Frame, text_area: Rect) {
    let cursor = model.buffer.cursor();
    if !model.viewport.is_visible(cursor.line) {
        return;
    }
    let line = model.buffer.line_at(cursor.line).unwrap_or_default();
    let col = cursor.col.min(line.len());
    #[allow(clippy::cast_possible_truncation)]
    let x = text_area.x + TEXT_LEFT_PADDING + line[..col].width() as u16;
    #[allow(clippy::cast_possible_truncation)]
    let y = text_area.y + (cursor.line - model.viewport.offset()) as u16;
    if x < text_area.x + text_area.width && y < text_area.y + text_area.height {
        frame.set_cursor_position(Position::new(x, y));
    }
}

fn render_help(frame: &mut Frame, area: Rect) {
    let mut rows: Vec<Line<'_>> = COMMANDS
        .iter()
        .map(|cmd| {
            Line::from(format!("  {:<10} {}", cmd.binding.label(), cmd.name))
        })
        .collect();
    rows.push(Line::from(""));
    for (binding, name) in [
        ("Ctrl+S", "Save"),
        ("Ctrl+W", "Toggle file watching"),
        ("Esc", "Cancel selection"),
        ("F1", "Toggle this help"),
        ("Ctrl+Q", "Quit"),
    ] {
        rows.push(Line::from(format!("  {binding:<10} {name}")));
    }

    #[allow(clippy::cast_possible_truncation)]
    let height = (rows.len() as u16 + 2).min(area.height);
    let width = 44.min(area.width);
    let popup = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Paragraph::new(Text::from(rows)).block(block), popup);
}
