use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};
use crate::config::IDLE_TIMEOUT_STEP_MS;

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let filename = model
        .file_path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "untitled".to_string());
    let dirty = if model.buffer.is_dirty() { " [+]" } else { "" };

    let cursor = model.buffer.cursor();
    let line_info = format!(
        "Ln {}/{}, Col {}",
        cursor.line + 1,
        model.buffer.line_count(),
        cursor.col + 1
    );

    let center_indicator = if model.auto_center_enabled && model.settings.idle_timeout_ms > 0 {
        format!(
            " [center {}s]",
            model.settings.idle_timeout_ms / IDLE_TIMEOUT_STEP_MS
        )
    } else {
        " [center off]".to_string()
    };
    let watch_indicator = if model.watch_enabled {
        " [watching]"
    } else {
        ""
    };

    let status = format!(
        " {}{}  [{}%]  {}{}{}  F1:help",
        filename,
        dirty,
        model.viewport.scroll_percent(),
        line_info,
        center_indicator,
        watch_indicator
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
