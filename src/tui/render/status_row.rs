use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, MessageKind, Mode};
use crate::tui::text::display_width;

/// Render the status row (bottom of screen): the last message on the left,
/// key hints for the current mode on the right.
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let mut spans: Vec<Span> = Vec::new();

    if let Some(ref msg) = app.status {
        let fg = match msg.kind {
            MessageKind::Info => app.theme.text_bright,
            MessageKind::Error => app.theme.error,
        };
        spans.push(Span::styled(
            format!(" {}", msg.text),
            Style::default().fg(fg).bg(bg),
        ));
    }

    if app.show_key_hints {
        let hint = key_hints(app.mode);
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let hint_width = display_width(hint);
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn key_hints(mode: Mode) -> &'static str {
    match mode {
        Mode::Navigate => "a add  space toggle  d delete  ? help  q quit",
        Mode::Add => "Tab next field  \u{2190}\u{2192} priority  Enter save  Esc cancel",
        Mode::Confirm => "y confirm  n cancel",
        Mode::Details | Mode::Help => "Esc close",
    }
}
