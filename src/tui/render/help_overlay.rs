use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::centered_rect_fixed;

const KEY_WIDTH: usize = 14;

const BINDINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("\u{2191}\u{2193}/jk", "Move cursor up/down"),
            ("g/G", "Jump to top/bottom"),
            ("Enter", "Show task details"),
            ("q/Esc", "Quit"),
        ],
    ),
    (
        "Tasks",
        &[
            ("a", "Add a task"),
            ("Space/x", "Toggle completed"),
            ("d/Del", "Delete task"),
            ("C", "Clear all tasks"),
        ],
    ),
    (
        "Add form",
        &[
            ("Tab/S-Tab", "Next/previous field"),
            ("\u{2190}\u{2192}", "Change priority"),
            ("Enter", "Save task"),
            ("Esc", "Cancel"),
        ],
    ),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(" Key Bindings", header_style)));

    for (section, bindings) in BINDINGS {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", section), header_style)));
        for (key, desc) in *bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("   {:<width$}", key, width = KEY_WIDTH), key_style),
                Span::styled(*desc, desc_style),
            ]));
        }
    }

    let popup_w = 42.min(area.width);
    let popup_h = (lines.len() as u16 + 2).min(area.height);
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}
