use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::ops::present::format_details;
use crate::tui::app::{App, ConfirmAction};
use crate::tui::text::{display_width, truncate_to_width};

use super::centered_rect_fixed;

const POPUP_MAX_W: u16 = 48;

/// Yes/no prompt for a pending delete or clear
pub fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(action) = app.confirm.as_ref() else {
        return;
    };
    let popup_w = POPUP_MAX_W.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let (title, question) = match action {
        ConfirmAction::Delete { name, .. } => {
            ("Delete Task", format!("Delete '{}'?", name))
        }
        ConfirmAction::ClearAll { count } => {
            ("Clear All Tasks", format!("Delete ALL {} tasks?", count))
        }
        ConfirmAction::ClearUnreadable => (
            "Clear Unreadable List",
            "Replace the unreadable task list?".to_string(),
        ),
    };

    let bg = app.theme.background;
    let header_style = Style::default()
        .fg(app.theme.error)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(Span::styled(format!(" {}", title), header_style)),
        Line::from(""),
        Line::from(Span::styled(
            truncate_to_width(&format!(" {}", question), inner_w),
            text_style,
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" y", key_style),
            Span::styled(" confirm  ", text_style),
            Span::styled("n", key_style),
            Span::styled(" cancel", text_style),
        ]),
    ];

    let popup_h = (lines.len() as u16) + 2;
    render_popup(frame, app, area, popup_w, popup_h, lines);
}

/// Details block for the task under `App::detail_id`
pub fn render_details_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(task) = app.detail_task() else {
        return;
    };
    let bg = app.theme.background;
    let details = format_details(task);

    let content_w = details
        .iter()
        .map(|l| display_width(l) + 2)
        .max()
        .unwrap_or(0) as u16;
    let popup_w = (content_w + 2)
        .max(28)
        .min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let header_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text).bg(bg);

    let lines: Vec<Line> = details
        .iter()
        .enumerate()
        .map(|(i, l)| {
            let style = if i < 2 { header_style } else { text_style };
            Line::from(Span::styled(
                truncate_to_width(&format!(" {}", l), inner_w),
                style,
            ))
        })
        .collect();

    let popup_h = (lines.len() as u16) + 2;
    render_popup(frame, app, area, popup_w, popup_h, lines);
}

fn render_popup(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    width: u16,
    height: u16,
    lines: Vec<Line>,
) {
    let bg = app.theme.background;
    let overlay_area = centered_rect_fixed(width, height, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}
