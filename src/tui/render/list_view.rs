use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::present::{render_line, status_category};
use crate::tui::app::App;
use crate::tui::text::{display_width, truncate_to_width};

/// Render the task list, one colored line per task
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let height = area.height as usize;
    let width = area.width as usize;

    if app.tasks.is_empty() {
        let hint = Line::from(Span::styled(
            " No tasks yet. Press a to add one.",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        frame.render_widget(Paragraph::new(hint), area);
        return;
    }

    adjust_scroll(app, height);

    let mut lines: Vec<Line> = Vec::with_capacity(height);
    for (i, task) in app
        .tasks
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(height)
    {
        let selected = i == app.cursor;
        let row_bg = if selected { app.theme.selection_bg } else { bg };
        let mut style = Style::default()
            .fg(app.theme.category_color(status_category(task)))
            .bg(row_bg);
        if task.completed {
            style = style.add_modifier(Modifier::DIM);
        }
        if selected {
            style = style.add_modifier(Modifier::BOLD);
        }

        let mut text = truncate_to_width(&format!(" {}", render_line(task)), width);
        // Pad so the selection background spans the row
        let pad = width.saturating_sub(display_width(&text));
        text.push_str(&" ".repeat(pad));
        lines.push(Line::from(Span::styled(text, style)));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

/// Keep the cursor inside the visible window
fn adjust_scroll(app: &mut App, height: usize) {
    if height == 0 {
        return;
    }
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if app.cursor >= app.scroll_offset + height {
        app.scroll_offset = app.cursor + 1 - height;
    }
    let max_offset = app.tasks.len().saturating_sub(height);
    app.scroll_offset = app.scroll_offset.min(max_offset);
}
