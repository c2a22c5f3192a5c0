use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::task::NO_DUE_DATE;
use crate::ops::task_ops::PRIORITY_SENTINEL;
use crate::tui::app::{App, FormField};
use crate::tui::text::TextInput;

const LABEL_WIDTH: usize = 11;

/// Render the add-task form and place the terminal cursor in the focused
/// text field.
pub fn render_add_form(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = app.add_form.as_ref() else {
        return;
    };
    let bg = app.theme.background;
    let label_style = Style::default().fg(app.theme.dim).bg(bg);
    let focus_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let value_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let placeholder_style = Style::default().fg(app.theme.dim).bg(bg);

    let label = |text: &str, field: FormField| {
        let style = if form.field == field {
            focus_style
        } else {
            label_style
        };
        Span::styled(format!(" {:<width$}", text, width = LABEL_WIDTH - 1), style)
    };
    let text_value = |input: &TextInput, placeholder: &'static str| {
        if input.as_str().is_empty() {
            Span::styled(placeholder, placeholder_style)
        } else {
            Span::styled(input.as_str().to_string(), value_style)
        }
    };

    let priority = match form.priority {
        Some(p) => Span::styled(format!("< {} >", p), value_style),
        None => Span::styled(format!("< {} >", PRIORITY_SENTINEL), placeholder_style),
    };

    let lines = vec![
        Line::from(vec![label("Name:", FormField::Name), text_value(&form.name, "")]),
        Line::from(vec![label("Priority:", FormField::Priority), priority]),
        Line::from(vec![
            label("Due date:", FormField::DueDate),
            text_value(&form.due_date, NO_DUE_DATE),
        ]),
    ];

    let block = Block::default()
        .title(" Add Task ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), area);

    let cursor = match form.field {
        FormField::Name => Some((0, &form.name)),
        FormField::DueDate => Some((2, &form.due_date)),
        FormField::Priority => None,
    };
    if let Some((row, input)) = cursor {
        let x = area.x + 1 + (LABEL_WIDTH + input.cursor_col()) as u16;
        let y = area.y + 1 + row;
        if x < area.right().saturating_sub(1) && y < area.bottom() {
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}
