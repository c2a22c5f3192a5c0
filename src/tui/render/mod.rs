pub mod add_form;
pub mod help_overlay;
pub mod list_view;
pub mod popups;
pub mod status_row;
#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::app::{App, Mode};

/// Rows taken by the add form (3 fields + borders)
const ADD_FORM_HEIGHT: u16 = 5;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let form_height = if app.mode == Mode::Add {
        ADD_FORM_HEIGHT
    } else {
        0
    };

    // Layout: title (1 row) | list | add form | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(form_height),
            Constraint::Length(1),
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    list_view::render_list_view(frame, app, chunks[1]);
    if app.mode == Mode::Add {
        add_form::render_add_form(frame, app, chunks[2]);
    }
    status_row::render_status_row(frame, app, chunks[3]);

    // Overlays (rendered on top of everything)
    match app.mode {
        Mode::Confirm => popups::render_confirm_popup(frame, app, area),
        Mode::Details => popups::render_details_popup(frame, app, area),
        Mode::Help => help_overlay::render_help_overlay(frame, app, area),
        Mode::Navigate | Mode::Add => {}
    }
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let pending = app.tasks.iter().filter(|t| !t.completed).count();
    let line = Line::from(vec![
        Span::styled(
            " To-Do List",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} tasks, {} pending", app.tasks.len(), pending),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Fixed-size rectangle centered in `area`, clipped to fit
pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
