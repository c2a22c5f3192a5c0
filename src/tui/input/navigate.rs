use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Any key dismisses the last message
    app.status = None;

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,

        // Movement
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.cursor_top(),
        KeyCode::Char('G') | KeyCode::End => app.cursor_bottom(),

        // Actions
        KeyCode::Char('a') => app.open_add_form(),
        KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('C') => app.request_clear(),
        KeyCode::Enter => app.show_details(),
        KeyCode::Char('?') => app.mode = Mode::Help,
        _ => {}
    }
}
