mod confirm;
mod form;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

use confirm::handle_confirm;
use form::handle_form;
use navigate::handle_navigate;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Ctrl+C quits from anywhere
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Add => handle_form(app, key),
        Mode::Confirm => handle_confirm(app, key),
        Mode::Details => handle_details(app, key),
        Mode::Help => handle_help(app, key),
    }
}

fn handle_details(app: &mut App, key: KeyEvent) {
    if matches!(
        key.code,
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')
    ) {
        app.close_popup();
    }
}

fn handle_help(app: &mut App, key: KeyEvent) {
    if matches!(
        key.code,
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
    ) {
        app.mode = Mode::Navigate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Priority;
    use crate::tui::app::{ConfirmAction, FormField};
    use crate::tui::render::test_helpers::app_in;
    use tempfile::TempDir;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn add_task_from_keys() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::Add);
        type_str(&mut app, "Buy milk");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "2025-01-01");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.tasks.len(), 1);
        let task = &app.tasks[0];
        assert_eq!(task.name, "Buy milk");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, "2025-01-01");
    }

    #[test]
    fn form_keys_edit_focused_field_only() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);

        press(&mut app, KeyCode::Char('a'));
        // Letters that are navigate bindings go into the text field
        type_str(&mut app, "jkqx");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.add_form.as_ref().unwrap().field, FormField::DueDate);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Left);

        let form = app.add_form.as_ref().unwrap();
        assert_eq!(form.name.as_str(), "jkq");
        assert_eq!(form.priority, Some(Priority::Low));
        assert!(form.due_date.as_str().is_empty());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.add_form.is_none());
        assert!(app.tasks.is_empty());
    }

    #[test]
    fn space_toggles_and_x_toggles_back() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "a");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char(' '));
        assert!(app.tasks[0].completed);
        press(&mut app, KeyCode::Char('x'));
        assert!(!app.tasks[0].completed);
    }

    #[test]
    fn delete_confirm_flow() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "a");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, Mode::Confirm);
        assert!(matches!(app.confirm, Some(ConfirmAction::Delete { .. })));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.tasks.len(), 1);

        press(&mut app, KeyCode::Delete);
        press(&mut app, KeyCode::Char('y'));
        assert!(app.tasks.is_empty());
    }

    #[test]
    fn overlays_open_and_close() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);

        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, Mode::Help);
        // q closes help instead of quitting
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.mode, Mode::Navigate);
        assert!(!app.should_quit);

        // Enter on an empty list does nothing
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn quit_keys() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_in(&tmp);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = app_in(&tmp);
        press(&mut app, KeyCode::Char('a'));
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }
}
