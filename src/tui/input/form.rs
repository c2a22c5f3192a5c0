use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, FormField};

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.cancel_add_form();
            return;
        }
        KeyCode::Enter => {
            app.submit_add_form();
            return;
        }
        _ => {}
    }

    let Some(form) = app.add_form.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Tab => form.field = form.field.next(),
        KeyCode::BackTab => form.field = form.field.prev(),
        _ => match form.field {
            FormField::Priority => match key.code {
                KeyCode::Right | KeyCode::Down | KeyCode::Char(' ') => form.cycle_priority(true),
                KeyCode::Left | KeyCode::Up => form.cycle_priority(false),
                _ => {}
            },
            FormField::Name => edit_text(&mut form.name, key),
            FormField::DueDate => edit_text(&mut form.due_date, key),
        },
    }
}

fn edit_text(input: &mut crate::tui::text::TextInput, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        _ => {}
    }
}
