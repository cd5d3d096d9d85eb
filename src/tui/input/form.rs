use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;

use super::edit_text;

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab | KeyCode::Down => {
            if let Some(form) = app.form.as_mut() {
                form.focus = form.focus.next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(form) = app.form.as_mut() {
                form.focus = form.focus.prev();
            }
        }
        _ => {
            if let Some(form) = app.form.as_mut()
                && edit_text(form.focused_mut(), key)
            {
                form.error = None;
            }
        }
    }
}
