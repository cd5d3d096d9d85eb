use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;

use super::edit_text;

/// Import/export path prompt in the status row
pub(super) fn handle_prompt(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Enter => app.submit_prompt(),
        _ => {
            if let Some((_, input)) = app.prompt.as_mut() {
                edit_text(input, key);
            }
        }
    }
}
