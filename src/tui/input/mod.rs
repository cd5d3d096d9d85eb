mod confirm;
mod form;
mod navigate;
mod prompt;
mod search;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode, TextInput};

use confirm::handle_confirm;
use form::handle_form;
use navigate::{handle_detail, handle_navigate};
use prompt::handle_prompt;
use search::handle_search;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Detail => handle_detail(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Form => handle_form(app, key),
        Mode::Confirm => handle_confirm(app, key),
        Mode::Prompt => handle_prompt(app, key),
    }
}

/// Shared single-line editing keys. Returns false when the key is not an edit.
fn edit_text(input: &mut TextInput, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert(c),
        KeyCode::Char('u') => input.clear(),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::seeded_app;

    pub(super) fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    pub(super) fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let mut app = seeded_app();
        app.open_add_form();
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn edit_text_keys() {
        let mut input = TextInput::new("abc");
        assert!(edit_text(&mut input, KeyEvent::new(KeyCode::Left, KeyModifiers::NONE)));
        assert!(edit_text(&mut input, KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE)));
        assert_eq!(input.text, "ac");
        assert!(edit_text(&mut input, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)));
        assert_eq!(input.text, "");
        assert!(!edit_text(&mut input, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    }

    #[test]
    fn full_add_flow_through_keys() {
        let mut app = seeded_app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::Form);
        type_str(&mut app, "Folio");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "Terminal portfolio manager");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "rust, tui");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.session.projects()[0].title, "Folio");
        assert_eq!(app.session.projects()[0].tags, vec!["rust", "tui"]);
    }
}
