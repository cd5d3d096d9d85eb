use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode, TextInput};

use super::edit_text;

/// Live search: the grid is re-filtered after every keystroke.
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.mode = Mode::Navigate,
        KeyCode::Esc => {
            app.query.text = std::mem::take(&mut app.search_backup);
            app.mode = Mode::Navigate;
            app.refresh();
        }
        _ => {
            let mut input = TextInput::new(std::mem::take(&mut app.query.text));
            let edited = edit_text(&mut input, key);
            app.query.text = input.text;
            if edited {
                app.cursor = 0;
                app.refresh();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use crate::tui::app::Mode;
    use crate::tui::input::tests::{press, type_str};
    use crate::tui::render::test_helpers::seeded_app;

    #[test]
    fn typing_filters_live() {
        let mut app = seeded_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, Mode::Search);
        type_str(&mut app, "osha");
        assert_eq!(app.grid.cards.len(), 1);
        assert_eq!(app.grid.cards[0].id, "p-nlp");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.query.text, "osh");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.query.text, "osh");
    }

    #[test]
    fn escape_restores_previous_text() {
        let mut app = seeded_app();
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "azure");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.query.text, "");
        assert_eq!(app.grid.cards.len(), 2);
    }

    #[test]
    fn search_with_no_hits_empties_grid() {
        let mut app = seeded_app();
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "zzz");
        assert!(app.grid.is_empty());
    }
}
