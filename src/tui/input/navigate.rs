use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode, PromptKind};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Any key dismisses the last message
    app.message = None;

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.cursor = app.grid.cards.len().saturating_sub(1);
        }
        KeyCode::Char('/') => {
            app.search_backup = app.query.text.clone();
            app.mode = Mode::Search;
        }
        KeyCode::Esc if !app.query.text.is_empty() => {
            app.query.text.clear();
            app.refresh();
        }
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('f') => app.toggle_favorites(),
        KeyCode::Char(']') => app.cycle_facet(true),
        KeyCode::Char('[') => app.cycle_facet(false),
        KeyCode::Enter | KeyCode::Char('v') => app.open_detail(),
        KeyCode::Char('a') => app.open_add_form(),
        KeyCode::Char('e') => app.open_edit_form(),
        KeyCode::Char('d') => app.request_delete(),
        KeyCode::Char('*') | KeyCode::Char(' ') => app.toggle_star(),
        KeyCode::Char('i') => app.open_prompt(PromptKind::Import),
        KeyCode::Char('x') => app.open_prompt(PromptKind::Export),
        KeyCode::Char('R') => app.request_reset(),
        KeyCode::Char('t') => app.toggle_theme(),
        _ => {}
    }
}

/// Detail popup: card actions stay available, anything else closes it.
pub(super) fn handle_detail(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('e') => app.open_edit_form(),
        KeyCode::Char('d') => app.request_delete(),
        KeyCode::Char('*') | KeyCode::Char(' ') => app.toggle_star(),
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('v') => {
            app.detail_id = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}
