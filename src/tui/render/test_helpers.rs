use std::path::Path;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::kv::{DirStore, KeyValueStore, MemoryStore};
use crate::model::config::AppConfig;
use crate::ops::session::Session;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over a fresh in-memory store, holding the two sample projects.
pub fn seeded_app() -> App {
    let backend: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
    App::new(Session::open(backend, AppConfig::default()).unwrap())
}

/// An App over a data directory, for state that must survive a reopen.
pub fn seeded_app_in(dir: &Path) -> App {
    let backend: Box<dyn KeyValueStore> = Box::new(DirStore::new(dir));
    App::new(Session::open(backend, AppConfig::default()).unwrap())
}
