use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};

use super::helpers::spans_width;

const NAVIGATE_HINT: &str = "/ search  a add  e edit  d delete  * star  q quit";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let bright = Style::default().fg(app.theme.text_bright).bg(bg);
    let cursor = Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg));

    let (mut spans, hint) = match app.mode {
        Mode::Search => (
            vec![Span::styled(format!("/{}", app.query.text), bright), cursor],
            "Enter keep  Esc clear",
        ),
        Mode::Prompt => match &app.prompt {
            Some((kind, input)) => (
                vec![
                    Span::styled(format!("{}: ", kind.label()), dim),
                    Span::styled(input.text.clone(), bright),
                    cursor,
                ],
                "Enter ok  Esc cancel",
            ),
            None => (Vec::new(), ""),
        },
        _ => match &app.message {
            Some(msg) => {
                let color = if msg.is_error { app.theme.red } else { app.theme.green };
                (
                    vec![Span::styled(msg.text.clone(), Style::default().fg(color).bg(bg))],
                    "",
                )
            }
            None if !app.query.text.is_empty() => (
                vec![Span::styled(format!("/{}", app.query.text), dim)],
                NAVIGATE_HINT,
            ),
            None => (Vec::new(), NAVIGATE_HINT),
        },
    };

    let width = area.width as usize;
    let content_width = spans_width(&spans);
    let hint_width = hint.chars().count();
    if !hint.is_empty() && content_width + hint_width < width {
        spans.push(Span::styled(
            " ".repeat(width - content_width - hint_width),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(hint, dim));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)), area);
}
