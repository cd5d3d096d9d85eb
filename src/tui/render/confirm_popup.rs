use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::helpers::{centered_rect_fixed, wrap_text};

/// y/n dialog for delete and reset
pub fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(action) = &app.confirm else {
        return;
    };
    let popup_w: u16 = 48.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let bg = app.theme.background;
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = wrap_text(" ", &action.message(), inner_w)
        .into_iter()
        .map(|s| Line::from(Span::styled(s, text_style)))
        .collect();
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled(" y", key_style),
        Span::styled(" confirm   ", text_style),
        Span::styled("n", key_style),
        Span::styled(" cancel", text_style),
    ]));

    let popup_h = (lines.len() as u16 + 2).min(area.height);
    let popup = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.red).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
