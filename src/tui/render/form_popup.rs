use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, FormField};
use crate::util::unicode::{display_col, truncate_to_width};

use super::helpers::centered_rect_fixed;

const LABEL_W: usize = 13;

/// Add/edit dialog: one row per field, focused field shows the cursor
pub fn render_form_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = &app.form else {
        return;
    };
    let popup_w: u16 = 72.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;
    let value_w = inner_w.saturating_sub(LABEL_W + 1);

    let bg = app.theme.background;
    let label_style = Style::default().fg(app.theme.dim).bg(bg);
    let value_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let focus_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let heading = if form.editing.is_some() { " Edit project" } else { " New project" };
    let mut lines = vec![Line::from(Span::styled(heading, focus_style)), Line::default()];
    let mut cursor_pos = None;

    for field in FormField::ALL {
        let input = form.field(field);
        let focused = field == form.focus;
        let label = format!(" {:<w$}", field.label(), w = LABEL_W - 1);
        let value = if field == FormField::Image && input.text.is_empty() {
            let hint = if form.current_image.is_some() {
                "(keep current; - to remove)"
            } else {
                "(none)"
            };
            Span::styled(hint, label_style)
        } else {
            Span::styled(truncate_to_width(&input.text, value_w), value_style)
        };
        lines.push(Line::from(vec![
            Span::styled(label, if focused { focus_style } else { label_style }),
            Span::styled(" ", value_style),
            value,
        ]));
        if focused {
            let col = display_col(&input.text, input.cursor).min(value_w);
            cursor_pos = Some((lines.len() - 1, LABEL_W + 1 + col));
        }
    }

    lines.push(Line::default());
    match &form.error {
        Some(err) => lines.push(Line::from(Span::styled(
            format!(" {}", err),
            Style::default().fg(app.theme.red).bg(bg),
        ))),
        None => lines.push(Line::from(Span::styled(
            " Tab next field  Enter save  Esc cancel",
            label_style,
        ))),
    }

    let popup_h = (lines.len() as u16 + 2).min(area.height);
    let popup = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);

    if let Some((row, col)) = cursor_pos {
        let x = popup.x + 1 + col.min(inner_w.saturating_sub(1)) as u16;
        let y = popup.y + 1 + row as u16;
        if y < popup.y + popup.height.saturating_sub(1) {
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}
