use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode::{single_line, truncate_to_width};
use crate::view::{Card, CardImage};

use super::push_highlighted_spans;

/// Rows per card: title, excerpt, tags, spacer
pub const CARD_HEIGHT: usize = 4;

/// Render the card grid, scrolling so the selected card stays visible
pub fn render_grid(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;

    if app.grid.is_empty() {
        let msg = if app.session.projects().is_empty() {
            "  No projects yet. Press a to add one."
        } else {
            "  No projects match."
        };
        let line = Line::from(Span::styled(msg, Style::default().fg(app.theme.dim).bg(bg)));
        frame.render_widget(Paragraph::new(vec![Line::default(), line]), area);
        return;
    }

    let visible = (area.height as usize / CARD_HEIGHT).max(1);
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if app.cursor >= app.scroll_offset + visible {
        app.scroll_offset = app.cursor + 1 - visible;
    }

    let search_re = app.search_re();
    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::new();
    for (i, card) in app
        .grid
        .cards
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(visible)
    {
        lines.extend(card_lines(app, card, i == app.cursor, search_re.as_ref(), width));
    }
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn card_lines<'a>(
    app: &App,
    card: &Card,
    selected: bool,
    search_re: Option<&regex::Regex>,
    width: usize,
) -> Vec<Line<'a>> {
    let theme = &app.theme;
    let bg = if selected { theme.selection_bg } else { theme.background };
    let base = Style::default().fg(theme.text).bg(bg);
    let hl = Style::default()
        .fg(theme.search_match_fg)
        .bg(theme.search_match_bg);
    let gutter = if selected {
        Span::styled("\u{258C}", Style::default().fg(theme.highlight).bg(bg))
    } else {
        Span::styled(" ", base)
    };

    // Title row, flattened so a multi-line title cannot break the card height
    let title_text = single_line(&card.title);
    let mut title = vec![gutter.clone()];
    let (star, star_color) = if card.starred {
        ("\u{2605} ", theme.yellow)
    } else {
        ("\u{2606} ", theme.dim)
    };
    title.push(Span::styled(star, Style::default().fg(star_color).bg(bg)));
    push_highlighted_spans(
        &mut title,
        &title_text,
        base.fg(theme.text_bright).add_modifier(Modifier::BOLD),
        hl,
        search_re,
    );
    if matches!(card.image, CardImage::DataUri(_)) {
        title.push(Span::styled("  [img]", Style::default().fg(theme.dim).bg(bg)));
    }

    // Excerpt row, cut to the terminal width
    let excerpt = truncate_to_width(&card.excerpt, width.saturating_sub(3));
    let mut body = vec![gutter.clone(), Span::styled("  ", base)];
    push_highlighted_spans(&mut body, &excerpt, base, hl, search_re);

    // Tags row
    let mut tags = vec![gutter, Span::styled("  ", base)];
    for (i, tag) in card.tags.iter().enumerate() {
        if i > 0 {
            tags.push(Span::styled(" ", base));
        }
        tags.push(Span::styled("#", Style::default().fg(theme.tag).bg(bg)));
        push_highlighted_spans(&mut tags, &single_line(tag), Style::default().fg(theme.tag).bg(bg), hl, search_re);
    }

    vec![
        Line::from(title).style(base),
        Line::from(body).style(base),
        Line::from(tags).style(base),
        Line::default(),
    ]
}
