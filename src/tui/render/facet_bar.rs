use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

use super::helpers::spans_width;

/// Header row (title, sort, filters, count) and the tag chip row below it
pub fn render_facet_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_chips(frame, app, chunks[1]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let mut spans = vec![
        Span::styled(
            " folio ",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" sort:{}", app.query.sort), dim),
    ];
    if app.query.favorites_only {
        spans.push(Span::styled(
            "  \u{2605} favorites",
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    }
    if let Some(tag) = &app.query.tag {
        spans.push(Span::styled(format!("  #{}", tag), Style::default().fg(app.theme.tag).bg(bg)));
    }

    let count = format!(
        "{}/{} projects ",
        app.grid.cards.len(),
        app.session.projects().len()
    );
    let used = spans_width(&spans) + count.len();
    let width = area.width as usize;
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
        spans.push(Span::styled(count, dim));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)), area);
}

fn render_chips(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let active = app.active_facet_index();
    let mut spans = vec![Span::styled(" ", Style::default().bg(bg))];
    for (i, facet) in app.facets.iter().enumerate() {
        let style = if i == active {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.tag).bg(bg)
        };
        spans.push(Span::styled(format!(" {} ", facet), style));
        spans.push(Span::styled(" ", Style::default().bg(bg)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn header_and_chips() {
        let app = seeded_app();
        let out = render_to_string(TERM_W, 2, |frame, area| {
            render_facet_bar(frame, &app, area);
        });
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with(" folio  sort:newest"));
        assert!(lines[0].ends_with("2/2 projects"));
        assert_eq!(
            lines[1],
            "  all   azure   etl   databricks   nlp   python   powerbi"
        );
    }

    #[test]
    fn favorites_flag_in_header() {
        let mut app = seeded_app();
        app.toggle_favorites();
        let out = render_to_string(TERM_W, 2, |frame, area| {
            render_facet_bar(frame, &app, area);
        });
        assert!(out.contains("\u{2605} favorites"));
        assert!(out.contains("1/2 projects"));
    }
}
