use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::ops::image::data_uri_size;
use crate::tui::app::App;
use crate::util::time::short_date;

use super::helpers::{centered_rect_fixed, wrap_text};

/// Full record of the selected project: description, every tag, links
pub fn render_detail_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(project) = app.detail_id.as_deref().and_then(|id| app.session.find(id)) else {
        return;
    };
    let popup_w: u16 = 72.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let bg = app.theme.background;
    let text = Style::default().fg(app.theme.text).bg(bg);
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let title_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let star = if project.starred { " \u{2605}" } else { "" };
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!(" {}", project.title), title_style),
            Span::styled(star, Style::default().fg(app.theme.yellow).bg(bg)),
        ]),
        Line::default(),
    ];
    for s in wrap_text(" ", &project.description, inner_w) {
        lines.push(Line::from(Span::styled(s, text)));
    }
    lines.push(Line::default());

    if !project.tags.is_empty() {
        let tags = project
            .tags
            .iter()
            .map(|t| format!("#{}", t))
            .collect::<Vec<_>>()
            .join(" ");
        for s in wrap_text(" ", &tags, inner_w) {
            lines.push(Line::from(Span::styled(s, Style::default().fg(app.theme.tag).bg(bg))));
        }
    }
    let mut field = |label: &str, value: String| {
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<8}", label), dim),
            Span::styled(value, text),
        ]));
    };
    if !project.github.is_empty() {
        field("code", project.github.clone());
    }
    if !project.demo.is_empty() {
        field("live", project.demo.clone());
    }
    if let Some(uri) = project.img.as_deref().filter(|u| !u.is_empty()) {
        field(
            "image",
            data_uri_size(uri).map_or_else(|| "attached".to_string(), |n| format!("{} bytes", n)),
        );
    }
    if let Some(created) = project.created_at.as_deref() {
        field("created", short_date(created));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(" e edit  d delete  * star  Esc close", dim)));

    let popup_h = (lines.len() as u16 + 2).min(area.height);
    let popup = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn detail_shows_every_tag_and_links() {
        let mut app = seeded_app();
        let mut draft = crate::model::project::ProjectDraft::from_project(
            app.session.find("p-nlp").unwrap(),
        );
        draft.tags = ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
        draft.github = "https://github.com/x/y".into();
        app.session.edit("p-nlp", draft).unwrap();
        app.refresh();
        app.cursor = 1;
        app.open_detail();

        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_detail_popup(frame, &app, area);
        });
        assert!(out.contains("Safety Intelligence (NLP) \u{2605}"));
        assert!(out.contains("#a #b #c #d #e"));
        assert!(out.contains("code    https://github.com/x/y"));
        assert!(!out.contains("live"));
    }
}
