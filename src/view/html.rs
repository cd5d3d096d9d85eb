use std::fmt::Write;

use crate::model::project::Project;
use crate::model::theme::ThemePreference;

use super::card::{Card, CardAction, CardImage, Grid};

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_card_html(card: &Card) -> String {
    let id = escape_html(&card.id);
    let mut out = String::new();
    let _ = write!(out, "<article class=\"card\" data-id=\"{}\">", id);
    match &card.image {
        CardImage::DataUri(uri) => {
            let _ = write!(
                out,
                "<img src=\"{}\" alt=\"{}\">",
                escape_html(uri),
                escape_html(&card.title)
            );
        }
        CardImage::Placeholder => out.push_str("<div class=\"placeholder\"></div>"),
    }
    let star = if card.starred { "\u{2605}" } else { "\u{2606}" };
    let _ = write!(
        out,
        "<h3>{}</h3><span class=\"star\">{}</span><p>{}</p>",
        escape_html(&card.title),
        star,
        escape_html(&card.excerpt)
    );
    out.push_str("<ul class=\"tags\">");
    for tag in &card.tags {
        let _ = write!(out, "<li>{}</li>", escape_html(tag));
    }
    out.push_str("</ul><nav>");
    for action in CardAction::ALL {
        let _ = write!(
            out,
            "<button data-action=\"{}\" data-id=\"{}\">{}</button>",
            action.label().to_lowercase(),
            id,
            action.label()
        );
    }
    out.push_str("</nav></article>");
    out
}

/// The card grid, or the empty-results block when nothing matches.
pub fn render_grid_html(grid: &Grid) -> String {
    if grid.is_empty() {
        return "<p class=\"empty\">No projects match.</p>".to_string();
    }
    let cards: String = grid.cards.iter().map(render_card_html).collect();
    format!("<section class=\"grid\">{}</section>", cards)
}

/// Full record: every tag, plus code/live links when present.
pub fn render_detail_html(project: &Project) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<article class=\"detail\" data-id=\"{}\"><h2>{}</h2>",
        escape_html(&project.id),
        escape_html(&project.title)
    );
    if let Some(uri) = project.img.as_deref().filter(|u| !u.is_empty()) {
        let _ = write!(out, "<img src=\"{}\" alt=\"\">", escape_html(uri));
    }
    let _ = write!(out, "<p>{}</p><ul class=\"tags\">", escape_html(&project.description));
    for tag in &project.tags {
        let _ = write!(out, "<li>{}</li>", escape_html(tag));
    }
    out.push_str("</ul>");
    for (label, href) in [("Code", &project.github), ("Live", &project.demo)] {
        if !href.is_empty() {
            let _ = write!(out, "<a href=\"{}\">{}</a>", escape_html(href), label);
        }
    }
    out.push_str("</article>");
    out
}

const STYLE: &str = "body{font-family:sans-serif;margin:2rem}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(16rem,1fr));gap:1rem}\
.card,.detail{border:1px solid #8884;border-radius:8px;padding:1rem}\
.card img{max-width:100%}.placeholder{height:6rem;background:#8882}\
.tags{list-style:none;padding:0;display:flex;gap:.5rem}\
.theme-dark{background:#111;color:#eee}";

/// A standalone page: featured project (if any) followed by the grid.
pub fn render_page(grid: &Grid, featured: Option<&Project>, theme: ThemePreference) -> String {
    let mut body = String::new();
    if let Some(p) = featured {
        body.push_str(&render_detail_html(p));
    }
    body.push_str(&render_grid_html(grid));
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Portfolio</title>\
<style>{}</style></head><body class=\"theme-{}\">{}</body></html>\n",
        STYLE,
        theme.as_str(),
        body
    )
}
