use serde::Serialize;

use crate::io::recovery::RecoveryEntry;
use crate::model::project::Project;
use crate::ops::image::data_uri_size;
use crate::util::time::short_date;
use crate::view::{Card, CardImage, Grid};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct CardJson<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub excerpt: &'a str,
    pub tags: &'a [String],
    pub starred: bool,
    pub has_image: bool,
}

#[derive(Serialize)]
pub struct RecoveryEntryJson<'a> {
    pub timestamp: String,
    pub category: String,
    pub description: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub body: &'a str,
}

#[derive(Serialize)]
pub struct ImportJson {
    pub imported: usize,
    pub skipped: usize,
    pub replaced: usize,
}

pub fn card_to_json(card: &Card) -> CardJson<'_> {
    CardJson {
        id: &card.id,
        title: &card.title,
        excerpt: &card.excerpt,
        tags: &card.tags,
        starred: card.starred,
        has_image: matches!(card.image, CardImage::DataUri(_)),
    }
}

pub fn recovery_to_json(entry: &RecoveryEntry) -> RecoveryEntryJson<'_> {
    RecoveryEntryJson {
        timestamp: entry
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        category: entry.category.to_string(),
        description: &entry.description,
        body: &entry.body,
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

fn star_char(starred: bool) -> char {
    if starred { '*' } else { ' ' }
}

fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("#{}", t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One card as two lines: header and indented excerpt
pub fn format_card(card: &Card) -> Vec<String> {
    let mut header = format!("[{}] {} {}", star_char(card.starred), card.id, card.title);
    if !card.tags.is_empty() {
        header.push(' ');
        header.push_str(&format_tags(&card.tags));
    }
    if matches!(card.image, CardImage::DataUri(_)) {
        header.push_str(" [img]");
    }
    vec![header, format!("    {}", card.excerpt)]
}

pub fn format_grid(grid: &Grid) -> Vec<String> {
    if grid.is_empty() {
        return vec!["no projects match".to_string()];
    }
    grid.cards.iter().flat_map(format_card).collect()
}

/// Full record for `fo show`
pub fn format_project_detail(project: &Project) -> Vec<String> {
    let mut lines = vec![format!(
        "[{}] {} {}",
        star_char(project.starred),
        project.id,
        project.title
    )];
    if !project.tags.is_empty() {
        lines.push(format!("tags: {}", format_tags(&project.tags)));
    }
    if !project.github.is_empty() {
        lines.push(format!("code: {}", project.github));
    }
    if !project.demo.is_empty() {
        lines.push(format!("live: {}", project.demo));
    }
    if let Some(uri) = project.img.as_deref().filter(|u| !u.is_empty()) {
        match data_uri_size(uri) {
            Some(n) => lines.push(format!("image: {} bytes", n)),
            None => lines.push("image: yes".to_string()),
        }
    }
    if let Some(created) = project.created_at.as_deref() {
        lines.push(format!("created: {}", short_date(created)));
    }
    if let Some(updated) = project.updated_at.as_deref() {
        lines.push(format!("updated: {}", short_date(updated)));
    }
    lines.push(String::new());
    lines.extend(project.description.lines().map(str::to_string));
    lines
}

pub fn format_recovery_entry(entry: &RecoveryEntry) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {}: {}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.category,
        entry.description
    )];
    lines.extend(entry.body.lines().map(|l| format!("  {}", l)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed::seed_projects;
    use crate::view::project_grid;
    use pretty_assertions::assert_eq;

    #[test]
    fn grid_lines() {
        let list = seed_projects("2025-01-01T00:00:00.000Z");
        let refs: Vec<&Project> = list.iter().collect();
        let lines = format_grid(&project_grid(&refs, 20));
        assert_eq!(
            lines,
            vec![
                "[ ] p-rcm Healthcare RCM Pipeline #azure #etl #databricks",
                "    Cloud ETL: Azure Da\u{2026}",
                "[*] p-nlp Safety Intelligence (NLP) #nlp #python #powerbi",
                "    NLP pipeline taggin\u{2026}",
            ]
        );
    }

    #[test]
    fn empty_grid_message() {
        assert_eq!(format_grid(&Grid::default()), vec!["no projects match"]);
    }

    #[test]
    fn detail_lines() {
        let mut p = seed_projects("2025-01-01T00:00:00.000Z").remove(1);
        p.demo = "https://demo.example".into();
        p.img = Some("data:image/png;base64,aGk=".into());
        let lines = format_project_detail(&p);
        assert_eq!(lines[0], "[*] p-nlp Safety Intelligence (NLP)");
        assert_eq!(lines[1], "tags: #nlp #python #powerbi");
        assert_eq!(lines[2], "live: https://demo.example");
        assert_eq!(lines[3], "image: 2 bytes");
        assert_eq!(lines[4], "created: 2025-01-01");
        assert_eq!(lines.last().map(String::as_str), Some(p.description.as_str()));
    }

    #[test]
    fn card_json_flags_image() {
        let card = Card {
            id: "1".into(),
            title: "T".into(),
            excerpt: "E".into(),
            tags: vec![],
            image: CardImage::DataUri("data:x".into()),
            starred: false,
        };
        let json = serde_json::to_value(card_to_json(&card)).unwrap();
        assert_eq!(json["has_image"], true);
        assert_eq!(json["id"], "1");
    }
}
