use crate::model::project::Project;
use crate::util::unicode::{single_line, truncate_to_width};

/// Tags shown on a card; the detail view shows all of them.
pub const MAX_CARD_TAGS: usize = 4;

/// Image slot of a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardImage {
    DataUri(String),
    Placeholder,
}

/// Per-card controls, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    View,
    Edit,
    Delete,
    ToggleStar,
}

impl CardAction {
    pub const ALL: [CardAction; 4] = [
        CardAction::View,
        CardAction::Edit,
        CardAction::Delete,
        CardAction::ToggleStar,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CardAction::View => "View",
            CardAction::Edit => "Edit",
            CardAction::Delete => "Delete",
            CardAction::ToggleStar => "Star",
        }
    }
}

/// Display unit for one project. Text fields are raw; escaping is the
/// output format's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub image: CardImage,
    pub starred: bool,
}

/// The whole visible collection, rebuilt from scratch on every render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    pub cards: Vec<Card>,
}

impl Grid {
    /// Whether the "no results" indicator is shown.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// A control bound to the record it acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionBinding {
    pub action: CardAction,
    pub id: String,
}

pub fn project_card(project: &Project, excerpt_width: usize) -> Card {
    Card {
        id: project.id.clone(),
        title: project.title.clone(),
        excerpt: truncate_to_width(&single_line(&project.description), excerpt_width),
        tags: project.tags.iter().take(MAX_CARD_TAGS).cloned().collect(),
        image: match &project.img {
            Some(uri) if !uri.is_empty() => CardImage::DataUri(uri.clone()),
            _ => CardImage::Placeholder,
        },
        starred: project.starred,
    }
}

/// Project query results into display cards, preserving order.
pub fn project_grid(results: &[&Project], excerpt_width: usize) -> Grid {
    Grid {
        cards: results
            .iter()
            .map(|p| project_card(p, excerpt_width))
            .collect(),
    }
}

/// One binding per displayed control. Rebuilt after every render since the
/// set of cards changes wholesale.
pub fn bindings(grid: &Grid) -> Vec<ActionBinding> {
    grid.cards
        .iter()
        .flat_map(|card| {
            CardAction::ALL.iter().map(move |&action| ActionBinding {
                action,
                id: card.id.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed::seed_projects;
    use pretty_assertions::assert_eq;

    #[test]
    fn card_truncates_and_caps_tags() {
        let mut p = seed_projects("2025-01-01T00:00:00.000Z").remove(0);
        p.tags = vec!["a", "b", "c", "d", "e"].into_iter().map(String::from).collect();
        let card = project_card(&p, 10);
        assert_eq!(card.tags, vec!["a", "b", "c", "d"]);
        assert_eq!(card.excerpt, "Cloud ETL\u{2026}");
        assert_eq!(card.image, CardImage::Placeholder);
        assert!(!card.starred);
    }

    #[test]
    fn card_keeps_short_description_and_image() {
        let mut p = seed_projects("2025-01-01T00:00:00.000Z").remove(1);
        p.description = "Short".into();
        p.img = Some("data:image/png;base64,AAAA".into());
        let card = project_card(&p, 120);
        assert_eq!(card.excerpt, "Short");
        assert_eq!(card.image, CardImage::DataUri("data:image/png;base64,AAAA".into()));
        assert!(card.starred);
    }

    #[test]
    fn empty_image_string_is_placeholder() {
        let mut p = seed_projects("2025-01-01T00:00:00.000Z").remove(0);
        p.img = Some(String::new());
        assert_eq!(project_card(&p, 120).image, CardImage::Placeholder);
    }

    #[test]
    fn grid_keeps_order_and_flags_empty() {
        let list = seed_projects("2025-01-01T00:00:00.000Z");
        let refs: Vec<&Project> = list.iter().rev().collect();
        let grid = project_grid(&refs, 120);
        assert_eq!(grid.cards[0].id, "p-nlp");
        assert_eq!(grid.cards[1].id, "p-rcm");
        assert!(!grid.is_empty());
        assert!(project_grid(&[], 120).is_empty());
    }

    #[test]
    fn bindings_cover_every_control() {
        let list = seed_projects("2025-01-01T00:00:00.000Z");
        let refs: Vec<&Project> = list.iter().collect();
        let b = bindings(&project_grid(&refs, 120));
        assert_eq!(b.len(), 8);
        assert_eq!(
            b[..4],
            [
                ActionBinding { action: CardAction::View, id: "p-rcm".into() },
                ActionBinding { action: CardAction::Edit, id: "p-rcm".into() },
                ActionBinding { action: CardAction::Delete, id: "p-rcm".into() },
                ActionBinding { action: CardAction::ToggleStar, id: "p-rcm".into() },
            ]
        );
        assert!(b[4..].iter().all(|x| x.id == "p-nlp"));
    }
}
