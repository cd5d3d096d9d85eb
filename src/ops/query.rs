use std::cmp::Ordering;

use indexmap::IndexSet;

use crate::model::config::{FacetMode, SortKey};
use crate::model::project::Project;
use crate::util::time::parse_timestamp;

/// Synthetic facet that clears the tag selection.
pub const ALL_FACET: &str = "all";

/// Current view restriction: free text, optional exact tag, favorites flag, sort order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub tag: Option<String>,
    pub favorites_only: bool,
    pub sort: SortKey,
}

impl Query {
    pub fn new(sort: SortKey) -> Self {
        Query {
            sort,
            ..Default::default()
        }
    }

    /// Apply a tag chip selection. `"all"` clears the selection.
    pub fn select_facet(&mut self, facet: &str, mode: FacetMode) {
        let selected = (facet != ALL_FACET).then(|| facet.to_string());
        match mode {
            FacetMode::FreeText => self.text = selected.unwrap_or_default(),
            FacetMode::ExactTag => self.tag = selected,
        }
    }

    /// The facet currently in effect, if any, for highlighting the chip.
    pub fn active_facet(&self, mode: FacetMode) -> Option<&str> {
        match mode {
            FacetMode::FreeText => (!self.text.is_empty()).then_some(self.text.as_str()),
            FacetMode::ExactTag => self.tag.as_deref(),
        }
    }

    pub fn matches(&self, project: &Project) -> bool {
        matches_text(project, &self.text)
            && self
                .tag
                .as_deref()
                .is_none_or(|tag| project.tags.iter().any(|t| t == tag))
            && (!self.favorites_only || project.starred)
    }
}

/// Case-insensitive substring match against title, description and tags.
pub fn matches_text(project: &Project, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    project
        .search_text()
        .to_lowercase()
        .contains(&query.to_lowercase())
}

/// Derive the visible subset in display order. The source list is not touched.
pub fn apply<'a>(list: &'a [Project], query: &Query) -> Vec<&'a Project> {
    let mut visible: Vec<&Project> = list.iter().filter(|p| query.matches(p)).collect();
    sort_projects(&mut visible, query.sort);
    visible
}

/// Stable sort; ties keep their relative order.
pub fn sort_projects(list: &mut [&Project], key: SortKey) {
    match key {
        SortKey::Newest => list.sort_by(|a, b| compare_created(a, b, true)),
        SortKey::Oldest => list.sort_by(|a, b| compare_created(a, b, false)),
        SortKey::Az => list.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortKey::Starred => list.sort_by_key(|p| !p.starred),
    }
}

/// Dated records come first in both directions; undated ones keep their order at the end.
fn compare_created(a: &Project, b: &Project, newest_first: bool) -> Ordering {
    let ta = a.created_at.as_deref().and_then(parse_timestamp);
    let tb = b.created_at.as_deref().and_then(parse_timestamp);
    match (ta, tb) {
        (Some(x), Some(y)) if newest_first => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// `"all"` followed by every distinct tag of the full list, first-seen order.
pub fn tag_facets(list: &[Project]) -> Vec<String> {
    let tags: IndexSet<&str> = list
        .iter()
        .flat_map(|p| p.tags.iter().map(|t| t.as_str()))
        .collect();
    std::iter::once(ALL_FACET.to_string())
        .chain(tags.into_iter().map(|t| t.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed::seed_projects;
    use pretty_assertions::assert_eq;

    fn project(id: &str, title: &str, created: Option<&str>, starred: bool, tags: &[&str]) -> Project {
        Project {
            id: id.into(),
            title: title.into(),
            description: format!("{} description", title),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            github: String::new(),
            demo: String::new(),
            img: None,
            created_at: created.map(|s| s.to_string()),
            updated_at: None,
            starred,
            extra: serde_json::Map::new(),
        }
    }

    fn ids(list: &[&Project]) -> Vec<String> {
        list.iter().map(|p| p.id.clone()).collect()
    }

    fn sample() -> Vec<Project> {
        vec![
            project("a", "beta", Some("2025-01-02T00:00:00.000Z"), false, &["rust"]),
            project("b", "Alpha", Some("2025-01-03T00:00:00.000Z"), true, &["go"]),
            project("c", "gamma", Some("2025-01-01T00:00:00.000Z"), true, &["rust", "cli"]),
            project("d", "alpha", Some("2025-01-02T00:00:00.000Z"), false, &[]),
        ]
    }

    #[test]
    fn empty_query_matches_all() {
        let list = sample();
        let q = Query {
            sort: SortKey::Oldest,
            ..Default::default()
        };
        assert_eq!(apply(&list, &q).len(), 4);
    }

    #[test]
    fn text_filter_is_case_insensitive_over_all_fields() {
        let list = seed_projects("2025-01-01T00:00:00.000Z");
        let mut q = Query::new(SortKey::Newest);
        q.text = "AZURE".into();
        let result = apply(&list, &q);
        assert_eq!(ids(&result), vec!["p-rcm"]);

        q.text = "powerbi".into();
        assert_eq!(ids(&apply(&list, &q)), vec!["p-nlp"]);

        q.text = "osha".into();
        assert_eq!(ids(&apply(&list, &q)), vec!["p-nlp"]);

        q.text = "nothing like this".into();
        assert!(apply(&list, &q).is_empty());
    }

    #[test]
    fn favorites_filter_keeps_only_starred() {
        let list = sample();
        let q = Query {
            favorites_only: true,
            sort: SortKey::Oldest,
            ..Default::default()
        };
        assert_eq!(ids(&apply(&list, &q)), vec!["c", "b"]);
    }

    #[test]
    fn exact_tag_filter() {
        let list = sample();
        let q = Query {
            tag: Some("rust".into()),
            sort: SortKey::Oldest,
            ..Default::default()
        };
        assert_eq!(ids(&apply(&list, &q)), vec!["c", "a"]);
    }

    #[test]
    fn newest_and_oldest_are_stable_on_ties() {
        let list = sample();
        let newest = apply(&list, &Query::new(SortKey::Newest));
        // a and d share a timestamp and keep list order
        assert_eq!(ids(&newest), vec!["b", "a", "d", "c"]);
        let oldest = apply(&list, &Query::new(SortKey::Oldest));
        assert_eq!(ids(&oldest), vec!["c", "a", "d", "b"]);
    }

    #[test]
    fn undated_records_sort_last() {
        let mut list = sample();
        list.insert(0, project("x", "undated", None, false, &[]));
        list.push(project("y", "bad date", Some("not a date"), false, &[]));
        let newest = apply(&list, &Query::new(SortKey::Newest));
        assert_eq!(ids(&newest), vec!["b", "a", "d", "c", "x", "y"]);
        let oldest = apply(&list, &Query::new(SortKey::Oldest));
        assert_eq!(ids(&oldest), vec!["c", "a", "d", "b", "x", "y"]);
    }

    #[test]
    fn az_sort_ignores_case_then_breaks_ties_by_case() {
        let list = sample();
        let result = apply(&list, &Query::new(SortKey::Az));
        assert_eq!(ids(&result), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn starred_sort_is_stable_within_groups() {
        let list = sample();
        let result = apply(&list, &Query::new(SortKey::Starred));
        assert_eq!(ids(&result), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn apply_does_not_reorder_source() {
        let list = sample();
        let before: Vec<String> = list.iter().map(|p| p.id.clone()).collect();
        let _ = apply(&list, &Query::new(SortKey::Az));
        let after: Vec<String> = list.iter().map(|p| p.id.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn facets_are_distinct_in_first_seen_order() {
        let list = sample();
        assert_eq!(tag_facets(&list), vec!["all", "rust", "go", "cli"]);
        assert_eq!(tag_facets(&[]), vec!["all"]);
    }

    #[test]
    fn facets_come_from_full_list_not_view() {
        let list = sample();
        let mut q = Query::new(SortKey::Newest);
        q.text = "gamma".into();
        assert_eq!(apply(&list, &q).len(), 1);
        assert_eq!(tag_facets(&list).len(), 4);
    }

    #[test]
    fn free_text_facet_sets_search_text() {
        let mut q = Query::new(SortKey::Newest);
        q.select_facet("rust", FacetMode::FreeText);
        assert_eq!(q.text, "rust");
        assert_eq!(q.tag, None);
        assert_eq!(q.active_facet(FacetMode::FreeText), Some("rust"));
        q.select_facet(ALL_FACET, FacetMode::FreeText);
        assert_eq!(q.text, "");
        assert_eq!(q.active_facet(FacetMode::FreeText), None);
    }

    #[test]
    fn free_text_facet_can_match_other_fields() {
        // "go" is a tag on b and also a substring of "Algorithms"
        let mut list = sample();
        list.push(project("e", "Algorithms", None, false, &[]));
        let mut q = Query::new(SortKey::Newest);
        q.select_facet("go", FacetMode::FreeText);
        assert_eq!(ids(&apply(&list, &q)), vec!["b", "e"]);

        let mut exact = Query::new(SortKey::Newest);
        exact.select_facet("go", FacetMode::ExactTag);
        assert_eq!(ids(&apply(&list, &exact)), vec!["b"]);
    }

    #[test]
    fn exact_tag_facet_leaves_text_alone() {
        let mut q = Query::new(SortKey::Newest);
        q.text = "alpha".into();
        q.select_facet("go", FacetMode::ExactTag);
        assert_eq!(q.text, "alpha");
        assert_eq!(q.tag.as_deref(), Some("go"));
        q.select_facet(ALL_FACET, FacetMode::ExactTag);
        assert_eq!(q.tag, None);
    }
}
