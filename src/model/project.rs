use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single portfolio entry, stored as one element of the persisted JSON array.
///
/// Field names follow the stored camelCase layout. Records are read leniently:
/// missing fields and `null` take the default, scalars of the wrong type are
/// read as text, and fields this crate does not know about are carried
/// through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub github: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub demo: String,
    /// Image as a data URI
    #[serde(default, deserialize_with = "lenient_opt_text")]
    pub img: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub starred: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Project {
    /// Build a fresh, unstarred record from a validated draft.
    pub fn from_draft(id: String, draft: ProjectDraft, created_at: String) -> Self {
        Project {
            id,
            title: draft.title,
            description: draft.description,
            tags: draft.tags,
            github: draft.github,
            demo: draft.demo,
            img: draft.img,
            created_at: Some(created_at),
            updated_at: None,
            starred: false,
            extra: serde_json::Map::new(),
        }
    }

    /// Overwrite every user-editable field. `id`, `createdAt` and `starred`
    /// are left alone.
    pub fn apply_draft(&mut self, draft: ProjectDraft, updated_at: String) {
        self.title = draft.title;
        self.description = draft.description;
        self.tags = draft.tags;
        self.github = draft.github;
        self.demo = draft.demo;
        self.img = draft.img;
        self.updated_at = Some(updated_at);
    }

    /// The text the free-text search runs against.
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.title, self.description, self.tags.join(" "))
    }
}

/// Any JSON value as text: strings as-is, other scalars in their JSON
/// spelling, `null` as empty, arrays and objects as compact JSON.
fn value_to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(value_to_text(Value::deserialize(deserializer)?))
}

fn lenient_opt_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(value_to_text(other)),
    })
}

/// An array keeps every element as text; a lone scalar becomes one tag.
fn lenient_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().map(value_to_text).collect(),
        other => vec![value_to_text(other)],
    })
}

/// Truthiness: `0`, `""`, `false` and `null` are unstarred.
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// Contents of the add/edit form, held until the form is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub github: String,
    pub demo: String,
    pub img: Option<String>,
}

/// Error type for form validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("title and description required")]
    MissingRequired,
}

impl ProjectDraft {
    /// Pre-fill a draft from an existing record (edit form).
    pub fn from_project(project: &Project) -> Self {
        ProjectDraft {
            title: project.title.clone(),
            description: project.description.clone(),
            tags: project.tags.clone(),
            github: project.github.clone(),
            demo: project.demo.clone(),
            img: project.img.clone(),
        }
    }

    /// Trim the text fields and check the required ones.
    pub fn validated(self) -> Result<Self, DraftError> {
        let draft = ProjectDraft {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            tags: self.tags,
            github: self.github.trim().to_string(),
            demo: self.demo.trim().to_string(),
            img: self.img.filter(|s| !s.is_empty()),
        };
        if draft.title.is_empty() || draft.description.is_empty() {
            return Err(DraftError::MissingRequired);
        }
        Ok(draft)
    }
}

/// Split the comma-separated tags field: `"a, b,,c "` → `["a", "b", "c"]`.
pub fn parse_tag_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Inverse of [`parse_tag_list`] for pre-filling the tags field.
pub fn format_tag_list(tags: &[String]) -> String {
    tags.join(", ")
}
