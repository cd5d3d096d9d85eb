use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Configuration from config.toml (every section optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_projects_key")]
    pub projects_key: String,
    #[serde(default = "default_theme_key")]
    pub theme_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            projects_key: default_projects_key(),
            theme_key: default_theme_key(),
        }
    }
}

/// The `_v2` suffix is bumped when the stored layout changes incompatibly.
fn default_projects_key() -> String {
    "folio_portfolio_v2".to_string()
}

fn default_theme_key() -> String {
    "folio_portfolio_theme".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub default_sort: SortKey,
    #[serde(default)]
    pub facet_mode: FacetMode,
    /// Display cells of description shown on a card
    #[serde(default = "default_excerpt_width")]
    pub excerpt_width: usize,
    /// Hex color overrides for the TUI palette, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            default_sort: SortKey::default(),
            facet_mode: FacetMode::default(),
            excerpt_width: default_excerpt_width(),
            colors: HashMap::new(),
        }
    }
}

fn default_excerpt_width() -> usize {
    120
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default)]
    pub duplicate_ids: DuplicatePolicy,
}

/// Sort order applied to the filtered view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    Az,
    Starred,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::Newest, SortKey::Oldest, SortKey::Az, SortKey::Starred];

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "newest" => Ok(SortKey::Newest),
            "oldest" => Ok(SortKey::Oldest),
            "az" => Ok(SortKey::Az),
            "starred" => Ok(SortKey::Starred),
            _ => Err(format!(
                "unknown sort '{}' (expected: newest, oldest, az, starred)",
                s
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::Az => "az",
            SortKey::Starred => "starred",
        }
    }

    /// Next key in selector order, wrapping around.
    pub fn next(self) -> Self {
        let idx = SortKey::ALL.iter().position(|k| *k == self).unwrap_or(0);
        SortKey::ALL[(idx + 1) % SortKey::ALL.len()]
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What selecting a tag facet does to the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacetMode {
    /// The tag text becomes the free-text search (it may also match titles
    /// and descriptions that contain it).
    #[default]
    FreeText,
    /// Only records carrying exactly that tag are shown.
    ExactTag,
}

/// How imported records whose id is already taken are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Prepend anyway; both records coexist.
    #[default]
    Keep,
    /// Drop the incoming record.
    Skip,
    /// Drop the existing record, keep the incoming one.
    Replace,
}
