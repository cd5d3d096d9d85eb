use std::collections::HashSet;

use chrono::Utc;

use crate::model::config::DuplicatePolicy;
use crate::model::project::{DraftError, Project, ProjectDraft};
use crate::util::time::now_iso;

/// Error type for list mutations
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("project not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Invalid(#[from] DraftError),
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Why an import payload was rejected
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to import JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to import JSON: expected an array of projects")]
    NotAnArray,
    #[error("failed to import JSON: entry {index} is not a project object")]
    NotAnObject { index: usize },
    #[error("failed to import JSON: entry {index}: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of merging an import into the list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Records prepended to the list
    pub imported: usize,
    /// Incoming records dropped under [`DuplicatePolicy::Skip`]
    pub skipped: usize,
    /// Existing records removed under [`DuplicatePolicy::Replace`]
    pub replaced: usize,
}

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// Millisecond timestamp id, bumped past any id already in the list.
pub fn new_id(list: &[Project]) -> String {
    let mut candidate = Utc::now().timestamp_millis();
    loop {
        let id = candidate.to_string();
        if !list.iter().any(|p| p.id == id) {
            return id;
        }
        candidate += 1;
    }
}

pub fn find_project<'a>(list: &'a [Project], id: &str) -> Option<&'a Project> {
    list.iter().find(|p| p.id == id)
}

fn require_present(list: &[Project], id: &str) -> Result<(), ProjectError> {
    if list.iter().any(|p| p.id == id) {
        Ok(())
    } else {
        Err(ProjectError::NotFound(id.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Validate the draft and insert a new unstarred record at the head.
/// Returns the new id.
pub fn add_project(list: &mut Vec<Project>, draft: ProjectDraft) -> Result<String, ProjectError> {
    let draft = draft.validated()?;
    let id = new_id(list);
    list.insert(0, Project::from_draft(id.clone(), draft, now_iso()));
    Ok(id)
}

/// Overwrite the editable fields of every record carrying `id` and stamp `updatedAt`.
pub fn edit_project(
    list: &mut [Project],
    id: &str,
    draft: ProjectDraft,
) -> Result<(), ProjectError> {
    require_present(list, id)?;
    let draft = draft.validated()?;
    let stamp = now_iso();
    for p in list.iter_mut().filter(|p| p.id == id) {
        p.apply_draft(draft.clone(), stamp.clone());
    }
    Ok(())
}

/// Remove every record carrying `id`, keeping the rest in order. Returns the removed records.
pub fn delete_project(list: &mut Vec<Project>, id: &str) -> Result<Vec<Project>, ProjectError> {
    require_present(list, id)?;
    let (removed, kept): (Vec<Project>, Vec<Project>) =
        std::mem::take(list).into_iter().partition(|p| p.id == id);
    *list = kept;
    Ok(removed)
}

/// Flip `starred` on every record carrying `id`. Returns the new value of the first one.
pub fn toggle_star(list: &mut [Project], id: &str) -> Result<bool, ProjectError> {
    require_present(list, id)?;
    let mut first = None;
    for p in list.iter_mut().filter(|p| p.id == id) {
        p.starred = !p.starred;
        first.get_or_insert(p.starred);
    }
    Ok(first.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Import / export
// ---------------------------------------------------------------------------

/// Parse an import payload: a JSON array of project objects, taken verbatim.
pub fn parse_import(text: &str) -> Result<Vec<Project>, ImportError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(ImportError::Parse)?;
    let serde_json::Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(ImportError::NotAnObject { index });
            }
            serde_json::from_value(item).map_err(|source| ImportError::InvalidEntry { index, source })
        })
        .collect()
}

/// Prepend `incoming` (in payload order) to the list under the duplicate-id policy.
pub fn merge_import(
    list: &mut Vec<Project>,
    incoming: Vec<Project>,
    policy: DuplicatePolicy,
) -> ImportReport {
    let mut report = ImportReport::default();
    let incoming = match policy {
        DuplicatePolicy::Keep => incoming,
        DuplicatePolicy::Skip => {
            let mut seen: HashSet<String> = list.iter().map(|p| p.id.clone()).collect();
            let total = incoming.len();
            let kept: Vec<Project> = incoming
                .into_iter()
                .filter(|p| seen.insert(p.id.clone()))
                .collect();
            report.skipped = total - kept.len();
            kept
        }
        DuplicatePolicy::Replace => {
            // The last occurrence in the payload wins
            let mut seen = HashSet::new();
            let mut kept: Vec<Project> = incoming
                .into_iter()
                .rev()
                .filter(|p| seen.insert(p.id.clone()))
                .collect();
            kept.reverse();
            let before = list.len();
            list.retain(|p| !seen.contains(&p.id));
            report.replaced = before - list.len();
            kept
        }
    };
    report.imported = incoming.len();
    list.splice(0..0, incoming);
    report
}

/// Serialize the full list, pretty-printed, for the export file.
pub fn export_json(list: &[Project]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(list)
}
