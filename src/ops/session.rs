use crate::io::kv::KeyValueStore;
use crate::io::recovery::RecoveryCategory;
use crate::io::store::{ProjectStore, StoreError};
use crate::model::config::AppConfig;
use crate::model::project::{Project, ProjectDraft};
use crate::model::seed::seed_projects;
use crate::model::theme::ThemePreference;
use crate::ops::project_ops::{self, ImportReport, ProjectError};
use crate::ops::query::{self, Query};
use crate::util::time::now_iso;

/// Error type for session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("could not serialize projects: {0}")]
    Export(#[from] serde_json::Error),
}

/// The single in-memory project list for one run, plus the store it came from.
///
/// Each mutation edits a copy of the list, persists it, and only then swaps
/// it in; a failed save leaves the session unchanged. Reads always
/// come from memory; storage is only read by [`Session::open`].
pub struct Session<S> {
    store: ProjectStore<S>,
    projects: Vec<Project>,
    config: AppConfig,
}

impl<S: KeyValueStore> Session<S> {
    pub fn open(backend: S, config: AppConfig) -> Result<Self, SessionError> {
        let mut store = ProjectStore::new(backend, config.storage.clone());
        let projects = store.load()?;
        Ok(Session {
            store,
            projects,
            config,
        })
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &ProjectStore<S> {
        &self.store
    }

    pub fn find(&self, id: &str) -> Option<&Project> {
        project_ops::find_project(&self.projects, id)
    }

    /// The first project in list order, shown as the featured one.
    pub fn featured(&self) -> Option<&Project> {
        self.projects.first()
    }

    pub fn query(&self, query: &Query) -> Vec<&Project> {
        query::apply(&self.projects, query)
    }

    pub fn tag_facets(&self) -> Vec<String> {
        query::tag_facets(&self.projects)
    }

    /// A query preloaded with the configured default sort.
    pub fn default_query(&self) -> Query {
        Query::new(self.config.ui.default_sort)
    }

    /// Persist `next` and only then make it the session's list, so a failed
    /// save leaves memory and storage in step.
    fn commit(&mut self, next: Vec<Project>) -> Result<(), SessionError> {
        self.store.save(&next)?;
        self.projects = next;
        Ok(())
    }

    pub fn add(&mut self, draft: ProjectDraft) -> Result<&Project, SessionError> {
        let mut next = self.projects.clone();
        let id = project_ops::add_project(&mut next, draft)?;
        self.commit(next)?;
        tracing::info!(%id, "added project");
        Ok(&self.projects[0])
    }

    pub fn edit(&mut self, id: &str, draft: ProjectDraft) -> Result<&Project, SessionError> {
        let mut next = self.projects.clone();
        project_ops::edit_project(&mut next, id, draft)?;
        self.commit(next)?;
        tracing::info!(%id, "edited project");
        self.find(id)
            .ok_or_else(|| SessionError::from(ProjectError::NotFound(id.to_string())))
    }

    /// Remove the project. Confirmation is the caller's job.
    pub fn delete(&mut self, id: &str) -> Result<Vec<Project>, SessionError> {
        let mut next = self.projects.clone();
        let removed = project_ops::delete_project(&mut next, id)?;
        let body = serde_json::to_string_pretty(&removed)?;
        self.commit(next)?;
        self.store
            .log_discarded(RecoveryCategory::Delete, format!("project {} deleted", id), body);
        tracing::info!(%id, "deleted project");
        Ok(removed)
    }

    pub fn toggle_star(&mut self, id: &str) -> Result<bool, SessionError> {
        let mut next = self.projects.clone();
        let starred = project_ops::toggle_star(&mut next, id)?;
        self.commit(next)?;
        tracing::info!(%id, starred, "toggled star");
        Ok(starred)
    }

    /// Prepend the records in `text`. A rejected payload or a failed save
    /// leaves the list and storage untouched.
    pub fn import_json(&mut self, text: &str) -> Result<ImportReport, SessionError> {
        let incoming = project_ops::parse_import(text).map_err(ProjectError::from)?;
        let mut next = self.projects.clone();
        let report =
            project_ops::merge_import(&mut next, incoming, self.config.import.duplicate_ids);
        self.commit(next)?;
        tracing::info!(
            imported = report.imported,
            skipped = report.skipped,
            replaced = report.replaced,
            "imported projects"
        );
        Ok(report)
    }

    pub fn export_json(&self) -> Result<String, SessionError> {
        Ok(project_ops::export_json(&self.projects)?)
    }

    /// Replace the whole list with the seed set. Confirmation is the caller's job.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        let previous = serde_json::to_string_pretty(&self.projects)?;
        self.commit(seed_projects(&now_iso()))?;
        self.store
            .log_discarded(RecoveryCategory::Reset, "list reset to sample projects".into(), previous);
        tracing::info!("reset to sample projects");
        Ok(())
    }

    pub fn theme(&self) -> Result<ThemePreference, SessionError> {
        Ok(self.store.theme()?)
    }

    pub fn set_theme(&mut self, theme: ThemePreference) -> Result<(), SessionError> {
        self.store.set_theme(theme)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::kv::{DirStore, KvError, MemoryStore};
    use crate::io::recovery::read_recovery_entries;
    use crate::model::config::DuplicatePolicy;
    use tempfile::TempDir;

    fn session() -> Session<MemoryStore> {
        Session::open(MemoryStore::new(), AppConfig::default()).unwrap()
    }

    fn stored(session: &Session<MemoryStore>) -> Vec<Project> {
        let raw = session
            .store()
            .backend()
            .get("folio_portfolio_v2")
            .unwrap()
            .unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    fn draft(title: &str) -> ProjectDraft {
        ProjectDraft {
            title: title.into(),
            description: "desc".into(),
            ..Default::default()
        }
    }

    /// Accepts a fixed number of writes, then fails every later one.
    struct FailingStore {
        inner: MemoryStore,
        writes_left: usize,
    }

    impl KeyValueStore for FailingStore {
        fn get(&self, key: &str) -> Result<Option<String>, KvError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), KvError> {
            if self.writes_left == 0 {
                return Err(KvError::Write {
                    path: key.into(),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.writes_left -= 1;
            self.inner.set(key, value)
        }
    }

    #[test]
    fn failed_save_keeps_memory_in_step_with_storage() {
        // The only accepted write is the seeding one in `open`
        let store = FailingStore {
            inner: MemoryStore::new(),
            writes_left: 1,
        };
        let mut s = Session::open(store, AppConfig::default()).unwrap();
        let before = s.projects().to_vec();

        assert!(s.add(draft("One")).is_err());
        assert!(s.add(draft("One")).is_err());
        assert!(s.edit("p-rcm", draft("Renamed")).is_err());
        assert!(s.toggle_star("p-rcm").is_err());
        assert!(s.delete("p-rcm").is_err());
        assert!(s
            .import_json(r#"[{"id":"x","title":"T","description":"D"}]"#)
            .is_err());
        assert!(s.reset().is_err());

        assert_eq!(s.projects(), &before[..]);
        let raw = s.store().backend().get("folio_portfolio_v2").unwrap().unwrap();
        let stored: Vec<Project> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, before);
    }

    #[test]
    fn every_mutation_is_persisted() {
        let mut s = session();
        let id = s.add(draft("One")).unwrap().id.clone();
        assert_eq!(stored(&s), s.projects());

        s.edit(&id, draft("Uno")).unwrap();
        assert_eq!(stored(&s)[0].title, "Uno");

        s.toggle_star(&id).unwrap();
        assert!(stored(&s)[0].starred);

        s.delete(&id).unwrap();
        assert_eq!(stored(&s).len(), 2);

        s.import_json(r#"[{"id":"x","title":"T","description":"D","tags":[]}]"#)
            .unwrap();
        assert_eq!(stored(&s)[0].id, "x");

        s.reset().unwrap();
        assert_eq!(stored(&s).len(), 2);
        assert_eq!(s.projects().len(), 2);
    }

    #[test]
    fn failed_import_leaves_state_alone() {
        let mut s = session();
        let before = s.projects().to_vec();
        let err = s.import_json(r#"{"not":"an array"}"#).unwrap_err();
        assert!(err.to_string().starts_with("failed to import JSON"));
        assert_eq!(s.projects(), &before[..]);
        assert_eq!(stored(&s), before);
    }

    #[test]
    fn failed_add_leaves_state_alone() {
        let mut s = session();
        assert!(s.add(draft("")).is_err());
        assert_eq!(s.projects().len(), 2);
        assert_eq!(stored(&s).len(), 2);
    }

    #[test]
    fn import_uses_configured_duplicate_policy() {
        let mut config = AppConfig::default();
        config.import.duplicate_ids = DuplicatePolicy::Skip;
        let mut s = Session::open(MemoryStore::new(), config).unwrap();
        let report = s
            .import_json(r#"[{"id":"p-rcm","title":"Dup","description":"D"}]"#)
            .unwrap();
        assert_eq!(report.imported, 0);
        assert_eq!(report.skipped, 1);
        assert_eq!(s.projects().len(), 2);
    }

    #[test]
    fn delete_and_reset_are_logged_for_recovery() {
        let tmp = TempDir::new().unwrap();
        let mut s = Session::open(DirStore::new(tmp.path()), AppConfig::default()).unwrap();
        s.delete("p-rcm").unwrap();
        s.reset().unwrap();

        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category, RecoveryCategory::Reset);
        assert!(entries[0].body.contains("p-nlp"));
        assert_eq!(entries[1].category, RecoveryCategory::Delete);
        assert!(entries[1].body.contains("Healthcare RCM Pipeline"));
    }

    #[test]
    fn reopen_reads_persisted_list() {
        let tmp = TempDir::new().unwrap();
        {
            let mut s = Session::open(DirStore::new(tmp.path()), AppConfig::default()).unwrap();
            s.add(draft("Kept")).unwrap();
        }
        let s = Session::open(DirStore::new(tmp.path()), AppConfig::default()).unwrap();
        assert_eq!(s.projects().len(), 3);
        assert_eq!(s.featured().unwrap().title, "Kept");
    }

    #[test]
    fn theme_round_trip() {
        let mut s = session();
        assert_eq!(s.theme().unwrap(), ThemePreference::Light);
        s.set_theme(ThemePreference::Dark).unwrap();
        assert_eq!(s.theme().unwrap(), ThemePreference::Dark);
    }
}
