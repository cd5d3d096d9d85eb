use crate::io::kv::{KeyValueStore, KvError};
use crate::io::recovery::{RecoveryCategory, RecoveryEntry, log_recovery};
use crate::model::config::StorageConfig;
use crate::model::project::Project;
use crate::model::seed::seed_projects;
use crate::model::theme::ThemePreference;
use crate::util::time::now_iso;

/// Error type for project store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Backend(#[from] KvError),
    #[error("could not serialize projects: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Loads and saves the project list and theme preference through a
/// [`KeyValueStore`] under fixed keys.
pub struct ProjectStore<S> {
    backend: S,
    keys: StorageConfig,
}

impl<S: KeyValueStore> ProjectStore<S> {
    pub fn new(backend: S, keys: StorageConfig) -> Self {
        ProjectStore { backend, keys }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Read the stored list. A missing or unreadable payload is replaced by
    /// the seed set, which is persisted before being returned.
    pub fn load(&mut self) -> Result<Vec<Project>, StoreError> {
        let raw = match self.backend.get(&self.keys.projects_key)? {
            Some(raw) => raw,
            None => {
                tracing::debug!(key = %self.keys.projects_key, "no stored projects, seeding");
                return self.reseed();
            }
        };

        match serde_json::from_str::<Vec<Project>>(&raw) {
            Ok(list) => {
                tracing::debug!(count = list.len(), "loaded projects");
                Ok(list)
            }
            Err(e) => {
                tracing::warn!(error = %e, key = %self.keys.projects_key, "stored projects unreadable, reseeding");
                if let Some(dir) = self.backend.data_dir() {
                    log_recovery(
                        dir,
                        RecoveryEntry::now(
                            RecoveryCategory::Corrupt,
                            format!("{} unreadable ({}), replaced by sample projects", self.keys.projects_key, e),
                            raw,
                        ),
                    );
                }
                self.reseed()
            }
        }
    }

    /// Overwrite the stored list with `list`.
    pub fn save(&mut self, list: &[Project]) -> Result<(), StoreError> {
        let payload = serde_json::to_string(list)?;
        if let Err(e) = self.backend.set(&self.keys.projects_key, &payload) {
            if let Some(dir) = self.backend.data_dir() {
                log_recovery(
                    dir,
                    RecoveryEntry::now(
                        RecoveryCategory::Write,
                        format!("save of {} failed: {}", self.keys.projects_key, e),
                        payload,
                    ),
                );
            }
            return Err(e.into());
        }
        tracing::debug!(count = list.len(), "saved projects");
        Ok(())
    }

    fn reseed(&mut self) -> Result<Vec<Project>, StoreError> {
        let seed = seed_projects(&now_iso());
        self.save(&seed)?;
        Ok(seed)
    }

    pub fn theme(&self) -> Result<ThemePreference, StoreError> {
        Ok(self
            .backend
            .get(&self.keys.theme_key)?
            .map(|s| ThemePreference::from_stored(&s))
            .unwrap_or_default())
    }

    pub fn set_theme(&mut self, theme: ThemePreference) -> Result<(), StoreError> {
        self.backend.set(&self.keys.theme_key, theme.as_str())?;
        Ok(())
    }

    /// Append a copy of data about to be discarded to the recovery log.
    pub fn log_discarded(&self, category: RecoveryCategory, description: String, body: String) {
        if let Some(dir) = self.backend.data_dir() {
            log_recovery(dir, RecoveryEntry::now(category, description, body));
        }
    }
}
