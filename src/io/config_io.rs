use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Resolve the data directory: explicit override, then `$FOLIO_DIR`,
/// then `$XDG_DATA_HOME/folio`, then `~/.local/share/folio`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(dir) = non_empty_env("FOLIO_DIR") {
        return PathBuf::from(dir);
    }
    let data_home = non_empty_env("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| dirs_home().join(".local").join("share"));
    data_home.join("folio")
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Read `config.toml` from the data directory. A missing file yields the
/// defaults; a malformed one is an error.
pub fn read_config(data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = config_path(data_dir);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    toml::from_str(&text).map_err(|e| ConfigError::ParseError { path, source: e })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::SortKey;
    use tempfile::TempDir;

    #[test]
    fn explicit_dir_wins() {
        let dir = resolve_data_dir(Some(Path::new("/tmp/folio-x")));
        assert_eq!(dir, PathBuf::from("/tmp/folio-x"));
    }

    #[test]
    fn missing_config_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.ui.default_sort, SortKey::Newest);
    }

    #[test]
    fn reads_config_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(config_path(tmp.path()), "[ui]\ndefault_sort = \"oldest\"\n").unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.ui.default_sort, SortKey::Oldest);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(config_path(tmp.path()), "[ui\nbroken").unwrap();
        let err = read_config(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}
