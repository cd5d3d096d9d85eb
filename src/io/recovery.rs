use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Size past which the log is trimmed before the next append (1 MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Default number of days before entries are prunable.
pub const PRUNE_AGE_DAYS: i64 = 30;

/// Self-documenting header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- folio recovery log: append-only copies of data folio replaced or removed.
     If a project went missing, check here.
     View with: fo recovery
     Prune old entries: fo recovery prune
     Safe to delete. -->

---
";

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Category of a recovery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// Stored payload could not be parsed and was replaced by the seed set
    Corrupt,
    /// A project was deleted
    Delete,
    /// The whole list was replaced by the seed set
    Reset,
    /// A save failed; the unsaved payload is kept here
    Write,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Corrupt => write!(f, "corrupt"),
            RecoveryCategory::Delete => write!(f, "delete"),
            RecoveryCategory::Reset => write!(f, "reset"),
            RecoveryCategory::Write => write!(f, "write"),
        }
    }
}

impl RecoveryCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "corrupt" => Some(RecoveryCategory::Corrupt),
            "delete" => Some(RecoveryCategory::Delete),
            "reset" => Some(RecoveryCategory::Reset),
            "write" => Some(RecoveryCategory::Write),
            _ => None,
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub body: String,
}

impl RecoveryEntry {
    pub fn now(category: RecoveryCategory, description: impl Into<String>, body: String) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            body,
        }
    }

    /// Format this entry as a markdown block for the recovery log.
    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} {}: {}\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        );

        if !self.body.is_empty() {
            out.push('\n');
            out.push_str("```json\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }

        out.push('\n');
        out.push_str("---\n");
        out
    }
}

/// Return the path to the recovery log file.
pub fn recovery_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".recovery.log")
}

// ---------------------------------------------------------------------------
// Atomic file write
// ---------------------------------------------------------------------------

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append a recovery entry to the log. Failures are reported through tracing only.
pub fn log_recovery(data_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(data_dir, &entry) {
        tracing::warn!(error = %e, category = %entry.category, "could not write to recovery log");
    }
}

fn log_recovery_inner(data_dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    std::fs::create_dir_all(data_dir)?;
    let path = recovery_log_path(data_dir);

    if let Ok(meta) = std::fs::metadata(&path)
        && meta.len() > MAX_LOG_SIZE
        && let Err(e) = trim_log(&path)
    {
        tracing::warn!(error = %e, "could not trim recovery log");
    }

    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

/// Drop entries older than [`PRUNE_AGE_DAYS`], then the oldest remaining
/// ones until the log is at most half of [`MAX_LOG_SIZE`].
fn trim_log(path: &Path) -> io::Result<()> {
    let content = std::fs::read_to_string(path)?;
    let cutoff = Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS);
    let (header, mut chunks) = split_entries(&content);
    chunks.retain(|(ts, _)| ts.is_some_and(|ts| ts >= cutoff));

    let budget = (MAX_LOG_SIZE / 2) as usize;
    let mut size = header.len() + chunks.iter().map(|(_, c)| c.len()).sum::<usize>();
    let mut keep_from = 0;
    while size > budget && keep_from < chunks.len() {
        size -= chunks[keep_from].1.len();
        keep_from += 1;
    }

    let mut out = header;
    for (_, chunk) in &chunks[keep_from..] {
        out.push_str(chunk);
    }
    tracing::debug!(dropped = keep_from, "trimmed recovery log");
    atomic_write(path, out.as_bytes())
}

/// Split raw log text into the file header and one chunk per entry, each
/// chunk tagged with its parsed timestamp.
fn split_entries(content: &str) -> (String, Vec<(Option<DateTime<Utc>>, String)>) {
    let mut header = String::new();
    let mut chunks: Vec<(Option<DateTime<Utc>>, String)> = Vec::new();

    for line in content.lines() {
        if let Some(stripped) = line.strip_prefix("## ") {
            let ts = parse_entry_header(stripped).map(|(ts, _, _)| ts);
            chunks.push((ts, String::new()));
        }
        let target = match chunks.last_mut() {
            Some((_, chunk)) => chunk,
            None => &mut header,
        };
        target.push_str(line);
        target.push('\n');
    }
    (header, chunks)
}

/// Remove entries older than `before` (default: [`PRUNE_AGE_DAYS`] ago), or
/// every entry with `all`. Returns the number of entries removed.
pub fn prune_recovery(
    data_dir: &Path,
    before: Option<DateTime<Utc>>,
    all: bool,
) -> io::Result<usize> {
    let path = recovery_log_path(data_dir);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let (header, chunks) = split_entries(&content);
    let total = chunks.len();
    let cutoff = before.unwrap_or_else(|| Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS));

    let mut out = if header.is_empty() {
        FILE_HEADER.to_string()
    } else {
        header
    };
    let mut kept = 0;
    if !all {
        for (_, chunk) in chunks.iter().filter(|(ts, _)| ts.is_some_and(|ts| ts >= cutoff)) {
            out.push_str(chunk);
            kept += 1;
        }
    }
    atomic_write(&path, out.as_bytes())?;
    Ok(total - kept)
}

// ---------------------------------------------------------------------------
// Reading entries
// ---------------------------------------------------------------------------

/// Read recovery entries, most recent first, keeping at most `limit`.
pub fn read_recovery_entries(data_dir: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let content = match std::fs::read_to_string(recovery_log_path(data_dir)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let mut entries = parse_entries(&content);
    if let Some(n) = limit {
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
    }
    entries.reverse();
    entries
}

/// Parse all entries from the log content string (oldest first).
fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some(header) = line.strip_prefix("## ") else {
            continue;
        };
        let Some((timestamp, category, description)) = parse_entry_header(header) else {
            continue;
        };

        let mut body = String::new();
        let mut in_code_block = false;
        for line in lines.by_ref() {
            if in_code_block {
                if line == "```" {
                    in_code_block = false;
                } else {
                    if !body.is_empty() {
                        body.push('\n');
                    }
                    body.push_str(line);
                }
                continue;
            }
            if line == "---" {
                break;
            }
            if line.starts_with("```") {
                in_code_block = true;
            }
        }

        entries.push(RecoveryEntry {
            timestamp,
            category,
            description,
            body,
        });
    }

    entries
}

/// Parse an entry header: `<timestamp> <category>: <description>`
fn parse_entry_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (timestamp_str, rest) = header.split_once(' ')?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .ok()?
        .with_timezone(&Utc);
    let (category_str, description) = rest.split_once(": ")?;
    let category = RecoveryCategory::parse_category(category_str)?;
    Some((timestamp, category, description.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_entry(category: RecoveryCategory, desc: &str, body: &str) -> RecoveryEntry {
        RecoveryEntry {
            timestamp: DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            category,
            description: desc.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_atomic_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("test.txt");

        atomic_write(&path, b"hello world").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello world");

        atomic_write(&path, b"goodbye").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "goodbye");
    }

    #[test]
    fn test_entry_markdown() {
        let entry = make_entry(RecoveryCategory::Corrupt, "unreadable payload", "not json");
        let md = entry.to_markdown();
        assert!(md.starts_with("## 2025-06-01T12:00:00Z corrupt: unreadable payload\n"));
        assert!(md.contains("```json\nnot json\n```\n"));
        assert!(md.ends_with("---\n"));
    }

    #[test]
    fn test_log_and_read_back() {
        let tmp = TempDir::new().unwrap();
        log_recovery(
            tmp.path(),
            make_entry(RecoveryCategory::Delete, "project x deleted", "{\"id\":\"x\"}"),
        );
        log_recovery(
            tmp.path(),
            make_entry(RecoveryCategory::Reset, "list reset", "[]"),
        );

        let content = std::fs::read_to_string(recovery_log_path(tmp.path())).unwrap();
        assert!(content.starts_with("<!-- folio recovery log"));

        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 2);
        // Most recent first
        assert_eq!(entries[0].category, RecoveryCategory::Reset);
        assert_eq!(entries[1].category, RecoveryCategory::Delete);
        assert_eq!(entries[1].description, "project x deleted");
        assert_eq!(entries[1].body, "{\"id\":\"x\"}");
    }

    #[test]
    fn test_read_with_limit() {
        let tmp = TempDir::new().unwrap();
        for i in 0..3 {
            log_recovery(
                tmp.path(),
                make_entry(RecoveryCategory::Write, &format!("save {}", i), ""),
            );
        }
        let entries = read_recovery_entries(tmp.path(), Some(2));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "save 2");
        assert_eq!(entries[1].description, "save 1");
    }

    fn entry_at(ts: &str, desc: &str, body: &str) -> RecoveryEntry {
        RecoveryEntry {
            timestamp: DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc),
            category: RecoveryCategory::Delete,
            description: desc.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_prune_before_cutoff() {
        let tmp = TempDir::new().unwrap();
        log_recovery(tmp.path(), entry_at("2024-01-01T00:00:00Z", "old", "{}"));
        log_recovery(tmp.path(), entry_at("2025-06-01T00:00:00Z", "new", "{}"));

        let cutoff = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(prune_recovery(tmp.path(), Some(cutoff), false).unwrap(), 1);

        let content = std::fs::read_to_string(recovery_log_path(tmp.path())).unwrap();
        assert!(content.starts_with("<!-- folio recovery log"));
        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "new");
    }

    #[test]
    fn test_prune_all_keeps_header() {
        let tmp = TempDir::new().unwrap();
        log_recovery(tmp.path(), make_entry(RecoveryCategory::Reset, "a", ""));
        log_recovery(tmp.path(), make_entry(RecoveryCategory::Reset, "b", ""));
        assert_eq!(prune_recovery(tmp.path(), None, true).unwrap(), 2);
        assert!(read_recovery_entries(tmp.path(), None).is_empty());
        assert_eq!(
            std::fs::read_to_string(recovery_log_path(tmp.path())).unwrap(),
            FILE_HEADER
        );
    }

    #[test]
    fn test_prune_missing_log_is_noop() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(prune_recovery(tmp.path(), None, false).unwrap(), 0);
        assert!(!recovery_log_path(tmp.path()).exists());
    }

    #[test]
    fn test_oversized_log_is_trimmed_on_append() {
        let tmp = TempDir::new().unwrap();
        let big = "x".repeat(200_000);
        let now = Utc::now();
        for i in 0..6 {
            log_recovery(
                tmp.path(),
                RecoveryEntry {
                    timestamp: now,
                    category: RecoveryCategory::Reset,
                    description: format!("reset {}", i),
                    body: big.clone(),
                },
            );
        }
        // Over the cap now; the next append trims the oldest entries first
        let path = recovery_log_path(tmp.path());
        assert!(std::fs::metadata(&path).unwrap().len() > MAX_LOG_SIZE);
        log_recovery(
            tmp.path(),
            RecoveryEntry::now(RecoveryCategory::Delete, "latest", "{}".into()),
        );

        assert!(std::fs::metadata(&path).unwrap().len() <= MAX_LOG_SIZE);
        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries[0].description, "latest");
        assert_eq!(entries[1].description, "reset 5");
        assert!(entries.iter().all(|e| e.description != "reset 0"));
    }

    #[test]
    fn test_trim_drops_entries_past_age() {
        let tmp = TempDir::new().unwrap();
        log_recovery(tmp.path(), entry_at("2020-01-01T00:00:00Z", "ancient", "{}"));
        log_recovery(
            tmp.path(),
            RecoveryEntry::now(RecoveryCategory::Delete, "recent", "{}".into()),
        );
        trim_log(&recovery_log_path(tmp.path())).unwrap();
        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "recent");
    }

    #[test]
    fn test_read_missing_log() {
        let tmp = TempDir::new().unwrap();
        assert!(read_recovery_entries(tmp.path(), None).is_empty());
    }
}
