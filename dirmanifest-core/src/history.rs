use crate::error::{Error, Result};
use crate::models::ChangeSet;
use crate::storage::write_json_atomic;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Append-only log of change sets, persisted as one JSON array.
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the history. A missing or unparsable file yields an empty
    /// history; the latter is replaced on the next append.
    pub fn load(&self) -> Result<Vec<ChangeSet>> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(Error::Unreadable {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_slice(&content) {
            Ok(history) => Ok(history),
            Err(e) => {
                tracing::warn!(
                    "Discarding malformed change history at {:?}: {}",
                    self.path,
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Appends `change_set` unless it is empty. Returns whether it was written.
    pub fn append(&self, change_set: &ChangeSet) -> Result<bool> {
        self.append_to(self.load()?, change_set)
    }

    /// Like [`append`](Self::append), but extends a history that was loaded
    /// earlier instead of reading the file again.
    pub fn append_to(&self, mut history: Vec<ChangeSet>, change_set: &ChangeSet) -> Result<bool> {
        if change_set.is_empty() {
            tracing::debug!("No changes detected, history left untouched");
            return Ok(false);
        }

        history.push(change_set.clone());
        write_json_atomic(&self.path, &history)?;

        tracing::info!(
            "Recorded {} change(s), history now holds {} entries",
            change_set.changes.len(),
            history.len()
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddedFile, Changes};
    use chrono::{FixedOffset, TimeZone};
    use tempfile::TempDir;

    fn change_set(path: &str) -> ChangeSet {
        ChangeSet {
            timestamp: FixedOffset::east_opt(8 * 3600)
                .unwrap()
                .with_ymd_and_hms(2024, 2, 2, 10, 0, 0)
                .unwrap(),
            changes: Changes {
                added: vec![AddedFile {
                    path: path.to_string(),
                    digest: "d".to_string(),
                }],
                ..Changes::default()
            },
        }
    }

    #[test]
    fn test_append_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let log = HistoryLog::new(temp_dir.path().join("changes.json"));

        assert!(log.load().unwrap().is_empty());
        assert!(log.append(&change_set("a.txt")).unwrap());
        assert!(log.append(&change_set("b.txt")).unwrap());

        let history = log.load().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].changes.added[0].path, "a.txt");
        assert_eq!(history[1].changes.added[0].path, "b.txt");
    }

    #[test]
    fn test_empty_change_set_not_appended() {
        let temp_dir = TempDir::new().unwrap();
        let log = HistoryLog::new(temp_dir.path().join("changes.json"));
        let mut empty = change_set("a.txt");
        empty.changes = Changes::default();

        assert!(!log.append(&empty).unwrap());
        assert!(!log.path().exists());
    }

    #[test]
    fn test_append_to_preloaded_history() {
        let temp_dir = TempDir::new().unwrap();
        let log = HistoryLog::new(temp_dir.path().join("changes.json"));
        log.append(&change_set("a.txt")).unwrap();

        let history = log.load().unwrap();
        assert!(log.append_to(history, &change_set("b.txt")).unwrap());

        let paths: Vec<_> = log
            .load()
            .unwrap()
            .iter()
            .map(|c| c.changes.added[0].path.clone())
            .collect();
        assert_eq!(paths, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_unreadable_history_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let log = HistoryLog::new(temp_dir.path().join("changes.json"));
        fs::create_dir(log.path()).unwrap();

        assert!(matches!(log.load(), Err(Error::Unreadable { .. })));
    }

    #[test]
    fn test_malformed_history_starts_fresh() {
        let temp_dir = TempDir::new().unwrap();
        let log = HistoryLog::new(temp_dir.path().join("changes.json"));
        fs::write(log.path(), "[{\"broken\":").unwrap();

        assert!(log.load().unwrap().is_empty());
        assert!(log.append(&change_set("a.txt")).unwrap());
        assert_eq!(log.load().unwrap().len(), 1);
    }
}
