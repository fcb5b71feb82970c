use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn as_str(&self) -> &str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }
}

/// One scanned entry, keyed by its path relative to the scan root.
///
/// Files carry the digest of their content. Directories carry the digest of
/// their relative path text, so their identity only changes on rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub path: String,
    pub size: u64,
    pub modified_time: DateTime<FixedOffset>,
    pub is_directory: bool,
    #[serde(rename = "md5")]
    pub digest: String,
}

/// Persisted per-digest snapshot of the file that produced the digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailRecord(pub FileRecord);

impl DetailRecord {
    pub fn digest(&self) -> &str {
        &self.0.digest
    }

    pub fn record(&self) -> &FileRecord {
        &self.0
    }
}

impl From<FileRecord> for DetailRecord {
    fn from(record: FileRecord) -> Self {
        Self(record)
    }
}

/// Digest → relative path mapping describing the last known state of the tree.
///
/// The digest is the primary key. Two files with identical content share one
/// entry and the one inserted last wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub files: IndexMap<String, String>,
}

impl Manifest {
    pub fn new(timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            timestamp: Some(timestamp),
            files: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, digest: String, path: String) {
        // Overwriting keeps the entry's original position.
        self.files.insert(digest, path);
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Inverts the mapping into relative path → digest.
    pub fn path_to_digest(&self) -> IndexMap<String, String> {
        self.files
            .iter()
            .map(|(digest, path)| (path.clone(), digest.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedFile {
    #[serde(rename = "filename")]
    pub path: String,
    #[serde(rename = "md5")]
    pub digest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedFile {
    #[serde(rename = "filename")]
    pub path: String,
    #[serde(rename = "last_md5")]
    pub last_digest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifiedFile {
    #[serde(rename = "filename")]
    pub path: String,
    #[serde(rename = "old_md5")]
    pub old_digest: String,
    #[serde(rename = "new_md5")]
    pub new_digest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changes {
    #[serde(default)]
    pub added: Vec<AddedFile>,
    #[serde(default)]
    pub removed: Vec<RemovedFile>,
    #[serde(default)]
    pub modified: Vec<ModifiedFile>,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}

/// One diff between two consecutive scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub timestamp: DateTime<FixedOffset>,
    pub changes: Changes,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_file_record_json_shape() {
        let record = FileRecord {
            path: "docs/a.txt".to_string(),
            size: 1,
            modified_time: ts(),
            is_directory: false,
            digest: "abc".to_string(),
        };

        let value = serde_json::to_value(DetailRecord::from(record)).unwrap();

        assert_eq!(value["path"], "docs/a.txt");
        assert_eq!(value["size"], 1);
        assert_eq!(value["isDirectory"], false);
        assert_eq!(value["md5"], "abc");
        assert_eq!(value["modifiedTime"], "2024-03-01T12:00:00+08:00");
    }

    #[test]
    fn test_manifest_last_write_wins() {
        let mut manifest = Manifest::new(ts());
        manifest.insert("d1".to_string(), "a.txt".to_string());
        manifest.insert("d2".to_string(), "b.txt".to_string());
        manifest.insert("d1".to_string(), "c.txt".to_string());

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.files["d1"], "c.txt");
        let order: Vec<_> = manifest.files.values().cloned().collect();
        assert_eq!(order, vec!["c.txt", "b.txt"]);
    }

    #[test]
    fn test_manifest_without_timestamp_parses() {
        let manifest: Manifest = serde_json::from_str(r#"{"files": {"d1": "a.txt"}}"#).unwrap();

        assert!(manifest.timestamp.is_none());
        assert_eq!(manifest.path_to_digest()["a.txt"], "d1");
    }

    #[test]
    fn test_change_set_json_shape() {
        let change_set = ChangeSet {
            timestamp: ts(),
            changes: Changes {
                added: vec![AddedFile {
                    path: "a.txt".to_string(),
                    digest: "d1".to_string(),
                }],
                removed: vec![RemovedFile {
                    path: "b.txt".to_string(),
                    last_digest: "d2".to_string(),
                }],
                modified: vec![ModifiedFile {
                    path: "c.txt".to_string(),
                    old_digest: "d3".to_string(),
                    new_digest: "d4".to_string(),
                }],
            },
        };

        let value = serde_json::to_value(&change_set).unwrap();

        assert_eq!(value["changes"]["added"][0]["filename"], "a.txt");
        assert_eq!(value["changes"]["added"][0]["md5"], "d1");
        assert_eq!(value["changes"]["removed"][0]["last_md5"], "d2");
        assert_eq!(value["changes"]["modified"][0]["old_md5"], "d3");
        assert_eq!(value["changes"]["modified"][0]["new_md5"], "d4");
        assert_eq!(change_set.changes.len(), 3);
    }
}
