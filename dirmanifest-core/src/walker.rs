//! Directory tree enumeration with hidden-entry and metadata-folder filtering.

use crate::config::ManifestConfig;
use crate::error::{Error, Result};
use crate::models::EntryKind;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

pub struct Walker {
    root: PathBuf,
    hidden_prefix: String,
    ignored_dirs: Vec<String>,
    excluded: Vec<PathBuf>,
}

impl Walker {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            hidden_prefix: ".".to_string(),
            ignored_dirs: vec![".git".to_string()],
            excluded: Vec::new(),
        }
    }

    /// Walker configured from `config`, with the data directory excluded.
    pub fn from_config<P: Into<PathBuf>>(root: P, config: &ManifestConfig) -> Self {
        let root = root.into();
        let data_dir = config.layout(&root).data_dir;
        Self::new(root)
            .with_hidden_prefix(config.hidden_prefix.clone())
            .with_ignored_dirs(config.ignored_dirs.clone())
            .exclude(data_dir)
    }

    pub fn with_hidden_prefix(mut self, prefix: String) -> Self {
        self.hidden_prefix = prefix;
        self
    }

    pub fn with_ignored_dirs(mut self, dirs: Vec<String>) -> Self {
        self.ignored_dirs = dirs;
        self
    }

    pub fn exclude<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.excluded.push(path.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily yields every entry below the root, directories included.
    ///
    /// Siblings come out in file-name order. Symbolic links are classified by
    /// their target but never recursed into.
    pub fn entries(&self) -> impl Iterator<Item = Result<WalkEntry>> + '_ {
        let excluded = self.canonical_excluded();
        WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !self.should_skip(entry, &excluded))
            .filter_map(|entry| Self::classify(entry).transpose())
    }

    /// Excluded paths that exist, resolved through `..` and symlinks.
    fn canonical_excluded(&self) -> Vec<PathBuf> {
        self.excluded
            .iter()
            .filter_map(|path| fs::canonicalize(path).ok())
            .collect()
    }

    fn should_skip(&self, entry: &DirEntry, canonical_excluded: &[PathBuf]) -> bool {
        if entry.depth() == 0 {
            return false;
        }

        let name = entry.file_name().to_string_lossy();

        if !self.hidden_prefix.is_empty() && name.starts_with(self.hidden_prefix.as_str()) {
            return true;
        }

        if entry.file_type().is_dir() && self.ignored_dirs.iter().any(|d| d.as_str() == name) {
            return true;
        }

        if self.excluded.iter().any(|p| p.as_path() == entry.path()) {
            return true;
        }

        entry.file_type().is_dir()
            && !canonical_excluded.is_empty()
            && fs::canonicalize(entry.path())
                .map(|path| canonical_excluded.contains(&path))
                .unwrap_or(false)
    }

    fn classify(entry: walkdir::Result<DirEntry>) -> Result<Option<WalkEntry>> {
        let entry = entry?;
        let file_type = entry.file_type();

        let kind = if file_type.is_dir() {
            Some(EntryKind::Directory)
        } else if file_type.is_file() {
            Some(EntryKind::File)
        } else if file_type.is_symlink() {
            let metadata = fs::metadata(entry.path()).map_err(|source| Error::Unreadable {
                path: entry.path().to_path_buf(),
                source,
            })?;
            if metadata.is_dir() {
                Some(EntryKind::Directory)
            } else if metadata.is_file() {
                Some(EntryKind::File)
            } else {
                None
            }
        } else {
            None
        };

        if kind.is_none() {
            tracing::debug!("Skipping special file {:?}", entry.path());
        }

        Ok(kind.map(|kind| WalkEntry {
            path: entry.into_path(),
            kind,
        }))
    }
}
