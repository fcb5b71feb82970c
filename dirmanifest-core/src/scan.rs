use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::hasher::Hasher;
use crate::models::{EntryKind, FileRecord, Manifest};
use crate::walker::Walker;
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::{Component, Path};

impl EntryKind {
    /// Identity key for an entry of this kind: content digest for files,
    /// digest of the relative path text for directories.
    pub fn identity(&self, hasher: &Hasher, absolute: &Path, relative: &str) -> Result<String> {
        match self {
            EntryKind::File => hasher.hash_file(absolute),
            EntryKind::Directory => Ok(hasher.hash_bytes(relative.as_bytes())),
        }
    }
}

/// Result of one full pass over the tree, in walk order.
#[derive(Debug, Clone, Default)]
pub struct Scan {
    pub records: Vec<FileRecord>,
}

impl Scan {
    pub fn files(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter().filter(|r| !r.is_directory)
    }

    pub fn directories(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter().filter(|r| r.is_directory)
    }

    /// Relative path → digest for every non-directory record.
    pub fn path_to_digest(&self) -> IndexMap<String, String> {
        self.files()
            .map(|r| (r.path.clone(), r.digest.clone()))
            .collect()
    }

    /// Digests of every non-directory record.
    pub fn digests(&self) -> HashSet<String> {
        self.files().map(|r| r.digest.clone()).collect()
    }

    pub fn to_manifest(&self, timestamp: DateTime<FixedOffset>) -> Manifest {
        let mut manifest = Manifest::new(timestamp);
        for record in self.files() {
            manifest.insert(record.digest.clone(), record.path.clone());
        }
        manifest
    }
}

pub struct Scanner<'a, C: Clock> {
    walker: &'a Walker,
    hasher: &'a Hasher,
    clock: &'a C,
}

impl<'a, C: Clock> Scanner<'a, C> {
    pub fn new(walker: &'a Walker, hasher: &'a Hasher, clock: &'a C) -> Self {
        Self {
            walker,
            hasher,
            clock,
        }
    }

    /// Walks and hashes the whole tree. Any unreadable entry aborts the scan.
    pub fn scan(&self) -> Result<Scan> {
        let root = self.walker.root();
        let mut records = Vec::new();

        for entry in self.walker.entries() {
            let entry = entry?;
            let relative = relative_path(root, &entry.path)?;
            let metadata = std::fs::metadata(&entry.path).map_err(|source| Error::Unreadable {
                path: entry.path.clone(),
                source,
            })?;
            let modified = metadata.modified().map_err(|source| Error::Unreadable {
                path: entry.path.clone(),
                source,
            })?;

            let digest = entry.kind.identity(self.hasher, &entry.path, &relative)?;
            let size = if entry.kind.is_directory() {
                0
            } else {
                metadata.len()
            };

            tracing::trace!("{} {} {}", entry.kind.as_str(), digest, relative);

            records.push(FileRecord {
                path: relative,
                size,
                modified_time: self.clock.localize(modified),
                is_directory: entry.kind.is_directory(),
                digest,
            });
        }

        tracing::debug!("Scanned {} entries under {:?}", records.len(), root);
        Ok(Scan { records })
    }
}

/// Renders `path` relative to `root` with `/` separators.
pub fn relative_path(root: &Path, path: &Path) -> Result<String> {
    let stripped = path
        .strip_prefix(root)
        .map_err(|_| Error::InvalidPath(format!("{:?} is outside {:?}", path, root)))?;

    let mut parts = Vec::new();
    for component in stripped.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            other => {
                return Err(Error::InvalidPath(format!(
                    "unexpected component {:?} in {:?}",
                    other, path
                )))
            }
        }
    }

    if parts.is_empty() {
        return Err(Error::InvalidPath(format!("{:?} is the scan root", path)));
    }

    Ok(parts.join("/"))
}
