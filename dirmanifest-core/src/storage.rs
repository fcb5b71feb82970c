use crate::config::DataLayout;
use crate::error::{Error, Result};
use crate::models::{DetailRecord, Manifest};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DETAIL_EXTENSION: &str = "json";

/// Owns the persisted manifest and the per-digest detail records.
pub struct ManifestStore {
    manifest_path: PathBuf,
    details_dir: PathBuf,
}

impl ManifestStore {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(manifest_path: P, details_dir: Q) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            details_dir: details_dir.into(),
        }
    }

    pub fn from_layout(layout: &DataLayout) -> Self {
        Self::new(&layout.manifest_path, &layout.details_dir)
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn details_dir(&self) -> &Path {
        &self.details_dir
    }

    /// Creates the manifest's parent directory and the details directory.
    pub fn ensure_layout(&self) -> Result<()> {
        if let Some(parent) = self.manifest_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::create_dir_all(&self.details_dir)?;
        Ok(())
    }

    pub fn exists(&self) -> bool {
        self.manifest_path.exists()
    }

    /// Returns an empty manifest when none has been saved yet.
    pub fn load(&self) -> Result<Manifest> {
        let content = match fs::read(&self.manifest_path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No manifest at {:?}, starting empty", self.manifest_path);
                return Ok(Manifest::default());
            }
            Err(source) => {
                return Err(Error::Unreadable {
                    path: self.manifest_path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&content).map_err(|source| Error::CorruptManifest {
            path: self.manifest_path.clone(),
            source,
        })
    }

    /// Like [`load`](Self::load), but a missing manifest is an error.
    pub fn load_existing(&self) -> Result<Manifest> {
        if !self.exists() {
            return Err(Error::ManifestNotFound(self.manifest_path.clone()));
        }
        self.load()
    }

    pub fn save(&self, manifest: &Manifest) -> Result<()> {
        write_json_atomic(&self.manifest_path, manifest)?;
        tracing::debug!(
            "Saved manifest with {} entries to {:?}",
            manifest.len(),
            self.manifest_path
        );
        Ok(())
    }

    pub fn detail_path(&self, digest: &str) -> PathBuf {
        self.details_dir.join(format!("{}.{}", digest, DETAIL_EXTENSION))
    }

    pub fn load_detail(&self, digest: &str) -> Result<Option<DetailRecord>> {
        let path = self.detail_path(digest);
        match fs::read(&path) {
            Ok(content) => Ok(Some(serde_json::from_slice(&content)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(Error::Unreadable { path, source }),
        }
    }

    pub fn save_detail(&self, detail: &DetailRecord) -> Result<()> {
        write_json_atomic(&self.detail_path(detail.digest()), detail)
    }

    /// Digests of every detail record currently on disk.
    pub fn detail_digests(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.details_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut digests = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DETAIL_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                digests.push(stem.to_string());
            }
        }

        digests.sort();
        Ok(digests)
    }

    pub fn remove_detail(&self, digest: &str) -> io::Result<()> {
        fs::remove_file(self.detail_path(digest))
    }
}

/// Serializes `value` to a sibling temp file, then renames it over `path`.
///
/// A failed write leaves the previous content of `path` untouched.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let serialized = serde_json::to_vec(value)?;
    write_atomic(path, &serialized)
}

pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| Error::InvalidPath(format!("{:?} has no file name", path)))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, content)?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::Io(e)
    })?;

    Ok(())
}
