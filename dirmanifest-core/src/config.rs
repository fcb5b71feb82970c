//! Runtime configuration.
//!
//! Values come from built-in defaults, optionally overlaid by a TOML file,
//! then by command-line overrides applied by the caller.

use crate::error::{Error, Result};
use crate::hasher::DigestAlgorithm;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Directory holding all persisted state, relative to the scan root
    /// unless absolute.
    pub data_dir: PathBuf,
    pub manifest_file: String,
    pub details_dir: String,
    pub history_file: String,
    /// Entries whose name starts with this prefix are skipped.
    pub hidden_prefix: String,
    /// Directory names skipped at any depth.
    pub ignored_dirs: Vec<String>,
    pub algorithm: DigestAlgorithm,
    /// Read buffer size used while hashing.
    pub chunk_size: usize,
    /// Civil offset applied to every timestamp, e.g. `+08:00`.
    pub utc_offset: String,
    pub sitemap: SitemapConfig,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".data"),
            manifest_file: "file-manifest.json".to_string(),
            details_dir: "md5s".to_string(),
            history_file: "changes.json".to_string(),
            hidden_prefix: ".".to_string(),
            ignored_dirs: vec![".git".to_string()],
            algorithm: DigestAlgorithm::Md5,
            chunk_size: 4096,
            utc_offset: "+08:00".to_string(),
            sitemap: SitemapConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Output file, relative to the scan root unless absolute.
    pub output: PathBuf,
    pub title: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("sitemap.html"),
            title: "Site Map".to_string(),
        }
    }
}

/// Resolved on-disk locations for one scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    pub data_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub details_dir: PathBuf,
    pub history_path: PathBuf,
}

impl ManifestConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::InvalidConfig(format!("{}: {}", path.display(), e)))
    }

    /// Loads `path` when it exists, otherwise returns the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::debug!("Loading configuration from {:?}", path);
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be positive".into()));
        }
        for (name, value) in [
            ("manifest_file", &self.manifest_file),
            ("details_dir", &self.details_dir),
            ("history_file", &self.history_file),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidConfig(format!("{} must not be empty", name)));
            }
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("data_dir must not be empty".into()));
        }
        self.offset()?;
        Ok(())
    }

    pub fn offset(&self) -> Result<FixedOffset> {
        self.utc_offset.parse::<FixedOffset>().map_err(|e| {
            Error::InvalidConfig(format!("invalid utc_offset {:?}: {}", self.utc_offset, e))
        })
    }

    pub fn layout(&self, root: &Path) -> DataLayout {
        let data_dir = root.join(&self.data_dir);
        DataLayout {
            manifest_path: data_dir.join(&self.manifest_file),
            details_dir: data_dir.join(&self.details_dir),
            history_path: data_dir.join(&self.history_file),
            data_dir,
        }
    }

    pub fn sitemap_path(&self, root: &Path) -> PathBuf {
        root.join(&self.sitemap.output)
    }
}
