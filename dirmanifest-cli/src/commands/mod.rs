pub mod generate;
pub mod log;
pub mod sitemap;
pub mod status;

use anyhow::{Context, Result};
use clap::{ArgAction, Args};
use dirmanifest_core::config::CONFIG_FILE_NAME;
use dirmanifest_core::{DigestAlgorithm, ManifestConfig};
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Default)]
pub struct GlobalOptions {
    /// Configuration file (defaults to <data-dir>/config.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the manifest, details and history, relative to the root
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Digest algorithm: md5 or sha256
    #[arg(long, global = true)]
    pub algorithm: Option<DigestAlgorithm>,

    /// UTC offset for timestamps, e.g. +08:00
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub utc_offset: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

pub fn resolve_root(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).with_context(|| format!("Cannot access {}", path.display()))
}

/// Defaults, then the config file, then command-line overrides.
pub fn load_config(root: &Path, options: &GlobalOptions) -> Result<ManifestConfig> {
    let mut config = match &options.config {
        Some(path) => ManifestConfig::load(path)?,
        None => {
            let data_dir = options
                .data_dir
                .clone()
                .unwrap_or_else(|| ManifestConfig::default().data_dir);
            ManifestConfig::load_or_default(root.join(data_dir).join(CONFIG_FILE_NAME))?
        }
    };

    if let Some(data_dir) = &options.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(algorithm) = options.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(offset) = &options.utc_offset {
        config.utc_offset = offset.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}
