//! # dirmanifest-core
//!
//! Core library for dirmanifest - directory manifests keyed by content digest.
//!
//! This crate walks a directory tree, hashes every file, persists a
//! digest → path manifest with per-digest detail records, and keeps an
//! append-only history of what was added, removed or modified between runs.

pub mod clock;
pub mod config;
pub mod diff;
pub mod error;
pub mod gc;
pub mod generator;
pub mod hasher;
pub mod history;
pub mod models;
pub mod scan;
pub mod sitemap;
pub mod storage;
pub mod walker;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{DataLayout, ManifestConfig};
pub use error::{Error, Result};
pub use gc::PruneReport;
pub use generator::{GenerationReport, ManifestGenerator};
pub use hasher::{DigestAlgorithm, Hasher};
pub use history::HistoryLog;
pub use models::{ChangeSet, Changes, DetailRecord, EntryKind, FileRecord, Manifest};
pub use sitemap::SitemapRenderer;
pub use storage::ManifestStore;
pub use walker::Walker;
