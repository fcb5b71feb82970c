use crate::clock::{Clock, SystemClock};
use crate::config::ManifestConfig;
use crate::error::{Error, Result};
use crate::gc::PruneReport;
use crate::hasher::Hasher;
use crate::history::HistoryLog;
use crate::models::{ChangeSet, DetailRecord};
use crate::scan::{Scan, Scanner};
use crate::storage::ManifestStore;
use crate::walker::Walker;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub change_set: ChangeSet,
    /// Whether the change set was appended to the history.
    pub recorded: bool,
    pub files: usize,
    pub directories: usize,
    pub manifest_entries: usize,
    pub details_written: usize,
    pub pruned: PruneReport,
}

/// Runs the scan → diff → prune → persist sequence for one root.
pub struct ManifestGenerator<C: Clock = SystemClock> {
    root: PathBuf,
    walker: Walker,
    hasher: Hasher,
    store: ManifestStore,
    history: HistoryLog,
    clock: C,
}

impl ManifestGenerator<SystemClock> {
    pub fn from_config(root: &Path, config: &ManifestConfig) -> Result<Self> {
        config.validate()?;
        let clock = SystemClock::new(config.offset()?);
        Self::with_clock(root, config, clock)
    }
}

impl<C: Clock> ManifestGenerator<C> {
    pub fn with_clock(root: &Path, config: &ManifestConfig, clock: C) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::InvalidPath(format!(
                "{:?} is not a directory",
                root
            )));
        }

        let layout = config.layout(root);
        Ok(Self {
            root: root.to_path_buf(),
            walker: Walker::from_config(root, config),
            hasher: Hasher::new(config.algorithm).with_chunk_size(config.chunk_size),
            store: ManifestStore::from_layout(&layout),
            history: HistoryLog::new(layout.history_path),
            clock,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self) -> &ManifestStore {
        &self.store
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn scan(&self) -> Result<Scan> {
        Scanner::new(&self.walker, &self.hasher, &self.clock).scan()
    }

    /// Computes the change set against the stored manifest without writing
    /// anything.
    pub fn preview(&self) -> Result<ChangeSet> {
        let scan = self.scan()?;
        let previous = self.store.load()?;
        Ok(ChangeSet::between(&previous, &scan, self.clock.now()))
    }

    /// Scans the tree and brings every persisted artifact up to date.
    ///
    /// The scan and every read complete before anything is written, so an
    /// unreadable file leaves the previous state in place. The history is
    /// written before the manifest: a run that fails in between is diffed
    /// again from the old manifest next time. Writes across the manifest,
    /// detail records and history are not transactional.
    pub fn run(&self) -> Result<GenerationReport> {
        tracing::info!("Scanning directory: {:?}", self.root);
        let scan = self.scan()?;
        let previous = self.store.load()?;
        let history = self.history.load()?;

        let timestamp = self.clock.now();
        let change_set = ChangeSet::between(&previous, &scan, timestamp);

        self.store.ensure_layout()?;

        let pruned = self.store.prune_details(&scan.digests())?;
        if !pruned.removed.is_empty() {
            tracing::info!("Pruned {} stale detail record(s)", pruned.removed.len());
        }

        let mut details_written = 0;
        for record in scan.files() {
            self.store.save_detail(&DetailRecord::from(record.clone()))?;
            details_written += 1;
        }

        let recorded = self.history.append_to(history, &change_set)?;

        let manifest = scan.to_manifest(timestamp);
        self.store.save(&manifest)?;
        tracing::info!("File manifest generated at: {:?}", self.store.manifest_path());

        Ok(GenerationReport {
            files: scan.files().count(),
            directories: scan.directories().count(),
            manifest_entries: manifest.len(),
            details_written,
            pruned,
            recorded,
            change_set,
        })
    }
}
