//! Pruning of detail records whose digest is no longer referenced.
//!
//! Pruning runs before the manifest is saved. A crash between the two can
//! leave the manifest pointing at a deleted record until the next run.

use crate::error::Result;
use crate::storage::ManifestStore;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub removed: Vec<String>,
    pub failed: Vec<String>,
}

impl PruneReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl ManifestStore {
    /// Deletes every detail record whose digest is not in `keep`.
    ///
    /// A record that cannot be deleted is logged and skipped.
    pub fn prune_details(&self, keep: &HashSet<String>) -> Result<PruneReport> {
        let mut report = PruneReport::default();

        for digest in self.detail_digests()? {
            if keep.contains(&digest) {
                continue;
            }

            match self.remove_detail(&digest) {
                Ok(()) => {
                    tracing::debug!("Removed stale detail record {}", digest);
                    report.removed.push(digest);
                }
                Err(e) => {
                    tracing::warn!("Failed to remove unused detail record {}: {}", digest, e);
                    report.failed.push(digest);
                }
            }
        }

        Ok(report)
    }
}
