use crate::models::{AddedFile, ChangeSet, Changes, Manifest, ModifiedFile, RemovedFile};
use crate::scan::Scan;
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;

impl Changes {
    /// Classifies every path of `current` (path → digest) against the
    /// inverted `previous` manifest.
    ///
    /// Added and modified entries follow `current` order; removed entries
    /// follow the previous manifest's order.
    pub fn compute(previous: &Manifest, current: &IndexMap<String, String>) -> Self {
        let previous_paths = previous.path_to_digest();
        let mut changes = Changes::default();

        for (path, digest) in current {
            match previous_paths.get(path) {
                Some(old_digest) if old_digest != digest => {
                    changes.modified.push(ModifiedFile {
                        path: path.clone(),
                        old_digest: old_digest.clone(),
                        new_digest: digest.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    changes.added.push(AddedFile {
                        path: path.clone(),
                        digest: digest.clone(),
                    });
                }
            }
        }

        for (path, digest) in &previous_paths {
            if !current.contains_key(path) {
                changes.removed.push(RemovedFile {
                    path: path.clone(),
                    last_digest: digest.clone(),
                });
            }
        }

        changes
    }
}

impl ChangeSet {
    /// Diffs the non-directory records of `scan` against `previous`.
    pub fn between(previous: &Manifest, scan: &Scan, timestamp: DateTime<FixedOffset>) -> Self {
        ChangeSet {
            timestamp,
            changes: Changes::compute(previous, &scan.path_to_digest()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileRecord;
    use chrono::TimeZone;

    fn ts() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 1, 8, 0, 0)
            .unwrap()
    }

    fn manifest(entries: &[(&str, &str)]) -> Manifest {
        let mut manifest = Manifest::new(ts());
        for (digest, path) in entries {
            manifest.insert(digest.to_string(), path.to_string());
        }
        manifest
    }

    fn current(entries: &[(&str, &str)]) -> IndexMap<String, String> {
        entries
            .iter()
            .map(|(path, digest)| (path.to_string(), digest.to_string()))
            .collect()
    }

    #[test]
    fn test_initial_population_is_all_added() {
        let changes = Changes::compute(&Manifest::default(), &current(&[("a.txt", "d1")]));

        assert_eq!(
            changes.added,
            vec![AddedFile {
                path: "a.txt".to_string(),
                digest: "d1".to_string()
            }]
        );
        assert!(changes.removed.is_empty());
        assert!(changes.modified.is_empty());
    }

    #[test]
    fn test_unchanged_tree_has_no_changes() {
        let previous = manifest(&[("d1", "a.txt"), ("d2", "b.txt")]);
        let changes = Changes::compute(&previous, &current(&[("b.txt", "d2"), ("a.txt", "d1")]));

        assert!(changes.is_empty());
    }

    #[test]
    fn test_classification() {
        let previous = manifest(&[("d1", "keep.txt"), ("d2", "edit.txt"), ("d3", "gone.txt")]);
        let changes = Changes::compute(
            &previous,
            &current(&[("keep.txt", "d1"), ("edit.txt", "d9"), ("new.txt", "d4")]),
        );

        assert_eq!(
            changes.added,
            vec![AddedFile {
                path: "new.txt".to_string(),
                digest: "d4".to_string()
            }]
        );
        assert_eq!(
            changes.modified,
            vec![ModifiedFile {
                path: "edit.txt".to_string(),
                old_digest: "d2".to_string(),
                new_digest: "d9".to_string()
            }]
        );
        assert_eq!(
            changes.removed,
            vec![RemovedFile {
                path: "gone.txt".to_string(),
                last_digest: "d3".to_string()
            }]
        );
    }

    #[test]
    fn test_rename_is_remove_plus_add() {
        let previous = manifest(&[("d1", "old.txt")]);
        let changes = Changes::compute(&previous, &current(&[("new.txt", "d1")]));

        assert_eq!(changes.added.len(), 1);
        assert_eq!(changes.removed.len(), 1);
        assert!(changes.modified.is_empty());
    }

    #[test]
    fn test_collided_path_reported_as_added() {
        // Only the last of two identical files survives in the manifest, so
        // the shadowed path looks new on every run.
        let previous = manifest(&[("same", "a.txt"), ("same", "b.txt")]);
        let changes = Changes::compute(&previous, &current(&[("a.txt", "same"), ("b.txt", "same")]));

        assert_eq!(changes.added.len(), 1);
        assert_eq!(changes.added[0].path, "a.txt");
        assert!(changes.removed.is_empty());
    }

    #[test]
    fn test_between_ignores_directories() {
        let scan = Scan {
            records: vec![
                FileRecord {
                    path: "docs".to_string(),
                    size: 0,
                    modified_time: ts(),
                    is_directory: true,
                    digest: "dir".to_string(),
                },
                FileRecord {
                    path: "docs/a.txt".to_string(),
                    size: 1,
                    modified_time: ts(),
                    is_directory: false,
                    digest: "d1".to_string(),
                },
            ],
        };

        let change_set = ChangeSet::between(&Manifest::default(), &scan, ts());

        assert_eq!(change_set.timestamp, ts());
        assert_eq!(change_set.changes.added.len(), 1);
        assert_eq!(change_set.changes.added[0].path, "docs/a.txt");
    }
}
