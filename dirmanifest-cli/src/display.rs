use colored::Colorize;
use dirmanifest_core::ChangeSet;

const SHORT_DIGEST_LEN: usize = 8;

pub fn short_digest(digest: &str) -> &str {
    digest.get(..SHORT_DIGEST_LEN).unwrap_or(digest)
}

/// Prints up to `limit` entries of `change_set`, one line each.
pub fn print_changes(change_set: &ChangeSet, indent: &str, limit: usize) {
    let changes = &change_set.changes;
    let mut printed = 0;

    for added in &changes.added {
        if printed == limit {
            break;
        }
        println!(
            "{}{} {} {}",
            indent,
            "+".green(),
            added.path,
            short_digest(&added.digest).dimmed()
        );
        printed += 1;
    }

    for modified in &changes.modified {
        if printed == limit {
            break;
        }
        println!(
            "{}{} {} {} → {}",
            indent,
            "~".yellow(),
            modified.path,
            short_digest(&modified.old_digest).dimmed(),
            short_digest(&modified.new_digest).dimmed()
        );
        printed += 1;
    }

    for removed in &changes.removed {
        if printed == limit {
            break;
        }
        println!(
            "{}{} {} {}",
            indent,
            "-".red(),
            removed.path,
            short_digest(&removed.last_digest).dimmed()
        );
        printed += 1;
    }

    let total = changes.len();
    if total > printed {
        println!(
            "{}{} and {} more...",
            indent,
            "...".dimmed(),
            (total - printed).to_string().yellow()
        );
    }
}

pub fn summary(change_set: &ChangeSet) -> String {
    let changes = &change_set.changes;
    format!(
        "{} added, {} modified, {} removed",
        changes.added.len().to_string().green(),
        changes.modified.len().to_string().yellow(),
        changes.removed.len().to_string().red()
    )
}
