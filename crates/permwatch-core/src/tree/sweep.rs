//! Recursive sweep that normalizes an entire subtree

use super::{enforce, watch};
use crate::policy::Policy;
use std::path::Path;
use tracing::error;
use walkdir::WalkDir;

/// Walk `root` depth-first, registering a watch on every directory and
/// enforcing the policy on every entry.
///
/// A directory's watch goes live before its children are listed, so an
/// entry created while the sweep is still inside that directory is caught
/// either by the sweep or by the new watch.
///
/// Errors never abort the sweep: an entry that vanishes mid-walk or a
/// directory that cannot be listed is logged and skipped. Safe to run
/// concurrently over overlapping subtrees, since redundant enforcement
/// and registration are harmless.
pub fn sweep(root: impl AsRef<Path>, policy: &Policy) {
    for entry in WalkDir::new(root.as_ref()).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                error!("Failed to stat {}: {}", entry.path().display(), e);
                continue;
            }
        };

        if metadata.is_dir() {
            if let Err(e) = watch::watch_dir(entry.path(), *policy) {
                error!("Failed to start watch on {}: {}", entry.path().display(), e);
            }
        }

        if let Err(e) = enforce::enforce_mode(entry.path(), &metadata, policy) {
            error!(
                "Failed to fix permissions for {}: {}",
                entry.path().display(),
                e
            );
        }
    }
}
