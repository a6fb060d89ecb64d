//! Per-directory creation watches
//!
//! Every watched directory owns one notify subscription and one tokio task
//! that consumes its events. A watch is registered for each directory the
//! sweep visits and for each directory created afterwards; none is ever
//! torn down before process exit, even if its directory is removed.

use super::{enforce, sweep};
use crate::error::Result;
use crate::policy::Policy;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{error, info};

/// Live pairing of a directory with its notify subscription.
///
/// Owned exclusively by the event-processing task. Dropping it cancels the
/// underlying watch, which in normal operation only happens at process
/// exit.
struct WatchHandle {
    path: PathBuf,
    _watcher: RecommendedWatcher,
}

/// Start watching `path` for child creations.
///
/// Returns as soon as the subscription is in place; event processing runs
/// on its own task, so neither the sweep nor another event processor is
/// ever delayed by registration. On failure the directory is left
/// unwatched and the error is returned for the caller to log.
pub fn watch_dir(path: impl AsRef<Path>, policy: Policy) -> Result<()> {
    let path = path.as_ref().to_path_buf();

    info!("Watching directory {}", path.display());

    let (tx, rx) = mpsc::unbounded_channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        // Runs on notify's thread; an unbounded send never blocks it.
        let _ = tx.send(res);
    })?;
    watcher.watch(&path, RecursiveMode::NonRecursive)?;

    let handle = WatchHandle {
        path,
        _watcher: watcher,
    };
    tokio::spawn(process_events(handle, rx, policy));

    Ok(())
}

/// Event loop for one watched directory.
///
/// Creation events are handled one at a time, in delivery order. Modify,
/// remove and rename events are out of scope and ignored. A source-level
/// fault is logged and the loop keeps waiting: a persistently broken
/// subscription degrades to a stream of logged errors, never to a crash.
async fn process_events(
    handle: WatchHandle,
    mut rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
    policy: Policy,
) {
    while let Some(res) = rx.recv().await {
        match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Create(_)) {
                    for path in &event.paths {
                        handle_created(path, policy);
                    }
                }
            }
            Err(e) => {
                error!("Watch error on {}: {}", handle.path.display(), e);
            }
        }
    }
}

/// React to a child appearing inside a watched directory.
fn handle_created(path: &Path, policy: Policy) {
    // The event payload may be stale by now; trust only a fresh stat.
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            error!("Failed to stat {}: {}", path.display(), e);
            return;
        }
    };

    if metadata.is_dir() {
        if let Err(e) = enforce::enforce_mode(path, &metadata, &policy) {
            error!("Failed to fix permissions for {}: {}", path.display(), e);
        }
        // Watch before sweeping: the sweep catches anything created before
        // the watch went live, the watch catches anything created after.
        if let Err(e) = watch_dir(path, policy) {
            error!("Failed to start watch on {}: {}", path.display(), e);
        }
        sweep::sweep(path, &policy);
    } else if let Err(e) = enforce::enforce_mode(path, &metadata, &policy) {
        error!("Failed to fix permissions for {}: {}", path.display(), e);
    }
}
