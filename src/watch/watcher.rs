// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use anyhow::Result;
use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::host::{WatchEvent, WatchEventKind};

/// Handle for a filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
    dirs: Vec<PathBuf>,
}

impl WatcherHandle {
    /// Directories this watcher observes recursively.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("dirs", &self.dirs)
            .finish()
    }
}

/// Spawn a filesystem watcher observing each of `dirs` recursively and
/// forwarding file-level changes as [`WatchEvent`]s on `events_tx`.
///
/// Paths in the forwarded events are absolute, exactly as reported by the
/// platform backend. Directory creation/removal and pure access events are
/// dropped.
pub fn spawn_watcher(
    dirs: &[PathBuf],
    events_tx: mpsc::UnboundedSender<WatchEvent>,
) -> Result<WatcherHandle> {
    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let Some(kind) = classify(&event.kind) else {
                    return;
                };
                for path in event.paths {
                    if events_tx.send(WatchEvent::new(kind, path)).is_err() {
                        debug!("watch event receiver dropped; discarding event");
                        return;
                    }
                }
            }
            Err(err) => warn!("file watch error: {err}"),
        },
        Config::default(),
    )?;

    for dir in dirs {
        watcher.watch(dir, RecursiveMode::Recursive)?;
        info!("file watcher started on {:?}", dir);
    }

    Ok(WatcherHandle {
        _inner: watcher,
        dirs: dirs.to_vec(),
    })
}

/// Map a raw `notify` event kind onto the add/change/unlink vocabulary.
pub fn classify(kind: &EventKind) -> Option<WatchEventKind> {
    match kind {
        EventKind::Create(CreateKind::Folder) => None,
        EventKind::Create(_) => Some(WatchEventKind::Add),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => Some(WatchEventKind::Unlink),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Some(WatchEventKind::Add),
        EventKind::Modify(_) => Some(WatchEventKind::Change),
        EventKind::Remove(RemoveKind::Folder) => None,
        EventKind::Remove(_) => Some(WatchEventKind::Unlink),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}

/// Nearest ancestor of `dir` (including itself) that currently exists.
///
/// Watch patterns may point into directories that have not been created yet;
/// watching the closest existing parent still lets us see them appear.
pub fn nearest_existing(dir: &Path, exists: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    dir.ancestors()
        .find(|candidate| !candidate.as_os_str().is_empty() && exists(candidate))
        .map(Path::to_path_buf)
}
