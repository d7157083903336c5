// src/host/dev.rs

//! Standalone host used by `turbo-reload watch`.
//!
//! - Watching is done with `notify` over the directories implied by the
//!   registered patterns (see [`watch_dirs`]).
//! - Live updates go out on a `tokio::sync::broadcast` channel; the CLI
//!   subscribes and prints them as JSON lines so an external dev server can
//!   forward them to its pages.
//! - Notices are written to stderr with `console`.

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use chrono::Local;
use console::{Style, Term};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::host::{BuildHost, LiveUpdate, LogOptions, WatchEvent};
use crate::watch::resolve::watch_dirs;
use crate::watch::watcher::{nearest_existing, spawn_watcher, WatcherHandle};

/// Capacity of the live-update broadcast channel.
const LIVE_UPDATE_CAPACITY: usize = 64;

pub struct DevHost {
    fs: Arc<dyn FileSystem>,
    events_tx: mpsc::UnboundedSender<WatchEvent>,
    updates: broadcast::Sender<LiveUpdate>,
    watchers: Mutex<Vec<WatcherHandle>>,
    term: Term,
    dim: Style,
}

impl std::fmt::Debug for DevHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevHost").finish_non_exhaustive()
    }
}

impl DevHost {
    /// Create a host and the receiving end of its watch-event stream.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<WatchEvent>) {
        Self::with_file_system(Arc::new(RealFileSystem))
    }

    pub fn with_file_system(
        fs: Arc<dyn FileSystem>,
    ) -> (Self, mpsc::UnboundedReceiver<WatchEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (updates, _) = broadcast::channel(LIVE_UPDATE_CAPACITY);
        let host = Self {
            fs,
            events_tx,
            updates,
            watchers: Mutex::new(Vec::new()),
            term: Term::stderr(),
            dim: Style::new().dim(),
        };
        (host, events_rx)
    }

    /// Subscribe to live updates sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LiveUpdate> {
        self.updates.subscribe()
    }

    /// Number of filesystem watchers currently alive.
    pub fn watcher_count(&self) -> usize {
        self.watchers.lock().map(|w| w.len()).unwrap_or(0)
    }
}

impl BuildHost for DevHost {
    fn register_watch(&self, patterns: &[String]) -> Result<()> {
        let mut dirs = Vec::new();
        for dir in watch_dirs(patterns) {
            match nearest_existing(&dir, |p| self.fs.is_dir(p)) {
                Some(existing) if existing != dir => {
                    warn!(
                        "watch directory {:?} does not exist yet; watching {:?} instead",
                        dir, existing
                    );
                    dirs.push(existing);
                }
                Some(existing) => dirs.push(existing),
                None => warn!("no existing ancestor to watch for {:?}", dir),
            }
        }
        dirs.sort();
        dirs.dedup();

        if dirs.is_empty() {
            return Ok(());
        }

        let handle = spawn_watcher(&dirs, self.events_tx.clone())?;
        self.watchers
            .lock()
            .map_err(|_| anyhow!("watcher registry poisoned"))?
            .push(handle);
        Ok(())
    }

    fn send_live_update(&self, update: LiveUpdate) {
        match self.updates.send(update) {
            Ok(receivers) => debug!(receivers, "live update sent"),
            Err(broadcast::error::SendError(update)) => {
                debug!(event = update.event(), "no live-update subscribers")
            }
        }
    }

    fn info(&self, message: &str, options: LogOptions) {
        if options.clear && self.term.is_term() {
            if let Err(err) = self.term.clear_screen() {
                debug!("failed to clear terminal: {err}");
            }
        }
        let line = if options.timestamp {
            format!("{} {}", self.dim.apply_to(clock_time()), message)
        } else {
            message.to_string()
        };
        if let Err(err) = self.term.write_line(&line) {
            debug!("failed to write notice to terminal: {err}");
        }
        info!(target: "turbo_reload::notice", "{}", console::strip_ansi_codes(message));
    }
}

/// Local wall-clock time for notice prefixes.
fn clock_time() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[tokio::test]
    async fn live_updates_reach_subscribers() {
        let (host, _events) = DevHost::new();
        let mut rx = host.subscribe();
        host.send_live_update(LiveUpdate::turbo_refresh());
        assert_eq!(rx.recv().await.unwrap(), LiveUpdate::turbo_refresh());
    }

    #[test]
    fn sending_without_subscribers_is_fine() {
        let (host, _events) = DevHost::new();
        host.send_live_update(LiveUpdate::turbo_refresh());
    }

    #[test]
    fn registering_with_nothing_on_disk_starts_no_watcher() {
        let (host, _events) = DevHost::with_file_system(Arc::new(MockFileSystem::new()));
        host.register_watch(&["/nowhere/**/*.html".to_string()]).unwrap();
        assert_eq!(host.watcher_count(), 0);
    }

    #[test]
    fn info_without_a_terminal_does_not_panic() {
        let (host, _events) = DevHost::new();
        host.info(
            "turbo reload views/home.html",
            LogOptions {
                clear: true,
                timestamp: true,
            },
        );
    }

    #[test]
    fn clock_time_is_formatted() {
        let t = clock_time();
        assert_eq!(t.len(), 8);
        assert_eq!(t.as_bytes()[2], b':');
    }
}
