// src/reload/notifier.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use console::Style;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::PluginConfig;
use crate::fs::FileSystem;
use crate::host::{BuildHost, LiveUpdate, LogOptions};
use crate::watch::path_utils::relative_to_root;
use crate::watch::resolve::resolve;

/// Marker word leading every notice.
pub const NOTICE_MARKER: &str = "turbo reload";

/// Handles to the detached work started by one [`Notifier::notify`] call.
///
/// Dropping it does not cancel anything: the refresh is still sent and the
/// companion file still touched, as long as the runtime stays up.
#[derive(Debug)]
pub struct Dispatch {
    /// Completes once the `turbo-refresh` message has been handed to the host.
    pub emission: JoinHandle<()>,
    /// Present when a companion file is configured; carries the touch error,
    /// if any.
    pub touch: Option<JoinHandle<anyhow::Result<()>>>,
}

/// Side effects of a matching change.
pub struct Notifier {
    host: Arc<dyn BuildHost>,
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    log: bool,
    delay: Duration,
    companion: Option<PathBuf>,
    marker: Style,
    dim: Style,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("root", &self.root)
            .field("log", &self.log)
            .field("delay", &self.delay)
            .field("companion", &self.companion)
            .finish_non_exhaustive()
    }
}

impl Notifier {
    /// `root` must be the absolute root the watch patterns were resolved
    /// against; the companion file is resolved against it too.
    pub fn new(
        host: Arc<dyn BuildHost>,
        fs: Arc<dyn FileSystem>,
        root: &Path,
        config: &PluginConfig,
    ) -> Self {
        let companion = config
            .tailwind_directive_path
            .as_ref()
            .map(|p| PathBuf::from(resolve(root, &p.to_string_lossy())));

        Self {
            host,
            fs,
            root: root.to_path_buf(),
            log: config.log,
            delay: config.delay(),
            companion,
            marker: Style::new().green(),
            dim: Style::new().dim(),
        }
    }

    /// Absolute path of the companion file, if one is configured.
    pub fn companion(&self) -> Option<&Path> {
        self.companion.as_deref()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// React to a change at `path` that already passed the match gate.
    ///
    /// Must be called from within a tokio runtime. Nothing is awaited here:
    /// the refresh and the touch run on detached tasks.
    pub fn notify(&self, path: &Path) -> Dispatch {
        let emission = schedule_refresh(Arc::clone(&self.host), self.delay);

        let touch = self
            .companion
            .as_ref()
            .map(|companion| touch_companion(Arc::clone(&self.fs), companion.clone()));

        if self.log {
            self.host.info(
                &self.notice(path),
                LogOptions {
                    clear: true,
                    timestamp: true,
                },
            );
        }

        debug!(?path, delay_ms = self.delay.as_millis() as u64, "refresh scheduled");
        Dispatch { emission, touch }
    }

    fn notice(&self, path: &Path) -> String {
        format!(
            "{} {}",
            self.marker.apply_to(NOTICE_MARKER),
            self.dim.apply_to(relative_to_root(&self.root, path))
        )
    }
}

/// Send one `turbo-refresh` after `delay`, on its own task.
///
/// Every call gets its own timer; nothing is coalesced.
fn schedule_refresh(host: Arc<dyn BuildHost>, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        host.send_live_update(LiveUpdate::turbo_refresh());
    })
}

/// Bump the companion file's timestamps on the blocking pool. No retry.
fn touch_companion(fs: Arc<dyn FileSystem>, path: PathBuf) -> JoinHandle<anyhow::Result<()>> {
    tokio::task::spawn_blocking(move || {
        fs.touch(&path)
            .with_context(|| format!("updating timestamps of companion file {:?}", path))
    })
}
