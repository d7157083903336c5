// src/host/mod.rs

//! The seam between the plugin and the build tool hosting it.
//!
//! The plugin never watches files or talks to browsers itself. It asks a
//! [`BuildHost`] to track the resolved patterns, to push [`LiveUpdate`]s over
//! its live-update channel and to print notices. The host in turn feeds
//! [`WatchEvent`]s back into the plugin's
//! [`ReloadTrigger`](crate::reload::ReloadTrigger).
//!
//! - [`dev`] provides [`DevHost`], a standalone host backed by `notify` and a
//!   broadcast channel, used by the `turbo-reload watch` command.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

pub mod dev;

pub use dev::DevHost;

/// Name of the custom event the injected client snippet listens for.
pub const TURBO_REFRESH_EVENT: &str = "turbo-refresh";

/// Message pushed over the host's live-update channel.
///
/// Serializes as `{"type":"custom","event":"turbo-refresh"}`; there is no
/// payload field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LiveUpdate {
    Custom { event: String },
}

impl LiveUpdate {
    pub fn turbo_refresh() -> Self {
        LiveUpdate::Custom {
            event: TURBO_REFRESH_EVENT.to_string(),
        }
    }

    pub fn event(&self) -> &str {
        match self {
            LiveUpdate::Custom { event } => event,
        }
    }
}

/// Presentation hints for [`BuildHost::info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogOptions {
    /// Ask the host to clear previous transient output first.
    pub clear: bool,
    /// Ask the host to prefix the line with a timestamp.
    pub timestamp: bool,
}

/// Kind of filesystem change reported by the host's watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    Add,
    Change,
    Unlink,
}

/// A single change reported by the host's watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub kind: WatchEventKind,
    pub path: PathBuf,
}

impl WatchEvent {
    pub fn new(kind: WatchEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn add(path: impl Into<PathBuf>) -> Self {
        Self::new(WatchEventKind::Add, path)
    }

    pub fn change(path: impl Into<PathBuf>) -> Self {
        Self::new(WatchEventKind::Change, path)
    }

    pub fn unlink(path: impl Into<PathBuf>) -> Self {
        Self::new(WatchEventKind::Unlink, path)
    }
}

/// Capabilities the plugin needs from the build tool.
///
/// Implementations must be shareable across tasks: delayed emissions call
/// [`BuildHost::send_live_update`] from a detached tokio task.
pub trait BuildHost: Send + Sync {
    /// Make the host's watcher track the given absolute glob patterns.
    fn register_watch(&self, patterns: &[String]) -> Result<()>;

    /// Push a message to every page connected to the live-update channel.
    ///
    /// Delivery is best-effort; having no connected page is not an error.
    fn send_live_update(&self, update: LiveUpdate);

    /// Print a human-readable notice.
    fn info(&self, message: &str, options: LogOptions);
}
