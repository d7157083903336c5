// src/reload/mod.rs

//! Turning watcher events into refreshes.
//!
//! [`ReloadTrigger`] pairs the match gate with the [`Notifier`]: the host
//! hands it every add/change event and it decides whether anything happens.

pub mod notifier;

use std::path::Path;

use tracing::trace;

use crate::host::{WatchEvent, WatchEventKind};
use crate::watch::patterns::ReloadMatcher;

pub use notifier::{Dispatch, Notifier, NOTICE_MARKER};

#[derive(Debug)]
pub struct ReloadTrigger {
    matcher: ReloadMatcher,
    notifier: Notifier,
}

impl ReloadTrigger {
    pub fn new(matcher: ReloadMatcher, notifier: Notifier) -> Self {
        Self { matcher, notifier }
    }

    pub fn matcher(&self) -> &ReloadMatcher {
        &self.matcher
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Fire the notifier if `path` matches; a no-op otherwise.
    pub fn check_reload(&self, path: &Path) -> Option<Dispatch> {
        if !self.matcher.matches(path) {
            trace!(?path, "change ignored");
            return None;
        }
        Some(self.notifier.notify(path))
    }

    /// Entry point for host watcher events. Only additions and changes can
    /// trigger a refresh.
    pub fn handle_event(&self, event: &WatchEvent) -> Option<Dispatch> {
        match event.kind {
            WatchEventKind::Add | WatchEventKind::Change => self.check_reload(&event.path),
            WatchEventKind::Unlink => None,
        }
    }
}
