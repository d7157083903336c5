// src/plugin.rs

//! The plugin descriptor handed to a build host.
//!
//! Each host hook is a separate method:
//! - [`TurboReloadPlugin::config`] contributes host configuration,
//! - [`TurboReloadPlugin::transform`] patches the Turbo bundle,
//! - [`TurboReloadPlugin::configure_server`] registers the watch patterns and
//!   returns the [`ReloadTrigger`] the host feeds watcher events into.

use std::sync::Arc;

use tracing::info;

use crate::config::PluginConfig;
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::host::BuildHost;
use crate::patch::{BundlePatcher, TransformOptions};
use crate::reload::{Notifier, ReloadTrigger};
use crate::watch::patterns::ReloadMatcher;
use crate::watch::resolve::{resolve_root, ResolvedPathSet, WatchPaths};

pub const PLUGIN_NAME: &str = "vite-plugin-turbo-reload";

/// When the host should use the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Dev server only.
    Serve,
    /// Production builds only.
    Build,
}

/// Host configuration the plugin contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostConfigPatch {
    /// The host's watcher must expand globs, or it loses track of templates
    /// added after startup.
    pub watch_globbing: bool,
}

#[derive(Debug, Clone)]
pub struct TurboReloadPlugin {
    paths: WatchPaths,
    config: PluginConfig,
    patcher: BundlePatcher,
    fs: Arc<dyn FileSystem>,
}

impl TurboReloadPlugin {
    pub fn new(paths: impl Into<WatchPaths>, config: PluginConfig) -> Self {
        let patcher = BundlePatcher::new(config.patch_mode());
        Self {
            paths: paths.into(),
            config,
            patcher,
            fs: Arc::new(RealFileSystem),
        }
    }

    /// Use another filesystem for companion-file touches.
    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Replace the bundle patcher (e.g. to force the SSR override).
    pub fn with_patcher(mut self, patcher: BundlePatcher) -> Self {
        self.patcher = patcher;
        self
    }

    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub fn apply(&self) -> ApplyMode {
        ApplyMode::Serve
    }

    pub fn config(&self) -> HostConfigPatch {
        HostConfigPatch {
            watch_globbing: true,
        }
    }

    pub fn paths(&self) -> &WatchPaths {
        &self.paths
    }

    pub fn options(&self) -> &PluginConfig {
        &self.config
    }

    pub fn transform(&self, code: &str, id: &str, options: TransformOptions) -> Option<String> {
        self.patcher.transform(code, id, options)
    }

    /// Resolve the watch set, register it with the host and build the
    /// trigger for its watcher events.
    ///
    /// Calling this again (e.g. after a server restart) recomputes
    /// everything from the configured paths.
    pub fn configure_server(&self, host: Arc<dyn BuildHost>) -> Result<ReloadTrigger> {
        let root = resolve_root(self.config.root.as_deref());
        let resolved = ResolvedPathSet::resolve(&root, &self.paths);
        let matcher = ReloadMatcher::new(&resolved)?;

        host.register_watch(resolved.patterns())?;

        let notifier = Notifier::new(host, Arc::clone(&self.fs), &root, &self.config);
        info!(
            root = %root.display(),
            patterns = ?resolved.patterns(),
            companion = ?notifier.companion(),
            "watching for turbo reloads"
        );

        Ok(ReloadTrigger::new(matcher, notifier))
    }
}
