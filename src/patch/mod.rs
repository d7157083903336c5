// src/patch/mod.rs

//! Bundle patching: teaching the Turbo runtime to listen for refreshes.
//!
//! During the host's transform stage, every module passes through
//! [`BundlePatcher::transform`]. When the module is the Turbo vendor bundle,
//! the footer from [`snippet`] is appended so that a `turbo-refresh` live
//! update becomes a `<turbo-stream action="refresh">` instead of a full page
//! reload.
//!
//! Detection is textual: the module id must contain [`BUNDLE_ID_MARKER`] and
//! the source must contain [`BUNDLE_SIGNATURE`]. Nothing is parsed.

pub mod snippet;

use std::ffi::OsStr;

use tracing::debug;

/// Token that appears in the Turbo bundle's module id.
pub const BUNDLE_ID_MARKER: &str = "turbo";

/// Top-level assignment the Turbo bundle performs.
pub const BUNDLE_SIGNATURE: &str = "window.Turbo =";

/// Environment variable whose presence lets SSR transforms be patched, so the
/// patcher can be exercised from test runners that compile in SSR mode.
pub const TEST_MODE_ENV: &str = "VITEST";

/// Which client footer to inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchMode {
    /// Only turn `turbo-refresh` into a Turbo stream refresh.
    RefreshOnly,
    /// Additionally swallow the host's next full reload after a refresh.
    SuppressFullReload,
}

/// Options the host passes alongside each module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransformOptions {
    /// The module is being compiled for server-side rendering.
    pub ssr: bool,
}

impl TransformOptions {
    pub fn ssr() -> Self {
        Self { ssr: true }
    }
}

#[derive(Debug, Clone)]
pub struct BundlePatcher {
    mode: PatchMode,
    patch_ssr: bool,
    footer: String,
}

impl BundlePatcher {
    /// Build a patcher; the SSR override is read from [`TEST_MODE_ENV`].
    pub fn new(mode: PatchMode) -> Self {
        let patch_ssr = ssr_override(std::env::var_os(TEST_MODE_ENV).as_deref());
        Self {
            mode,
            patch_ssr,
            footer: snippet::footer(mode),
        }
    }

    /// Force the SSR override on or off regardless of the environment.
    pub fn with_ssr_override(mut self, patch_ssr: bool) -> Self {
        self.patch_ssr = patch_ssr;
        self
    }

    pub fn mode(&self) -> PatchMode {
        self.mode
    }

    pub fn footer(&self) -> &str {
        &self.footer
    }

    /// True when `id` and `code` both carry the Turbo bundle markers.
    pub fn is_turbo_bundle(code: &str, id: &str) -> bool {
        id.contains(BUNDLE_ID_MARKER) && code.contains(BUNDLE_SIGNATURE)
    }

    /// Returns the patched source, or `None` to keep the module unchanged.
    pub fn transform(&self, code: &str, id: &str, options: TransformOptions) -> Option<String> {
        if options.ssr && !self.patch_ssr {
            return None;
        }

        if !Self::is_turbo_bundle(code, id) {
            return None;
        }

        debug!(id, mode = ?self.mode, "appending turbo refresh footer");
        Some(format!("{code}\n{}", self.footer))
    }
}

/// Whether a [`TEST_MODE_ENV`] value turns the SSR override on: any
/// non-empty value does.
fn ssr_override(value: Option<&OsStr>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
