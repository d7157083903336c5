// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::patch::PatchMode;
use crate::watch::resolve::WatchPaths;

/// Options recognised by the plugin.
///
/// The same struct backs the library API and the config file; every field
/// has a default, so an empty table is a valid configuration:
///
/// ```toml
/// delay = 0
/// log = true
/// root = "."
/// tailwind_directive_path = "app/assets/stylesheets/application.tailwind.css"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PluginConfig {
    /// Milliseconds to wait between a matching change and the refresh
    /// event. Negative values behave like `0`.
    #[serde(default)]
    pub delay: i64,

    /// Whether to print a notice for every change that triggers a refresh.
    #[serde(default = "default_log")]
    pub log: bool,

    /// Watch paths are resolved against this directory.
    ///
    /// `None` means the process working directory.
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Stylesheet holding the `@tailwind` directives.
    ///
    /// When set, its timestamps are bumped on every matching change so that
    /// Tailwind's own watcher rebuilds the utility classes.
    #[serde(default, alias = "tailwindDirectivePath")]
    pub tailwind_directive_path: Option<PathBuf>,

    /// Whether the injected client snippet also swallows the host's full
    /// reload that follows a Turbo refresh.
    ///
    /// `None` enables it exactly when `tailwind_directive_path` is set, since
    /// touching the stylesheet is what makes the host reload the page.
    #[serde(default, alias = "suppressFullReload")]
    pub suppress_full_reload: Option<bool>,
}

fn default_log() -> bool {
    true
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            delay: 0,
            log: default_log(),
            root: None,
            tailwind_directive_path: None,
            suppress_full_reload: None,
        }
    }
}

impl PluginConfig {
    /// Effective delay before the refresh event is sent.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(u64::try_from(self.delay).unwrap_or(0))
    }

    /// Which client snippet the bundle patcher injects.
    pub fn patch_mode(&self) -> PatchMode {
        let suppress = self
            .suppress_full_reload
            .unwrap_or(self.tailwind_directive_path.is_some());
        if suppress {
            PatchMode::SuppressFullReload
        } else {
            PatchMode::RefreshOnly
        }
    }
}

/// Config file as read from TOML, before validation.
///
/// ```toml
/// paths = ["app/views/**/*.html.erb", "app/components/**/*"]
/// delay = 50
/// tailwind_directive_path = "app/assets/stylesheets/application.tailwind.css"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// A single path/glob or a list of them.
    #[serde(default)]
    pub paths: WatchPaths,

    #[serde(flatten)]
    pub plugin: PluginConfig,
}

/// Validated configuration: at least one watch path, sane option values.
///
/// Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub paths: WatchPaths,
    pub plugin: PluginConfig,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(paths: WatchPaths, plugin: PluginConfig) -> Self {
        Self { paths, plugin }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = PluginConfig::default();
        assert_eq!(cfg.delay(), Duration::ZERO);
        assert!(cfg.log);
        assert!(cfg.root.is_none());
        assert_eq!(cfg.patch_mode(), PatchMode::RefreshOnly);
    }

    #[test]
    fn negative_delay_is_immediate() {
        let cfg = PluginConfig {
            delay: -250,
            ..PluginConfig::default()
        };
        assert_eq!(cfg.delay(), Duration::ZERO);
    }

    #[test]
    fn companion_file_enables_reload_suppression_by_default() {
        let mut cfg = PluginConfig {
            tailwind_directive_path: Some("app.css".into()),
            ..PluginConfig::default()
        };
        assert_eq!(cfg.patch_mode(), PatchMode::SuppressFullReload);

        cfg.suppress_full_reload = Some(false);
        assert_eq!(cfg.patch_mode(), PatchMode::RefreshOnly);
    }

    #[test]
    fn camel_case_option_names_are_accepted() {
        let raw: RawConfigFile = toml::from_str(
            r#"
paths = "views/**"
tailwindDirectivePath = "app.css"
log = false
"#,
        )
        .unwrap();
        assert_eq!(raw.paths.as_slice(), ["views/**"]);
        assert_eq!(raw.plugin.tailwind_directive_path, Some(PathBuf::from("app.css")));
        assert!(!raw.plugin.log);
    }
}
