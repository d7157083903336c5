#![allow(dead_code)]

use std::path::PathBuf;

use turbo_reload::config::PluginConfig;

/// Builder for `PluginConfig` to simplify test setup.
pub struct PluginConfigBuilder {
    config: PluginConfig,
}

impl PluginConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: PluginConfig::default(),
        }
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = Some(root.into());
        self
    }

    pub fn delay(mut self, ms: i64) -> Self {
        self.config.delay = ms;
        self
    }

    pub fn log(mut self, log: bool) -> Self {
        self.config.log = log;
        self
    }

    pub fn tailwind_directive_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.tailwind_directive_path = Some(path.into());
        self
    }

    pub fn suppress_full_reload(mut self, val: bool) -> Self {
        self.config.suppress_full_reload = Some(val);
        self
    }

    pub fn build(self) -> PluginConfig {
        self.config
    }
}

impl Default for PluginConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
