#![allow(dead_code)]

use std::path::PathBuf;

pub use turbo_reload_test_utils::builders::PluginConfigBuilder;
pub use turbo_reload_test_utils::{init_tracing, with_timeout, RecordingHost};

/// The demo project shipped with the crate.
pub fn demo_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos")
}
