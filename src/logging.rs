// src/logging.rs

//! `tracing` setup for the `turbo-reload` binary.
//!
//! The filter comes from, in order:
//! 1. `--log-level`, applied to this crate only;
//! 2. `TURBO_RELOAD_LOG`, read as full `EnvFilter` directives
//!    (e.g. `turbo_reload=debug,notify=warn`);
//! 3. [`DEFAULT_DIRECTIVES`].
//!
//! Output goes to stderr. Stdout is reserved for live-update lines.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "TURBO_RELOAD_LOG";

/// Used when neither the flag nor the environment says otherwise.
pub const DEFAULT_DIRECTIVES: &str = "turbo_reload=info,warn";

pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(cli_level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

fn build_filter(cli_level: Option<LogLevel>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(cli_directives(level));
    }
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// The flag raises or lowers this crate's verbosity; dependencies stay at
/// `warn` unless the flag is quieter than that.
fn cli_directives(level: LogLevel) -> String {
    let ours = match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };
    let deps = match level {
        LogLevel::Error => "error",
        _ => "warn",
    };
    format!("turbo_reload={ours},{deps}")
}
