// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line arguments for `turbo-reload`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "turbo-reload",
    version,
    about = "Send Turbo refreshes when watched templates change.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TURBO_RELOAD_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Watch paths and print a live-update message per matching change.
    Watch(WatchArgs),
    /// Append the refresh footer to a Turbo bundle and print the result.
    Patch(PatchArgs),
}

#[derive(Debug, Clone, Args)]
pub struct WatchArgs {
    /// Paths or globs to watch, relative to the root.
    ///
    /// Replaces `paths` from the config file when given.
    #[arg(value_name = "PATHS")]
    pub paths: Vec<String>,

    /// Path to the config file (TOML).
    ///
    /// Default: `turbo-reload.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory the paths are resolved against.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Milliseconds to wait before sending each refresh.
    #[arg(long, value_name = "MS", allow_hyphen_values = true)]
    pub delay: Option<i64>,

    /// Do not print a notice for each refresh.
    #[arg(long)]
    pub no_log: bool,

    /// Stylesheet with `@tailwind` directives to touch on every refresh.
    #[arg(long, value_name = "PATH")]
    pub tailwind_directive_path: Option<PathBuf>,

    /// Whether the injected client also swallows the follow-up full reload.
    #[arg(long, value_name = "BOOL")]
    pub suppress_full_reload: Option<bool>,
}

#[derive(Debug, Clone, Args)]
pub struct PatchArgs {
    /// Bundle source file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Module id to check for the Turbo marker. Defaults to the file path.
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,

    /// Treat the module as compiled for server-side rendering.
    #[arg(long)]
    pub ssr: bool,

    /// Inject the footer that also swallows the follow-up full reload.
    #[arg(long)]
    pub suppress_full_reload: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_flags_parse() {
        let args = CliArgs::try_parse_from([
            "turbo-reload",
            "watch",
            "app/views/**/*.erb",
            "--delay",
            "-5",
            "--no-log",
            "--log-level",
            "debug",
        ])
        .unwrap();

        let Command::Watch(watch) = args.command else {
            panic!("expected watch command");
        };
        assert_eq!(watch.paths, vec!["app/views/**/*.erb"]);
        assert_eq!(watch.delay, Some(-5));
        assert!(watch.no_log);
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    }

    #[test]
    fn patch_defaults() {
        let args = CliArgs::try_parse_from(["turbo-reload", "patch", "turbo.js"]).unwrap();
        let Command::Patch(patch) = args.command else {
            panic!("expected patch command");
        };
        assert_eq!(patch.file, PathBuf::from("turbo.js"));
        assert!(patch.id.is_none());
        assert!(!patch.ssr);
    }
}
