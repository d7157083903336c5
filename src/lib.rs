// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod fs;
pub mod host;
pub mod logging;
pub mod patch;
pub mod plugin;
pub mod reload;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cli::{CliArgs, Command, PatchArgs, WatchArgs};
use crate::config::{default_config_path, load_from_path, ConfigFile, RawConfigFile};
use crate::fs::{FileSystem, RealFileSystem};
use crate::host::{DevHost, LiveUpdate};
use crate::patch::{BundlePatcher, PatchMode, TransformOptions};
use crate::reload::Dispatch;
use crate::watch::resolve::WatchPaths;

pub use crate::plugin::TurboReloadPlugin;

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Watch(watch) => run_watch(watch).await,
        Command::Patch(patch) => run_patch(&patch),
    }
}

/// Run the standalone dev host until Ctrl-C.
///
/// This wires together:
/// - config file + CLI overrides
/// - the `notify`-backed [`DevHost`]
/// - the plugin's reload trigger
/// - a printer that writes every live update to stdout as one JSON line
async fn run_watch(args: WatchArgs) -> Result<()> {
    let cfg = watch_config(&args)?;

    let (host, mut events) = DevHost::new();
    let host = Arc::new(host);
    let printer = spawn_update_printer(host.subscribe());

    let plugin = TurboReloadPlugin::new(cfg.paths, cfg.plugin);
    let trigger = plugin.configure_server(host.clone())?;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            res = &mut shutdown => {
                if let Err(e) = res {
                    warn!("failed to listen for Ctrl+C: {e}");
                }
                info!("shutdown requested; pending refreshes are dropped");
                break;
            }
            event = events.recv() => {
                let Some(event) = event else {
                    info!("watch event channel closed; exiting");
                    break;
                };
                debug!(?event, "received watch event");
                if let Some(dispatch) = trigger.handle_event(&event) {
                    report_touch_failure(dispatch);
                }
            }
        }
    }

    printer.abort();
    Ok(())
}

/// Merge the config file (if any) with CLI overrides and validate the result.
///
/// Without an explicit `--root`, a root from the config file (or the lack of
/// one) is taken relative to the config file's directory.
pub fn watch_config(args: &WatchArgs) -> errors::Result<ConfigFile> {
    let config_path = args.config.clone().or_else(default_config_path);

    let mut raw = match &config_path {
        Some(path) => {
            debug!(?path, "loading config file");
            let mut raw = load_from_path(path)?;
            let base = config_root_dir(path);
            raw.plugin.root = Some(match raw.plugin.root.take() {
                Some(root) => base.join(root),
                None => base,
            });
            raw
        }
        None => RawConfigFile::default(),
    };

    if !args.paths.is_empty() {
        raw.paths = WatchPaths::from(args.paths.clone());
    }
    if let Some(root) = &args.root {
        raw.plugin.root = Some(root.clone());
    }
    if let Some(delay) = args.delay {
        raw.plugin.delay = delay;
    }
    if args.no_log {
        raw.plugin.log = false;
    }
    if let Some(path) = &args.tailwind_directive_path {
        raw.plugin.tailwind_directive_path = Some(path.clone());
    }
    if let Some(suppress) = args.suppress_full_reload {
        raw.plugin.suppress_full_reload = Some(suppress);
    }

    ConfigFile::try_from(raw)
}

/// Directory a config file's relative paths are anchored to.
///
/// - If the config path has a non-empty parent (e.g. "config/turbo-reload.toml"),
///   we use that directory.
/// - If it's just a bare filename, we fall back to the current working
///   directory.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn spawn_update_printer(mut updates: broadcast::Receiver<LiveUpdate>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(update) => match serde_json::to_string(&update) {
                    Ok(line) => println!("{line}"),
                    Err(err) => warn!("failed to encode live update: {err}"),
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "live-update printer fell behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// Companion-file touches are not awaited by the event loop; surface their
/// failures in the log once they finish.
fn report_touch_failure(dispatch: Dispatch) {
    let Some(touch) = dispatch.touch else {
        return;
    };
    tokio::spawn(async move {
        match touch.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => error!("{err:#}"),
            Err(err) => error!("companion touch task failed: {err}"),
        }
    });
}

/// Print the patched bundle, or the original source when it is not the
/// Turbo bundle.
fn run_patch(args: &PatchArgs) -> Result<()> {
    let code = RealFileSystem.read_to_string(&args.file)?;
    let id = args
        .id
        .clone()
        .unwrap_or_else(|| args.file.to_string_lossy().into_owned());

    let mode = if args.suppress_full_reload {
        PatchMode::SuppressFullReload
    } else {
        PatchMode::RefreshOnly
    };
    let patcher = BundlePatcher::new(mode);

    match patcher.transform(&code, &id, TransformOptions { ssr: args.ssr }) {
        Some(patched) => {
            info!(%id, "turbo bundle patched");
            print!("{patched}");
        }
        None => {
            info!(%id, "not a turbo bundle; source left unchanged");
            print!("{code}");
        }
    }
    Ok(())
}
