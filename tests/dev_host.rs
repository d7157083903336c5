mod common;
use crate::common::{init_tracing, with_timeout, PluginConfigBuilder};

use std::error::Error;
use std::fs;
use std::sync::Arc;

use turbo_reload::host::{BuildHost, DevHost, LiveUpdate};
use turbo_reload::TurboReloadPlugin;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn file_written_under_a_watched_glob_becomes_a_refresh() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let root = dir.path().canonicalize()?;
    fs::create_dir_all(root.join("views"))?;

    let (host, mut events) = DevHost::new();
    let host = Arc::new(host);
    let mut updates = host.subscribe();

    let plugin = TurboReloadPlugin::new(
        "views/**/*.html",
        PluginConfigBuilder::new().root(&root).log(false).build(),
    );
    let trigger = plugin.configure_server(host.clone())?;
    assert_eq!(host.watcher_count(), 1);

    fs::write(root.join("views/home.html"), "<h1>hi</h1>")?;

    // The backend may report several raw events for one write; the first
    // matching one is enough.
    let dispatch = with_timeout(async {
        loop {
            let event = events.recv().await.expect("watcher channel closed");
            if let Some(dispatch) = trigger.handle_event(&event) {
                break dispatch;
            }
        }
    })
    .await;
    with_timeout(dispatch.emission).await?;

    assert_eq!(with_timeout(updates.recv()).await?, LiveUpdate::turbo_refresh());
    Ok(())
}

#[tokio::test]
async fn missing_watch_directory_falls_back_to_an_existing_ancestor() -> TestResult {
    let dir = tempfile::tempdir()?;
    let root = dir.path().canonicalize()?;

    let (host, _events) = DevHost::new();
    let pattern = format!("{}/not-yet/**/*.html", root.display());
    host.register_watch(&[pattern])?;

    assert_eq!(host.watcher_count(), 1);
    Ok(())
}
