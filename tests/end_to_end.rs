mod common;
use crate::common::{init_tracing, with_timeout, PluginConfigBuilder, RecordingHost};

use std::error::Error;
use std::sync::Arc;

use turbo_reload::host::{LiveUpdate, WatchEvent};
use turbo_reload::plugin::{ApplyMode, PLUGIN_NAME};
use turbo_reload::TurboReloadPlugin;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn change_to_a_watched_view_sends_one_refresh_and_one_notice() -> TestResult {
    init_tracing();

    let root = tempfile::tempdir()?;
    let host = RecordingHost::new();
    let plugin = TurboReloadPlugin::new(
        "src/views/**/*.html",
        PluginConfigBuilder::new()
            .root(root.path())
            .log(true)
            .delay(0)
            .build(),
    );

    let trigger = plugin.configure_server(Arc::new(host.clone()))?;

    let event = WatchEvent::change(root.path().join("src/views/home.html"));
    let dispatch = trigger.handle_event(&event).expect("path should match");
    with_timeout(dispatch.emission).await?;

    let updates = host.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].update, LiveUpdate::turbo_refresh());

    let logs = host.logs();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].message.contains("views/home.html"));
    Ok(())
}

#[tokio::test]
async fn configure_server_registers_resolved_patterns() -> TestResult {
    let host = RecordingHost::new();
    let plugin = TurboReloadPlugin::new(
        vec!["app/views/**/*.erb", "./config/../config/routes.rb"],
        PluginConfigBuilder::new().root("/srv/app").build(),
    );

    plugin.configure_server(Arc::new(host.clone()))?;

    assert_eq!(
        host.watched(),
        vec![vec![
            "/srv/app/app/views/**/*.erb".to_string(),
            "/srv/app/config/routes.rb".to_string(),
        ]]
    );
    Ok(())
}

#[tokio::test]
async fn unmatched_and_removed_files_do_nothing() -> TestResult {
    let host = RecordingHost::new();
    let plugin = TurboReloadPlugin::new(
        "views/**",
        PluginConfigBuilder::new().root("/proj").build(),
    );
    let trigger = plugin.configure_server(Arc::new(host.clone()))?;

    assert!(trigger.handle_event(&WatchEvent::change("/proj/assets/app.js")).is_none());
    assert!(trigger.handle_event(&WatchEvent::unlink("/proj/views/old.html")).is_none());
    assert!(trigger.handle_event(&WatchEvent::add("/proj/views/new.html")).is_some());

    with_timeout(host.wait_for_updates(1)).await;
    assert_eq!(host.update_count(), 1);
    assert_eq!(host.logs().len(), 1);
    Ok(())
}

#[test]
fn descriptor_hooks() {
    let plugin = TurboReloadPlugin::new("views/**", Default::default());
    assert_eq!(plugin.name(), PLUGIN_NAME);
    assert_eq!(plugin.apply(), ApplyMode::Serve);
    assert!(plugin.config().watch_globbing);
}

#[test]
fn invalid_glob_is_a_configuration_error() {
    let plugin = TurboReloadPlugin::new("views/[", PluginConfigBuilder::new().root("/proj").build());
    let err = plugin
        .configure_server(Arc::new(RecordingHost::new()))
        .unwrap_err();
    assert!(err.to_string().contains("Invalid watch pattern"));
}
