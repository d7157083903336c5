mod common;
use crate::common::{init_tracing, with_timeout, PluginConfigBuilder, RecordingHost};

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use turbo_reload::fs::mock::MockFileSystem;
use turbo_reload::fs::RealFileSystem;
use turbo_reload::host::LiveUpdate;
use turbo_reload::reload::{Notifier, NOTICE_MARKER};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn delayed_refresh_is_not_sent_synchronously() -> TestResult {
    init_tracing();

    let host = RecordingHost::new();
    let config = PluginConfigBuilder::new().delay(100).log(false).build();
    let notifier = Notifier::new(
        Arc::new(host.clone()),
        Arc::new(MockFileSystem::new()),
        Path::new("/proj"),
        &config,
    );

    let started = Instant::now();
    let dispatch = notifier.notify(Path::new("/proj/pages/about.html"));
    assert_eq!(host.update_count(), 0);

    with_timeout(dispatch.emission).await?;

    let updates = host.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].update, LiveUpdate::turbo_refresh());
    assert!(updates[0].at.duration_since(started) >= Duration::from_millis(100));
    Ok(())
}

#[tokio::test]
async fn zero_delay_still_defers_the_refresh() -> TestResult {
    let host = RecordingHost::new();
    let config = PluginConfigBuilder::new().log(false).build();
    let notifier = Notifier::new(
        Arc::new(host.clone()),
        Arc::new(MockFileSystem::new()),
        Path::new("/proj"),
        &config,
    );

    let dispatch = notifier.notify(Path::new("/proj/a.html"));
    assert_eq!(host.update_count(), 0);
    with_timeout(dispatch.emission).await?;
    assert_eq!(host.update_count(), 1);
    Ok(())
}

#[tokio::test]
async fn rapid_matches_are_not_coalesced() -> TestResult {
    let host = RecordingHost::new();
    let config = PluginConfigBuilder::new().delay(30).log(false).build();
    let notifier = Notifier::new(
        Arc::new(host.clone()),
        Arc::new(MockFileSystem::new()),
        Path::new("/proj"),
        &config,
    );

    let dispatches: Vec<_> = (0..3)
        .map(|i| notifier.notify(&PathBuf::from(format!("/proj/views/{i}.html"))))
        .collect();
    for dispatch in dispatches {
        with_timeout(dispatch.emission).await?;
    }

    assert_eq!(host.update_count(), 3);
    Ok(())
}

#[tokio::test]
async fn notice_names_the_path_relative_to_root() -> TestResult {
    let host = RecordingHost::new();
    let config = PluginConfigBuilder::new().build();
    let notifier = Notifier::new(
        Arc::new(host.clone()),
        Arc::new(MockFileSystem::new()),
        Path::new("/proj"),
        &config,
    );

    let dispatch = notifier.notify(Path::new("/proj/app/views/home.html.erb"));

    let logs = host.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].message, format!("{NOTICE_MARKER} app/views/home.html.erb"));
    assert!(logs[0].options.clear);
    assert!(logs[0].options.timestamp);

    with_timeout(dispatch.emission).await?;
    Ok(())
}

#[tokio::test]
async fn logging_can_be_disabled() -> TestResult {
    let host = RecordingHost::new();
    let config = PluginConfigBuilder::new().log(false).build();
    let notifier = Notifier::new(
        Arc::new(host.clone()),
        Arc::new(MockFileSystem::new()),
        Path::new("/proj"),
        &config,
    );

    with_timeout(notifier.notify(Path::new("/proj/a.html")).emission).await?;
    assert!(host.logs().is_empty());
    Ok(())
}

#[tokio::test]
async fn companion_file_is_resolved_against_root_and_touched() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/app/assets/application.tailwind.css", "@tailwind base;");

    let host = RecordingHost::new();
    let config = PluginConfigBuilder::new()
        .log(false)
        .tailwind_directive_path("app/assets/application.tailwind.css")
        .build();
    let notifier = Notifier::new(
        Arc::new(host.clone()),
        Arc::new(fs.clone()),
        Path::new("/proj"),
        &config,
    );

    assert_eq!(
        notifier.companion(),
        Some(Path::new("/proj/app/assets/application.tailwind.css"))
    );

    let dispatch = notifier.notify(Path::new("/proj/views/a.html"));
    let touch = dispatch.touch.expect("companion configured");
    with_timeout(touch).await??;

    assert_eq!(
        fs.touched(),
        vec![PathBuf::from("/proj/app/assets/application.tailwind.css")]
    );
    Ok(())
}

#[tokio::test]
async fn missing_companion_file_fails_without_blocking_the_refresh() -> TestResult {
    let host = RecordingHost::new();
    let config = PluginConfigBuilder::new()
        .log(false)
        .tailwind_directive_path("missing.css")
        .build();
    let notifier = Notifier::new(
        Arc::new(host.clone()),
        Arc::new(MockFileSystem::new()),
        Path::new("/proj"),
        &config,
    );

    let dispatch = notifier.notify(Path::new("/proj/a.html"));
    let touch = dispatch.touch.expect("companion configured");

    let err = with_timeout(touch).await?.unwrap_err();
    assert!(format!("{err:#}").contains("missing.css"));

    with_timeout(dispatch.emission).await?;
    assert_eq!(host.update_count(), 1);
    Ok(())
}

#[tokio::test]
async fn companion_touch_updates_real_timestamps() -> TestResult {
    let dir = tempfile::tempdir()?;
    let css = dir.path().join("application.tailwind.css");
    std::fs::write(&css, "@tailwind utilities;")?;

    let past = filetime::FileTime::from_unix_time(1_000_000_000, 0);
    filetime::set_file_times(&css, past, past)?;

    let config = PluginConfigBuilder::new()
        .log(false)
        .tailwind_directive_path("application.tailwind.css")
        .build();
    let notifier = Notifier::new(
        Arc::new(RecordingHost::new()),
        Arc::new(RealFileSystem),
        dir.path(),
        &config,
    );

    let dispatch = notifier.notify(&dir.path().join("index.html"));
    with_timeout(dispatch.touch.expect("companion configured")).await??;

    let meta = std::fs::metadata(&css)?;
    let mtime = filetime::FileTime::from_last_modification_time(&meta);
    assert!(mtime > past);
    Ok(())
}
