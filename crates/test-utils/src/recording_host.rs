use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::sync::Notify;
use turbo_reload::errors::Result;
use turbo_reload::host::{BuildHost, LiveUpdate, LogOptions};

/// A live update as seen by the host, with the moment it arrived.
#[derive(Debug, Clone)]
pub struct RecordedUpdate {
    pub update: LiveUpdate,
    pub at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub message: String,
    pub options: LogOptions,
}

#[derive(Debug, Default)]
struct Recorded {
    watched: Vec<Vec<String>>,
    updates: Vec<RecordedUpdate>,
    logs: Vec<LogLine>,
}

/// A fake host that:
/// - records every `register_watch`, live update and notice
/// - wakes waiters whenever a live update arrives.
///
/// Clones share the same recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    recorded: Arc<Mutex<Recorded>>,
    update_arrived: Arc<Notify>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watched(&self) -> Vec<Vec<String>> {
        self.recorded.lock().unwrap().watched.clone()
    }

    pub fn updates(&self) -> Vec<RecordedUpdate> {
        self.recorded.lock().unwrap().updates.clone()
    }

    pub fn update_count(&self) -> usize {
        self.recorded.lock().unwrap().updates.len()
    }

    pub fn logs(&self) -> Vec<LogLine> {
        self.recorded.lock().unwrap().logs.clone()
    }

    /// Wait until at least `count` live updates have been recorded.
    pub async fn wait_for_updates(&self, count: usize) {
        loop {
            let notified = self.update_arrived.notified();
            if self.update_count() >= count {
                return;
            }
            notified.await;
        }
    }
}

impl BuildHost for RecordingHost {
    fn register_watch(&self, patterns: &[String]) -> Result<()> {
        self.recorded.lock().unwrap().watched.push(patterns.to_vec());
        Ok(())
    }

    fn send_live_update(&self, update: LiveUpdate) {
        self.recorded.lock().unwrap().updates.push(RecordedUpdate {
            update,
            at: Instant::now(),
        });
        self.update_arrived.notify_waiters();
    }

    fn info(&self, message: &str, options: LogOptions) {
        self.recorded.lock().unwrap().logs.push(LogLine {
            message: console::strip_ansi_codes(message).into_owned(),
            options,
        });
    }
}
