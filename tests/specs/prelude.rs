//! Shared fixtures for the behavioral specs

#![allow(dead_code)]

pub use jot_storage::{
    EventReceiver, FakeBacking, FakeClock, Log, LogConfig, LogError, LogEvent, Phase, Record,
    ShutdownCoordinator, Target,
};
pub use serde_json::json;
pub use std::path::{Path, PathBuf};
pub use std::sync::Arc;
pub use std::time::Duration;

use tempfile::TempDir;

/// Scratch directory removed when dropped
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).unwrap()
    }

    /// File names in the scratch directory, sorted
    pub fn files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Config that only flushes and loads when told to
pub fn quiet() -> LogConfig {
    LogConfig::default()
        .with_auto_load(false)
        .with_flush_interval(Duration::from_secs(3600))
}

/// Everything published so far
pub fn drain(events: &mut EventReceiver) -> Vec<LogEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

pub fn records(events: &[LogEvent]) -> Vec<(Record, u64)> {
    events
        .iter()
        .filter_map(|e| match e {
            LogEvent::Record { record, line } => Some((record.clone(), *line)),
            _ => None,
        })
        .collect()
}

/// Open a fresh log over `target`, replay it, and return what it published
pub async fn replay(target: impl Into<Target>, config: LogConfig) -> Vec<LogEvent> {
    let (log, mut events) = Log::open(target, config.with_auto_load(false))
        .await
        .unwrap();
    let _ = log.load().await;
    let published = drain(&mut events);
    log.stop().await.unwrap();
    published
}

/// Open a log over a fake backing with a fixed clock
pub async fn open_fake(fake: &FakeBacking, config: LogConfig) -> (Log, EventReceiver) {
    Log::open_with(
        Arc::new(fake.clone()),
        config,
        Arc::new(FakeClock::default()),
    )
    .await
    .unwrap()
}
