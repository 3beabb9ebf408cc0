// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory backing with failure injection for tests

use crate::backing::{Backing, LineReader};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct FakeState {
    active: String,
    batches: Vec<String>,
    archives: Vec<(PathBuf, String)>,
    read_error: Option<io::ErrorKind>,
    fail_appends: usize,
    fail_archives: usize,
    append_attempts: usize,
    append_delay: Duration,
}

/// Fake backing that keeps its "file" in memory
///
/// Clones share state, so a test can keep one clone and hand another to
/// the log under test.
#[derive(Clone)]
pub struct FakeBacking {
    path: PathBuf,
    state: Arc<Mutex<FakeState>>,
}

impl FakeBacking {
    pub fn new() -> Self {
        Self::at("fake/events.log")
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Arc::new(Mutex::new(FakeState::default())),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Seed the active content served to the loader
    pub fn with_content(self, content: &str) -> Self {
        self.lock().active = content.to_string();
        self
    }

    /// Make every `reader()` call fail with the given kind
    pub fn fail_reads(&self, kind: io::ErrorKind) {
        self.lock().read_error = Some(kind);
    }

    /// Fail the next `n` appends
    pub fn fail_next_appends(&self, n: usize) {
        self.lock().fail_appends = n;
    }

    /// Fail the next `n` archives
    pub fn fail_next_archives(&self, n: usize) {
        self.lock().fail_archives = n;
    }

    /// Stall every append before it lands
    pub fn set_append_delay(&self, delay: Duration) {
        self.lock().append_delay = delay;
    }

    /// Content appended since the last archive
    pub fn contents(&self) -> String {
        self.lock().active.clone()
    }

    /// Lines of the active content, in order
    pub fn lines(&self) -> Vec<String> {
        self.lock().active.lines().map(str::to_string).collect()
    }

    /// Every successful append, one entry per batch
    pub fn batches(&self) -> Vec<String> {
        self.lock().batches.clone()
    }

    /// Archived content keyed by archive path
    pub fn archives(&self) -> Vec<(PathBuf, String)> {
        self.lock().archives.clone()
    }

    /// Appends attempted, including injected failures
    pub fn append_attempts(&self) -> usize {
        self.lock().append_attempts
    }
}

impl Default for FakeBacking {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backing for FakeBacking {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    async fn prepare(&self) -> io::Result<()> {
        Ok(())
    }

    async fn reader(&self) -> io::Result<Option<LineReader>> {
        let state = self.lock();
        if let Some(kind) = state.read_error {
            return Err(io::Error::new(kind, "injected read failure"));
        }
        let content = state.active.clone().into_bytes();
        Ok(Some(Box::new(io::Cursor::new(content))))
    }

    async fn append(&self, data: &[u8]) -> io::Result<()> {
        let delay = {
            let mut state = self.lock();
            state.append_attempts += 1;
            state.append_delay
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.lock();
        if state.fail_appends > 0 {
            state.fail_appends -= 1;
            return Err(io::Error::new(io::ErrorKind::Other, "injected append failure"));
        }
        let batch = String::from_utf8_lossy(data).into_owned();
        state.active.push_str(&batch);
        state.batches.push(batch);
        Ok(())
    }

    async fn archive(&self, to: &Path) -> io::Result<()> {
        let mut state = self.lock();
        if state.fail_archives > 0 {
            state.fail_archives -= 1;
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "injected archive failure",
            ));
        }
        let active = std::mem::take(&mut state.active);
        state.archives.push((to.to_path_buf(), active));
        Ok(())
    }
}
