// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backing stores a log appends to and replays from

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncBufRead, AsyncWriteExt, BufReader};

/// Line source handed to the loader
pub type LineReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// Durable (or not) destination for a log's lines
///
/// A backing is owned by exactly one log. The log serializes appends and
/// archives, so implementations never see two of them at once.
#[async_trait]
pub trait Backing: Send + Sync + 'static {
    /// Identifier used in errors and traces
    fn describe(&self) -> String;

    /// File path, for backings that can be archived
    fn path(&self) -> Option<&Path>;

    /// Create whatever must exist before the first read or write
    async fn prepare(&self) -> io::Result<()>;

    /// Open existing content for replay; `None` means nothing to replay
    async fn reader(&self) -> io::Result<Option<LineReader>>;

    /// Append one batch of newline-terminated lines
    async fn append(&self, data: &[u8]) -> io::Result<()>;

    /// Move the active content aside so the next append starts fresh
    async fn archive(&self, to: &Path) -> io::Result<()>;
}

/// Append-only file on disk
#[derive(Debug, Clone)]
pub struct FileBacking {
    path: PathBuf,
}

impl FileBacking {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Backing for FileBacking {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    async fn prepare(&self) -> io::Result<()> {
        if fs::try_exists(&self.path).await? {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        Ok(())
    }

    async fn reader(&self) -> io::Result<Option<LineReader>> {
        let file = File::open(&self.path).await?;
        Ok(Some(Box::new(BufReader::new(file))))
    }

    async fn append(&self, data: &[u8]) -> io::Result<()> {
        // Reopened per batch so an archived file is never written again
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(data).await?;
        file.flush().await?;
        Ok(())
    }

    async fn archive(&self, to: &Path) -> io::Result<()> {
        fs::rename(&self.path, to).await
    }
}

/// Mirrors every flushed batch to the process's standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutBacking;

#[async_trait]
impl Backing for StdoutBacking {
    fn describe(&self) -> String {
        "<stdout>".to_string()
    }

    fn path(&self) -> Option<&Path> {
        None
    }

    async fn prepare(&self) -> io::Result<()> {
        Ok(())
    }

    async fn reader(&self) -> io::Result<Option<LineReader>> {
        Ok(None)
    }

    async fn append(&self, data: &[u8]) -> io::Result<()> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(data).await?;
        stdout.flush().await
    }

    async fn archive(&self, _to: &Path) -> io::Result<()> {
        Ok(())
    }
}

/// No persistent backing: records are observed, never stored
#[derive(Debug, Clone, Copy, Default)]
pub struct SinkBacking;

#[async_trait]
impl Backing for SinkBacking {
    fn describe(&self) -> String {
        "<sink>".to_string()
    }

    fn path(&self) -> Option<&Path> {
        None
    }

    async fn prepare(&self) -> io::Result<()> {
        Ok(())
    }

    async fn reader(&self) -> io::Result<Option<LineReader>> {
        Ok(None)
    }

    async fn append(&self, _data: &[u8]) -> io::Result<()> {
        Ok(())
    }

    async fn archive(&self, _to: &Path) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "backing_tests.rs"]
mod tests;
