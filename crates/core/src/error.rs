// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy shared by every log component

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors reported by a log, both as return values and as `LogEvent::Error`
///
/// I/O errors are shared behind an `Arc` so a single failure can be
/// returned to the caller and published to subscribers.
#[derive(Debug, Clone, Error)]
pub enum LogError {
    #[error("failed parsing {log}:{line}: {message}")]
    Parse {
        log: String,
        line: u64,
        message: String,
    },
    #[error("cannot encode record: {0}")]
    Encode(String),
    #[error("failed preparing {log}: {error}")]
    Prepare {
        log: String,
        error: Arc<io::Error>,
    },
    #[error("failed reading {log}: {error}")]
    Read {
        log: String,
        error: Arc<io::Error>,
    },
    #[error("failed appending to {log}: {error}")]
    Append {
        log: String,
        error: Arc<io::Error>,
    },
    #[error("failed archiving {log} to {}: {error}", .archive.display())]
    Archive {
        log: String,
        archive: PathBuf,
        error: Arc<io::Error>,
    },
    #[error("overflow: {pending} records pending (watermark {watermark})")]
    Overflow { pending: usize, watermark: usize },
    #[error("handler failed{}: {message}", .line.map(|l| format!(" on line {l}")).unwrap_or_default())]
    Handler { line: Option<u64>, message: String },
    #[error("log {log} stopped, cannot save record")]
    Stopped { log: String },
}

impl LogError {
    /// Back-pressure rejections are expected; generic handlers can skip them
    pub fn is_overflow(&self) -> bool {
        matches!(self, LogError::Overflow { .. })
    }

    pub fn prepare(log: impl Into<String>, error: io::Error) -> Self {
        LogError::Prepare {
            log: log.into(),
            error: Arc::new(error),
        }
    }

    pub fn read(log: impl Into<String>, error: io::Error) -> Self {
        LogError::Read {
            log: log.into(),
            error: Arc::new(error),
        }
    }

    pub fn append(log: impl Into<String>, error: io::Error) -> Self {
        LogError::Append {
            log: log.into(),
            error: Arc::new(error),
        }
    }

    pub fn archive(log: impl Into<String>, archive: PathBuf, error: io::Error) -> Self {
        LogError::Archive {
            log: log.into(),
            archive,
            error: Arc::new(error),
        }
    }
}

/// Errors produced by a record codec
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("raw record is empty")]
    Empty,
    #[error("raw record contains a line break")]
    LineBreak,
}

/// Errors loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed reading config {}: {error}", .path.display())]
    Io { path: PathBuf, error: io::Error },
    #[error("invalid config{}: {error}", .path.as_ref().map(|p| format!(" {}", p.display())).unwrap_or_default())]
    Toml {
        path: Option<PathBuf>,
        error: toml::de::Error,
    },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
