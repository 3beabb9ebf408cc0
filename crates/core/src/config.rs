// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log configuration and backing targets

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Tunables for one log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Replay existing content as soon as the log is opened
    pub auto_load: bool,
    /// Coalescing window between drains
    #[serde(with = "humantime_serde")]
    pub flush_interval: Duration,
    /// Pending lines allowed before new records are rejected (0 = unlimited)
    pub buffer_watermark: usize,
    /// Lines per file before archival (0 = disabled)
    pub rollover_threshold: u64,
    /// Treat records as literal text lines
    pub raw_mode: bool,
    /// Exclude from bulk shutdown
    pub unmanaged: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            auto_load: true,
            flush_interval: Duration::from_secs(3),
            // 3072 records every 3 seconds
            buffer_watermark: 3072,
            rollover_threshold: 0,
            raw_mode: false,
            unmanaged: false,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_load(mut self, auto_load: bool) -> Self {
        self.auto_load = auto_load;
        self
    }

    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    pub fn with_buffer_watermark(mut self, watermark: usize) -> Self {
        self.buffer_watermark = watermark;
        self
    }

    pub fn with_rollover_threshold(mut self, threshold: u64) -> Self {
        self.rollover_threshold = threshold;
        self
    }

    pub fn with_raw_mode(mut self, raw_mode: bool) -> Self {
        self.raw_mode = raw_mode;
        self
    }

    pub fn with_unmanaged(mut self, unmanaged: bool) -> Self {
        self.unmanaged = unmanaged;
        self
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|error| ConfigError::Toml { path: None, error })
    }

    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        let config = toml::from_str(&content).map_err(|error| ConfigError::Toml {
            path: Some(path.to_path_buf()),
            error,
        })?;
        tracing::debug!(path = %path.display(), ?config, "loaded log config");
        Ok(config)
    }
}

/// Where a log's lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Append to a file, replaying it on load
    File(PathBuf),
    /// Mirror each flushed batch to standard output
    Stdout,
    /// No persistent backing: records are only observed
    Sink,
}

impl Target {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Target::File(path.into())
    }
}

impl From<Option<PathBuf>> for Target {
    /// A log opened without a path mirrors to stdout
    fn from(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Target::File(path),
            None => Target::Stdout,
        }
    }
}

impl From<PathBuf> for Target {
    fn from(path: PathBuf) -> Self {
        Target::File(path)
    }
}

impl From<&Path> for Target {
    fn from(path: &Path) -> Self {
        Target::File(path.to_path_buf())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
