// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Archival of the active file once it reaches the line threshold

use crate::log::{LogState, Shared};
use chrono::{DateTime, SecondsFormat, Utc};
use jot_core::{LogError, LogEvent};
use std::path::{Path, PathBuf};

impl Shared {
    /// Archive the active file if it holds at least `rollover_threshold` lines
    ///
    /// Called after each successful append, and by a drain with nothing
    /// buffered while one is due. On rename failure nothing is reset, so
    /// the next flush or timer tick retries against the same file.
    pub(crate) async fn rollover(&self) -> Result<(), LogError> {
        let lines = {
            let state = self.lock_state();
            if !self.rollover_due(&state) {
                return Ok(());
            }
            state.file_lines
        };
        let Some(path) = self.backing.path() else {
            return Ok(());
        };

        let archive = archive_path(path, self.clock.now(), lines);
        self.backing
            .archive(&archive)
            .await
            .map_err(|e| LogError::archive(self.source.clone(), archive.clone(), e))?;

        {
            let mut state = self.lock_state();
            state.file_lines -= lines;
            // Records still pending keep their place at the top of the new file
            state.line_number = state.line_number.saturating_sub(lines);
        }

        tracing::info!(
            log = %self.source,
            archive = %archive.display(),
            lines,
            "rolled over"
        );
        self.events.publish(LogEvent::Rollover { archive, lines });
        Ok(())
    }

    /// True when the active file has reached its threshold and can be archived
    pub(crate) fn rollover_due(&self, state: &LogState) -> bool {
        let threshold = self.config.rollover_threshold;
        threshold != 0 && self.backing.path().is_some() && state.file_lines >= threshold
    }
}

/// `{stem}-{timestamp}-{lines}{ext}` next to the active file
///
/// The timestamp is ISO 8601 with millisecond precision and `:` replaced
/// by `_` so the name is valid on every filesystem.
pub fn archive_path(path: &Path, now: DateTime<Utc>, lines: u64) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let timestamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(':', "_");
    path.with_file_name(format!("{stem}-{timestamp}-{lines}{ext}"))
}

#[cfg(test)]
#[path = "rollover_tests.rs"]
mod tests;
