// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replay of a log's existing content
//!
//! Lines are streamed in file order. Every physical line advances the line
//! counter, blank ones included, so reported line numbers match the file.
//! Lines are split on raw bytes: invalid UTF-8 is a parse error for that
//! line in structured mode and is decoded lossily in raw mode.

use crate::log::{LoadState, Log, Shared};
use jot_core::{LogError, LogEvent};
use std::borrow::Cow;
use std::fmt;
use std::io;
use tokio::io::AsyncBufReadExt;

impl Log {
    /// Replay existing content, publishing each record with its line number
    ///
    /// Only the first call does anything. A missing file is an empty log.
    /// Malformed lines are reported and skipped; a read error ends the
    /// replay without `LogEvent::Loaded`.
    pub async fn load(&self) -> Result<(), LogError> {
        {
            let mut state = self.shared.lock_state();
            if state.load != LoadState::NotStarted {
                return Ok(());
            }
            state.load = LoadState::Loading;
        }

        let result = replay(&self.shared).await;
        let shared = &self.shared;
        let mut state = shared.lock_state();
        match result {
            Ok(records) => {
                state.load = LoadState::Done;
                tracing::info!(log = %shared.source, records, lines = state.line_number, "log loaded");
                shared.events.publish(LogEvent::Loaded { records });
                Ok(())
            }
            Err(error) => {
                state.load = LoadState::Failed;
                shared.report(&error);
                Err(error)
            }
        }
    }
}

impl Shared {
    fn parse_error(&self, line: u64, error: impl fmt::Display) -> LogError {
        LogError::Parse {
            log: self.source.clone(),
            line,
            message: error.to_string(),
        }
    }
}

/// Stream the backing's lines, returning how many records were replayed
async fn replay(shared: &Shared) -> Result<u64, LogError> {
    let reader = match shared.backing.reader().await {
        Ok(Some(reader)) => reader,
        Ok(None) => return Ok(0),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(LogError::read(shared.source.clone(), e)),
    };

    let mut segments = reader.split(b'\n');
    let mut records = 0;
    while let Some(bytes) = segments
        .next_segment()
        .await
        .map_err(|e| LogError::read(shared.source.clone(), e))?
    {
        let mut state = shared.lock_state();
        state.line_number += 1;
        state.file_lines += 1;
        let line_number = state.line_number;

        let text = if shared.config.raw_mode {
            String::from_utf8_lossy(&bytes)
        } else {
            match std::str::from_utf8(&bytes) {
                Ok(text) => Cow::Borrowed(text),
                Err(e) => {
                    shared.report(&shared.parse_error(line_number, e));
                    continue;
                }
            }
        };

        let line = text.trim();
        if line.is_empty() {
            continue;
        }

        match shared.codec.decode(line) {
            Ok(record) => {
                records += 1;
                shared.events.publish(LogEvent::Record {
                    record,
                    line: line_number,
                });
            }
            // Skip the line, keep replaying
            Err(e) => shared.report(&shared.parse_error(line_number, e)),
        }
    }
    Ok(records)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
