// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle: `Created → (Loading) → Ready ⇄ Flushing → Stopping → Stopped`

use crate::log::Log;
use jot_core::{LogError, LogEvent};

/// Where a log is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Opened, replay scheduled but not yet started
    Created,
    /// Replaying existing content
    Loading,
    /// Accepting writes
    Ready,
    /// Accepting writes with an append in flight
    Flushing,
    /// Refusing writes, draining what was accepted
    Stopping,
    /// Terminal
    Stopped,
}

impl Log {
    /// Stop the log: refuse further writes and drain what is buffered
    ///
    /// Idempotent. A second call waits for the first to finish, then
    /// returns `Ok` without flushing again. A failed final flush is
    /// reported and returned, but the log still ends up stopped.
    pub async fn stop(&self) -> Result<(), LogError> {
        let shared = &self.shared;
        let mut closed = shared.closed.subscribe();
        let first = {
            let mut state = shared.lock_state();
            if state.stopped {
                false
            } else {
                state.stopped = true;
                shared.cancel_timer(&mut state);
                true
            }
        };

        if !first {
            // Sender lives as long as `shared`, so this only ends once closed
            let _ = closed.wait_for(|closed| *closed).await;
            return Ok(());
        }

        tracing::info!(log = %shared.source, pending = self.pending(), "stopping");
        let result = shared.drain().await;

        shared.events.publish(LogEvent::Stopped);
        shared.closed.send_replace(true);
        tracing::info!(log = %shared.source, lines = self.line_number(), "stopped");
        result
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
