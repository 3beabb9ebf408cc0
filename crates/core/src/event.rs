// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notifications a log publishes to its collaborators

use crate::error::LogError;
use crate::record::Record;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Sender for event delivery
pub type EventSender = mpsc::UnboundedSender<LogEvent>;
/// Receiver for event delivery
pub type EventReceiver = mpsc::UnboundedReceiver<LogEvent>;

/// Everything a log reports, in the order it happened
#[derive(Debug, Clone)]
pub enum LogEvent {
    /// A record was replayed or accepted, with its line number
    Record { record: Record, line: u64 },
    /// Any failure: parse, encode, I/O, overflow, handler, post-stop write
    Error(LogError),
    /// Replay reached end of input
    Loaded { records: u64 },
    /// A record was rejected because the buffer is at its watermark
    Overflow { record: Record },
    /// The log drained its buffer and refuses further writes
    Stopped,
    /// The active file was archived; the next record starts a fresh file
    Rollover { archive: PathBuf, lines: u64 },
}

impl LogEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LogEvent::Record { .. } => "log:record",
            LogEvent::Error(_) => "log:error",
            LogEvent::Loaded { .. } => "log:loaded",
            LogEvent::Overflow { .. } => "log:overflow",
            LogEvent::Stopped => "log:stopped",
            LogEvent::Rollover { .. } => "log:rollover",
        }
    }
}

/// Fans every event out to all live subscribers
///
/// Publishing never blocks; subscribers whose receiver was dropped are
/// pruned on the next publish.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<EventSender>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to every event published from now on
    pub fn subscribe(&self) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subs.push(tx);
        rx
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: LogEvent) {
        let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subs.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Get count of active subscribers
    pub fn subscriber_count(&self) -> usize {
        let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subs.retain(|tx| !tx.is_closed());
        subs.len()
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
