// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The log handle: buffered appends over a single backing
//!
//! All bookkeeping lives in one `LogState` behind a std mutex. Flags are
//! checked and set under that lock before any I/O starts, and the lock is
//! never held across an await. Drains are serialized by a separate async
//! mutex so at most one append is in flight.

use crate::backing::{Backing, FileBacking, SinkBacking, StdoutBacking};
use crate::buffer::WriteBuffer;
use crate::lifecycle::Phase;
use jot_core::{
    codec_for, Clock, Codec, EventBus, EventReceiver, LogConfig, LogError, LogEvent, Record,
    SystemClock, Target,
};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Replay progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadState {
    NotStarted,
    Loading,
    Done,
    Failed,
}

/// Pending flush timer; `seq` tells a woken timer whether it was cancelled
pub(crate) struct FlushTimer {
    pub(crate) seq: u64,
    pub(crate) handle: JoinHandle<()>,
}

pub(crate) struct LogState {
    pub(crate) load: LoadState,
    pub(crate) stopped: bool,
    pub(crate) flushing: bool,
    /// Last line number handed out by replay or `add`
    pub(crate) line_number: u64,
    /// Lines in the active file: replayed plus flushed since the last rollover
    pub(crate) file_lines: u64,
    pub(crate) buffer: WriteBuffer,
    pub(crate) timer: Option<FlushTimer>,
    pub(crate) timer_seq: u64,
}

pub(crate) struct Shared {
    pub(crate) source: String,
    pub(crate) backing: Arc<dyn Backing>,
    pub(crate) codec: Box<dyn Codec>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: LogConfig,
    pub(crate) events: EventBus,
    pub(crate) runtime: Handle,
    pub(crate) state: Mutex<LogState>,
    pub(crate) drain_lock: tokio::sync::Mutex<()>,
    pub(crate) closed: watch::Sender<bool>,
}

impl Shared {
    pub(crate) fn lock_state(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Trace and publish a failure
    pub(crate) fn report(&self, error: &LogError) {
        if error.is_overflow() {
            tracing::debug!(log = %self.source, error = %error, "record rejected");
        } else {
            tracing::warn!(log = %self.source, error = %error, "log error");
        }
        self.events.publish(LogEvent::Error(error.clone()));
    }
}

/// An open, append-only record log
///
/// Cloning is cheap; every clone drives the same log.
#[derive(Clone)]
pub struct Log {
    pub(crate) shared: Arc<Shared>,
}

impl Log {
    /// Open a log on a file, stdout, or nothing
    ///
    /// Returns the handle and a subscription that sees every event from
    /// the start, including the replay scheduled here when `auto_load`
    /// is set. Must be called from within a tokio runtime.
    pub async fn open(
        target: impl Into<Target>,
        config: LogConfig,
    ) -> Result<(Log, EventReceiver), LogError> {
        let backing: Arc<dyn Backing> = match target.into() {
            Target::File(path) => Arc::new(FileBacking::new(path)),
            Target::Stdout => Arc::new(StdoutBacking),
            Target::Sink => Arc::new(SinkBacking),
        };
        Self::open_with(backing, config, Arc::new(SystemClock)).await
    }

    /// Open a log over any backing and clock
    pub async fn open_with(
        backing: Arc<dyn Backing>,
        config: LogConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<(Log, EventReceiver), LogError> {
        let source = backing.describe();
        backing
            .prepare()
            .await
            .map_err(|e| LogError::prepare(source.clone(), e))?;

        let (closed, _) = watch::channel(false);
        let shared = Arc::new(Shared {
            codec: codec_for(config.raw_mode),
            source,
            backing,
            clock,
            config,
            events: EventBus::new(),
            runtime: Handle::current(),
            state: Mutex::new(LogState {
                load: LoadState::NotStarted,
                stopped: false,
                flushing: false,
                line_number: 0,
                file_lines: 0,
                buffer: WriteBuffer::new(),
                timer: None,
                timer_seq: 0,
            }),
            drain_lock: tokio::sync::Mutex::new(()),
            closed,
        });
        let events = shared.events.subscribe();
        let log = Log { shared };

        tracing::debug!(log = %log.source(), config = ?log.config(), "opened log");

        if log.config().auto_load {
            let loader = log.clone();
            log.shared.runtime.spawn(async move {
                // Outcome already published
                let _ = loader.load().await;
            });
        }

        Ok((log, events))
    }

    /// Buffer a record for the next flush and report it as observed
    ///
    /// The observed record is the encoded line decoded again, so live and
    /// replayed records compare equal. Returns the record's line number. Rejections (stopped log, overflow,
    /// unencodable record) are returned and also published as errors; an
    /// overflow additionally publishes `LogEvent::Overflow` with the record.
    pub fn add(&self, record: impl Into<Record>) -> Result<u64, LogError> {
        let record = record.into();
        let shared = &self.shared;
        let mut state = shared.lock_state();

        if state.stopped {
            let error = LogError::Stopped {
                log: shared.source.clone(),
            };
            shared.report(&error);
            return Err(error);
        }

        if let Err(error) = state.buffer.admit(shared.config.buffer_watermark) {
            shared.events.publish(LogEvent::Overflow { record });
            shared.report(&error);
            return Err(error);
        }

        let line = match shared.codec.encode(&record) {
            Ok(line) => line,
            Err(e) => {
                let error = LogError::Encode(e.to_string());
                shared.report(&error);
                return Err(error);
            }
        };

        // Observed in the form replay will produce for this line
        let record = shared.codec.decode(line.trim()).unwrap_or(record);

        state.buffer.push(line);
        state.line_number += 1;
        let line = state.line_number;
        self.shared.arm_timer(&mut state);

        // Published under the state lock so emission order is append order
        shared.events.publish(LogEvent::Record { record, line });
        Ok(line)
    }

    /// Serialize a value and add it as a structured record
    pub fn add_serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<u64, LogError> {
        match Record::from_serialize(value) {
            Ok(record) => self.add(record),
            Err(error) => {
                self.shared.report(&error);
                Err(error)
            }
        }
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> EventReceiver {
        self.shared.events.subscribe()
    }

    /// Run `handler` over a subscription on its own task
    ///
    /// A handler error never stops dispatch: it is published as
    /// `LogError::Handler` (except for errors raised while handling an
    /// `Error` event). The task ends after the `Stopped` event.
    pub fn handle_events<F, E>(&self, mut events: EventReceiver, mut handler: F) -> JoinHandle<()>
    where
        F: FnMut(&LogEvent) -> Result<(), E> + Send + 'static,
        E: fmt::Display + Send,
    {
        let shared = Arc::clone(&self.shared);
        self.shared.runtime.spawn(async move {
            while let Some(event) = events.recv().await {
                if let Err(e) = handler(&event) {
                    let line = match &event {
                        LogEvent::Record { line, .. } => Some(*line),
                        _ => None,
                    };
                    if let LogEvent::Error(_) = event {
                        tracing::debug!(log = %shared.source, error = %e, "error handler failed");
                    } else {
                        shared.report(&LogError::Handler {
                            line,
                            message: e.to_string(),
                        });
                    }
                }
                if let LogEvent::Stopped = event {
                    break;
                }
            }
        })
    }

    /// Identifier of the backing (file path, `<stdout>`, or `<sink>`)
    pub fn source(&self) -> &str {
        &self.shared.source
    }

    pub fn config(&self) -> &LogConfig {
        &self.shared.config
    }

    /// Last line number handed out
    pub fn line_number(&self) -> u64 {
        self.shared.lock_state().line_number
    }

    /// Lines buffered and not yet appended
    pub fn pending(&self) -> usize {
        self.shared.lock_state().buffer.len()
    }

    /// True once replay has been attempted
    pub fn is_loaded(&self) -> bool {
        self.shared.lock_state().load != LoadState::NotStarted
    }

    /// True once `stop` has been called; writes are refused from then on
    pub fn is_stopped(&self) -> bool {
        self.shared.lock_state().stopped
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        let state = self.shared.lock_state();
        if *self.shared.closed.borrow() {
            Phase::Stopped
        } else if state.stopped {
            Phase::Stopping
        } else if state.load == LoadState::Loading {
            Phase::Loading
        } else if state.flushing {
            Phase::Flushing
        } else if state.load == LoadState::NotStarted && self.shared.config.auto_load {
            Phase::Created
        } else {
            Phase::Ready
        }
    }
}

impl fmt::Debug for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Log")
            .field("source", &self.shared.source)
            .field("phase", &self.phase())
            .finish()
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
