// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for the unit tests

use crate::fake::FakeBacking;
use crate::log::Log;
use jot_core::{EventReceiver, FakeClock, LogConfig, LogEvent, Record};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

/// Config that never flushes or loads on its own
pub(crate) fn manual() -> LogConfig {
    LogConfig::default()
        .with_auto_load(false)
        .with_flush_interval(Duration::from_secs(3600))
}

pub(crate) async fn open_fake(config: LogConfig) -> (Log, EventReceiver, FakeBacking) {
    open_on(FakeBacking::new(), config).await
}

pub(crate) async fn open_on(
    fake: FakeBacking,
    config: LogConfig,
) -> (Log, EventReceiver, FakeBacking) {
    let (log, events) = Log::open_with(
        Arc::new(fake.clone()),
        config,
        Arc::new(FakeClock::default()),
    )
    .await
    .unwrap();
    (log, events, fake)
}

/// Everything published so far
pub(crate) fn drain_events(events: &mut EventReceiver) -> Vec<LogEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

/// Observed records with their line numbers
pub(crate) fn observed(events: &[LogEvent]) -> Vec<(Record, u64)> {
    events
        .iter()
        .filter_map(|e| match e {
            LogEvent::Record { record, line } => Some((record.clone(), *line)),
            _ => None,
        })
        .collect()
}

/// Wait until the event stream yields one matching `predicate`
pub(crate) async fn next_matching(
    events: &mut EventReceiver,
    predicate: impl Fn(&LogEvent) -> bool,
) -> LogEvent {
    let wait = async {
        loop {
            match events.recv().await {
                Some(event) if predicate(&event) => return event,
                Some(_) => continue,
                None => panic!("event stream closed"),
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), wait)
        .await
        .unwrap()
}

/// Writer that keeps formatted trace output for assertions
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.logs.lock().unwrap()).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` on a current-thread runtime with trace output captured
pub(crate) fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}
