// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of managed logs and coordinated shutdown

use crate::backing::Backing;
use crate::lifecycle::Phase;
use crate::log::Log;
use crate::signal::TerminationSignal;
use jot_core::{Clock, EventReceiver, LogConfig, LogError, Target};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::{JoinHandle, JoinSet};

/// Tracks every managed log so they can be stopped together
///
/// Constructed once by the owning process and shared (it is cheap to
/// clone) with whatever opens logs.
#[derive(Clone, Default)]
pub struct ShutdownCoordinator {
    logs: Arc<Mutex<Vec<Log>>>,
    termination_hooked: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a log, registering it unless its config says `unmanaged`
    pub async fn open(
        &self,
        target: impl Into<Target>,
        config: LogConfig,
    ) -> Result<(Log, EventReceiver), LogError> {
        let (log, events) = Log::open(target, config).await?;
        self.register_managed(&log);
        Ok((log, events))
    }

    /// Open a log over any backing, registering it unless `unmanaged`
    pub async fn open_with(
        &self,
        backing: Arc<dyn Backing>,
        config: LogConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<(Log, EventReceiver), LogError> {
        let (log, events) = Log::open_with(backing, config, clock).await?;
        self.register_managed(&log);
        Ok((log, events))
    }

    fn register_managed(&self, log: &Log) {
        if !log.config().unmanaged {
            self.register(log.clone());
        }
    }

    /// Track a log for bulk shutdown regardless of its config
    ///
    /// Logs that have finished stopping are dropped from the registry.
    pub fn register(&self, log: Log) {
        tracing::debug!(log = %log.source(), "registered log");
        let mut logs = self.logs.lock().unwrap_or_else(|e| e.into_inner());
        logs.retain(|existing| existing.phase() != Phase::Stopped);
        logs.push(log);
    }

    /// Number of managed logs not yet known to be stopped
    pub fn len(&self) -> usize {
        self.logs.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop every managed log concurrently
    ///
    /// Resolves once, after the last log reports stopped. Individual stop
    /// failures were already published by their logs and are only traced
    /// here.
    pub async fn stop_all(&self) {
        let logs: Vec<Log> = self.logs.lock().unwrap_or_else(|e| e.into_inner()).clone();
        let count = logs.len();

        let mut stops = JoinSet::new();
        for log in logs {
            stops.spawn(async move {
                let result = log.stop().await;
                (log, result)
            });
        }

        while let Some(joined) = stops.join_next().await {
            match joined {
                Ok((log, Err(e))) => {
                    tracing::warn!(log = %log.source(), error = %e, "log stopped with error");
                }
                Ok((_, Ok(()))) => {}
                Err(e) => tracing::error!(error = %e, "stop task failed"),
            }
        }

        self.logs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|log| log.phase() != Phase::Stopped);
        tracing::info!(count, "all logs stopped");
    }

    /// Stop all logs when `signals` fires, then run `on_complete` once
    ///
    /// Only the first hook per coordinator is installed; later calls
    /// return `None`. Every notification triggers `stop_all` (stopping is
    /// idempotent), but `on_complete` runs at most once however many
    /// notifications arrive.
    pub fn on_termination<S, F>(&self, mut signals: S, on_complete: F) -> Option<JoinHandle<()>>
    where
        S: TerminationSignal,
        F: FnOnce() + Send + 'static,
    {
        if self.termination_hooked.swap(true, Ordering::SeqCst) {
            return None;
        }

        let coordinator = self.clone();
        let on_complete = Arc::new(Mutex::new(Some(on_complete)));
        Some(tokio::spawn(async move {
            while signals.recv().await.is_some() {
                tracing::info!("termination requested, stopping all logs");
                let coordinator = coordinator.clone();
                let on_complete = Arc::clone(&on_complete);
                tokio::spawn(async move {
                    coordinator.stop_all().await;
                    let callback = on_complete.lock().unwrap_or_else(|e| e.into_inner()).take();
                    if let Some(callback) = callback {
                        callback();
                    }
                });
            }
        }))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
