// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flush scheduling and the drain loop
//!
//! The first record after an idle period arms a timer; when it fires the
//! buffer is drained. Each drain pass captures the whole buffer and resets
//! it before the append starts, so records added during the I/O land in a
//! fresh buffer and are picked up by the next pass.

use crate::log::{FlushTimer, Log, LogState, Shared};
use jot_core::LogError;
use std::sync::Arc;

impl Shared {
    /// Arm the flush timer unless one is pending or a drain will pick the
    /// buffer up anyway
    ///
    /// Also armed for an empty buffer while a failed rollover is outstanding.
    pub(crate) fn arm_timer(self: &Arc<Self>, state: &mut LogState) {
        if state.stopped || state.flushing || state.timer.is_some() {
            return;
        }
        if state.buffer.is_empty() && !self.rollover_due(state) {
            return;
        }

        state.timer_seq += 1;
        let seq = state.timer_seq;
        let interval = self.config.flush_interval;
        let shared = Arc::clone(self);
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(interval).await;
            {
                let mut state = shared.lock_state();
                if state.timer.as_ref().map(|t| t.seq) != Some(seq) {
                    return;
                }
                state.timer = None;
            }
            // Runs on its own task: cancelling a timer never cancels an append
            let drain = Arc::clone(&shared);
            shared.runtime.spawn(async move {
                // Outcome already published
                let _ = drain.drain().await;
            });
        });
        state.timer = Some(FlushTimer { seq, handle });
    }

    /// Cancel a pending timer; a timer already draining is left alone
    pub(crate) fn cancel_timer(&self, state: &mut LogState) {
        if let Some(timer) = state.timer.take() {
            timer.handle.abort();
        }
    }

    /// Append buffered lines until the buffer is empty
    ///
    /// On append failure the captured batch goes back in front of the
    /// buffer and the cycle is abandoned; the re-armed timer retries it.
    /// An empty buffer still retries a rollover that is due.
    pub(crate) async fn drain(self: &Arc<Self>) -> Result<(), LogError> {
        let _drain = self.drain_lock.lock().await;

        loop {
            let batch = {
                let mut state = self.lock_state();
                if state.buffer.is_empty() {
                    if !self.rollover_due(&state) {
                        state.flushing = false;
                        return Ok(());
                    }
                    state.flushing = true;
                    None
                } else {
                    state.flushing = true;
                    Some(state.buffer.take())
                }
            };

            if let Some(batch) = batch {
                let count = batch.len() as u64;
                tracing::debug!(log = %self.source, lines = count, "flushing");

                if let Err(e) = self.backing.append(batch.render().as_bytes()).await {
                    let error = LogError::append(self.source.clone(), e);
                    let mut state = self.lock_state();
                    state.buffer.restore(batch);
                    state.flushing = false;
                    self.arm_timer(&mut state);
                    self.report(&error);
                    return Err(error);
                }

                self.lock_state().file_lines += count;
            }

            if let Err(error) = self.rollover().await {
                let mut state = self.lock_state();
                state.flushing = false;
                self.arm_timer(&mut state);
                self.report(&error);
                return Err(error);
            }
        }
    }
}

impl Log {
    /// Drain the buffer now instead of waiting for the timer
    ///
    /// Waits behind a drain already in flight.
    pub async fn flush(&self) -> Result<(), LogError> {
        {
            let mut state = self.shared.lock_state();
            self.shared.cancel_timer(&mut state);
        }
        self.shared.drain().await
    }
}

#[cfg(test)]
#[path = "flush_tests.rs"]
mod tests;
