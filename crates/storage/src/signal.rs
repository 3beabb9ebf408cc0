// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Termination notifications the shutdown coordinator listens to

use async_trait::async_trait;
use tokio::sync::mpsc;

/// A source of process termination notifications
///
/// `recv` resolves once per notification and returns `None` when no more
/// can arrive.
#[async_trait]
pub trait TerminationSignal: Send + 'static {
    async fn recv(&mut self) -> Option<()>;
}

#[async_trait]
impl TerminationSignal for mpsc::Receiver<()> {
    async fn recv(&mut self) -> Option<()> {
        mpsc::Receiver::recv(self).await
    }
}

#[async_trait]
impl TerminationSignal for mpsc::UnboundedReceiver<()> {
    async fn recv(&mut self) -> Option<()> {
        mpsc::UnboundedReceiver::recv(self).await
    }
}

#[cfg(unix)]
pub use unix::UnixSignals;

#[cfg(unix)]
mod unix {
    use super::TerminationSignal;
    use async_trait::async_trait;
    use std::io;
    use tokio::signal::unix::{signal, Signal, SignalKind};

    /// SIGINT and SIGTERM
    pub struct UnixSignals {
        interrupt: Signal,
        terminate: Signal,
    }

    impl UnixSignals {
        /// Install the handlers; must be called from within a tokio runtime
        pub fn new() -> io::Result<Self> {
            Ok(Self {
                interrupt: signal(SignalKind::interrupt())?,
                terminate: signal(SignalKind::terminate())?,
            })
        }
    }

    #[async_trait]
    impl TerminationSignal for UnixSignals {
        async fn recv(&mut self) -> Option<()> {
            tokio::select! {
                received = self.interrupt.recv() => {
                    tracing::info!("received SIGINT");
                    received
                }
                received = self.terminate.recv() => {
                    tracing::info!("received SIGTERM");
                    received
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
