// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jot-storage: buffered, file-backed, append-only record logs
//!
//! ```text
//! add() → overflow guard → codec → WriteBuffer ──timer/flush──→ Backing
//!                                       ↓                          ↓
//!                                 LogEvent::Record          rollover (archive)
//!
//! Backing → loader (replay) → LogEvent::Record … LogEvent::Loaded
//! ```
//!
//! ## Durability
//!
//! - Writes are buffered and appended in one batch per flush interval,
//!   so a crash loses at most one interval of records
//! - A failed append puts its batch back and is retried; nothing is lost
//!   or duplicated
//! - `stop()` (directly or through `ShutdownCoordinator::stop_all`)
//!   drains the buffer before reporting stopped

mod backing;
mod buffer;
mod flush;
mod lifecycle;
mod loader;
mod log;
mod registry;
mod rollover;
mod signal;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(test)]
mod testing;

pub use backing::{Backing, FileBacking, LineReader, SinkBacking, StdoutBacking};
pub use buffer::{Batch, WriteBuffer};
pub use lifecycle::Phase;
pub use log::Log;
pub use registry::ShutdownCoordinator;
pub use rollover::archive_path;
pub use signal::TerminationSignal;

#[cfg(unix)]
pub use signal::UnixSignals;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeBacking;

pub use jot_core::{
    Clock, Codec, EventBus, EventReceiver, FakeClock, JsonCodec, LogConfig, LogError, LogEvent,
    RawCodec, Record, SystemClock, Target,
};
