// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jot-core: record model and shared vocabulary for jot logs
//!
//! This crate provides:
//! - `Record` and the line codecs (structured JSON or raw text)
//! - `LogConfig` and `Target`
//! - `LogEvent` and the `EventBus` subscribers receive them on
//! - `LogError`, the single error taxonomy every component reports through
//! - A wall-clock abstraction for testable archive names

pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod event;
pub mod record;

pub use clock::{Clock, FakeClock, SystemClock};
pub use codec::{codec_for, Codec, JsonCodec, RawCodec};
pub use config::{LogConfig, Target};
pub use error::{CodecError, ConfigError, LogError};
pub use event::{EventBus, EventReceiver, EventSender, LogEvent};
pub use record::Record;
