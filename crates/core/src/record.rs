// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record model
//!
//! A record has no identity of its own: its position in the log is its
//! only index, and its meaning belongs to the caller.

use crate::error::LogError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// One logical unit appended to or replayed from a log
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// Structured value, one JSON document per line
    Structured(serde_json::Value),
    /// Literal text line
    Text(String),
}

impl Record {
    /// Convert any serializable value into a structured record
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, LogError> {
        serde_json::to_value(value)
            .map(Record::Structured)
            .map_err(|e| LogError::Encode(e.to_string()))
    }

    /// Decode a structured record into a concrete type
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self {
            Record::Structured(value) => T::deserialize(value),
            Record::Text(text) => T::deserialize(serde_json::Value::String(text.clone())),
        }
    }

    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            Record::Structured(value) => Some(value),
            Record::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Record::Text(text) => Some(text),
            Record::Structured(_) => None,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Structured(value) => write!(f, "{value}"),
            Record::Text(text) => f.write_str(text),
        }
    }
}

impl From<serde_json::Value> for Record {
    fn from(value: serde_json::Value) -> Self {
        Record::Structured(value)
    }
}

impl From<String> for Record {
    fn from(text: String) -> Self {
        Record::Text(text)
    }
}

impl From<&str> for Record {
    fn from(text: &str) -> Self {
        Record::Text(text.to_string())
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
