// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record codecs: one record to one line of text and back

use crate::error::CodecError;
use crate::record::Record;

/// Converts records to single lines (without the trailing newline) and back
pub trait Codec: Send + Sync {
    fn encode(&self, record: &Record) -> Result<String, CodecError>;
    fn decode(&self, line: &str) -> Result<Record, CodecError>;
}

/// Structured mode: each line is one compact JSON document
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, record: &Record) -> Result<String, CodecError> {
        // Compact serde_json output never contains a raw newline
        let line = match record {
            Record::Structured(value) => serde_json::to_string(value)?,
            Record::Text(text) => serde_json::to_string(text)?,
        };
        Ok(line)
    }

    fn decode(&self, line: &str) -> Result<Record, CodecError> {
        Ok(Record::Structured(serde_json::from_str(line)?))
    }
}

/// Raw mode: the line is the record verbatim
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCodec;

impl Codec for RawCodec {
    fn encode(&self, record: &Record) -> Result<String, CodecError> {
        let line = match record {
            Record::Text(text) => text.clone(),
            Record::Structured(serde_json::Value::String(text)) => text.clone(),
            Record::Structured(value) => value.to_string(),
        };
        if line.contains(['\n', '\r']) {
            return Err(CodecError::LineBreak);
        }
        if line.trim().is_empty() {
            return Err(CodecError::Empty);
        }
        Ok(line)
    }

    fn decode(&self, line: &str) -> Result<Record, CodecError> {
        Ok(Record::Text(line.to_string()))
    }
}

/// Pick the codec for a log's mode
pub fn codec_for(raw_mode: bool) -> Box<dyn Codec> {
    if raw_mode {
        Box::new(RawCodec)
    } else {
        Box::new(JsonCodec)
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
