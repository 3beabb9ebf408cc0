// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pending lines awaiting a durable append, and the overflow guard

use jot_core::LogError;

/// Ordered, already-encoded lines not yet persisted
#[derive(Debug, Default)]
pub struct WriteBuffer {
    lines: Vec<String>,
}

impl WriteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overflow guard: refuse a new record once `watermark` lines are pending
    ///
    /// A watermark of zero is unlimited.
    pub fn admit(&self, watermark: usize) -> Result<(), LogError> {
        if watermark != 0 && self.lines.len() >= watermark {
            return Err(LogError::Overflow {
                pending: self.lines.len(),
                watermark,
            });
        }
        Ok(())
    }

    /// Queue one encoded line (without its newline)
    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    /// Capture everything pending, leaving an empty buffer behind
    pub fn take(&mut self) -> Batch {
        Batch {
            lines: std::mem::take(&mut self.lines),
        }
    }

    /// Put a failed batch back in front of anything queued since
    pub fn restore(&mut self, batch: Batch) {
        let mut lines = batch.lines;
        lines.append(&mut self.lines);
        self.lines = lines;
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Lines captured for a single append
#[derive(Debug)]
pub struct Batch {
    lines: Vec<String>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Newline-terminated lines concatenated in order
    pub fn render(&self) -> String {
        let size = self.lines.iter().map(|l| l.len() + 1).sum();
        let mut data = String::with_capacity(size);
        for line in &self.lines {
            data.push_str(line);
            data.push('\n');
        }
        data
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
