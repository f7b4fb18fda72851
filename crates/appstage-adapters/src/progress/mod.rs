//! Progress sinks that do not talk to a terminal.

use std::sync::{Arc, Mutex, PoisonError};

use appstage_core::application::ports::ProgressSink;

/// Discards every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn write_line(&self, _line: &str) {}
}

/// Keeps every line in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingProgress {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of lines containing `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.lines().iter().filter(|l| l.contains(needle)).count()
    }
}

impl ProgressSink for RecordingProgress {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_owned());
    }
}
