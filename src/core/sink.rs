// src/core/sink.rs

use crate::constants::DEFAULT_LOG_TARGET;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};

/// Destination for the text lines a registry emits.
///
/// A sink receives one already-formatted line per call and must not
/// reformat or split it.
pub trait LogSink: Send + Sync + Debug {
    /// Emits a single debug line.
    fn debug(&self, line: &str);
}

/// Forwards every line to the `log` facade.
#[derive(Debug, Clone)]
pub struct LogCrateSink {
    target: String,
    level: log::Level,
}

impl LogCrateSink {
    /// Creates a sink writing at `level` under the given `log` target.
    pub fn new(target: impl Into<String>, level: log::Level) -> Self {
        Self {
            target: target.into(),
            level,
        }
    }

    /// The `log` target lines are written under.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The level lines are written at.
    pub fn level(&self) -> log::Level {
        self.level
    }
}

impl Default for LogCrateSink {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_TARGET, log::Level::Debug)
    }
}

impl LogSink for LogCrateSink {
    fn debug(&self, line: &str) {
        log::log!(target: self.target.as_str(), self.level, "{}", line);
    }
}

/// Keeps every line in memory. Cloning shares the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out every line received so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns every line received so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl LogSink for MemorySink {
    fn debug(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}
