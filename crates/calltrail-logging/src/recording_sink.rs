//! In-memory sink for deterministic assertions
//!
//! Stands in for a real logger in tests: every line is kept with its level
//! and every level reports itself enabled unless switched off.

use crate::sink::{LogLevel, LogSink};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// One line written to a [`RecordingSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedLine {
    pub level: LogLevel,
    pub message: String,
}

/// Sink that records every line in memory
///
/// Clones share the same buffer, so a test can hand one clone to the
/// interceptor and keep another for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    lines: Arc<Mutex<Vec<RecordedLine>>>,
    disabled: Arc<Mutex<HashSet<LogLevel>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded lines in write order
    pub fn lines(&self) -> Vec<RecordedLine> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Get the messages recorded at `level`, in write order
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.level == level)
            .map(|line| line.message)
            .collect()
    }

    /// Count lines recorded at `level`
    pub fn count(&self, level: LogLevel) -> usize {
        self.count_lines(|line| line.level == level)
    }

    /// Count lines at `level` whose message is exactly `message`
    pub fn count_exact(&self, level: LogLevel, message: &str) -> usize {
        self.count_lines(|line| line.level == level && line.message == message)
    }

    /// Count lines matching a predicate
    pub fn count_lines<F>(&self, predicate: F) -> usize
    where
        F: Fn(&RecordedLine) -> bool,
    {
        self.lines().iter().filter(|line| predicate(line)).count()
    }

    /// Clear all recorded lines
    pub fn clear(&self) {
        self.lines.lock().map(|mut l| l.clear()).ok();
    }

    /// Change what `is_enabled(level)` reports
    ///
    /// Lines are recorded regardless; this only affects the capability query.
    pub fn set_enabled(&self, level: LogLevel, enabled: bool) {
        self.disabled
            .lock()
            .map(|mut d| {
                if enabled {
                    d.remove(&level);
                } else {
                    d.insert(level);
                }
            })
            .ok();
    }

    fn record(&self, level: LogLevel, message: &str) {
        self.lines
            .lock()
            .map(|mut l| {
                l.push(RecordedLine {
                    level,
                    message: message.to_string(),
                })
            })
            .ok();
    }

    fn enabled(&self, level: LogLevel) -> bool {
        self.disabled
            .lock()
            .map(|d| !d.contains(&level))
            .unwrap_or(true)
    }
}

impl LogSink for RecordingSink {
    fn fatal(&self, message: &str) {
        self.record(LogLevel::Fatal, message);
    }

    fn error(&self, message: &str) {
        self.record(LogLevel::Error, message);
    }

    fn warn(&self, message: &str) {
        self.record(LogLevel::Warn, message);
    }

    fn info(&self, message: &str) {
        self.record(LogLevel::Info, message);
    }

    fn debug(&self, message: &str) {
        self.record(LogLevel::Debug, message);
    }

    fn trace(&self, message: &str) {
        self.record(LogLevel::Trace, message);
    }

    fn is_fatal_enabled(&self) -> bool {
        self.enabled(LogLevel::Fatal)
    }

    fn is_error_enabled(&self) -> bool {
        self.enabled(LogLevel::Error)
    }

    fn is_warn_enabled(&self) -> bool {
        self.enabled(LogLevel::Warn)
    }

    fn is_info_enabled(&self) -> bool {
        self.enabled(LogLevel::Info)
    }

    fn is_debug_enabled(&self) -> bool {
        self.enabled(LogLevel::Debug)
    }

    fn is_trace_enabled(&self) -> bool {
        self.enabled(LogLevel::Trace)
    }
}
