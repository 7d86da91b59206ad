//! Log sink abstraction
//!
//! The interceptor writes finished lines to a [`LogSink`]. Transport,
//! persistence and level filtering are the sink's business.

use std::fmt;

/// Severity of a sink line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogLevel {
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Fatal,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Fatal => "fatal",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for formatted call-boundary lines
///
/// Implementations must tolerate concurrent writes; the interceptor never
/// serializes access. The `is_*_enabled` queries report capability only,
/// callers are not required to consult them before writing.
pub trait LogSink: Send + Sync {
    fn fatal(&self, message: &str);
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn debug(&self, message: &str);
    fn trace(&self, message: &str);

    fn is_fatal_enabled(&self) -> bool;
    fn is_error_enabled(&self) -> bool;
    fn is_warn_enabled(&self) -> bool;
    fn is_info_enabled(&self) -> bool;
    fn is_debug_enabled(&self) -> bool;
    fn is_trace_enabled(&self) -> bool;

    /// Write at a level chosen at runtime
    fn write(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Fatal => self.fatal(message),
            LogLevel::Error => self.error(message),
            LogLevel::Warn => self.warn(message),
            LogLevel::Info => self.info(message),
            LogLevel::Debug => self.debug(message),
            LogLevel::Trace => self.trace(message),
        }
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Fatal => self.is_fatal_enabled(),
            LogLevel::Error => self.is_error_enabled(),
            LogLevel::Warn => self.is_warn_enabled(),
            LogLevel::Info => self.is_info_enabled(),
            LogLevel::Debug => self.is_debug_enabled(),
            LogLevel::Trace => self.is_trace_enabled(),
        }
    }
}
