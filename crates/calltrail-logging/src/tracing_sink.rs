//! Sink that forwards lines to `tracing`
//!
//! Each sink level maps onto the matching tracing macro under the
//! `calltrail` target. `tracing` has no fatal level, so fatal lines go out
//! as errors tagged `fatal = true`.

use crate::sink::LogSink;
use calltrail_core_types::schema::COMPONENT;
use tracing::Level;

/// Target used for every forwarded line
pub const TARGET: &str = COMPONENT;

/// [`LogSink`] backed by the globally installed tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for TracingSink {
    fn fatal(&self, message: &str) {
        tracing::error!(target: TARGET, component = TARGET, fatal = true, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: TARGET, component = TARGET, "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: TARGET, component = TARGET, "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: TARGET, component = TARGET, "{}", message);
    }

    fn debug(&self, message: &str) {
        tracing::debug!(target: TARGET, component = TARGET, "{}", message);
    }

    fn trace(&self, message: &str) {
        tracing::trace!(target: TARGET, component = TARGET, "{}", message);
    }

    fn is_fatal_enabled(&self) -> bool {
        tracing::enabled!(target: TARGET, Level::ERROR)
    }

    fn is_error_enabled(&self) -> bool {
        tracing::enabled!(target: TARGET, Level::ERROR)
    }

    fn is_warn_enabled(&self) -> bool {
        tracing::enabled!(target: TARGET, Level::WARN)
    }

    fn is_info_enabled(&self) -> bool {
        tracing::enabled!(target: TARGET, Level::INFO)
    }

    fn is_debug_enabled(&self) -> bool {
        tracing::enabled!(target: TARGET, Level::DEBUG)
    }

    fn is_trace_enabled(&self) -> bool {
        tracing::enabled!(target: TARGET, Level::TRACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_without_subscriber_do_not_panic() {
        let sink = TracingSink::new();
        sink.info("Init: a.b [0] params");
        sink.fatal("fatal");
        assert!(!sink.is_info_enabled() || sink.is_error_enabled());
    }
}
