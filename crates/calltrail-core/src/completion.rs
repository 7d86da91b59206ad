//! Completion logging
//!
//! Turns invocation metadata into the call-boundary lines and writes them to
//! a [`LogSink`]. Entry and exit lines go out at info, one debug line per
//! argument, failures at error.

use crate::indent::IndentTracker;
use calltrail_core_types::schema::{
    COMPONENT, EVENT_SINK_PANIC, LABEL_EXCEPTION, LABEL_EXIT, LABEL_INIT, LABEL_PARAMS,
};
use calltrail_core_types::{ArgumentBinding, MethodIdentity};
use calltrail_errors::InvocationFailure;
use calltrail_logging::{LogLevel, LogSink};
use std::fmt::{self, Display};
use std::panic::{self, AssertUnwindSafe};

/// `Init: <Type>.<method> [<N>] params`
pub fn format_entry(identity: &MethodIdentity) -> String {
    format!(
        "{}{} [{}] {}",
        LABEL_INIT,
        identity.qualified_name(),
        identity.parameter_count(),
        LABEL_PARAMS
    )
}

/// `<name>: <value>`
pub fn format_argument(binding: &ArgumentBinding) -> String {
    format!("{}: {}", binding.name, binding.value)
}

/// `Exit: [<value>]`, or `Exit: []` when there is no value
pub fn format_exit(value: Option<&dyn Display>) -> String {
    match value {
        Some(v) => format!("{}[{}]", LABEL_EXIT, v),
        None => format!("{}[]", LABEL_EXIT),
    }
}

/// `OnException: <kind>: <message>`
pub fn format_exception(failure: &InvocationFailure) -> String {
    format!("{}{}: {}", LABEL_EXCEPTION, failure.kind(), failure.message())
}

/// Stateless line writer over a borrowed sink
pub struct CompletionLogger<'a> {
    sink: &'a dyn LogSink,
    indent_unit: &'a str,
}

impl<'a> CompletionLogger<'a> {
    pub fn new(sink: &'a dyn LogSink, indent_unit: &'a str) -> Self {
        Self { sink, indent_unit }
    }

    /// Entry line followed by one debug line per argument, in position order
    pub fn log_entry(&self, identity: &MethodIdentity, bindings: &[ArgumentBinding], level: usize) {
        let indent = IndentTracker::prefix(level, self.indent_unit);
        self.emit(LogLevel::Info, || format!("{}{}", indent, format_entry(identity)));

        let mut ordered: Vec<&ArgumentBinding> = bindings.iter().collect();
        ordered.sort_by_key(|b| b.position);
        for binding in ordered {
            self.emit(LogLevel::Debug, || {
                format!("{}{}", indent, format_argument(binding))
            });
        }
    }

    pub fn log_exit(&self, value: Option<&dyn Display>, level: usize) {
        let indent = IndentTracker::prefix(level, self.indent_unit);
        self.emit(LogLevel::Info, || format!("{}{}", indent, format_exit(value)));
    }

    pub fn log_exception(&self, failure: &InvocationFailure, level: usize) {
        let indent = IndentTracker::prefix(level, self.indent_unit);
        self.emit(LogLevel::Error, || {
            format!("{}{}", indent, format_exception(failure))
        });
    }

    // Neither rendering the line nor writing it may unwind into the wrapped
    // method; a panic in either drops the line.
    fn emit<F>(&self, level: LogLevel, render: F)
    where
        F: FnOnce() -> String,
    {
        let sink = self.sink;
        if panic::catch_unwind(AssertUnwindSafe(|| sink.write(level, &render()))).is_err() {
            tracing::warn!(
                component = COMPONENT,
                event = EVENT_SINK_PANIC,
                level = %level,
                "line rendering or log sink panicked, line dropped"
            );
        }
    }
}

impl fmt::Debug for CompletionLogger<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionLogger")
            .field("indent_unit", &self.indent_unit)
            .finish_non_exhaustive()
    }
}
