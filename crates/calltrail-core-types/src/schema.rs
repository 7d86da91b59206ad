//! Canonical schema constants for call-boundary log lines
//!
//! The line labels are bit-exact: downstream tooling greps for them.

/// Default indentation unit, one per nesting level
pub const INDENT_UNIT: &str = "   ";

// Line labels
pub const LABEL_INIT: &str = "Init: ";
pub const LABEL_PARAMS: &str = "params";
pub const LABEL_EXIT: &str = "Exit: ";
pub const LABEL_EXCEPTION: &str = "OnException: ";

/// Value of the `component` field and target of forwarded lines
pub const COMPONENT: &str = "calltrail";

// Canonical field keys for the crate's own diagnostics
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_INVOCATION_ID: &str = "invocation_id";
pub const FIELD_DEPTH: &str = "depth";
pub const FIELD_BASELINE: &str = "baseline";

// Canonical event names
pub const EVENT_ENTRY: &str = "entry";
pub const EVENT_EXIT: &str = "exit";
pub const EVENT_EXIT_DEFERRED: &str = "exit_deferred";
pub const EVENT_EXCEPTION: &str = "exception";
pub const EVENT_BASELINE: &str = "baseline_init";
pub const EVENT_SINK_PANIC: &str = "sink_panic";
pub const EVENT_FORMAT_PANIC: &str = "format_panic";

/// Kind reported for a wrapped method that panicked
pub const PANIC_KIND: &str = "panic";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_unit_is_three_spaces() {
        assert_eq!(INDENT_UNIT.len(), 3);
        assert!(INDENT_UNIT.chars().all(|c| c == ' '));
    }

    #[test]
    fn test_event_names_are_distinct() {
        let events = [
            EVENT_ENTRY,
            EVENT_EXIT,
            EVENT_EXIT_DEFERRED,
            EVENT_EXCEPTION,
            EVENT_BASELINE,
            EVENT_SINK_PANIC,
            EVENT_FORMAT_PANIC,
        ];
        for (i, a) in events.iter().enumerate() {
            for b in &events[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
