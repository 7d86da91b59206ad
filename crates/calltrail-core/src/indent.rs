//! Indentation tracking
//!
//! Lines are indented by call depth relative to a baseline. The baseline is
//! the depth seen by the first indentation query and is fixed from then on,
//! so a tree rooted below the top of the program still starts at column 0.

use calltrail_core_types::schema::{COMPONENT, EVENT_BASELINE};
use calltrail_core_types::CallDepth;
use std::sync::{Arc, OnceLock};

/// Computes indentation levels against a baseline captured once
#[derive(Debug, Default)]
pub struct IndentTracker {
    baseline: OnceLock<isize>,
}

static GLOBAL_TRACKER: OnceLock<Arc<IndentTracker>> = OnceLock::new();

impl IndentTracker {
    pub const fn new() -> Self {
        Self {
            baseline: OnceLock::new(),
        }
    }

    /// The process-wide tracker used by interceptors that were not given one
    pub fn global() -> Arc<IndentTracker> {
        GLOBAL_TRACKER
            .get_or_init(|| Arc::new(IndentTracker::new()))
            .clone()
    }

    /// Baseline depth, if any query has been made yet
    pub fn baseline(&self) -> Option<isize> {
        self.baseline.get().copied()
    }

    /// Indentation level for a line logged at `depth`
    ///
    /// `extra_depth` shifts the measured depth, as if the line were logged
    /// that many frames deeper. The result is clamped at zero.
    pub fn indent_level(&self, depth: CallDepth, extra_depth: isize) -> usize {
        self.level_at(to_signed(depth), extra_depth)
    }

    /// Indentation level for the deferred exit line of an async call at `depth`
    ///
    /// The continuation runs in the frame awaiting the future, one level
    /// above the call; `extra_depth = 1` puts the line back at the call's level.
    pub fn deferred_indent_level(&self, depth: CallDepth) -> usize {
        self.level_at(to_signed(depth) - 1, 1)
    }

    fn level_at(&self, measured: isize, extra_depth: isize) -> usize {
        let baseline = *self.baseline.get_or_init(|| {
            tracing::trace!(
                component = COMPONENT,
                event = EVENT_BASELINE,
                baseline = measured,
                "indentation baseline fixed"
            );
            measured
        });
        let level = measured
            .saturating_add(extra_depth)
            .saturating_sub(baseline)
            .max(0);
        usize::try_from(level).unwrap_or(0)
    }

    /// Render `level` repetitions of `unit`
    pub fn prefix(level: usize, unit: &str) -> String {
        unit.repeat(level)
    }
}

fn to_signed(depth: CallDepth) -> isize {
    isize::try_from(depth.get()).unwrap_or(isize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calltrail_core_types::schema::INDENT_UNIT;

    #[test]
    fn test_first_query_fixes_baseline() {
        let tracker = IndentTracker::new();
        assert_eq!(tracker.baseline(), None);

        assert_eq!(tracker.indent_level(CallDepth::new(2), 0), 0);
        assert_eq!(tracker.baseline(), Some(2));

        assert_eq!(tracker.indent_level(CallDepth::new(5), 0), 3);
        assert_eq!(tracker.baseline(), Some(2));
    }

    #[test]
    fn test_shallower_than_baseline_clamps_to_zero() {
        let tracker = IndentTracker::new();
        tracker.indent_level(CallDepth::new(4), 0);

        assert_eq!(tracker.indent_level(CallDepth::new(1), 0), 0);
        assert_eq!(tracker.indent_level(CallDepth::new(4), -3), 0);
    }

    #[test]
    fn test_extra_depth_shifts_level() {
        let tracker = IndentTracker::new();
        tracker.indent_level(CallDepth::ROOT, 0);

        assert_eq!(tracker.indent_level(CallDepth::new(2), 1), 3);
        assert_eq!(tracker.indent_level(CallDepth::new(2), -1), 1);
    }

    #[test]
    fn test_deferred_level_matches_call_level() {
        let tracker = IndentTracker::new();
        tracker.indent_level(CallDepth::ROOT, 0);

        for depth in 0..5 {
            let depth = CallDepth::new(depth);
            assert_eq!(
                tracker.deferred_indent_level(depth),
                tracker.indent_level(depth, 0)
            );
        }
    }

    #[test]
    fn test_prefix_repeats_unit() {
        assert_eq!(IndentTracker::prefix(0, INDENT_UNIT), "");
        assert_eq!(IndentTracker::prefix(2, INDENT_UNIT), "      ");
        assert_eq!(IndentTracker::prefix(3, "|"), "|||");
    }

    #[test]
    fn test_global_tracker_is_shared() {
        assert!(Arc::ptr_eq(&IndentTracker::global(), &IndentTracker::global()));
    }
}
