//! Point-in-time snapshot of the sink's running totals.

use crate::severity::Severity;
use std::fmt;

/// Counts of counted-severity diagnostics at the moment of the snapshot.
///
/// Info events have no running total and never appear here.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct DiagnosticCounts {
    /// Number of error events.
    pub errors: usize,
    /// Number of warning events.
    pub warnings: usize,
    /// Number of suggestion events.
    pub suggestions: usize,
}

impl DiagnosticCounts {
    /// Sum of all three counts.
    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.suggestions
    }

    /// Returns `true` if nothing was counted.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// The severity whose color the summary line uses.
    pub fn summary_severity(&self) -> Severity {
        if self.errors > 0 {
            Severity::Error
        } else if self.warnings > 0 {
            Severity::Warning
        } else {
            Severity::Suggestion
        }
    }
}

/// The summary line, with its two leading spaces.
impl fmt::Display for DiagnosticCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  {} Error(s), {} Warning(s), {} Suggestion(s)",
            self.errors, self.warnings, self.suggestions
        )
    }
}
