//! Thread-safe diagnostic aggregator shared by every producer in a build.

use crate::console::Console;
use crate::counts::DiagnosticCounts;
use crate::diagnostic::DiagnosticEvent;
use crate::durable_log::DurableLog;
use crate::error::SinkError;
use crate::severity::Severity;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// The per-build collector of diagnostic events.
///
/// Producers on any number of threads call [`add`](Self::add). Each event is
/// counted with an atomic increment, appended to the [`DurableLog`], and
/// rendered on the [`Console`]; the log and the console each have their own
/// lock, and the counters take neither, so [`has_error`](Self::has_error)
/// never waits on I/O.
///
/// The sink is built once per build by the composition root and passed by
/// reference (or `Arc`) to producers. Call [`print_summary`](Self::print_summary)
/// and then [`dispose`](Self::dispose) after all producers have finished;
/// dropping the sink disposes it as well.
pub struct DiagnosticSink {
    error_count: AtomicUsize,
    warning_count: AtomicUsize,
    suggestion_count: AtomicUsize,
    log: DurableLog,
    console: Console,
    log_fault_reported: AtomicBool,
    console_fault_reported: AtomicBool,
}

impl DiagnosticSink {
    /// Creates a sink writing records to `log` and rendering to `console`.
    pub fn new(log: DurableLog, console: Console) -> Self {
        Self {
            error_count: AtomicUsize::new(0),
            warning_count: AtomicUsize::new(0),
            suggestion_count: AtomicUsize::new(0),
            log,
            console,
            log_fault_reported: AtomicBool::new(false),
            console_fault_reported: AtomicBool::new(false),
        }
    }

    /// Records one event: counts it, logs it, and renders it.
    ///
    /// Never fails. Faults in logging or rendering are reported once per
    /// destination on the console's fallback channel, including a log fault
    /// that only surfaces at [`dispose`](Self::dispose); a record without its
    /// closing delimiter is reported every time it occurs.
    pub fn add(&self, event: &DiagnosticEvent) {
        match event.severity() {
            Severity::Error => self.error_count.fetch_add(1, Ordering::Relaxed),
            Severity::Warning => self.warning_count.fetch_add(1, Ordering::Relaxed),
            Severity::Suggestion => self.suggestion_count.fetch_add(1, Ordering::Relaxed),
            Severity::Info => 0,
        };

        if let Err(fault) = self.log.append(event.serialized_form()) {
            self.report_once(&self.log_fault_reported, fault);
        }
        if !event.is_well_formed() {
            self.console.report_fault(&SinkError::MalformedRecord {
                code: event.code().to_string(),
            });
        }

        if let Err(fault) = self.console.render_event(event) {
            self.report_once(&self.console_fault_reported, fault);
        }
    }

    /// Prints the one-line totals, or nothing if no counted event was added.
    ///
    /// Not guarded against repeated calls; each call prints again.
    pub fn print_summary(&self) {
        if let Err(fault) = self.console.render_summary(&self.counts()) {
            self.report_once(&self.console_fault_reported, fault);
        }
    }

    /// Flushes and closes the durable log if it was ever created.
    ///
    /// Call once, after all producers have stopped. Later calls, including
    /// the one made on drop, do nothing.
    pub fn dispose(&self) {
        if let Err(fault) = self.log.close() {
            self.report_once(&self.log_fault_reported, fault);
        }
    }

    /// Returns `true` if any error-severity event has been added.
    pub fn has_error(&self) -> bool {
        self.error_count.load(Ordering::Relaxed) > 0
    }

    /// Returns the number of error-severity events added so far.
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Returns the number of warning-severity events added so far.
    pub fn warning_count(&self) -> usize {
        self.warning_count.load(Ordering::Relaxed)
    }

    /// Returns the number of suggestion-severity events added so far.
    pub fn suggestion_count(&self) -> usize {
        self.suggestion_count.load(Ordering::Relaxed)
    }

    /// A snapshot of all three running totals.
    pub fn counts(&self) -> DiagnosticCounts {
        DiagnosticCounts {
            errors: self.error_count(),
            warnings: self.warning_count(),
            suggestions: self.suggestion_count(),
        }
    }

    /// The durable log this sink writes to.
    pub fn log(&self) -> &DurableLog {
        &self.log
    }

    fn report_once(&self, reported: &AtomicBool, fault: SinkError) {
        if reported.swap(true, Ordering::AcqRel) {
            tracing::debug!(%fault, "repeated diagnostic sink fault suppressed");
        } else {
            self.console.report_fault(&fault);
        }
    }
}

impl Drop for DiagnosticSink {
    fn drop(&mut self) {
        self.dispose();
    }
}
