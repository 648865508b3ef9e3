//! Shared helpers for Quire conformance tests.
//!
//! Builds diagnostic sinks whose console streams are captured in memory so
//! tests can assert on exactly what was rendered where.

#![warn(missing_docs)]

use std::path::Path;

use quire_config::QuireConfig;
use quire_diagnostics::{
    Console, DiagnosticEvent, DiagnosticSink, DurableLog, Severity, SharedBuffer,
};

/// Captured console streams of a sink built by [`captured_sink`].
#[derive(Clone, Default)]
pub struct CapturedConsole {
    /// Normal output.
    pub out: SharedBuffer,
    /// Error output.
    pub err: SharedBuffer,
    /// Fallback channel for sink faults.
    pub fallback: SharedBuffer,
}

/// Builds a sink over `log` whose console output is captured.
pub fn captured_sink(log: DurableLog, color: bool) -> (DiagnosticSink, CapturedConsole) {
    let captured = CapturedConsole::default();
    let console = Console::new(
        Box::new(captured.out.clone()),
        Box::new(captured.err.clone()),
        Box::new(captured.fallback.clone()),
        color,
    );
    (DiagnosticSink::new(log, console), captured)
}

/// Builds a captured, uncolored sink the way the CLI does from a project's configuration.
pub fn sink_from_config(
    config: &QuireConfig,
    project_dir: &Path,
) -> (DiagnosticSink, CapturedConsole) {
    let log = DurableLog::from_path(config.diagnostics.resolve_log_path(project_dir));
    captured_sink(log, false)
}

/// A deterministic event of the given severity, distinguishable by `index`.
pub fn make_event(severity: Severity, index: usize) -> DiagnosticEvent {
    let code = match severity {
        Severity::Error => "E100",
        Severity::Warning => "W100",
        Severity::Suggestion => "S100",
        Severity::Info => "I100",
    };
    let line = u32::try_from(index % 1000).unwrap_or(0) + 1;
    DiagnosticEvent::new(severity, code, format!("event {index}"))
        .with_source(format!("docs/page{}.md", index % 7), line, 1)
}

/// The severity cycle used by [`mixed_events`].
pub const SEVERITY_CYCLE: [Severity; 4] = [
    Severity::Error,
    Severity::Warning,
    Severity::Suggestion,
    Severity::Info,
];

/// `n` events cycling through all severities.
pub fn mixed_events(n: usize) -> Vec<DiagnosticEvent> {
    (0..n)
        .map(|i| make_event(SEVERITY_CYCLE[i % SEVERITY_CYCLE.len()], i))
        .collect()
}
