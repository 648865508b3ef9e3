//! Colored, line-oriented console rendering of diagnostics.

use crate::counts::DiagnosticCounts;
use crate::diagnostic::DiagnosticEvent;
use crate::error::SinkError;
use crate::severity::Severity;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

type Stream = Box<dyn Write + Send>;

/// The two interactive streams, guarded together so a rendered line and its
/// color reset are never split by another writer.
struct Streams {
    out: Stream,
    err: Stream,
}

/// Interactive output for diagnostics.
///
/// Error events go to the error stream, everything else to the normal stream.
/// A separate fallback channel, with its own lock, carries faults of the sink
/// itself so they can be reported while the interactive lock is held.
pub struct Console {
    streams: Mutex<Streams>,
    fallback: Mutex<Stream>,
    out_color: bool,
    err_color: bool,
}

impl Console {
    /// A console over arbitrary writers, colored on both streams or neither.
    pub fn new(out: Stream, err: Stream, fallback: Stream, color: bool) -> Self {
        Self::with_colors(out, err, fallback, color, color)
    }

    /// A console over arbitrary writers with a color decision per stream.
    pub fn with_colors(
        out: Stream,
        err: Stream,
        fallback: Stream,
        out_color: bool,
        err_color: bool,
    ) -> Self {
        Self {
            streams: Mutex::new(Streams { out, err }),
            fallback: Mutex::new(fallback),
            out_color,
            err_color,
        }
    }

    /// A console over the process's stdout and stderr. Faults go to stderr.
    pub fn stdio(out_color: bool, err_color: bool) -> Self {
        Self::with_colors(
            Box::new(io::stdout()),
            Box::new(io::stderr()),
            Box::new(io::stderr()),
            out_color,
            err_color,
        )
    }

    /// Renders one event as a single colored line.
    pub fn render_event(&self, event: &DiagnosticEvent) -> Result<(), SinkError> {
        let line = format_event(event);
        let mut streams = self.lock_streams();
        let (stream, color) = if event.severity().is_error() {
            (&mut streams.err, self.err_color)
        } else {
            (&mut streams.out, self.out_color)
        };
        write_line(stream, &line, event.severity(), color)
            .map_err(|source| SinkError::Console { source })
    }

    /// Renders the end-of-build summary. Writes nothing when all counts are zero.
    pub fn render_summary(&self, counts: &DiagnosticCounts) -> Result<(), SinkError> {
        if counts.is_empty() {
            return Ok(());
        }
        let line = counts.to_string();
        let mut streams = self.lock_streams();
        write_line(
            &mut streams.out,
            &line,
            counts.summary_severity(),
            self.out_color,
        )
            .map_err(|source| SinkError::Console { source })
    }

    /// Reports a fault of the sink on the fallback channel.
    ///
    /// Never fails; an error writing the fault itself is dropped.
    pub fn report_fault(&self, fault: &SinkError) {
        tracing::warn!(%fault, "diagnostic sink fault");
        let mut fallback = self.fallback.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(fallback, "warning: {fault}").and_then(|()| fallback.flush());
    }

    fn lock_streams(&self) -> MutexGuard<'_, Streams> {
        self.streams.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Formats an event as `<code> ./<file>(<line>,<column>): <message>`, or
/// `<code> <message>` when it has no source location.
pub fn format_event(event: &DiagnosticEvent) -> String {
    match event.source() {
        Some(source) => format!("{} {}: {}", event.code(), source, event.message()),
        None => format!("{} {}", event.code(), event.message()),
    }
}

/// The foreground color used for a severity.
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Suggestion => Color::Magenta,
        Severity::Info => Color::DarkGrey,
    }
}

// The reset is queued before the newline so no color state survives the line.
fn write_line(stream: &mut Stream, line: &str, severity: Severity, color: bool) -> io::Result<()> {
    if color {
        queue!(
            stream,
            SetForegroundColor(severity_color(severity)),
            Print(line),
            ResetColor,
            Print("\n")
        )?;
    } else {
        writeln!(stream, "{line}")?;
    }
    stream.flush()
}
