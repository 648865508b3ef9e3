//! Diagnostic events and the structured record written to the durable log.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use quire_common::SourceLocation;
use serde::{Deserialize, Serialize};

/// One line of the durable log.
///
/// Producers never build this directly; it is derived from a
/// [`DiagnosticEvent`] and kept in its pre-serialized form. Tools reading the
/// log back use [`LogRecord::parse_line`].
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LogRecord {
    /// Severity of the event.
    pub message_severity: Severity,
    /// Stable identifier of the event kind.
    pub code: DiagnosticCode,
    /// Human-readable text.
    pub message: String,
    /// Source file, if the event is location-aware.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// 1-based line, present together with `file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// 1-based column, present together with `file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl LogRecord {
    /// Parses one durable-log line back into a record.
    pub fn parse_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim_end())
    }

    /// The source location described by this record, if any.
    pub fn source(&self) -> Option<SourceLocation> {
        let file = self.file.as_ref()?;
        Some(SourceLocation::new(
            file.clone(),
            self.line.unwrap_or(1),
            self.column.unwrap_or(1),
        ))
    }

    /// Converts the record into an event carrying the same data.
    pub fn into_event(self) -> DiagnosticEvent {
        let source = self.source();
        let mut event = DiagnosticEvent::new(self.message_severity, self.code, self.message);
        event.source = source;
        event.reserialize();
        event
    }
}

/// A single reportable build-time condition.
///
/// The event carries its own serialized form, a single-line JSON object that
/// is appended verbatim to the durable log. The builder methods keep it in
/// sync with the other fields; [`with_serialized_form`](Self::with_serialized_form)
/// overrides it for producers that serialize their own records.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DiagnosticEvent {
    severity: Severity,
    code: DiagnosticCode,
    message: String,
    source: Option<SourceLocation>,
    serialized: String,
}

impl DiagnosticEvent {
    /// Creates an event with the given severity, code, and message.
    pub fn new(
        severity: Severity,
        code: impl Into<DiagnosticCode>,
        message: impl Into<String>,
    ) -> Self {
        let mut event = Self {
            severity,
            code: code.into(),
            message: message.into(),
            source: None,
            serialized: String::new(),
        };
        event.reserialize();
        event
    }

    /// Creates an error event.
    pub fn error(code: impl Into<DiagnosticCode>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Creates a warning event.
    pub fn warning(code: impl Into<DiagnosticCode>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Creates a suggestion event.
    pub fn suggestion(code: impl Into<DiagnosticCode>, message: impl Into<String>) -> Self {
        Self::new(Severity::Suggestion, code, message)
    }

    /// Creates an informational event.
    pub fn info(code: impl Into<DiagnosticCode>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    /// Attaches a source location (1-based line and column).
    pub fn with_source(mut self, file: impl Into<String>, line: u32, column: u32) -> Self {
        self.source = Some(SourceLocation::new(file, line, column));
        self.reserialize();
        self
    }

    /// Replaces the durable-log record with a producer-supplied one.
    ///
    /// The text is written as-is; the sink reports it on the fallback channel
    /// if it does not end with a closing `}`.
    pub fn with_serialized_form(mut self, serialized: impl Into<String>) -> Self {
        self.serialized = serialized.into();
        self
    }

    /// The severity of this event.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The stable code of this event.
    pub fn code(&self) -> &DiagnosticCode {
        &self.code
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The source location, if the event is location-aware.
    pub fn source(&self) -> Option<&SourceLocation> {
        self.source.as_ref()
    }

    /// The pre-serialized durable-log record.
    pub fn serialized_form(&self) -> &str {
        &self.serialized
    }

    /// Returns `true` if the serialized form is terminated by its closing delimiter.
    pub fn is_well_formed(&self) -> bool {
        self.serialized.trim_end().ends_with('}')
    }

    /// The structured record describing this event.
    pub fn to_record(&self) -> LogRecord {
        LogRecord {
            message_severity: self.severity,
            code: self.code.clone(),
            message: self.message.clone(),
            file: self.source.as_ref().map(|s| s.file.clone()),
            line: self.source.as_ref().map(|s| s.line),
            column: self.source.as_ref().map(|s| s.column),
        }
    }

    // A serialization failure leaves the form empty, which the sink then
    // reports as a malformed record.
    fn reserialize(&mut self) {
        self.serialized = serde_json::to_string(&self.to_record()).unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_error() {
        let event = DiagnosticEvent::error("X001", "bad token");
        assert_eq!(event.severity(), Severity::Error);
        assert_eq!(event.code().as_str(), "X001");
        assert_eq!(event.message(), "bad token");
        assert!(event.source().is_none());
    }

    #[test]
    fn serialized_form_is_single_line_json() {
        let event = DiagnosticEvent::warning("W002", "line one\nline two");
        let serialized = event.serialized_form();
        assert!(!serialized.contains('\n'));
        assert!(serialized.starts_with('{'));
        assert!(event.is_well_formed());
    }

    #[test]
    fn serialized_form_tracks_source() {
        let event = DiagnosticEvent::error("X001", "bad token").with_source("a.md", 3, 5);
        let record = LogRecord::parse_line(event.serialized_form()).unwrap();
        assert_eq!(record.message_severity, Severity::Error);
        assert_eq!(record.file.as_deref(), Some("a.md"));
        assert_eq!(record.line, Some(3));
        assert_eq!(record.column, Some(5));
    }

    #[test]
    fn record_without_source_omits_location_fields() {
        let event = DiagnosticEvent::info("I100", "built 3 files");
        assert!(!event.serialized_form().contains("\"file\""));
        assert_eq!(
            event.serialized_form(),
            r#"{"message_severity":"info","code":"I100","message":"built 3 files"}"#
        );
    }

    #[test]
    fn custom_serialized_form_checked_for_closing_delimiter() {
        let truncated = DiagnosticEvent::error("X001", "bad").with_serialized_form("{\"code\":");
        assert!(!truncated.is_well_formed());
        let custom = DiagnosticEvent::error("X001", "bad").with_serialized_form("{}\n");
        assert!(custom.is_well_formed());
    }

    #[test]
    fn record_into_event_roundtrip() {
        let event = DiagnosticEvent::suggestion("S010", "prefer relative links")
            .with_source("docs/index.md", 12, 1);
        let back = event.to_record().into_event();
        assert_eq!(back, event);
    }
}
