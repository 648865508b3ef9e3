//! `quire replay` — feed a recorded diagnostic log back through a sink.
//!
//! Each non-blank line of the input is parsed as a durable-log record and
//! added to the session sink from the worker pool. Lines that cannot be
//! parsed become `invalid-record` warnings pointing at the input file.

use std::fs;

use quire_diagnostics::{DiagnosticCode, DiagnosticEvent, LogRecord};
use rayon::prelude::*;

use crate::pipeline::{finish, open_session};
use crate::{GlobalArgs, ReplayArgs};

/// Code reported for input lines that are not valid records.
pub const INVALID_RECORD: &str = "invalid-record";

/// Runs the `quire replay` command.
///
/// Returns exit code 0 if no errors were replayed, 1 otherwise.
pub fn run(args: &ReplayArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(&args.input)?;
    let session = open_session(global)?;
    let input_name = args.input.display().to_string();

    let lines = record_lines(&content);
    if !global.quiet {
        eprintln!("   Replaying {} record(s) from {input_name}", lines.len());
    }

    session.pool.install(|| {
        lines.par_iter().for_each(|&(line_number, line)| {
            session.sink.add(&parse_record(&input_name, line_number, line));
        });
    });
    Ok(finish(session))
}

/// Non-blank lines paired with their 1-based line numbers.
fn record_lines(content: &str) -> Vec<(u32, &str)> {
    content
        .lines()
        .zip(1u32..)
        .filter(|(line, _)| !line.trim().is_empty())
        .map(|(line, number)| (number, line))
        .collect()
}

/// Converts one input line into the event to add.
pub fn parse_record(input_name: &str, line_number: u32, line: &str) -> DiagnosticEvent {
    let record = match LogRecord::parse_line(line) {
        Ok(record) => record,
        Err(err) => {
            let column = u32::try_from(err.column()).unwrap_or(u32::MAX);
            return DiagnosticEvent::warning(
                INVALID_RECORD,
                format!("cannot parse diagnostic record: {err}"),
            )
            .with_source(input_name, line_number, column);
        }
    };
    if let Err(err) = DiagnosticCode::try_new(record.code.as_str()) {
        return DiagnosticEvent::warning(INVALID_RECORD, err.to_string())
            .with_source(input_name, line_number, 1);
    }
    record.into_event()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_diagnostics::{Console, DiagnosticSink, DurableLog, Severity};
    use std::io;

    fn quiet_sink() -> DiagnosticSink {
        let console = Console::new(
            Box::new(io::sink()),
            Box::new(io::sink()),
            Box::new(io::sink()),
            false,
        );
        DiagnosticSink::new(DurableLog::disabled(), console)
    }

    #[test]
    fn valid_record_replayed_verbatim() {
        let line = r#"{"message_severity":"error","code":"X001","message":"bad token","file":"a.md","line":3,"column":5}"#;
        let event = parse_record("build.log", 1, line);
        assert_eq!(event.severity(), Severity::Error);
        assert_eq!(event.code().as_str(), "X001");
        assert_eq!(event.source().unwrap().to_string(), "./a.md(3,5)");
        assert_eq!(event.serialized_form(), line);
    }

    #[test]
    fn unparseable_line_becomes_warning() {
        let event = parse_record("obj/build.log", 7, "{\"message_severity\":");
        assert_eq!(event.severity(), Severity::Warning);
        assert_eq!(event.code().as_str(), INVALID_RECORD);
        let source = event.source().unwrap();
        assert_eq!(source.file, "obj/build.log");
        assert_eq!(source.line, 7);
    }

    #[test]
    fn record_with_blank_code_becomes_warning() {
        let line = r#"{"message_severity":"info","code":"","message":"x"}"#;
        let event = parse_record("build.log", 2, line);
        assert_eq!(event.code().as_str(), INVALID_RECORD);
    }

    #[test]
    fn blank_lines_skipped_and_numbered() {
        let lines = record_lines("{}\n\n   \n{}\n");
        assert_eq!(lines, vec![(1, "{}"), (4, "{}")]);
    }

    #[test]
    fn replay_counts_by_severity() {
        let content = concat!(
            r#"{"message_severity":"error","code":"X001","message":"a"}"#,
            "\n",
            r#"{"message_severity":"warning","code":"W001","message":"b"}"#,
            "\n",
            r#"{"message_severity":"suggestion","code":"S001","message":"c"}"#,
            "\n",
            r#"{"message_severity":"info","code":"I001","message":"d"}"#,
            "\n",
            "not json\n",
        );
        let sink = quiet_sink();
        for (line_number, line) in record_lines(content) {
            sink.add(&parse_record("build.log", line_number, line));
        }
        assert_eq!(sink.error_count(), 1);
        assert_eq!(sink.warning_count(), 2);
        assert_eq!(sink.suggestion_count(), 1);
    }
}
