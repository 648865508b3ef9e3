//! `quire check` — lint markdown sources for common authoring problems.
//!
//! Each file is checked on the worker pool and every finding is added to the
//! session sink as it is found:
//!
//! - `trailing-whitespace` (suggestion)
//! - `line-too-long` (warning, more than [`MAX_LINE_LENGTH`] characters)
//! - `unclosed-code-fence` (error)
//! - `empty-file` (info)
//! - `file-not-found` (error, the file could not be read)

use std::fs;
use std::path::Path;

use quire_diagnostics::{DiagnosticEvent, DiagnosticSink};
use rayon::prelude::*;

use crate::pipeline::{finish, open_session};
use crate::{CheckArgs, GlobalArgs};

/// Longest line, in characters, accepted without a warning.
pub const MAX_LINE_LENGTH: usize = 200;

/// Runs the `quire check` command.
///
/// Returns exit code 0 if no errors were found, 1 otherwise.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let session = open_session(global)?;
    if !global.quiet {
        eprintln!("   Checking {} file(s)", args.files.len());
    }

    session.pool.install(|| {
        args.files
            .par_iter()
            .for_each(|path| check_file(path, &session.sink));
    });
    Ok(finish(session))
}

/// Reads and checks one file, adding findings to `sink`.
pub fn check_file(path: &Path, sink: &DiagnosticSink) {
    let name = path.to_string_lossy();
    match fs::read_to_string(path) {
        Ok(content) => {
            for event in check_markdown(&name, &content) {
                sink.add(&event);
            }
        }
        Err(err) => sink.add(
            &DiagnosticEvent::error("file-not-found", format!("cannot read file: {err}"))
                .with_source(name, 1, 1),
        ),
    }
}

/// Checks markdown text and returns its findings in line order.
pub fn check_markdown(file: &str, content: &str) -> Vec<DiagnosticEvent> {
    let mut events = Vec::new();
    if content.trim().is_empty() {
        events.push(
            DiagnosticEvent::info("empty-file", "file has no content").with_source(file, 1, 1),
        );
        return events;
    }

    let mut open_fence: Option<(u32, &str)> = None;
    for (line, number) in content.lines().zip(1u32..) {
        let trimmed = line.trim_end();
        if trimmed.len() != line.len() {
            events.push(
                DiagnosticEvent::suggestion("trailing-whitespace", "remove trailing whitespace")
                    .with_source(file, number, column_of(trimmed.chars().count())),
            );
        }

        let length = line.chars().count();
        if length > MAX_LINE_LENGTH {
            events.push(
                DiagnosticEvent::warning(
                    "line-too-long",
                    format!("line is {length} characters long, the limit is {MAX_LINE_LENGTH}"),
                )
                .with_source(file, number, column_of(MAX_LINE_LENGTH)),
            );
        }

        let indented = line.trim_start();
        let marker = ["```", "~~~"]
            .into_iter()
            .find(|marker| indented.starts_with(marker));
        match (open_fence, marker) {
            (None, Some(marker)) => open_fence = Some((number, marker)),
            (Some((_, opened)), Some(marker)) if opened == marker => open_fence = None,
            _ => {}
        }
    }

    if let Some((number, marker)) = open_fence {
        events.push(
            DiagnosticEvent::error(
                "unclosed-code-fence",
                format!("code fence `{marker}` is never closed"),
            )
            .with_source(file, number, 1),
        );
    }
    events
}

fn column_of(chars_before: usize) -> u32 {
    u32::try_from(chars_before + 1).unwrap_or(u32::MAX)
}
