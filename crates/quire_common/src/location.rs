//! Source locations attached to location-aware diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position inside a source document: file path plus 1-based line and column.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Path of the file, relative to the docset root.
    pub file: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl SourceLocation {
    /// Creates a new source location.
    ///
    /// Backslashes in `file` are normalized to forward slashes, and line and
    /// column are clamped to a minimum of 1.
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        let file = file.into().replace('\\', "/");
        Self {
            file,
            line: line.max(1),
            column: column.max(1),
        }
    }

    /// The file path without any leading `./`.
    pub fn relative_file(&self) -> &str {
        self.file.trim_start_matches("./")
    }
}

/// Displays as `./<file>(<line>,<column>)`.
impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "./{}({},{})", self.relative_file(), self.line, self.column)
    }
}
