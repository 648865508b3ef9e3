//! Faults inside the sink itself, as opposed to the diagnostics it carries.

use std::path::PathBuf;

/// Infrastructure faults raised while logging or rendering diagnostics.
///
/// These never propagate out of [`DiagnosticSink::add`](crate::DiagnosticSink::add);
/// they are reported once on the console's fallback channel and the build
/// continues with degraded observability.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The durable log file or its parent directories could not be created.
    #[error("failed to create diagnostic log {path}: {source}")]
    CreateLog {
        /// The resolved log path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A record could not be appended to the durable log.
    #[error("failed to write diagnostic log {path}: {source}")]
    WriteLog {
        /// The resolved log path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Buffered records could not be flushed when closing the durable log.
    #[error("failed to flush diagnostic log {path}: {source}")]
    FlushLog {
        /// The resolved log path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Interactive console output failed.
    #[error("failed to write diagnostics to console: {source}")]
    Console {
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A producer supplied a serialized record without its closing delimiter.
    #[error("incomplete serialized record for diagnostic '{code}'")]
    MalformedRecord {
        /// Code of the offending event.
        code: String,
    },
}
