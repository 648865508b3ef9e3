//! Diagnostic aggregation and reporting for documentation builds.
//!
//! Producers across the build pipeline construct [`DiagnosticEvent`]s and hand
//! them to a shared [`DiagnosticSink`]. The sink counts them per [`Severity`],
//! appends their serialized record to a lazily created [`DurableLog`], and
//! renders them in color through a [`Console`].

#![warn(missing_docs)]

pub mod capture;
pub mod code;
pub mod console;
pub mod counts;
pub mod diagnostic;
pub mod durable_log;
pub mod error;
pub mod severity;
pub mod sink;

pub use capture::SharedBuffer;
pub use code::{DiagnosticCode, InvalidCodeError};
pub use console::Console;
pub use counts::DiagnosticCounts;
pub use diagnostic::{DiagnosticEvent, LogRecord};
pub use durable_log::DurableLog;
pub use error::SinkError;
pub use quire_common::SourceLocation;
pub use severity::{ParseSeverityError, Severity};
pub use sink::DiagnosticSink;
