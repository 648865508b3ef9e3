//! Append-only, lazily created log of serialized diagnostic records.

use crate::error::SinkError;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lifecycle of the log destination. Every transition happens under the
/// [`DurableLog`] mutex, so the file is created at most once.
enum LogState {
    /// No destination configured; appends are discarded.
    Disabled,
    /// Destination configured but not yet touched.
    Pending(PathBuf),
    /// File created and accepting records.
    Open {
        path: PathBuf,
        writer: BufWriter<File>,
    },
    /// Creation failed; appends are discarded.
    Faulted(PathBuf),
    /// Flushed and closed; appends are discarded.
    Closed,
}

/// The machine-readable record of every diagnostic in a build.
///
/// One line per record. The file is created on the first [`append`](Self::append):
/// the path is made absolute against the current directory, parent directories
/// are created, and the file is opened in append mode. [`close`](Self::close)
/// moves the log to its terminal state exactly once.
pub struct DurableLog {
    state: Mutex<LogState>,
}

impl DurableLog {
    /// A log with no destination. Nothing is ever written or created.
    pub fn disabled() -> Self {
        Self {
            state: Mutex::new(LogState::Disabled),
        }
    }

    /// A log that will be created at `path` on first use.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            state: Mutex::new(LogState::Pending(path.into())),
        }
    }

    /// A log at `path` if one is configured, otherwise a disabled log.
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::at(path),
            None => Self::disabled(),
        }
    }

    /// Appends one record followed by a line terminator.
    ///
    /// Trailing line terminators already present in `record` are dropped so
    /// every record occupies exactly one line. Records appended to a disabled,
    /// faulted, or closed log are discarded.
    pub fn append(&self, record: &str) -> Result<(), SinkError> {
        let mut state = self.lock();
        if let LogState::Pending(configured) = &*state {
            let configured = configured.clone();
            match create(&configured) {
                Ok((path, writer)) => {
                    tracing::debug!(path = %path.display(), "created diagnostic log");
                    *state = LogState::Open { path, writer };
                }
                Err(err) => {
                    *state = LogState::Faulted(configured);
                    return Err(err);
                }
            }
        }

        match &mut *state {
            LogState::Open { path, writer } => {
                // One write per record, so a failed write never leaves a
                // record buffered without its terminator.
                let record = record.trim_end_matches(|c: char| c == '\r' || c == '\n');
                let line = format!("{record}\n");
                writer
                    .write_all(line.as_bytes())
                    .map_err(|source| SinkError::WriteLog {
                        path: path.clone(),
                        source,
                    })
            }
            LogState::Closed => {
                tracing::debug!("diagnostic record dropped: log already closed");
                Ok(())
            }
            LogState::Faulted(path) => {
                tracing::debug!(path = %path.display(), "diagnostic record dropped: log unavailable");
                Ok(())
            }
            LogState::Disabled | LogState::Pending(_) => Ok(()),
        }
    }

    /// Flushes buffered records, then closes the file.
    ///
    /// The file is closed even if the flush fails. Closing a log that was
    /// never created, or closing twice, does nothing.
    pub fn close(&self) -> Result<(), SinkError> {
        let mut state = self.lock();
        let LogState::Open { path, mut writer } = std::mem::replace(&mut *state, LogState::Closed)
        else {
            return Ok(());
        };
        let flushed = writer.flush();
        // into_parts hands back the file without a second flush attempt on drop.
        let (file, _) = writer.into_parts();
        drop(file);
        tracing::debug!(path = %path.display(), "closed diagnostic log");
        flushed.map_err(|source| SinkError::FlushLog { path, source })
    }

    /// Returns `true` if the log file has been created and not yet closed.
    pub fn is_open(&self) -> bool {
        matches!(*self.lock(), LogState::Open { .. })
    }

    /// Returns `true` once [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        matches!(*self.lock(), LogState::Closed)
    }

    /// Returns `true` if no destination was configured.
    pub fn is_disabled(&self) -> bool {
        matches!(*self.lock(), LogState::Disabled)
    }

    fn lock(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DurableLog {
    fn default() -> Self {
        Self::disabled()
    }
}

fn create(path: &Path) -> Result<(PathBuf, BufWriter<File>), SinkError> {
    let resolved = absolute(path).map_err(|source| SinkError::CreateLog {
        path: path.to_path_buf(),
        source,
    })?;
    let opened = resolved
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| OpenOptions::new().create(true).append(true).open(&resolved));
    match opened {
        Ok(file) => Ok((resolved, BufWriter::new(file))),
        Err(source) => Err(SinkError::CreateLog {
            path: resolved,
            source,
        }),
    }
}

fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn disabled_log_creates_nothing() {
        let log = DurableLog::disabled();
        log.append("{}").unwrap();
        log.close().unwrap();
        assert!(log.is_closed());
    }

    #[test]
    fn file_created_lazily_with_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("obj").join("logs").join("build.log");
        let log = DurableLog::at(&path);
        assert!(!path.exists());
        assert!(!log.is_open());

        log.append(r#"{"code":"A"}"#).unwrap();
        assert!(log.is_open());
        assert!(path.exists());

        log.close().unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\"code\":\"A\"}\n");
    }

    #[test]
    fn never_used_log_is_not_created_on_close() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.log");
        let log = DurableLog::at(&path);
        log.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn appends_to_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.log");
        fs::write(&path, "{\"earlier\":true}\n").unwrap();

        let log = DurableLog::at(&path);
        log.append("{\"later\":true}").unwrap();
        log.close().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn trailing_newlines_collapse_to_one_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.log");
        let log = DurableLog::at(&path);
        log.append("{}\r\n").unwrap();
        log.append("{}\n\n").unwrap();
        log.close().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n{}\n");
    }

    #[test]
    fn close_twice_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.log");
        let log = DurableLog::at(&path);
        log.append("{}").unwrap();
        log.close().unwrap();
        log.close().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
    }

    #[test]
    fn append_after_close_is_dropped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.log");
        let log = DurableLog::at(&path);
        log.append("{\"n\":1}").unwrap();
        log.close().unwrap();
        log.append("{\"n\":2}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"n\":1}\n");
    }

    #[test]
    fn creation_failure_faults_once() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "").unwrap();
        let log = DurableLog::at(blocker.join("build.log"));

        let err = log.append("{}").unwrap_err();
        assert!(matches!(err, SinkError::CreateLog { .. }));
        // Subsequent appends are discarded rather than retried.
        assert!(log.append("{}").is_ok());
        assert!(!log.is_open());
        log.close().unwrap();
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn full_device_faults_on_write_and_flush() {
        let log = DurableLog::at("/dev/full");
        let record = format!("{{\"message\":\"{}\"}}", "x".repeat(100));
        // Enough records to overflow the write buffer several times.
        let faults: Vec<SinkError> = (0..500)
            .filter_map(|_| log.append(&record).err())
            .collect();
        assert!(!faults.is_empty());
        assert!(faults
            .iter()
            .all(|fault| matches!(fault, SinkError::WriteLog { .. })));

        let err = log.close().unwrap_err();
        assert!(matches!(err, SinkError::FlushLog { .. }));
        assert!(log.is_closed());
        // Closing again does not retry the flush.
        log.close().unwrap();
    }
}
