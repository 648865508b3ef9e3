//! Shared composition-root helpers for CLI commands.
//!
//! Resolves the project directory and configuration, builds the one
//! [`DiagnosticSink`] of the invocation together with its worker pool, and
//! finishes the run by printing the summary and disposing the sink.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use quire_config::{ColorChoice, QuireConfig, CONFIG_FILE_NAME};
use quire_diagnostics::{Console, DiagnosticSink, DurableLog};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::GlobalArgs;

/// Everything a command needs to run producers for one build.
pub struct Session {
    /// The diagnostic sink shared by all producers.
    pub sink: DiagnosticSink,
    /// Worker pool the producers run on.
    pub pool: ThreadPool,
}

/// Walks up from `start` looking for the nearest directory containing `quire.toml`.
///
/// Falls back to `start` itself when no configuration file exists.
pub fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE_NAME).is_file())
        .unwrap_or(start)
        .to_path_buf()
}

/// Resolves the project directory and loads its configuration.
///
/// If `--config` is given, that file is loaded and its parent directory is
/// the project directory.
pub fn load_project(
    global: &GlobalArgs,
) -> Result<(PathBuf, QuireConfig), Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let config = quire_config::load_config_file(config_path)?;
        let project_dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok((project_dir, config))
    } else {
        let project_dir = find_project_root(&std::env::current_dir()?);
        let config = quire_config::load_config(&project_dir)?;
        Ok((project_dir, config))
    }
}

/// Builds the sink and worker pool from configuration and CLI overrides.
pub fn open_session(global: &GlobalArgs) -> Result<Session, Box<dyn std::error::Error>> {
    let (project_dir, config) = load_project(global)?;

    let log_path = global
        .log
        .clone()
        .or_else(|| config.diagnostics.resolve_log_path(&project_dir));
    let choice = global
        .color
        .map(Into::into)
        .unwrap_or(config.diagnostics.color);
    let (out_color, err_color) = stream_colors(
        choice,
        std::io::stdout().is_terminal(),
        std::io::stderr().is_terminal(),
    );
    tracing::debug!(
        project = %project_dir.display(),
        log = ?log_path,
        out_color,
        err_color,
        "opening diagnostic session"
    );

    let jobs = global.jobs.or(config.build.jobs).unwrap_or_else(default_jobs);
    let pool = ThreadPoolBuilder::new()
        .num_threads(jobs)
        .thread_name(|i| format!("quire-worker-{i}"))
        .build()?;

    let sink = DiagnosticSink::new(DurableLog::from_path(log_path), Console::stdio(out_color, err_color));
    Ok(Session { sink, pool })
}

/// Prints the summary, disposes the sink, and maps the outcome to an exit code.
pub fn finish(session: Session) -> i32 {
    let Session { sink, pool } = session;
    drop(pool);
    sink.print_summary();
    sink.dispose();
    if sink.has_error() {
        1
    } else {
        0
    }
}

/// Color decisions for (stdout, stderr); `auto` looks at each stream on its own.
fn stream_colors(choice: ColorChoice, stdout_tty: bool, stderr_tty: bool) -> (bool, bool) {
    match choice {
        ColorChoice::Auto => (stdout_tty, stderr_tty),
        ColorChoice::Always => (true, true),
        ColorChoice::Never => (false, false),
    }
}

fn default_jobs() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}
