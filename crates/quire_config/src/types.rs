//! Configuration types deserialized from `quire.toml`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The top-level configuration parsed from `quire.toml`.
///
/// Every table is optional; a missing file yields [`QuireConfig::default`].
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuireConfig {
    /// Diagnostic output settings.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    /// Build execution settings.
    #[serde(default)]
    pub build: BuildConfig,
}

/// The `[diagnostics]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Path of the durable diagnostic log. No log is written when absent.
    #[serde(default)]
    pub log: Option<PathBuf>,
    /// Whether console output is colored.
    #[serde(default)]
    pub color: ColorChoice,
}

impl DiagnosticsConfig {
    /// Resolves the configured log path against `project_dir`.
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve_log_path(&self, project_dir: &Path) -> Option<PathBuf> {
        self.log.as_ref().map(|log| {
            if log.is_absolute() {
                log.clone()
            } else {
                project_dir.join(log)
            }
        })
    }
}

/// When console output is colored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Color when the output looks like a terminal.
    #[default]
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

/// The `[build]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Number of worker threads. Defaults to the available parallelism.
    #[serde(default)]
    pub jobs: Option<usize>,
}
