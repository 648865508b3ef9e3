//! Parsing and validation of `quire.toml` project configuration files.
//!
//! This crate reads the optional project configuration file and produces a
//! strongly-typed [`QuireConfig`] with diagnostic output and build settings.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
