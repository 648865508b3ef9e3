//! Quire CLI — the command-line interface for the Quire documentation toolchain.
//!
//! Provides `quire check` for linting markdown sources and `quire replay` for
//! feeding a recorded diagnostic log back through the console and a fresh
//! durable log. Both share one diagnostic sink per invocation and exit with
//! status 1 when any error was reported.

#![warn(missing_docs)]

mod check;
mod pipeline;
mod replay;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Quire — a documentation build toolchain.
#[derive(Parser, Debug)]
#[command(name = "quire", version, about = "Quire documentation toolchain")]
pub struct Cli {
    /// Suppress all output except diagnostics.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) internal logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output. Overrides `diagnostics.color` in `quire.toml`.
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Path to a custom `quire.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Write the durable diagnostic log to this path. Overrides `diagnostics.log`.
    #[arg(long, global = true)]
    pub log: Option<PathBuf>,

    /// Number of worker threads. Overrides `build.jobs`.
    #[arg(short, long, global = true)]
    pub jobs: Option<usize>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check markdown files for common authoring problems.
    Check(CheckArgs),
    /// Replay a recorded diagnostic log.
    Replay(ReplayArgs),
}

/// Arguments for the `quire check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Markdown files to check.
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,
}

/// Arguments for the `quire replay` subcommand.
#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// A diagnostic log with one JSON record per line.
    pub input: PathBuf,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

impl From<ColorChoice> for quire_config::ColorChoice {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => quire_config::ColorChoice::Auto,
            ColorChoice::Always => quire_config::ColorChoice::Always,
            ColorChoice::Never => quire_config::ColorChoice::Never,
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress status output.
    pub quiet: bool,
    /// Color override from the command line.
    pub color: Option<ColorChoice>,
    /// Optional path to a custom config file.
    pub config: Option<PathBuf>,
    /// Durable log override from the command line.
    pub log: Option<PathBuf>,
    /// Worker count override from the command line.
    pub jobs: Option<usize>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let global = GlobalArgs {
        quiet: cli.quiet,
        color: cli.color,
        config: cli.config,
        log: cli.log,
        jobs: cli.jobs,
    };

    let result = match cli.command {
        Command::Check(ref args) => check::run(args, &global),
        Command::Replay(ref args) => replay::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs a stderr tracing subscriber when `--verbose` or `RUST_LOG` asks for one.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        return;
    };
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_check() {
        let cli = Cli::parse_from(["quire", "check", "a.md", "b.md"]);
        match cli.command {
            Command::Check(args) => {
                assert_eq!(args.files, vec![PathBuf::from("a.md"), PathBuf::from("b.md")]);
            }
            _ => panic!("expected Check command"),
        }
        assert!(cli.color.is_none());
        assert!(cli.log.is_none());
    }

    #[test]
    fn check_requires_files() {
        assert!(Cli::try_parse_from(["quire", "check"]).is_err());
    }

    #[test]
    fn parse_replay_with_globals() {
        let cli = Cli::parse_from([
            "quire",
            "replay",
            "obj/build.log",
            "--log",
            "out/replayed.log",
            "--color",
            "never",
            "-j",
            "3",
            "--quiet",
        ]);
        match cli.command {
            Command::Replay(args) => assert_eq!(args.input, PathBuf::from("obj/build.log")),
            _ => panic!("expected Replay command"),
        }
        assert_eq!(cli.log, Some(PathBuf::from("out/replayed.log")));
        assert_eq!(cli.color, Some(ColorChoice::Never));
        assert_eq!(cli.jobs, Some(3));
        assert!(cli.quiet);
    }

    #[test]
    fn color_choice_maps_to_config() {
        assert_eq!(
            quire_config::ColorChoice::from(ColorChoice::Always),
            quire_config::ColorChoice::Always
        );
    }
}
