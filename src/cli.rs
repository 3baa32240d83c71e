// src/cli.rs

//! CLI argument parsing using `clap`.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::duration::parse_duration;
use crate::config::model::{
    DEFAULT_DEBOUNCE, DEFAULT_EXCLUDE_DIR, DEFAULT_EXCLUDE_FILE, DEFAULT_INCLUDE_FILE,
};

/// Command-line arguments for `inl`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "inl",
    version,
    about = "Re-run a shell command whenever files under the current directory change.",
    override_usage = "inl [OPTIONS] SHELL-COMMAND...",
    long_about = None
)]
pub struct CliArgs {
    /// Verbose logging (shorthand for `--log-level debug`).
    #[arg(short, long)]
    pub verbose: bool,

    /// Regular expression of directory basenames to exclude from watching.
    ///
    /// Matching directories are pruned: nothing below them is watched.
    #[arg(long = "ed", alias = "exclude-dir", value_name = "REGEX", default_value = DEFAULT_EXCLUDE_DIR)]
    pub exclude_dir: String,

    /// Regular expression of file paths to ignore when watching.
    #[arg(short = 'e', long = "exclude", value_name = "REGEX", default_value = DEFAULT_EXCLUDE_FILE)]
    pub exclude_file: String,

    /// Regular expression of file paths to include when watching.
    #[arg(short = 'i', long = "include", value_name = "REGEX", default_value = DEFAULT_INCLUDE_FILE)]
    pub include_file: String,

    /// Quiet period after the last change before the command is triggered.
    #[arg(
        short = 't',
        long = "debounce",
        value_name = "DURATION",
        default_value = DEFAULT_DEBOUNCE,
        value_parser = parse_duration
    )]
    pub debounce: Duration,

    /// Do not wait for the command to finish; kill it on the next change.
    #[arg(short = 'n', long)]
    pub no_wait: bool,

    /// Directory to watch.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: String,

    /// Shell used to interpret the command.
    #[arg(long, value_name = "PROG", default_value = default_shell())]
    pub shell: String,

    /// Wait for the first change instead of running the command at startup.
    #[arg(long)]
    pub postpone: bool,

    /// Clear the terminal before each run.
    #[arg(long)]
    pub clear: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `--verbose`, `INL_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the resolved configuration and watch set, run nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// The command to run. All remaining arguments are joined with spaces.
    #[arg(
        value_name = "SHELL-COMMAND",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn default_shell() -> &'static str {
    if cfg!(windows) { "cmd" } else { "sh" }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
