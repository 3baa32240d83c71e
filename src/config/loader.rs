// src/config/loader.rs

use std::path::PathBuf;

use crate::cli::CliArgs;
use crate::config::model::{Config, RawConfig};
use crate::errors::Result;
use crate::types::WaitMode;

/// Map parsed CLI arguments onto a [`RawConfig`].
///
/// This performs no validation; see [`load_from_args`].
pub fn raw_from_args(args: &CliArgs) -> RawConfig {
    RawConfig {
        root: PathBuf::from(&args.root),
        exclude_dir: args.exclude_dir.clone(),
        exclude_file: args.exclude_file.clone(),
        include_file: args.include_file.clone(),
        debounce: args.debounce,
        wait_mode: WaitMode::from_no_wait(args.no_wait),
        shell: args.shell.clone(),
        command: args.command.clone(),
        postpone: args.postpone,
        clear: args.clear,
    }
}

/// Build and validate the run configuration from CLI arguments.
///
/// Every pattern is compiled here, before any watch is established.
pub fn load_from_args(args: &CliArgs) -> Result<Config> {
    Config::try_from(raw_from_args(args))
}
