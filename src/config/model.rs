// src/config/model.rs

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;
use tokio::process::Command;

use crate::types::WaitMode;

pub const DEFAULT_EXCLUDE_DIR: &str = r"^\.";
pub const DEFAULT_EXCLUDE_FILE: &str = r"(^.*\.sw[px]$)|(/4913$)";
pub const DEFAULT_INCLUDE_FILE: &str = ".*";
pub const DEFAULT_DEBOUNCE: &str = "100ms";

/// Configuration as typed by the user, before any validation.
///
/// Patterns are kept as strings here; [`Config::try_from`] compiles them.
#[derive(Debug, Clone)]
pub struct RawConfig {
    pub root: PathBuf,
    pub exclude_dir: String,
    pub exclude_file: String,
    pub include_file: String,
    pub debounce: Duration,
    pub wait_mode: WaitMode,
    pub shell: String,
    pub command: Vec<String>,
    pub postpone: bool,
    pub clear: bool,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            exclude_dir: DEFAULT_EXCLUDE_DIR.to_string(),
            exclude_file: DEFAULT_EXCLUDE_FILE.to_string(),
            include_file: DEFAULT_INCLUDE_FILE.to_string(),
            debounce: Duration::from_millis(100),
            wait_mode: WaitMode::Wait,
            shell: if cfg!(windows) { "cmd" } else { "sh" }.to_string(),
            command: Vec::new(),
            postpone: false,
            clear: false,
        }
    }
}

/// Compiled path patterns.
///
/// - `exclude_dir` is matched against directory *base names* during the walk.
/// - `exclude_file` / `include_file` are matched against full event paths.
#[derive(Debug, Clone)]
pub struct Patterns {
    pub exclude_dir: Regex,
    pub exclude_file: Regex,
    pub include_file: Regex,
}

/// A command line handed to a shell interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    shell: String,
    line: String,
}

impl ShellCommand {
    pub fn new(shell: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            line: line.into(),
        }
    }

    /// Join CLI arguments with single spaces, the way a user typed them.
    pub fn from_args(shell: impl Into<String>, args: &[String]) -> Self {
        Self::new(shell, args.join(" "))
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    /// Flag that tells the shell to read the command from its next argument.
    fn command_flag(&self) -> &'static str {
        let program = std::path::Path::new(&self.shell)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        if program.eq_ignore_ascii_case("cmd") {
            "/C"
        } else {
            "-c"
        }
    }

    /// Argument vector, e.g. `["sh", "-c", "make test"]`.
    pub fn argv(&self) -> Vec<&str> {
        vec![self.shell.as_str(), self.command_flag(), self.line.as_str()]
    }

    /// Build a process command. stdio is inherited from `inl`.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.shell);
        cmd.arg(self.command_flag()).arg(&self.line);
        cmd
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.argv())
    }
}

/// Validated, immutable configuration for one `inl` process.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute path of the watched root.
    pub root: PathBuf,
    pub patterns: Patterns,
    pub debounce: Duration,
    pub wait_mode: WaitMode,
    pub command: ShellCommand,
    pub postpone: bool,
    pub clear: bool,
}

impl Config {
    pub(crate) fn new_unchecked(
        root: PathBuf,
        patterns: Patterns,
        raw: &RawConfig,
    ) -> Self {
        Self {
            root,
            patterns,
            debounce: raw.debounce,
            wait_mode: raw.wait_mode,
            command: ShellCommand::from_args(raw.shell.clone(), &raw.command),
            postpone: raw.postpone,
            clear: raw.clear,
        }
    }
}
