// src/exec/invocation.rs

use std::fmt;
use std::process::ExitStatus;

use tokio::process::Child;
use tokio::time::Instant;

use crate::config::ShellCommand;

/// How a finished child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Success,
    Failed(i32),
    /// Terminated by a signal (unix only).
    Signaled(i32),
    Unknown,
}

impl ExitOutcome {
    pub fn from_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(0) => ExitOutcome::Success,
            Some(code) => ExitOutcome::Failed(code),
            None => signal_of(status).map_or(ExitOutcome::Unknown, ExitOutcome::Signaled),
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitOutcome::Success)
    }
}

#[cfg(unix)]
fn signal_of(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn signal_of(_status: ExitStatus) -> Option<i32> {
    None
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitOutcome::Success => f.write_str("exit status 0"),
            ExitOutcome::Failed(code) => write!(f, "exit status {code}"),
            ExitOutcome::Signaled(sig) => write!(f, "signal {sig}"),
            ExitOutcome::Unknown => f.write_str("unknown exit status"),
        }
    }
}

/// Lifecycle state of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationStatus {
    Running,
    Completed(ExitOutcome),
    Killed,
}

/// One run of the user's command.
///
/// `child` is `Some` only while the process may still be running; it is
/// cleared as soon as the exit status is collected.
#[derive(Debug)]
pub struct Invocation {
    pub id: u64,
    pub command: ShellCommand,
    pub started_at: Instant,
    pub(crate) child: Option<Child>,
    pub status: InvocationStatus,
}

impl Invocation {
    pub(crate) fn new(id: u64, command: ShellCommand, child: Child) -> Self {
        Self {
            id,
            command,
            started_at: Instant::now(),
            child: Some(child),
            status: InvocationStatus::Running,
        }
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(|c| c.id())
    }

    pub fn is_live(&self) -> bool {
        self.child.is_some()
    }
}
