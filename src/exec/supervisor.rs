// src/exec/supervisor.rs

//! Owns the child process of the current invocation.

use std::io;
use std::process::ExitStatus;

use tokio::process::Child;
use tracing::{debug, error, info, warn};

use crate::config::ShellCommand;
use crate::errors::{InlError, Result};
use crate::types::WaitMode;

use super::invocation::{ExitOutcome, Invocation, InvocationStatus};

/// Result of starting an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    /// no-wait mode: the process is still running.
    Running,
    /// wait mode: the process already exited.
    Finished(ExitOutcome),
}

/// Spawns the shell command and tracks at most one live child.
///
/// In [`WaitMode::Wait`] `spawn_invocation` only returns once the child has
/// exited. In [`WaitMode::NoWait`] it returns immediately and the child must be
/// stopped with `kill_invocation` before the next start.
#[derive(Debug)]
pub struct Supervisor {
    command: ShellCommand,
    mode: WaitMode,
    current: Option<Invocation>,
    next_id: u64,
}

impl Supervisor {
    pub fn new(command: ShellCommand, mode: WaitMode) -> Self {
        Self {
            command,
            mode,
            current: None,
            next_id: 1,
        }
    }

    pub fn mode(&self) -> WaitMode {
        self.mode
    }

    /// Most recent invocation, live or finished.
    pub fn current(&self) -> Option<&Invocation> {
        self.current.as_ref()
    }

    pub fn is_live(&self) -> bool {
        self.current.as_ref().is_some_and(Invocation::is_live)
    }

    pub async fn spawn_invocation(&mut self) -> Result<InvocationState> {
        if self.is_live() {
            return Err(InlError::InvalidTransition(
                "start requested while the previous invocation is still running".to_string(),
            ));
        }

        let id = self.next_id;
        self.next_id += 1;

        info!(run = id, command = %self.command, "executing command");

        let child = {
            let mut cmd = self.command.to_command();
            cmd.kill_on_drop(true);
            // A no-wait run is killed as a group so that commands started by
            // the shell die with it. Wait-mode runs stay in the foreground
            // group and receive the terminal's Ctrl-C.
            #[cfg(unix)]
            if !self.mode.waits() {
                cmd.process_group(0);
            }
            cmd.spawn().map_err(|source| InlError::SpawnError {
                command: self.command.to_string(),
                source,
            })?
        };
        debug!(run = id, pid = ?child.id(), "process spawned");

        self.current = Some(Invocation::new(id, self.command.clone(), child));

        if !self.mode.waits() {
            return Ok(InvocationState::Running);
        }

        let outcome = self.reap_invocation().await?;
        Ok(InvocationState::Finished(outcome))
    }

    /// Wait for the live child to exit on its own and record its status.
    ///
    /// Never resolves when nothing is running.
    pub async fn reap_invocation(&mut self) -> Result<ExitOutcome> {
        let status = match self.current.as_mut().and_then(|inv| inv.child.as_mut()) {
            Some(child) => child.wait().await?,
            None => return std::future::pending().await,
        };
        Ok(self.record_exit(status))
    }

    /// Kill the live child (if any) and wait for it to be gone.
    ///
    /// A child that already exited is only reaped, never signalled.
    pub async fn kill_invocation(&mut self) -> Result<()> {
        let Some(inv) = self.current.as_mut() else {
            return Ok(());
        };
        let Some(child) = inv.child.as_mut() else {
            debug!(run = inv.id, "previous invocation already finished; nothing to stop");
            return Ok(());
        };

        if let Some(status) = child.try_wait()? {
            self.record_exit(status);
            return Ok(());
        }

        warn!(run = inv.id, pid = ?child.id(), "killing process");
        terminate(child, !self.mode.waits()).await?;
        inv.child = None;
        inv.status = InvocationStatus::Killed;
        info!(
            run = inv.id,
            elapsed = ?inv.started_at.elapsed(),
            "process killed"
        );
        Ok(())
    }

    fn record_exit(&mut self, status: ExitStatus) -> ExitOutcome {
        let outcome = ExitOutcome::from_status(status);
        if let Some(inv) = self.current.as_mut() {
            inv.child = None;
            inv.status = InvocationStatus::Completed(outcome);
            let elapsed = inv.started_at.elapsed();
            if outcome.is_success() {
                info!(run = inv.id, ?elapsed, status = %outcome, "command finished");
            } else {
                error!(run = inv.id, ?elapsed, status = %outcome, "command failed");
            }
        }
        outcome
    }
}

/// Kill `child` (and its process group when it leads one) and reap it.
#[cfg(unix)]
async fn terminate(child: &mut Child, own_group: bool) -> io::Result<()> {
    match child.id() {
        Some(pid) if own_group => {
            kill_group(pid)?;
            child.wait().await?;
            Ok(())
        }
        _ => child.kill().await,
    }
}

#[cfg(not(unix))]
async fn terminate(child: &mut Child, _own_group: bool) -> io::Result<()> {
    child.kill().await
}

/// SIGKILL every process in the group led by `pid`.
#[cfg(unix)]
fn kill_group(pid: u32) -> io::Result<()> {
    let pgid = libc::pid_t::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
    // SAFETY: killpg has no memory-safety preconditions.
    if unsafe { libc::killpg(pgid, libc::SIGKILL) } == 0 {
        return Ok(());
    }
    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        // The group is already empty; the leader only needs reaping.
        return Ok(());
    }
    Err(err)
}
