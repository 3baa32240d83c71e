// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The runtime talks to an `ExecutorBackend` instead of a concrete process
//! supervisor. Production uses [`Supervisor`]; tests swap in a fake that
//! records start/stop calls without spawning anything.

use crate::errors::Result;
use crate::types::BoxFuture;

use super::invocation::ExitOutcome;
use super::supervisor::{InvocationState, Supervisor};

/// Trait abstracting how the user's command is run.
pub trait ExecutorBackend: Send {
    /// Start a new invocation. Must not be called while one is live.
    fn start(&mut self) -> BoxFuture<'_, Result<InvocationState>>;

    /// Terminate the live invocation (if any) and wait until it is gone.
    fn stop(&mut self) -> BoxFuture<'_, Result<()>>;

    /// Resolve when the live invocation exits on its own.
    ///
    /// Implementations return a future that never resolves when nothing is
    /// running; callers should only poll it while [`is_live`](Self::is_live).
    fn wait_exit(&mut self) -> BoxFuture<'_, Result<ExitOutcome>>;

    fn is_live(&self) -> bool;
}

impl ExecutorBackend for Supervisor {
    fn start(&mut self) -> BoxFuture<'_, Result<InvocationState>> {
        Box::pin(self.spawn_invocation())
    }

    fn stop(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(self.kill_invocation())
    }

    fn wait_exit(&mut self) -> BoxFuture<'_, Result<ExitOutcome>> {
        Box::pin(self.reap_invocation())
    }

    fn is_live(&self) -> bool {
        Supervisor::is_live(self)
    }
}
