use std::sync::{Arc, Mutex};

use inl::errors::Result;
use inl::exec::{ExecutorBackend, ExitOutcome, InvocationState};
use inl::types::{BoxFuture, WaitMode};

/// What the runtime asked the fake executor to do, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecCall {
    Start(u64),
    /// `stop` while run `n` was live.
    Kill(u64),
    /// `stop` with nothing running.
    StopIdle,
}

/// A fake executor that records calls instead of spawning processes.
///
/// - In wait mode every start "finishes" immediately with success.
/// - In no-wait mode a start stays live until `stop`, or until the test calls
///   [`FakeExecutorHandle::finish_current`].
pub struct FakeExecutor {
    mode: WaitMode,
    state: Arc<Mutex<FakeState>>,
    exited: tokio::sync::mpsc::UnboundedReceiver<ExitOutcome>,
}

#[derive(Debug, Default)]
struct FakeState {
    calls: Vec<ExecCall>,
    live: Option<u64>,
    runs: u64,
}

/// Test-side view of a [`FakeExecutor`].
#[derive(Clone)]
pub struct FakeExecutorHandle {
    state: Arc<Mutex<FakeState>>,
    exit_tx: tokio::sync::mpsc::UnboundedSender<ExitOutcome>,
}

impl FakeExecutor {
    pub fn new(mode: WaitMode) -> (Self, FakeExecutorHandle) {
        let state = Arc::new(Mutex::new(FakeState::default()));
        let (exit_tx, exited) = tokio::sync::mpsc::unbounded_channel();
        (
            Self {
                mode,
                state: Arc::clone(&state),
                exited,
            },
            FakeExecutorHandle { state, exit_tx },
        )
    }
}

impl FakeExecutorHandle {
    pub fn calls(&self) -> Vec<ExecCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn starts(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ExecCall::Start(_)))
            .count()
    }

    /// Whether a no-wait run is currently alive.
    pub fn is_live(&self) -> bool {
        self.state.lock().unwrap().live.is_some()
    }

    /// Make the live run exit on its own with `outcome`.
    pub fn finish_current(&self, outcome: ExitOutcome) {
        let _ = self.exit_tx.send(outcome);
    }
}

impl ExecutorBackend for FakeExecutor {
    fn start(&mut self) -> BoxFuture<'_, Result<InvocationState>> {
        let state = Arc::clone(&self.state);
        let mode = self.mode;
        Box::pin(async move {
            let mut guard = state.lock().unwrap();
            assert!(guard.live.is_none(), "start while a run is live");
            guard.runs += 1;
            let id = guard.runs;
            guard.calls.push(ExecCall::Start(id));
            if mode.waits() {
                Ok(InvocationState::Finished(ExitOutcome::Success))
            } else {
                guard.live = Some(id);
                Ok(InvocationState::Running)
            }
        })
    }

    fn stop(&mut self) -> BoxFuture<'_, Result<()>> {
        let state = Arc::clone(&self.state);
        Box::pin(async move {
            let mut guard = state.lock().unwrap();
            let call = match guard.live.take() {
                Some(id) => ExecCall::Kill(id),
                None => ExecCall::StopIdle,
            };
            guard.calls.push(call);
            Ok(())
        })
    }

    fn wait_exit(&mut self) -> BoxFuture<'_, Result<ExitOutcome>> {
        Box::pin(async move {
            match self.exited.recv().await {
                Some(outcome) => {
                    self.state.lock().unwrap().live = None;
                    Ok(outcome)
                }
                None => std::future::pending().await,
            }
        })
    }

    fn is_live(&self) -> bool {
        self.state.lock().unwrap().live.is_some()
    }
}
