use std::future::Future;
use std::pin::Pin;

/// Boxed, sendable future returned by the backend traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// How the supervisor treats a running invocation.
///
/// - `Wait`: `start` blocks until the command exits. Changes that happen while
///   it runs are only noticed afterwards.
/// - `NoWait`: `start` returns immediately; the next trigger kills the
///   previous run (if still alive) before starting a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitMode {
    #[default]
    Wait,
    NoWait,
}

impl WaitMode {
    pub fn from_no_wait(no_wait: bool) -> Self {
        if no_wait {
            WaitMode::NoWait
        } else {
            WaitMode::Wait
        }
    }

    pub fn waits(self) -> bool {
        matches!(self, WaitMode::Wait)
    }
}
