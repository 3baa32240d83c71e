// src/engine/mod.rs

//! Orchestration engine for inl.
//!
//! One cycle is: build watches, wait for a trigger, stop the previous run if
//! it is still alive, start a new run, release the watches, repeat. Changes
//! that were queued on the released watches are carried into the next cycle.
//!
//! The pure state machine lives in [`core`]; the async/IO shell that talks to
//! the watch and executor backends is implemented in [`runtime`].

use crate::exec::ExitOutcome;
use crate::watch::Trigger;

/// Orchestrator phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    BuildingWatches,
    AwaitingTrigger,
    StoppingPrevious,
    StartingNew,
    ShuttingDown,
    Stopped,
}

/// Outcomes reported by the IO shell back into the core.
#[derive(Debug, Clone)]
pub enum CoreEvent {
    /// A fresh watch set is in place.
    WatchesReady { watched: usize, skipped: usize },
    /// The debouncer produced a trigger.
    Triggered(Trigger),
    /// A no-wait invocation exited on its own while we were waiting.
    InvocationExited(ExitOutcome),
    /// The previous invocation has been killed (or reaped) and is gone.
    PreviousStopped,
    /// A new invocation was started; `live` is false when it already finished.
    Started { live: bool },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Actions the core asks the IO shell to perform, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreCommand {
    BuildWatches,
    AwaitTrigger,
    ReleaseWatches,
    StopPrevious,
    StartInvocation,
}

pub mod core;
pub mod runtime;

pub use self::core::{CoreLoop, CoreStep};
pub use runtime::Runtime;
