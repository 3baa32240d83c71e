// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`invocation`] describes one run of the command and how it ended.
//! - [`supervisor`] spawns the shell command with inherited stdio, waits for
//!   it (wait mode) or keeps it running (no-wait mode), and kills it on
//!   demand.
//! - [`backend`] provides the `ExecutorBackend` trait the runtime uses, which
//!   tests can replace with a fake implementation.

pub mod backend;
pub mod invocation;
pub mod supervisor;

pub use backend::ExecutorBackend;
pub use invocation::{ExitOutcome, Invocation, InvocationStatus};
pub use supervisor::{InvocationState, Supervisor};
