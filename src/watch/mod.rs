// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Walking the root and registering a watch per non-excluded directory
//!   ([`tree`]).
//! - Dropping events by path pattern ([`filter`]).
//! - Coalescing bursts of events into a single [`Trigger`] ([`debounce`],
//!   [`stream`]).
//! - Tying those together over a live `notify` watcher ([`session`]).
//!
//! It does **not** know about processes; it only turns filesystem changes into
//! triggers.

pub mod debounce;
pub mod event;
pub mod filter;
pub mod session;
pub mod stream;
pub mod tree;

pub use event::{ChangeKind, RawEvent, Trigger};
pub use filter::{EventFilter, Verdict};
pub use session::{NotifyWatchBackend, WatchSession};
pub use stream::TriggerStream;
pub use tree::{build_watch_set, CollectingRegistrar, WatchRegistrar, WatchSet};

use crate::errors::Result;
use crate::types::BoxFuture;

/// A live set of watches that can be awaited for the next trigger.
///
/// Dropping it releases the watches.
pub trait TriggerSource: Send {
    fn next_trigger(&mut self) -> BoxFuture<'_, Result<Trigger>>;

    /// Directories this session watches.
    fn watch_set(&self) -> &WatchSet;

    /// Collect changes that are queued but not yet turned into a trigger.
    ///
    /// Called right before the session is dropped.
    fn flush(&mut self) -> Result<Option<Trigger>>;
}

/// Trait abstracting how watch sessions are created.
///
/// Production code uses [`NotifyWatchBackend`]; tests can hand out scripted
/// sessions that yield prepared triggers.
pub trait WatchBackend: Send {
    type Session: TriggerSource;

    /// Build a fresh watch set for one cycle.
    fn establish(&mut self) -> Result<Self::Session>;
}
