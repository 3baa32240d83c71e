// src/watch/event.rs

//! Raw filesystem events and the debounced [`Trigger`] built from them.

use std::fmt;
use std::path::PathBuf;

use notify::event::{AccessKind, AccessMode, EventKind, ModifyKind};
use tokio::time::Instant;

/// Coarse classification of a filesystem notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Create,
    Write,
    Remove,
    Rename,
    Chmod,
    Other,
}

impl ChangeKind {
    /// `None` for notifications that do not change anything on disk.
    ///
    /// Opens and read-only closes are reported by inotify for every
    /// `read_dir` of a watched directory, including the walk itself. A close
    /// after writing is the end of a write and counts as one.
    pub fn from_notify(kind: &EventKind) -> Option<Self> {
        let kind = match kind {
            EventKind::Create(_) => ChangeKind::Create,
            EventKind::Remove(_) => ChangeKind::Remove,
            EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Rename,
            EventKind::Modify(ModifyKind::Metadata(_)) => ChangeKind::Chmod,
            EventKind::Modify(_) => ChangeKind::Write,
            EventKind::Access(AccessKind::Close(AccessMode::Write)) => ChangeKind::Write,
            EventKind::Access(_) => return None,
            EventKind::Any | EventKind::Other => ChangeKind::Other,
        };
        Some(kind)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeKind::Create => "create",
            ChangeKind::Write => "write",
            ChangeKind::Remove => "remove",
            ChangeKind::Rename => "rename",
            ChangeKind::Chmod => "chmod",
            ChangeKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// One observed change to one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
    pub at: Instant,
}

impl RawEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind, at: Instant) -> Self {
        Self {
            path: path.into(),
            kind,
            at,
        }
    }

    /// Split a notify event into one `RawEvent` per path.
    ///
    /// A rename may carry both the old and the new path; each is filtered and
    /// counted on its own. Access-only notifications yield nothing.
    pub fn from_notify(event: notify::Event, at: Instant) -> Vec<RawEvent> {
        let Some(kind) = ChangeKind::from_notify(&event.kind) else {
            return Vec::new();
        };
        event
            .paths
            .into_iter()
            .map(|path| RawEvent { path, kind, at })
            .collect()
    }
}

/// The debounced result of a burst of qualifying events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    /// First qualifying event of the burst.
    pub first: RawEvent,
    /// Number of qualifying events absorbed, including `first`.
    pub count: usize,
}

impl Trigger {
    pub fn new(first: RawEvent, count: usize) -> Self {
        Self { first, count }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.first.kind, self.first.path)?;
        if self.count > 1 {
            write!(f, " (+{} more)", self.count - 1)?;
        }
        Ok(())
    }
}
