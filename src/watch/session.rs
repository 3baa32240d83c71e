// src/watch/session.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, RecommendedWatcher, Watcher};
use regex::Regex;
use tokio::sync::mpsc;

use crate::config::Config as RunConfig;
use crate::errors::{InlError, Result};
use crate::fs::FileSystem;
use crate::types::BoxFuture;

use super::event::Trigger;
use super::filter::EventFilter;
use super::stream::{NotifyMessage, TriggerStream};
use super::tree::{build_watch_set, WatchSet};
use super::{TriggerSource, WatchBackend};

/// One cycle's worth of watches.
///
/// Dropping the session drops the `RecommendedWatcher`, which releases every
/// OS watch descriptor it holds.
pub struct WatchSession {
    _watcher: RecommendedWatcher,
    set: WatchSet,
    stream: TriggerStream,
}

impl std::fmt::Debug for WatchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchSession")
            .field("watched", &self.set.watched.len())
            .field("skipped", &self.set.skipped.len())
            .finish_non_exhaustive()
    }
}

impl TriggerSource for WatchSession {
    fn next_trigger(&mut self) -> BoxFuture<'_, Result<Trigger>> {
        Box::pin(self.stream.next_trigger())
    }

    fn watch_set(&self) -> &WatchSet {
        &self.set
    }

    fn flush(&mut self) -> Result<Option<Trigger>> {
        self.stream.flush()
    }
}

/// Production watch backend built on `notify`.
///
/// Every call to [`WatchBackend::establish`] walks the tree again, so
/// directories created or removed since the last cycle are picked up without
/// any incremental bookkeeping.
#[derive(Debug)]
pub struct NotifyWatchBackend {
    root: PathBuf,
    exclude_dir: Regex,
    filter: EventFilter,
    debounce: Duration,
    fs: Arc<dyn FileSystem>,
}

impl NotifyWatchBackend {
    pub fn new(cfg: &RunConfig, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            root: cfg.root.clone(),
            exclude_dir: cfg.patterns.exclude_dir.clone(),
            filter: EventFilter::from_patterns(&cfg.patterns),
            debounce: cfg.debounce,
            fs,
        }
    }

    /// Walk the tree and start watching it.
    pub fn open_session(&self) -> Result<WatchSession> {
        // Channel from the blocking notify callback into the async world.
        let (event_tx, event_rx) = mpsc::unbounded_channel::<NotifyMessage>();

        let mut watcher = RecommendedWatcher::new(
            move |res: NotifyMessage| {
                // The receiver is gone once the session is dropped; late
                // events are simply discarded.
                let _ = event_tx.send(res);
            },
            Config::default(),
        )
        .map_err(|source| InlError::WatchError {
            path: self.root.clone(),
            source,
        })?;

        let set = build_watch_set(&*self.fs, &self.root, &self.exclude_dir, &mut watcher)?;

        Ok(WatchSession {
            _watcher: watcher,
            set,
            stream: TriggerStream::new(event_rx, self.filter.clone(), self.debounce),
        })
    }
}

impl WatchBackend for NotifyWatchBackend {
    type Session = WatchSession;

    fn establish(&mut self) -> Result<WatchSession> {
        self.open_session()
    }
}
