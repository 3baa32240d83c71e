use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::time::Instant;

use inl::errors::{InlError, Result};
use inl::types::BoxFuture;
use inl::watch::{ChangeKind, RawEvent, Trigger, TriggerSource, WatchBackend, WatchSet};

/// Watch backend whose sessions yield triggers pushed by the test.
///
/// Counts how many sessions were established and how many were dropped, so
/// tests can check that watches are released every cycle.
pub struct ScriptedWatchBackend {
    rx: Arc<Mutex<mpsc::UnboundedReceiver<Result<Trigger>>>>,
    counters: Arc<SessionCounters>,
}

#[derive(Debug, Default)]
pub struct SessionCounters {
    established: AtomicUsize,
    released: AtomicUsize,
}

impl SessionCounters {
    pub fn established(&self) -> usize {
        self.established.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Sessions currently holding watches.
    pub fn open(&self) -> usize {
        self.established() - self.released()
    }
}

/// Test-side handle used to feed triggers.
#[derive(Clone)]
pub struct TriggerFeed {
    tx: mpsc::UnboundedSender<Result<Trigger>>,
}

impl TriggerFeed {
    pub fn change(&self, path: &str) {
        let event = RawEvent::new(PathBuf::from(path), ChangeKind::Write, Instant::now());
        let _ = self.tx.send(Ok(Trigger::new(event, 1)));
    }

    pub fn fail(&self, err: InlError) {
        let _ = self.tx.send(Err(err));
    }
}

impl ScriptedWatchBackend {
    pub fn new() -> (Self, TriggerFeed, Arc<SessionCounters>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let counters = Arc::new(SessionCounters::default());
        (
            Self {
                rx: Arc::new(Mutex::new(rx)),
                counters: Arc::clone(&counters),
            },
            TriggerFeed { tx },
            counters,
        )
    }
}

pub struct ScriptedSession {
    rx: Arc<Mutex<mpsc::UnboundedReceiver<Result<Trigger>>>>,
    counters: Arc<SessionCounters>,
    set: WatchSet,
}

impl Drop for ScriptedSession {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

impl TriggerSource for ScriptedSession {
    fn next_trigger(&mut self) -> BoxFuture<'_, Result<Trigger>> {
        Box::pin(async move {
            let mut rx = self.rx.lock().await;
            match rx.recv().await {
                Some(item) => item,
                // Feed dropped: behave like a quiet tree.
                None => std::future::pending().await,
            }
        })
    }

    fn watch_set(&self) -> &WatchSet {
        &self.set
    }

    // Fed triggers stay in the shared channel, so the next session sees them.
    fn flush(&mut self) -> Result<Option<Trigger>> {
        Ok(None)
    }
}

impl WatchBackend for ScriptedWatchBackend {
    type Session = ScriptedSession;

    fn establish(&mut self) -> Result<ScriptedSession> {
        self.counters.established.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedSession {
            rx: Arc::clone(&self.rx),
            counters: Arc::clone(&self.counters),
            set: WatchSet {
                watched: vec![PathBuf::from("/scripted")],
                skipped: Vec::new(),
            },
        })
    }
}
