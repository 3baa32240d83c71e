// src/watch/stream.rs

//! Filtered, debounced stream of triggers over a raw notify channel.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};

use crate::errors::{InlError, Result};

use super::debounce::Debouncer;
use super::event::{ChangeKind, RawEvent, Trigger};
use super::filter::{EventFilter, Verdict};

/// What the notify callback forwards: an event or a delivery error.
pub type NotifyMessage = notify::Result<notify::Event>;

/// Consumes raw notify messages and yields one [`Trigger`] per quiet period.
#[derive(Debug)]
pub struct TriggerStream {
    rx: mpsc::UnboundedReceiver<NotifyMessage>,
    filter: EventFilter,
    debouncer: Debouncer,
}

impl TriggerStream {
    pub fn new(
        rx: mpsc::UnboundedReceiver<NotifyMessage>,
        filter: EventFilter,
        debounce: Duration,
    ) -> Self {
        Self {
            rx,
            filter,
            debouncer: Debouncer::new(debounce),
        }
    }

    /// Block until a burst of qualifying events has settled.
    ///
    /// An expired deadline is checked before the channel, so an event that
    /// arrives a full interval after the previous one opens a new burst.
    ///
    /// Returns an error if the watcher reports a delivery error or its
    /// channel closes; both are fatal.
    pub async fn next_trigger(&mut self) -> Result<Trigger> {
        loop {
            let wake_at = self.debouncer.wake_at(Instant::now());

            tokio::select! {
                biased;

                _ = sleep_until(wake_at) => {
                    if let Some(trigger) = self.debouncer.fire(Instant::now()) {
                        return Ok(trigger);
                    }
                }

                msg = self.rx.recv() => match msg {
                    Some(Ok(event)) => self.absorb(event),
                    Some(Err(err)) => return Err(InlError::WatchDelivery(err)),
                    None => return Err(InlError::WatchClosed),
                },
            }
        }
    }

    /// Absorb everything already queued, without waiting, and return the
    /// pending burst (if any) regardless of its deadline.
    ///
    /// Used when a session is torn down so that changes seen while a
    /// wait-mode command ran are not lost.
    pub fn flush(&mut self) -> Result<Option<Trigger>> {
        loop {
            match self.rx.try_recv() {
                Ok(Ok(event)) => self.absorb(event),
                Ok(Err(err)) => return Err(InlError::WatchDelivery(err)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        Ok(self.debouncer.take())
    }

    fn absorb(&mut self, event: notify::Event) {
        let now = Instant::now();
        if ChangeKind::from_notify(&event.kind).is_none() {
            trace!(kind = ?event.kind, paths = ?event.paths, "ignoring access notification");
            return;
        }
        for raw in RawEvent::from_notify(event, now) {
            match self.filter.check(&raw.path) {
                Verdict::Accept => {
                    let path = raw.path.clone();
                    self.debouncer.record(raw, now);
                    debug!(
                        ?path,
                        burst = self.debouncer.pending(),
                        "qualifying event; debounce timer reset"
                    );
                }
                verdict => {
                    debug!(path = ?raw.path, kind = %raw.kind, ?verdict, "ignoring event");
                }
            }
        }
    }
}
