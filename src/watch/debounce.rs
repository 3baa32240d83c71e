// src/watch/debounce.rs

//! Timer-reset debouncing as a plain state machine.
//!
//! The [`Debouncer`] owns no timers and does no IO. The caller feeds it
//! qualifying events with the time they were observed, asks for the current
//! deadline, and calls [`Debouncer::fire`] once that deadline has passed.
//! [`super::stream::TriggerStream`] drives it from a `tokio::select!`.

use std::time::Duration;

use tokio::time::Instant;

use super::event::{RawEvent, Trigger};

/// How long to sleep when no burst is in progress.
///
/// Waking up from this wait emits nothing; it only re-arms itself.
pub const IDLE_WAIT: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
struct Burst {
    first: RawEvent,
    count: usize,
    deadline: Instant,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    interval: Duration,
    burst: Option<Burst>,
}

impl Debouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            burst: None,
        }
    }

    /// Record a qualifying event observed at `now`.
    ///
    /// The first event of a burst becomes the representative; every event
    /// pushes the deadline out to `now + interval`.
    pub fn record(&mut self, event: RawEvent, now: Instant) {
        let deadline = now + self.interval;
        match &mut self.burst {
            Some(burst) => {
                burst.count += 1;
                burst.deadline = deadline;
            }
            None => {
                self.burst = Some(Burst {
                    first: event,
                    count: 1,
                    deadline,
                });
            }
        }
    }

    /// Deadline of the current burst, `None` when idle.
    pub fn deadline(&self) -> Option<Instant> {
        self.burst.as_ref().map(|b| b.deadline)
    }

    /// When the caller should next wake up: the burst deadline, or
    /// [`IDLE_WAIT`] from `now` when nothing is pending.
    pub fn wake_at(&self, now: Instant) -> Instant {
        self.deadline().unwrap_or(now + IDLE_WAIT)
    }

    /// Number of events absorbed by the current burst.
    pub fn pending(&self) -> usize {
        self.burst.as_ref().map_or(0, |b| b.count)
    }

    /// Emit whatever burst is pending, without waiting for its deadline.
    pub fn take(&mut self) -> Option<Trigger> {
        self.burst
            .take()
            .map(|burst| Trigger::new(burst.first, burst.count))
    }

    /// Emit the accumulated trigger if the quiet period has elapsed.
    ///
    /// Resets the burst state when it fires.
    pub fn fire(&mut self, now: Instant) -> Option<Trigger> {
        match &self.burst {
            Some(burst) if burst.deadline <= now => {
                let burst = self.burst.take()?;
                Some(Trigger::new(burst.first, burst.count))
            }
            _ => None,
        }
    }
}
