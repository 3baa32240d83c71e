// src/engine/runtime.rs

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use tracing::{debug, info};

use crate::errors::{InlError, Result};
use crate::exec::{ExecutorBackend, InvocationState};
use crate::watch::{Trigger, TriggerSource, WatchBackend};

use super::core::CoreLoop;
use super::{CoreCommand, CoreEvent};

type ShutdownSignal = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Drives [`CoreLoop`] by performing the commands it returns against a watch
/// backend and an executor backend.
///
/// This is a pure IO shell around the core: it owns the current watch session
/// and the executor, and reports what happened back as [`CoreEvent`]s.
pub struct Runtime<W: WatchBackend, E: ExecutorBackend> {
    core: CoreLoop,
    watch: W,
    executor: E,
    session: Option<W::Session>,
    /// Burst collected from a released session, served by the next await.
    carried: Option<Trigger>,
    shutdown: ShutdownSignal,
    clear_screen: bool,
}

impl<W: WatchBackend, E: ExecutorBackend> fmt::Debug for Runtime<W, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("watching", &self.session.is_some())
            .finish_non_exhaustive()
    }
}

impl<W: WatchBackend, E: ExecutorBackend> Runtime<W, E> {
    /// `shutdown` resolves when the loop should stop (e.g. on Ctrl-C). It is
    /// only observed while waiting for changes.
    pub fn new(
        core: CoreLoop,
        watch: W,
        executor: E,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Self {
        Self {
            core,
            watch,
            executor,
            session: None,
            carried: None,
            shutdown: Box::pin(shutdown),
            clear_screen: false,
        }
    }

    /// Clear the terminal before every invocation.
    pub fn with_clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    /// Main loop.
    ///
    /// Only returns on shutdown or on a fatal error; the watch session is
    /// dropped (watches released) on both paths.
    pub async fn run(mut self) -> Result<()> {
        info!("inl runtime started");

        let mut pending: VecDeque<CoreCommand> = self.core.initial_step().commands.into();

        while let Some(command) = pending.pop_front() {
            debug!(?command, phase = ?self.core.phase(), "executing core command");

            let Some(event) = self.execute_command(command).await? else {
                continue;
            };

            let step = self.core.step(event)?;
            if !step.keep_running {
                info!(runs = self.core.runs(), "stopping runtime");
                return Ok(());
            }
            pending.extend(step.commands);
        }

        Err(InlError::InvalidTransition(
            "core stopped issuing commands".to_string(),
        ))
    }

    async fn execute_command(&mut self, command: CoreCommand) -> Result<Option<CoreEvent>> {
        let event = match command {
            CoreCommand::BuildWatches => {
                let session = self.watch.establish()?;
                let set = session.watch_set();
                let event = CoreEvent::WatchesReady {
                    watched: set.watched.len(),
                    skipped: set.skipped.len(),
                };
                self.session = Some(session);
                Some(event)
            }
            CoreCommand::AwaitTrigger => Some(self.await_trigger().await?),
            CoreCommand::ReleaseWatches => {
                self.release_watches()?;
                None
            }
            CoreCommand::StopPrevious => {
                self.executor.stop().await?;
                Some(CoreEvent::PreviousStopped)
            }
            CoreCommand::StartInvocation => {
                if self.clear_screen {
                    crate::term::clear_screen()?;
                }
                let live = match self.executor.start().await? {
                    InvocationState::Running => true,
                    InvocationState::Finished(_) => false,
                };
                Some(CoreEvent::Started { live })
            }
        };
        Ok(event)
    }

    fn release_watches(&mut self) -> Result<()> {
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };
        if let Some(trigger) = session.flush()? {
            debug!(count = trigger.count, "changes arrived during the run; carrying over");
            if self.carried.is_none() {
                self.carried = Some(trigger);
            }
        }
        drop(session);
        debug!("watches released");
        Ok(())
    }

    /// Wait for the first of: a trigger, the live child exiting, shutdown.
    async fn await_trigger(&mut self) -> Result<CoreEvent> {
        if let Some(trigger) = self.carried.take() {
            return Ok(CoreEvent::Triggered(trigger));
        }

        let session = self
            .session
            .as_mut()
            .ok_or_else(|| InlError::InvalidTransition("awaiting trigger without watches".into()))?;
        let live = self.executor.is_live();

        tokio::select! {
            trigger = session.next_trigger() => Ok(CoreEvent::Triggered(trigger?)),
            outcome = self.executor.wait_exit(), if live => {
                Ok(CoreEvent::InvocationExited(outcome?))
            }
            _ = &mut self.shutdown => Ok(CoreEvent::ShutdownRequested),
        }
    }
}
