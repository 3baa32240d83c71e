// src/engine/core.rs

//! Pure orchestrator state machine.
//!
//! `BuildingWatches → AwaitingTrigger → (StoppingPrevious →) StartingNew →
//! BuildingWatches`, with `ShuttingDown → Stopped` reachable from
//! `AwaitingTrigger`.
//!
//! The core has no channels, no Tokio types, and performs no IO; it only
//! decides what the shell does next, which keeps it unit testable.

use tracing::{debug, info};

use crate::errors::{InlError, Result};

use super::{CoreCommand, CoreEvent, Phase};

/// Commands to run next, and whether the loop should keep going afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    pub keep_running: bool,
}

impl CoreStep {
    fn run(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    fn stop() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: false,
        }
    }
}

#[derive(Debug)]
pub struct CoreLoop {
    phase: Phase,
    postpone: bool,
    /// Whether the supervisor holds a running child.
    live: bool,
    /// Invocations started so far.
    runs: u64,
}

impl CoreLoop {
    pub fn new(postpone: bool) -> Self {
        Self {
            phase: Phase::BuildingWatches,
            postpone,
            live: false,
            runs: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_live_invocation(&self) -> bool {
        self.live
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// First commands: run the command once up front unless postponed.
    pub fn initial_step(&mut self) -> CoreStep {
        if self.postpone {
            self.phase = Phase::BuildingWatches;
            CoreStep::run(vec![CoreCommand::BuildWatches])
        } else {
            self.phase = Phase::StartingNew;
            CoreStep::run(vec![CoreCommand::StartInvocation])
        }
    }

    pub fn step(&mut self, event: CoreEvent) -> Result<CoreStep> {
        let step = match (self.phase, event) {
            (Phase::BuildingWatches, CoreEvent::WatchesReady { watched, skipped }) => {
                debug!(watched, skipped, "watches established");
                self.phase = Phase::AwaitingTrigger;
                CoreStep::run(vec![CoreCommand::AwaitTrigger])
            }

            (Phase::AwaitingTrigger, CoreEvent::Triggered(trigger)) => {
                info!(
                    path = ?trigger.first.path,
                    kind = %trigger.first.kind,
                    events = trigger.count,
                    "change detected"
                );
                if self.live {
                    self.phase = Phase::StoppingPrevious;
                    CoreStep::run(vec![CoreCommand::StopPrevious])
                } else {
                    self.phase = Phase::StartingNew;
                    CoreStep::run(vec![CoreCommand::StartInvocation])
                }
            }

            (Phase::AwaitingTrigger, CoreEvent::InvocationExited(outcome)) => {
                debug!(%outcome, "invocation exited while awaiting changes");
                self.live = false;
                CoreStep::run(vec![CoreCommand::AwaitTrigger])
            }

            (Phase::AwaitingTrigger, CoreEvent::ShutdownRequested) => {
                info!("shutdown requested");
                if self.live {
                    self.phase = Phase::ShuttingDown;
                    CoreStep::run(vec![CoreCommand::StopPrevious])
                } else {
                    self.phase = Phase::Stopped;
                    CoreStep::stop()
                }
            }

            (Phase::StoppingPrevious, CoreEvent::PreviousStopped) => {
                self.live = false;
                self.phase = Phase::StartingNew;
                CoreStep::run(vec![CoreCommand::StartInvocation])
            }

            (Phase::ShuttingDown, CoreEvent::PreviousStopped) => {
                self.live = false;
                self.phase = Phase::Stopped;
                CoreStep::stop()
            }

            (Phase::StartingNew, CoreEvent::Started { live }) => {
                self.live = live;
                self.runs += 1;
                self.phase = Phase::BuildingWatches;
                // The old watch set lives until the new run is under way.
                CoreStep::run(vec![CoreCommand::ReleaseWatches, CoreCommand::BuildWatches])
            }

            (phase, event) => {
                return Err(InlError::InvalidTransition(format!(
                    "{event:?} while in {phase:?}"
                )));
            }
        };
        Ok(step)
    }
}
