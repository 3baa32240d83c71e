// tests/supervisor_process.rs
//
// Real child processes through `sh -c`.
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, read_lines, with_timeout};

use std::error::Error;
use std::time::Duration;

use tempfile::TempDir;
use tokio::time::Instant;

use inl::config::ShellCommand;
use inl::errors::InlError;
use inl::exec::{ExecutorBackend, ExitOutcome, InvocationState, InvocationStatus, Supervisor};
use inl::types::WaitMode;

type TestResult = Result<(), Box<dyn Error>>;

fn supervisor(line: &str, mode: WaitMode) -> Supervisor {
    init_tracing();
    Supervisor::new(ShellCommand::new("sh", line), mode)
}

#[tokio::test]
async fn wait_mode_start_returns_after_exit() -> TestResult {
    let dir = TempDir::new()?;
    let marker = dir.path().join("log");
    let line = format!("sleep 0.3 && echo done >> {}", marker.display());
    let mut sup = supervisor(&line, WaitMode::Wait);
    assert!(sup.mode().waits());

    let started = Instant::now();
    let state = with_timeout(sup.start()).await?;

    assert_eq!(state, InvocationState::Finished(ExitOutcome::Success));
    assert!(started.elapsed() >= Duration::from_millis(300));
    assert_eq!(read_lines(&marker), vec!["done"]);
    assert!(!sup.is_live());
    Ok(())
}

#[tokio::test]
async fn wait_mode_stop_never_touches_a_finished_run() -> TestResult {
    let mut sup = supervisor("exit 3", WaitMode::Wait);

    let state = with_timeout(sup.start()).await?;
    assert_eq!(state, InvocationState::Finished(ExitOutcome::Failed(3)));

    with_timeout(sup.stop()).await?;
    let inv = sup.current().expect("one invocation");
    assert_eq!(inv.status, InvocationStatus::Completed(ExitOutcome::Failed(3)));
    Ok(())
}

#[tokio::test]
async fn no_wait_kill_is_awaited_before_restart() -> TestResult {
    let mut sup = supervisor("sleep 5", WaitMode::NoWait);

    let started = Instant::now();
    assert_eq!(with_timeout(sup.start()).await?, InvocationState::Running);
    assert!(sup.is_live());
    let first_pid = sup.current().and_then(|inv| inv.pid());
    assert!(first_pid.is_some());

    with_timeout(sup.stop()).await?;
    assert!(!sup.is_live());
    assert_eq!(sup.current().map(|inv| inv.status), Some(InvocationStatus::Killed));

    assert_eq!(with_timeout(sup.start()).await?, InvocationState::Running);
    let second = sup.current().expect("second invocation");
    assert_eq!(second.id, 2);
    assert_ne!(second.pid(), first_pid);
    assert!(started.elapsed() < Duration::from_secs(5));

    with_timeout(sup.stop()).await?;
    Ok(())
}

#[tokio::test]
async fn no_wait_natural_exit_is_reaped_not_killed() -> TestResult {
    let mut sup = supervisor("exit 0", WaitMode::NoWait);
    assert_eq!(with_timeout(sup.start()).await?, InvocationState::Running);

    let outcome = with_timeout(sup.wait_exit()).await?;
    assert_eq!(outcome, ExitOutcome::Success);
    assert!(!sup.is_live());

    with_timeout(sup.stop()).await?;
    assert_eq!(
        sup.current().map(|inv| inv.status),
        Some(InvocationStatus::Completed(ExitOutcome::Success))
    );
    Ok(())
}

#[tokio::test]
async fn stop_after_unobserved_exit_records_the_status() -> TestResult {
    let mut sup = supervisor("exit 7", WaitMode::NoWait);
    with_timeout(sup.start()).await?;
    tokio::time::sleep(Duration::from_millis(300)).await;

    with_timeout(sup.stop()).await?;
    assert_eq!(
        sup.current().map(|inv| inv.status),
        Some(InvocationStatus::Completed(ExitOutcome::Failed(7)))
    );
    Ok(())
}

#[tokio::test]
async fn starting_over_a_live_run_is_rejected() -> TestResult {
    let mut sup = supervisor("sleep 5", WaitMode::NoWait);
    with_timeout(sup.start()).await?;

    let err = with_timeout(sup.start()).await.unwrap_err();
    assert!(matches!(err, InlError::InvalidTransition(_)), "got {err:?}");

    with_timeout(sup.stop()).await?;
    Ok(())
}

#[tokio::test]
async fn missing_shell_is_a_spawn_error() {
    init_tracing();
    let mut sup = Supervisor::new(
        ShellCommand::new("/nonexistent/bin/sh", "true"),
        WaitMode::Wait,
    );
    let err = with_timeout(sup.start()).await.unwrap_err();
    assert!(matches!(err, InlError::SpawnError { .. }), "got {err:?}");
    assert!(sup.current().is_none());
}

#[tokio::test]
async fn signal_termination_is_reported_not_fatal() -> TestResult {
    let mut sup = supervisor("kill -TERM $$", WaitMode::Wait);
    let state = with_timeout(sup.start()).await?;
    assert_eq!(state, InvocationState::Finished(ExitOutcome::Signaled(15)));
    Ok(())
}

/// Whether `pid` is gone or only a zombie waiting for its new parent.
#[cfg(target_os = "linux")]
fn is_dead(pid: &str) -> bool {
    match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
        Ok(stat) => stat
            .rsplit_once(')')
            .and_then(|(_, rest)| rest.split_whitespace().next())
            .is_some_and(|state| state == "Z" || state == "X"),
        Err(_) => true,
    }
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn no_wait_kill_reaches_processes_started_by_the_shell() -> TestResult {
    let dir = TempDir::new()?;
    let pid_file = dir.path().join("bg.pid");
    let line = format!("sleep 30 & echo $! > {}; wait", pid_file.display());
    let mut sup = supervisor(&line, WaitMode::NoWait);

    with_timeout(sup.start()).await?;
    let file = pid_file.clone();
    crate::common::wait_until("background pid written", move || {
        read_lines(&file).first().is_some_and(|l| !l.is_empty())
    })
    .await;
    let bg = read_lines(&pid_file).remove(0);
    assert!(!is_dead(&bg), "background sleep should be running");

    with_timeout(sup.stop()).await?;
    assert_eq!(sup.current().map(|inv| inv.status), Some(InvocationStatus::Killed));

    let pid = bg.clone();
    crate::common::wait_until("background sleep killed", move || is_dead(&pid)).await;
    Ok(())
}
