// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod term;
pub mod types;
pub mod watch;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::cli::CliArgs;
use crate::config::{load_from_args, Config};
use crate::engine::{CoreLoop, Runtime};
use crate::exec::Supervisor;
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::{build_watch_set, CollectingRegistrar, NotifyWatchBackend};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and pattern compilation
/// - the notify-backed watch backend
/// - the process supervisor
/// - Ctrl-C handling
/// - the orchestrator runtime
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_from_args(&args)?;
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    if args.dry_run {
        print_dry_run(&cfg, &*fs)?;
        return Ok(());
    }

    let watch = NotifyWatchBackend::new(&cfg, fs);
    let executor = Supervisor::new(cfg.command.clone(), cfg.wait_mode);

    // Ctrl-C → graceful shutdown. Registered now so that the handler is in
    // place before the first invocation starts.
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {e}");
            // Keep the sender alive so the runtime never sees a shutdown.
            std::future::pending::<()>().await;
        }
        let _ = shutdown_tx.send(());
    });
    let shutdown = async move {
        let _ = shutdown_rx.await;
    };

    let runtime = Runtime::new(CoreLoop::new(cfg.postpone), watch, executor, shutdown)
        .with_clear_screen(cfg.clear);
    runtime.run().await?;
    Ok(())
}

/// Dry-run output: resolved configuration and the directories that would be
/// watched.
fn print_dry_run(cfg: &Config, fs: &dyn FileSystem) -> Result<()> {
    println!("inl dry-run");
    println!("  root         = {}", cfg.root.display());
    println!("  exclude-dir  = {}", cfg.patterns.exclude_dir);
    println!("  exclude      = {}", cfg.patterns.exclude_file);
    println!("  include      = {}", cfg.patterns.include_file);
    println!("  debounce     = {:?}", cfg.debounce);
    println!("  wait mode    = {:?}", cfg.wait_mode);
    println!("  postpone     = {}", cfg.postpone);
    println!("  command      = {}", cfg.command);
    println!();

    let mut registrar = CollectingRegistrar::default();
    let set = build_watch_set(fs, &cfg.root, &cfg.patterns.exclude_dir, &mut registrar)?;

    println!("watched ({}):", set.watched.len());
    for dir in &set.watched {
        println!("  + {}", dir.display());
    }
    if !set.skipped.is_empty() {
        println!("pruned ({}):", set.skipped.len());
        for dir in &set.skipped {
            println!("  - {}", dir.display());
        }
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
