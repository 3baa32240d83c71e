// src/watch/tree.rs

//! Walk a directory tree and register one non-recursive watch per directory.
//!
//! Exclusion prunes whole subtrees: a directory whose base name matches the
//! exclude pattern is neither watched nor descended into, so nothing below
//! it can be re-included.

use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use regex::Regex;
use tracing::{debug, info};

use crate::errors::{InlError, Result};
use crate::fs::FileSystem;

/// Something that can start watching a single directory.
pub trait WatchRegistrar {
    fn register(&mut self, dir: &Path) -> Result<()>;
}

impl WatchRegistrar for RecommendedWatcher {
    fn register(&mut self, dir: &Path) -> Result<()> {
        self.watch(dir, RecursiveMode::NonRecursive)
            .map_err(|source| InlError::WatchError {
                path: dir.to_path_buf(),
                source,
            })
    }
}

/// Registrar that only records directories. Used by `--dry-run` and tests.
#[derive(Debug, Default)]
pub struct CollectingRegistrar {
    pub dirs: Vec<PathBuf>,
}

impl WatchRegistrar for CollectingRegistrar {
    fn register(&mut self, dir: &Path) -> Result<()> {
        self.dirs.push(dir.to_path_buf());
        Ok(())
    }
}

/// Directories covered by one watch session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchSet {
    /// Watched directories in walk order, root first.
    pub watched: Vec<PathBuf>,
    /// Pruned directories (their descendants are not listed).
    pub skipped: Vec<PathBuf>,
}

impl WatchSet {
    pub fn contains(&self, dir: &Path) -> bool {
        self.watched.iter().any(|d| d == dir)
    }
}

/// Depth-first walk from `root`, registering every directory whose base name
/// does not match `exclude_dir`.
///
/// The root itself is always watched. Any registration or listing failure
/// aborts the walk.
pub fn build_watch_set(
    fs: &dyn FileSystem,
    root: &Path,
    exclude_dir: &Regex,
    registrar: &mut dyn WatchRegistrar,
) -> Result<WatchSet> {
    debug!(?root, "establishing watches");

    let mut set = WatchSet::default();
    registrar.register(root)?;
    set.watched.push(root.to_path_buf());

    // Explicit stack; children are pushed in reverse so they pop in order.
    let mut stack = list_subdirs(fs, root)?;
    stack.reverse();

    while let Some(dir) = stack.pop() {
        debug!(?dir, "watch directory candidate");

        let excluded = dir
            .file_name()
            .map(|name| exclude_dir.is_match(&name.to_string_lossy()))
            .unwrap_or(false);
        if excluded {
            debug!(?dir, "pruning excluded directory");
            set.skipped.push(dir);
            continue;
        }

        registrar.register(&dir)?;
        let mut children = list_subdirs(fs, &dir)?;
        set.watched.push(dir);
        children.reverse();
        stack.extend(children);
    }

    info!(
        ?root,
        watched = set.watched.len(),
        skipped = set.skipped.len(),
        "watching"
    );
    Ok(set)
}

fn list_subdirs(fs: &dyn FileSystem, dir: &Path) -> Result<Vec<PathBuf>> {
    fs.subdirectories(dir).map_err(|err| InlError::WalkError {
        path: dir.to_path_buf(),
        message: format!("{err:#}"),
    })
}
