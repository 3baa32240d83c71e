#![allow(dead_code)]

pub use inl_test_utils::builders;
pub use inl_test_utils::{init_tracing, wait_until, with_timeout};

use std::fs;
use std::path::Path;

use notify::event::{DataChange, EventKind, ModifyKind, RemoveKind};

/// A content-modification event for `path`, as notify would deliver it.
pub fn write_event(path: &str) -> notify::Event {
    notify::Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
        .add_path(path.into())
}

pub fn remove_event(path: &str) -> notify::Event {
    notify::Event::new(EventKind::Remove(RemoveKind::File)).add_path(path.into())
}

/// Create `path` (and its parents) with `contents`.
pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Lines of `path`, or nothing if it does not exist yet.
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
