// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File,
    Dir(Vec<String>), // child names
}

/// In-memory directory tree for walk tests.
///
/// Directories listed via [`MockFileSystem::fail_on`] return an error from
/// `read_dir`, simulating a permission problem or a directory that vanished
/// mid-walk.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    failing: Arc<Mutex<HashSet<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let fs = Self::default();
        fs.lock()
            .insert(root.as_ref().to_path_buf(), MockEntry::Dir(Vec::new()));
        fs
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut entries = self.lock();
        Self::ensure_dir(&mut entries, path.as_ref());
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut entries = self.lock();
        if let Some(parent) = path.parent() {
            Self::ensure_dir(&mut entries, parent);
            Self::link_child(&mut entries, parent, path);
        }
        entries.insert(path.to_path_buf(), MockEntry::File);
    }

    pub fn fail_on(&self, path: impl AsRef<Path>) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.as_ref().to_path_buf());
    }

    fn ensure_dir(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if entries.contains_key(path) {
            return;
        }
        entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        if let Some(parent) = path.parent() {
            if parent != path && !parent.as_os_str().is_empty() {
                Self::ensure_dir(entries, parent);
                Self::link_child(entries, parent, path);
            }
        }
    }

    fn link_child(entries: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
        if let (Some(MockEntry::Dir(children)), Some(name)) = (
            entries.get_mut(parent),
            child.file_name().and_then(|n| n.to_str()),
        ) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

impl FileSystem for MockFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(MockEntry::Dir(_)))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(path)
        {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        match self.lock().get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_dirs_are_linked_to_parents() {
        let fs = MockFileSystem::new("/p");
        fs.add_dir("/p/src/bin");
        fs.add_file("/p/src/main.rs");

        assert_eq!(fs.subdirectories(Path::new("/p")).unwrap(), vec![PathBuf::from("/p/src")]);
        assert_eq!(
            fs.subdirectories(Path::new("/p/src")).unwrap(),
            vec![PathBuf::from("/p/src/bin")]
        );
        assert!(!fs.is_dir(Path::new("/p/src/main.rs")));
    }

    #[test]
    fn failing_dir_errors() {
        let fs = MockFileSystem::new("/p");
        fs.add_dir("/p/locked");
        fs.fail_on("/p/locked");
        assert!(fs.read_dir(Path::new("/p/locked")).is_err());
    }
}
