// src/watch/cache.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::fs::FileSystem;
use crate::watch::hash::compute_file_hash;

/// Last-seen content hash per watched file.
///
/// Editors and the OS often report several events for one save (or touch a
/// file without changing it); comparing hashes lets the watcher trigger only
/// when content really changed. A file that cannot be read (e.g. it was
/// removed) is recorded as `None`.
#[derive(Debug, Default)]
pub struct FileCache {
    hashes: HashMap<PathBuf, Option<String>>,
}

impl FileCache {
    pub fn new() -> Self {
        Self {
            hashes: HashMap::new(),
        }
    }

    /// Record the current hash of `path` without reporting a change.
    pub fn prime(&mut self, fs: &dyn FileSystem, path: &Path) {
        let hash = compute_file_hash(fs, path).ok();
        self.hashes.insert(path.to_path_buf(), hash);
    }

    /// Re-hash `path` and report whether it differs from the last recorded
    /// state. Unknown paths always count as changed.
    pub fn observe(&mut self, fs: &dyn FileSystem, path: &Path) -> bool {
        let hash = compute_file_hash(fs, path).ok();
        let changed = match self.hashes.get(path) {
            Some(previous) => *previous != hash,
            None => true,
        };
        debug!(path = ?path, changed, "observed file hash");
        self.hashes.insert(path.to_path_buf(), hash);
        changed
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}
