// src/watch/event_handler.rs

//! Event processing logic for file system changes.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::fs::FileSystem;
use crate::types::TaskKind;
use crate::watch::cache::FileCache;
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::{collect_matching_files, TaskWatchProfile};

/// Everything needed to turn a changed path into task triggers.
pub struct WatchContext {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    profiles: Vec<TaskWatchProfile>,
    use_hash: bool,
    cache: Mutex<FileCache>,
}

impl fmt::Debug for WatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchContext")
            .field("root", &self.root)
            .field("profiles", &self.profiles)
            .field("use_hash", &self.use_hash)
            .finish_non_exhaustive()
    }
}

impl WatchContext {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        root: impl Into<PathBuf>,
        profiles: Vec<TaskWatchProfile>,
        use_hash: bool,
    ) -> Self {
        Self {
            fs,
            root: root.into(),
            profiles,
            use_hash,
            cache: Mutex::new(FileCache::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Hash every currently watched file so that the first event for an
    /// untouched file is not mistaken for a change.
    pub fn prime(&self) {
        if !self.use_hash {
            return;
        }

        let mut cache = self.lock_cache();
        for profile in &self.profiles {
            match collect_matching_files(self.fs.as_ref(), &self.root, profile) {
                Ok(files) => {
                    for file in files {
                        cache.prime(self.fs.as_ref(), &file);
                    }
                }
                Err(err) => {
                    warn!(task = %profile.task(), error = %err, "failed to prime hash cache")
                }
            }
        }
        debug!(files = cache.len(), "primed hash cache");
    }

    /// Tasks that should run because `path` changed.
    ///
    /// 1. Relativize the path against the watch root.
    /// 2. Keep the tasks whose watch/exclude patterns match it.
    /// 3. With `use_hash`, drop everything if the file's content hash is
    ///    unchanged since the last event.
    pub fn tasks_for_change(&self, path: &Path) -> Vec<TaskKind> {
        let Some(rel_str) = relative_str(&self.root, path) else {
            warn!("could not relativize path {:?} against root {:?}", path, self.root);
            return Vec::new();
        };

        let matching: Vec<TaskKind> = self
            .profiles
            .iter()
            .filter(|p| p.matches(&rel_str))
            .map(|p| p.task())
            .collect();

        if matching.is_empty() {
            return matching;
        }

        if self.use_hash && !self.lock_cache().observe(self.fs.as_ref(), path) {
            info!(path = %rel_str, "content unchanged; skipping trigger");
            return Vec::new();
        }

        matching
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, FileCache> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Process a single changed path and send triggers to the runtime.
///
/// Returns `false` once the runtime channel is closed, at which point the
/// watcher loop should stop.
pub async fn process_file_change(
    ctx: Arc<WatchContext>,
    path: PathBuf,
    runtime_tx: &mpsc::Sender<RuntimeEvent>,
) -> bool {
    let lookup_path = path.clone();
    let tasks = match tokio::task::spawn_blocking(move || ctx.tasks_for_change(&lookup_path)).await
    {
        Ok(tasks) => tasks,
        Err(err) => {
            warn!(?path, error = %err, "change lookup failed; ignoring event");
            return true;
        }
    };

    for task in tasks {
        debug!(%task, ?path, "watch match -> triggering task");
        if let Err(err) = runtime_tx
            .send(RuntimeEvent::TaskTriggered {
                task,
                path: path.clone(),
            })
            .await
        {
            warn!("failed to send RuntimeEvent::TaskTriggered: {err}");
            return false;
        }
    }

    true
}
