// src/watch/patterns.rs

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::config::{ConfigFile, TaskConfig};
use crate::fs::FileSystem;
use crate::pipeline::{glob_base, normalize_pattern};
use crate::tasks::join_root;
use crate::types::TaskKind;

/// Compiled watch/exclude glob patterns for a single task.
///
/// The patterns are relative to the project root. The watcher and the
/// discovery walk pass relative, forward-slash paths (e.g.
/// `"assets/css/site.scss"`) into `matches`.
#[derive(Clone)]
pub struct TaskWatchProfile {
    task: TaskKind,
    watch_set: GlobSet,
    exclude_set: Option<GlobSet>,
    /// Literal directory prefixes of the watch patterns; discovery only
    /// walks below these.
    bases: Vec<PathBuf>,
}

impl fmt::Debug for TaskWatchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskWatchProfile")
            .field("task", &self.task)
            .field("bases", &self.bases)
            .finish_non_exhaustive()
    }
}

impl TaskWatchProfile {
    /// Task this profile belongs to.
    pub fn task(&self) -> TaskKind {
        self.task
    }

    pub fn bases(&self) -> &[PathBuf] {
        &self.bases
    }

    /// Returns true if this task should be considered interested in the given
    /// path (relative to project root), e.g. `"assets/js/app.js"`.
    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.watch_set.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

/// Compile the watch profile of one task section.
pub fn build_task_watch_profile(kind: TaskKind, task: &TaskConfig) -> Result<TaskWatchProfile> {
    let watch_set = build_globset(&task.watch)
        .with_context(|| format!("building watch globset for task {kind}"))?;

    let exclude_set = if task.exclude.is_empty() {
        None
    } else {
        Some(
            build_globset(&task.exclude)
                .with_context(|| format!("building exclude globset for task {kind}"))?,
        )
    };

    let bases: BTreeSet<PathBuf> = task.watch.iter().map(|p| glob_base(p)).collect();

    Ok(TaskWatchProfile {
        task: kind,
        watch_set,
        exclude_set,
        bases: bases.into_iter().collect(),
    })
}

/// Convenience: compiled profiles for every task in a loaded `ConfigFile`.
pub fn build_profiles_from_config(cfg: &ConfigFile) -> Result<Vec<TaskWatchProfile>> {
    TaskKind::ALL
        .iter()
        .map(|&kind| build_task_watch_profile(kind, cfg.task(kind)))
        .collect()
}

/// Build a GlobSet from simple string patterns.
///
/// `*` does not cross `/`, so `assets/js/*.js` stays one level deep while
/// `**` still matches any depth. A leading `./` is ignored.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(normalize_pattern(pat))
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Collect all files under `root` that match this profile, sorted.
///
/// Only the profile's base directories are walked; a base that does not
/// exist simply contributes no files.
pub fn collect_matching_files(
    fs: &dyn FileSystem,
    root: &Path,
    profile: &TaskWatchProfile,
) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();

    for base in &profile.bases {
        let start = join_root(root, base);
        if !fs.is_dir(&start) {
            continue;
        }

        let mut stack = vec![start];
        while let Some(dir) = stack.pop() {
            for path in fs.read_dir(&dir)? {
                if fs.is_dir(&path) {
                    stack.push(path);
                } else if fs.is_file(&path) {
                    if let Ok(rel) = path.strip_prefix(root) {
                        let rel_str = rel.to_string_lossy().replace('\\', "/");
                        if profile.matches(&rel_str) {
                            files.insert(path);
                        }
                    }
                }
            }
        }
    }

    Ok(files.into_iter().collect())
}
