// src/tasks/mod.rs

//! Build tasks: discover sources, run them through a pipeline, write the
//! results beside the sources.
//!
//! - [`style`] builds the Sass pipeline.
//! - [`script`] builds the JavaScript pipeline.
//! - [`TaskSet`] is the dispatch table the CLI and the watch executor use to
//!   look tasks up by [`TaskKind`].

pub mod script;
pub mod style;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::anyhow;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::config::ConfigFile;
use crate::errors::{BuildError, Result};
use crate::fs::FileSystem;
use crate::pipeline::{Pipeline, SourceFile};
use crate::types::TaskKind;
use crate::watch::patterns::{
    build_task_watch_profile, collect_matching_files, TaskWatchProfile,
};

/// What to do when one file of a batch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the batch and return the first error (one-shot CLI runs).
    FailFast,
    /// Log the error, keep building the other files (watch mode).
    BestEffort,
}

/// Whether a file's output actually changed on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStatus {
    Written,
    Unchanged,
}

/// Result of building a single source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltFile {
    pub source: PathBuf,
    pub output: PathBuf,
    pub status: OutputStatus,
}

/// Summary of one task run.
#[derive(Debug)]
pub struct BuildReport {
    pub task: TaskKind,
    /// Successfully built files, sorted by source path.
    pub built: Vec<BuiltFile>,
    /// Per-file failures (only populated in best-effort mode).
    pub failures: Vec<BuildError>,
}

impl BuildReport {
    fn new(task: TaskKind) -> Self {
        Self {
            task,
            built: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn written(&self) -> usize {
        self.built
            .iter()
            .filter(|b| b.status == OutputStatus::Written)
            .count()
    }

    pub fn outputs(&self) -> Vec<&Path> {
        self.built.iter().map(|b| b.output.as_path()).collect()
    }
}

/// One build task: a set of source globs plus the pipeline their files go
/// through.
pub struct BuildTask {
    kind: TaskKind,
    root: PathBuf,
    profile: TaskWatchProfile,
    pipeline: Pipeline,
    fs: Arc<dyn FileSystem>,
}

impl fmt::Debug for BuildTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildTask")
            .field("kind", &self.kind)
            .field("root", &self.root)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl BuildTask {
    pub fn new(
        kind: TaskKind,
        root: impl Into<PathBuf>,
        profile: TaskWatchProfile,
        pipeline: Pipeline,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            kind,
            root: root.into(),
            profile,
            pipeline,
            fs,
        }
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn profile(&self) -> &TaskWatchProfile {
        &self.profile
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Source files this task would build right now, sorted.
    ///
    /// These are the watched files minus anything that is never an entry
    /// point on its own (Sass partials).
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let files = collect_matching_files(self.fs.as_ref(), &self.root, &self.profile)
            .map_err(|e| BuildError::io(&self.root, format!("{e:#}")))?;

        Ok(files
            .into_iter()
            .filter(|path| match self.kind {
                TaskKind::Style => style::is_entry_point(path),
                TaskKind::Script => true,
            })
            .collect())
    }

    /// Read, transform and write a single source file.
    pub fn build_file(&self, path: &Path) -> Result<BuiltFile> {
        let contents = self
            .fs
            .read(path)
            .map_err(|e| BuildError::io(path, format!("{e:#}")))?;

        let base = self.base_of(path);
        let file = self.pipeline.run(SourceFile::new(path, base, contents))?;
        let output = file.output_path();

        let unchanged = self
            .fs
            .read(&output)
            .is_ok_and(|existing| existing == file.contents);
        if unchanged {
            debug!(
                task = %self.kind,
                output = %output.display(),
                "output unchanged; not rewriting"
            );
            return Ok(BuiltFile {
                source: path.to_path_buf(),
                output,
                status: OutputStatus::Unchanged,
            });
        }

        self.fs
            .write(&output, &file.contents)
            .map_err(|e| BuildError::io(&output, format!("{e:#}")))?;
        info!(task = %self.kind, output = %output.display(), "wrote");

        Ok(BuiltFile {
            source: path.to_path_buf(),
            output,
            status: OutputStatus::Written,
        })
    }

    /// Build every discovered file.
    ///
    /// Files are processed concurrently on the blocking pool; each file's
    /// stages run in order. With [`FailurePolicy::FailFast`] the first error
    /// aborts the batch and is returned; with [`FailurePolicy::BestEffort`]
    /// errors are logged and collected in the report.
    pub async fn run(self: Arc<Self>, policy: FailurePolicy) -> Result<BuildReport> {
        let sources = self.discover()?;
        info!(task = %self.kind, files = sources.len(), "starting build");

        let mut jobs = JoinSet::new();
        for path in sources {
            let task = Arc::clone(&self);
            jobs.spawn_blocking(move || task.build_file(&path));
        }

        let mut report = BuildReport::new(self.kind);
        while let Some(joined) = jobs.join_next().await {
            let result = joined
                .map_err(|e| {
                    BuildError::Other(anyhow!("build worker for {} failed: {e}", self.kind))
                })
                .and_then(|r| r);

            match result {
                Ok(built) => report.built.push(built),
                Err(err) => match policy {
                    FailurePolicy::FailFast => {
                        jobs.abort_all();
                        error!(task = %self.kind, error = %err, "build failed");
                        return Err(err);
                    }
                    FailurePolicy::BestEffort => {
                        error!(
                            task = %self.kind,
                            error = %err,
                            "file failed; continuing with the rest"
                        );
                        report.failures.push(err);
                    }
                },
            }
        }

        report.built.sort_by(|a, b| a.source.cmp(&b.source));
        info!(
            task = %self.kind,
            built = report.built.len(),
            written = report.written(),
            failed = report.failures.len(),
            "build finished"
        );
        Ok(report)
    }

    fn base_of(&self, path: &Path) -> PathBuf {
        self.profile
            .bases()
            .iter()
            .map(|base| join_root(&self.root, base))
            .filter(|base| path.starts_with(base))
            .max_by_key(|base| base.components().count())
            .unwrap_or_else(|| self.root.clone())
    }
}

/// `root.join(base)` without introducing a trailing separator for an empty
/// base.
pub(crate) fn join_root(root: &Path, base: &Path) -> PathBuf {
    if base.as_os_str().is_empty() {
        root.to_path_buf()
    } else {
        root.join(base)
    }
}

/// Dispatch table from [`TaskKind`] to its [`BuildTask`], built once at
/// startup.
#[derive(Debug, Clone)]
pub struct TaskSet {
    tasks: BTreeMap<TaskKind, Arc<BuildTask>>,
}

impl TaskSet {
    /// Build both tasks from a validated config. Globs are evaluated
    /// relative to `root`.
    pub fn from_config(
        cfg: &ConfigFile,
        root: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        let root = root.into();
        let mut tasks = BTreeMap::new();

        for kind in TaskKind::ALL {
            let profile = build_task_watch_profile(kind, cfg.task(kind))?;
            let pipeline = match kind {
                TaskKind::Style => style::pipeline(&cfg.build, Arc::clone(&fs))?,
                TaskKind::Script => script::pipeline(&cfg.build),
            };
            debug!(task = %kind, stages = ?pipeline.stage_names(), "registered task");
            let task = BuildTask::new(kind, root.clone(), profile, pipeline, Arc::clone(&fs));
            tasks.insert(kind, Arc::new(task));
        }

        Ok(Self { tasks })
    }

    pub fn get(&self, kind: TaskKind) -> Option<&Arc<BuildTask>> {
        self.tasks.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = TaskKind> + '_ {
        self.tasks.keys().copied()
    }

    /// Watch profiles of all tasks, for the file watcher.
    pub fn profiles(&self) -> Vec<TaskWatchProfile> {
        self.tasks.values().map(|t| t.profile().clone()).collect()
    }

    /// Run the given tasks once, concurrently, failing fast.
    ///
    /// Reports are returned in the order of `kinds`.
    pub async fn run_once(&self, kinds: &[TaskKind]) -> Result<Vec<BuildReport>> {
        let unique: BTreeSet<TaskKind> = kinds.iter().copied().collect();

        let mut jobs = JoinSet::new();
        for kind in unique {
            let task = self.get(kind).cloned().ok_or_else(|| {
                BuildError::ConfigError(format!("task '{kind}' is not registered"))
            })?;
            jobs.spawn(task.run(FailurePolicy::FailFast));
        }

        let mut reports = Vec::new();
        while let Some(joined) = jobs.join_next().await {
            let result = joined
                .map_err(|e| BuildError::Other(anyhow!("build task panicked: {e}")))
                .and_then(|r| r);
            match result {
                Ok(report) => reports.push(report),
                Err(err) => {
                    jobs.abort_all();
                    return Err(err);
                }
            }
        }

        reports.sort_by_key(|r| kinds.iter().position(|k| *k == r.task));
        Ok(reports)
    }
}
