// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod pipeline;
pub mod tasks;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cli::{CliArgs, TaskArg};
use crate::config::{load_or_default, ConfigFile};
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions};
use crate::exec::RealExecutorBackend;
use crate::fs::{FileSystem, RealFileSystem};
use crate::tasks::{BuildReport, TaskSet};
use crate::types::TaskKind;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (optional `BuildTool.toml`)
/// - the style / script tasks
/// - either a one-shot build or the watch runtime
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_or_default(&config_path)?;
    let root = project_root(&config_path);

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let tasks = TaskSet::from_config(&cfg, &root, Arc::clone(&fs))?;

    match args.task {
        Some(TaskArg::Style) => build_once(&tasks, &[TaskKind::Style]).await,
        Some(TaskArg::Script) => build_once(&tasks, &[TaskKind::Script]).await,
        None => build_once(&tasks, &TaskKind::ALL).await,
        Some(TaskArg::Watch) => watch_and_rebuild(&cfg, root, tasks, fs).await,
    }
}

/// Run the given tasks once and fail on the first error.
async fn build_once(tasks: &TaskSet, kinds: &[TaskKind]) -> Result<()> {
    let reports = tasks.run_once(kinds).await?;
    for report in &reports {
        log_report(report);
    }
    Ok(())
}

fn log_report(report: &BuildReport) {
    info!(
        task = %report.task,
        files = report.built.len(),
        written = report.written(),
        "task complete"
    );
}

/// Watch both tasks' globs until Ctrl-C.
///
/// Each change re-runs the owning task through the runtime, which keeps at
/// most one build per task in flight. Build failures are logged by the
/// executor and never stop the watcher.
async fn watch_and_rebuild(
    cfg: &ConfigFile,
    root: PathBuf,
    tasks: TaskSet,
    fs: Arc<dyn FileSystem>,
) -> Result<()> {
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let profiles = tasks.profiles();
    let executor = RealExecutorBackend::new(tasks, rt_tx.clone());

    let _watcher_handle = crate::watch::spawn_watcher(
        root,
        profiles,
        rt_tx.clone(),
        fs,
        cfg.config.use_hash,
    )?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    info!("watching for changes (Ctrl+C to stop)");

    let core = CoreRuntime::new(
        cfg.config.triggered_while_running_behaviour,
        cfg.config.queue_length,
        RuntimeOptions {
            exit_when_idle: false,
        },
    );

    let runtime = Runtime::new(core, rt_rx, executor);
    runtime.run().await?;
    Ok(())
}

/// Figure out the project root globs are evaluated against.
///
/// - If the config path has a non-empty parent (e.g. "site/BuildTool.toml"),
///   we use that directory.
/// - If it's just a bare filename like "BuildTool.toml" (parent = ""),
///   we fall back to the current working directory.
fn project_root(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
