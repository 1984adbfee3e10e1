// tests/style_task.rs

use std::error::Error;
use std::fs;
use std::sync::Arc;

use tempfile::tempdir;

use build_tool::errors::BuildError;
use build_tool::fs::RealFileSystem;
use build_tool::tasks::{FailurePolicy, OutputStatus, TaskSet};
use build_tool::types::TaskKind;
use build_tool_test_utils::builders::ConfigFileBuilder;
use build_tool_test_utils::{init_tracing, read_file, write_file};

type TestResult = Result<(), Box<dyn Error>>;

fn real_tasks(root: &std::path::Path, builder: ConfigFileBuilder) -> TaskSet {
    TaskSet::from_config(&builder.build(), root, Arc::new(RealFileSystem))
        .expect("tasks from config")
}

#[tokio::test]
async fn compiles_scss_to_compressed_min_css_beside_source() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    write_file(dir.path(), "assets/css/button.scss", ".btn {\n  color: red;\n}\n");

    let tasks = real_tasks(dir.path(), ConfigFileBuilder::new());
    let reports = tasks.run_once(&[TaskKind::Style]).await?;

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].task, TaskKind::Style);
    assert_eq!(reports[0].written(), 1);

    let css = read_file(dir.path(), "assets/css/button.min.css");
    assert_eq!(css.trim(), ".btn{color:red}");
    Ok(())
}

#[tokio::test]
async fn dot_slash_globs_match_like_plain_ones() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    write_file(dir.path(), "assets/css/button.scss", ".btn { color: red; }\n");
    write_file(dir.path(), "assets/css/skip/x.scss", ".x { color: blue; }\n");

    let builder = ConfigFileBuilder::new()
        .style_watch("./assets/css/**/*.scss")
        .style_exclude("./assets/css/skip/**");
    let tasks = real_tasks(dir.path(), builder);
    let reports = tasks.run_once(&[TaskKind::Style]).await?;

    assert_eq!(reports[0].built.len(), 1);
    assert!(dir.path().join("assets/css/button.min.css").exists());
    assert!(!dir.path().join("assets/css/skip/x.min.css").exists());
    Ok(())
}

#[tokio::test]
async fn nested_sources_keep_their_directory() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    write_file(
        dir.path(),
        "assets/css/pages/home.scss",
        "$pad: 4px;\n.home { padding: $pad * 2; }\n",
    );

    let tasks = real_tasks(dir.path(), ConfigFileBuilder::new());
    tasks.run_once(&[TaskKind::Style]).await?;

    let css = read_file(dir.path(), "assets/css/pages/home.min.css");
    assert!(css.contains(".home{padding:8px}"), "got {css}");
    assert!(!dir.path().join("assets/css/home.min.css").exists());
    Ok(())
}

#[tokio::test]
async fn partials_are_imported_but_not_built() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    write_file(dir.path(), "assets/css/_colors.scss", "$brand: #ff0000;\n");
    write_file(
        dir.path(),
        "assets/css/site.scss",
        "@import 'colors';\n.site { color: $brand; }\n",
    );

    let tasks = real_tasks(dir.path(), ConfigFileBuilder::new());
    let reports = tasks.run_once(&[TaskKind::Style]).await?;

    assert_eq!(reports[0].built.len(), 1);
    assert!(!dir.path().join("assets/css/_colors.min.css").exists());

    let css = read_file(dir.path(), "assets/css/site.min.css");
    assert!(css.contains(".site{color:red}"), "got {css}");
    Ok(())
}

#[tokio::test]
async fn vendor_prefixes_follow_browser_targets() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    write_file(dir.path(), "assets/css/select.scss", ".no-select { user-select: none; }\n");

    let tasks = real_tasks(dir.path(), ConfigFileBuilder::new().browsers(&["safari 12"]));
    tasks.run_once(&[TaskKind::Style]).await?;

    let css = read_file(dir.path(), "assets/css/select.min.css");
    assert!(css.contains("-webkit-user-select:none"), "got {css}");
    assert!(css.contains("user-select:none"), "got {css}");
    Ok(())
}

#[tokio::test]
async fn compile_error_names_the_source_file() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let broken = write_file(dir.path(), "assets/css/broken.scss", ".a {\n  color: $missing;\n}\n");

    let tasks = real_tasks(dir.path(), ConfigFileBuilder::new());
    let err = tasks
        .run_once(&[TaskKind::Style])
        .await
        .expect_err("undefined variable must fail");

    match err {
        BuildError::Compile { path, line, message } => {
            assert_eq!(path, broken);
            assert_eq!(line, Some(2), "line taken from the compiler diagnostic");
            assert!(!message.is_empty());
        }
        other => panic!("expected a compile error, got {other:?}"),
    }
    assert!(!dir.path().join("assets/css/broken.min.css").exists());
    Ok(())
}

#[tokio::test]
async fn best_effort_builds_the_healthy_files() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    write_file(dir.path(), "assets/css/broken.scss", ".a { color: $missing; }\n");
    write_file(dir.path(), "assets/css/ok.scss", ".ok { margin: 0; }\n");

    let tasks = real_tasks(dir.path(), ConfigFileBuilder::new());
    let task = Arc::clone(tasks.get(TaskKind::Style).expect("style task"));
    let report = task.run(FailurePolicy::BestEffort).await?;

    assert!(!report.is_success());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.built.len(), 1);
    assert_eq!(report.built[0].status, OutputStatus::Written);
    assert!(dir.path().join("assets/css/ok.min.css").exists());
    Ok(())
}

#[tokio::test]
async fn rebuilding_unchanged_sources_does_not_rewrite() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    write_file(dir.path(), "assets/css/a.scss", ".a { display: block; }\n");

    let tasks = real_tasks(dir.path(), ConfigFileBuilder::new());
    tasks.run_once(&[TaskKind::Style]).await?;
    let first = fs::read(dir.path().join("assets/css/a.min.css"))?;

    let reports = tasks.run_once(&[TaskKind::Style]).await?;
    let second = fs::read(dir.path().join("assets/css/a.min.css"))?;

    assert_eq!(first, second);
    assert_eq!(reports[0].written(), 0);
    assert!(reports[0].built.iter().all(|b| b.status == OutputStatus::Unchanged));
    Ok(())
}

#[tokio::test]
async fn no_sources_is_a_successful_empty_build() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let tasks = real_tasks(dir.path(), ConfigFileBuilder::new());
    let reports = tasks.run_once(&TaskKind::ALL).await?;

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.built.is_empty() && r.is_success()));
    Ok(())
}
