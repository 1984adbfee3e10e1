// tests/fs_abstraction.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use build_tool::config::ConfigFile;
use build_tool::fs::mock::MockFileSystem;
use build_tool::fs::{FileSystem, RealFileSystem};
use build_tool::tasks::TaskSet;
use build_tool::types::TaskKind;
use build_tool::watch::cache::FileCache;
use build_tool::watch::hash::compute_file_hash;
use build_tool::watch::patterns::{build_profiles_from_config, collect_matching_files};
use build_tool::watch::WatchContext;
use build_tool_test_utils::builders::ConfigFileBuilder;
use build_tool_test_utils::{init_tracing, with_timeout};

fn site() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("./assets/css/_vars.scss", "$gap: 2px;");
    fs.add_file("./assets/css/main.scss", "@import 'vars';\n.main { margin: $gap; }\n");
    fs.add_file("./assets/js/app.js", "function hello() { return 'hi'; }\n");
    fs.add_file("./assets/js/jquery.min.js", "var j=1;");
    fs.add_file("./README.md", "# site");
    fs
}

#[test]
fn test_mock_fs_hashing() {
    let fs = MockFileSystem::new();
    fs.add_file("test.txt", b"hello world".to_vec());

    let hash = compute_file_hash(&fs, &PathBuf::from("test.txt")).unwrap();
    // blake3 hash of "hello world"
    assert_eq!(hash, "d74981efa70a0c880b8d8c1985d075dbcbf679b99a5f9914e5aaf96b831a9e24");
}

#[test]
fn test_mock_fs_patterns() {
    let fs = site();
    let config = ConfigFile::default();
    let profiles = build_profiles_from_config(&config).unwrap();

    let style = collect_matching_files(&fs, Path::new("."), &profiles[0]).unwrap();
    assert_eq!(
        style,
        vec![
            PathBuf::from("./assets/css/_vars.scss"),
            PathBuf::from("./assets/css/main.scss"),
        ]
    );

    let script = collect_matching_files(&fs, Path::new("."), &profiles[1]).unwrap();
    assert_eq!(script, vec![PathBuf::from("./assets/js/app.js")]);
}

#[test]
fn single_star_does_not_cross_directories() {
    let fs = MockFileSystem::new();
    fs.add_file("./js/top.js", "var a;");
    fs.add_file("./js/deep/nested.js", "var b;");

    let cfg = ConfigFileBuilder::new().script_watch("js/*.js").build();
    let profiles = build_profiles_from_config(&cfg).unwrap();

    let files = collect_matching_files(&fs, Path::new("."), &profiles[1]).unwrap();
    assert_eq!(files, vec![PathBuf::from("./js/top.js")]);
}

#[test]
fn dot_slash_patterns_are_relative_to_the_root() {
    let fs = site();
    let cfg = ConfigFileBuilder::new()
        .script_watch("./assets/js/**/*.js")
        .build();
    let profiles = build_profiles_from_config(&cfg).unwrap();

    assert!(profiles[1].matches("assets/js/app.js"));
    assert!(!profiles[1].matches("assets/js/jquery.min.js"));

    let files = collect_matching_files(&fs, Path::new("."), &profiles[1]).unwrap();
    assert_eq!(files, vec![PathBuf::from("./assets/js/app.js")]);

    let ctx = WatchContext::new(Arc::new(fs), ".", profiles, false);
    assert_eq!(
        ctx.tasks_for_change(Path::new("./assets/js/app.js")),
        vec![TaskKind::Script]
    );
}

#[test]
fn real_fs_write_replaces_whole_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("css/site.min.css");
    let fs = RealFileSystem;

    fs.write(&out, b".a{color:red}.b{color:blue}").unwrap();
    fs.write(&out, b".a{color:red}").unwrap();

    assert_eq!(std::fs::read(&out).unwrap(), b".a{color:red}");

    // No temporary files are left next to the output.
    let entries: Vec<_> = std::fs::read_dir(dir.path().join("css"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("site.min.css")]);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&out).unwrap().permissions().mode();
        assert_eq!(mode & 0o644, 0o644, "output must stay world-readable");
    }
}

#[tokio::test]
async fn full_build_against_mock_fs() {
    init_tracing();

    let fs = site();
    let tasks = TaskSet::from_config(&ConfigFile::default(), ".", Arc::new(fs.clone())).unwrap();
    let reports = with_timeout(tasks.run_once(&TaskKind::ALL)).await.unwrap();

    assert_eq!(reports[0].task, TaskKind::Style);
    assert_eq!(reports[1].task, TaskKind::Script);

    let css = String::from_utf8(fs.contents("./assets/css/main.min.css").unwrap()).unwrap();
    assert!(css.contains(".main{margin:2px}"), "got {css}");
    assert!(fs.contents("./assets/js/app.min.js").is_some());

    assert!(fs.contents("./assets/css/_vars.min.css").is_none());
    assert!(fs.contents("./assets/js/jquery.min.min.js").is_none());
    assert_eq!(fs.contents("./README.md").unwrap(), b"# site");
}

#[test]
fn file_cache_reports_only_real_changes() {
    let fs = MockFileSystem::new();
    fs.add_file("./a.js", "var a = 1;");
    let path = Path::new("./a.js");

    let mut cache = FileCache::new();
    assert!(cache.observe(&fs, path), "unknown file counts as changed");
    assert!(!cache.observe(&fs, path));

    fs.write(path, b"var a = 2;").unwrap();
    assert!(cache.observe(&fs, path));
    assert_eq!(cache.len(), 1);
}

#[test]
fn watch_context_maps_changes_to_tasks() {
    init_tracing();

    let fs = site();
    let profiles = build_profiles_from_config(&ConfigFile::default()).unwrap();
    let ctx = WatchContext::new(Arc::new(fs.clone()), ".", profiles, true);
    ctx.prime();

    // Primed and untouched: no rebuild.
    assert!(ctx.tasks_for_change(Path::new("./assets/js/app.js")).is_empty());

    fs.add_file("./assets/js/app.js", "function hello() { return 'hey'; }\n");
    assert_eq!(
        ctx.tasks_for_change(Path::new("./assets/js/app.js")),
        vec![TaskKind::Script]
    );

    // Partials are not built on their own, but editing one rebuilds styles.
    fs.add_file("./assets/css/_vars.scss", "$gap: 3px;");
    assert_eq!(
        ctx.tasks_for_change(Path::new("./assets/css/_vars.scss")),
        vec![TaskKind::Style]
    );

    fs.add_file("./assets/js/app.min.js", "function hello(){return'hey'}");
    assert!(ctx.tasks_for_change(Path::new("./assets/js/app.min.js")).is_empty());
    assert!(ctx.tasks_for_change(Path::new("./README.md")).is_empty());
}

#[test]
fn without_hashing_every_event_triggers() {
    let fs = site();
    let profiles = build_profiles_from_config(&ConfigFile::default()).unwrap();
    let ctx = WatchContext::new(Arc::new(fs), ".", profiles, false);
    ctx.prime();

    for _ in 0..2 {
        assert_eq!(
            ctx.tasks_for_change(Path::new("./assets/js/app.js")),
            vec![TaskKind::Script]
        );
    }
}
