// tests/config_loading.rs

use std::error::Error;

use tempfile::tempdir;

use build_tool::config::{
    load_and_validate, load_or_default, ConfigFile, DEFAULT_SCRIPT_WATCH, DEFAULT_STYLE_WATCH,
    MINIFIED_SCRIPT_EXCLUDE,
};
use build_tool::errors::BuildError;
use build_tool::types::{TaskKind, TriggerWhileRunningBehaviour};
use build_tool_test_utils::builders::ConfigFileBuilder;
use build_tool_test_utils::{init_tracing, write_file};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn missing_file_uses_default_layout() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let cfg = load_or_default(dir.path().join("BuildTool.toml"))?;

    assert_eq!(cfg.task(TaskKind::Style).watch, vec![DEFAULT_STYLE_WATCH]);
    assert_eq!(cfg.task(TaskKind::Script).watch, vec![DEFAULT_SCRIPT_WATCH]);
    assert_eq!(cfg.task(TaskKind::Script).exclude, vec![MINIFIED_SCRIPT_EXCLUDE]);
    assert_eq!(cfg.build.suffix, ".min");
    assert_eq!(
        cfg.config.triggered_while_running_behaviour,
        TriggerWhileRunningBehaviour::Coalesce
    );
    assert_eq!(cfg.config.queue_length, 1);
    assert!(cfg.config.use_hash);
    Ok(())
}

#[test]
fn missing_file_is_an_error_for_strict_loading() {
    let dir = tempdir().unwrap();
    let err = load_and_validate(dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, BuildError::Io { .. }), "got {err:?}");
}

#[test]
fn toml_overrides_defaults() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let path = write_file(
        dir.path(),
        "BuildTool.toml",
        r#"
[config]
triggered_while_running_behaviour = "queue"
queue_length = 3
use_hash = false

[build]
suffix = ".prod"
browsers = ["last 2 chrome versions"]

[script]
watch = ["web/**/*.js"]
exclude = ["web/vendor/**"]
"#,
    );

    let cfg = load_and_validate(&path)?;

    assert_eq!(
        cfg.config.triggered_while_running_behaviour,
        TriggerWhileRunningBehaviour::Queue
    );
    assert_eq!(cfg.config.queue_length, 3);
    assert!(!cfg.config.use_hash);
    assert_eq!(cfg.build.suffix, ".prod");
    assert_eq!(cfg.build.browsers, vec!["last 2 chrome versions"]);

    // Untouched section keeps its default.
    assert_eq!(cfg.task(TaskKind::Style).watch, vec![DEFAULT_STYLE_WATCH]);

    let script = cfg.task(TaskKind::Script);
    assert_eq!(script.watch, vec!["web/**/*.js"]);
    assert_eq!(script.exclude, vec!["web/vendor/**", MINIFIED_SCRIPT_EXCLUDE]);
    Ok(())
}

#[test]
fn minified_exclude_is_not_duplicated() -> TestResult {
    let cfg = ConfigFileBuilder::new()
        .script_exclude(MINIFIED_SCRIPT_EXCLUDE)
        .build();

    let excludes = &cfg.task(TaskKind::Script).exclude;
    assert_eq!(excludes.iter().filter(|p| *p == MINIFIED_SCRIPT_EXCLUDE).count(), 1);
    Ok(())
}

#[test]
fn empty_suffix_is_rejected() {
    let err = ConfigFile::try_from(ConfigFileBuilder::new().suffix("").raw()).unwrap_err();
    assert!(matches!(err, BuildError::ConfigError(_)), "got {err:?}");
}

#[test]
fn suffix_with_separator_is_rejected() {
    let err = ConfigFile::try_from(ConfigFileBuilder::new().suffix("/min").raw()).unwrap_err();
    assert!(matches!(err, BuildError::ConfigError(_)), "got {err:?}");
}

#[test]
fn invalid_glob_is_rejected() {
    let raw = ConfigFileBuilder::new().style_watch("assets/[css").raw();
    let err = ConfigFile::try_from(raw).unwrap_err();
    match err {
        BuildError::ConfigError(msg) => assert!(msg.contains("assets/[css"), "got {msg}"),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn zero_queue_length_is_rejected() {
    let err = ConfigFile::try_from(ConfigFileBuilder::new().queue_length(0).raw()).unwrap_err();
    assert!(matches!(err, BuildError::ConfigError(_)), "got {err:?}");
}

#[test]
fn empty_watch_list_is_rejected() {
    let mut raw = ConfigFileBuilder::new().raw();
    raw.style.watch.clear();
    let err = ConfigFile::try_from(raw).unwrap_err();
    assert!(matches!(err, BuildError::ConfigError(_)), "got {err:?}");
}

#[test]
fn unknown_browser_query_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .browsers(&["definitely-not-a-browser 1"])
        .raw();
    let err = ConfigFile::try_from(raw).unwrap_err();
    assert!(matches!(err, BuildError::ConfigError(_)), "got {err:?}");
}

#[test]
fn unknown_behaviour_is_a_toml_error() -> TestResult {
    let dir = tempdir()?;
    let path = write_file(
        dir.path(),
        "BuildTool.toml",
        "[config]\ntriggered_while_running_behaviour = \"restart\"\n",
    );

    let err = load_and_validate(&path).unwrap_err();
    assert!(matches!(err, BuildError::TomlError(_)), "got {err:?}");
    Ok(())
}

#[test]
fn behaviour_parses_from_str() {
    assert_eq!(
        " Queue ".parse::<TriggerWhileRunningBehaviour>(),
        Ok(TriggerWhileRunningBehaviour::Queue)
    );
    assert!("restart".parse::<TriggerWhileRunningBehaviour>().is_err());
}
