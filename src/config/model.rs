// src/config/model.rs

use serde::Deserialize;

use crate::types::{TaskKind, TriggerWhileRunningBehaviour};

/// Stylesheet sources, relative to the project root.
pub const DEFAULT_STYLE_WATCH: &str = "assets/css/**/*.scss";

/// Script sources, relative to the project root.
pub const DEFAULT_SCRIPT_WATCH: &str = "assets/js/**/*.js";

/// Exclusion appended to every script task so already-minified output is
/// never picked up again (no `.min.min.js`, no watch loops).
pub const MINIFIED_SCRIPT_EXCLUDE: &str = "**/*.min.js";

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// triggered_while_running_behaviour = "coalesce"
/// queue_length = 1
/// use_hash = true
///
/// [build]
/// suffix = ".min"
/// browsers = ["defaults"]
///
/// [style]
/// watch = ["assets/css/**/*.scss"]
///
/// [script]
/// watch = ["assets/js/**/*.js"]
/// ```
///
/// All sections are optional and default to the `assets/css` +
/// `assets/js` layout.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default = "TaskConfig::default_style")]
    pub style: TaskConfig,

    #[serde(default = "TaskConfig::default_script")]
    pub script: TaskConfig,
}

impl Default for RawConfigFile {
    fn default() -> Self {
        Self {
            config: ConfigSection::default(),
            build: BuildSection::default(),
            style: TaskConfig::default_style(),
            script: TaskConfig::default_script(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`), so
/// holders can rely on non-empty watch lists, a sane suffix and the
/// `*.min.js` exclusion being present on the script task.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub build: BuildSection,
    style: TaskConfig,
    script: TaskConfig,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        build: BuildSection,
        style: TaskConfig,
        script: TaskConfig,
    ) -> Self {
        Self {
            config,
            build,
            style,
            script,
        }
    }

    /// Task section for the given kind.
    pub fn task(&self, kind: TaskKind) -> &TaskConfig {
        match kind {
            TaskKind::Style => &self.style,
            TaskKind::Script => &self.script,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let raw = RawConfigFile::default();
        let script = raw.script.with_minified_exclude();
        Self::new_unchecked(raw.config, raw.build, raw.style, script)
    }
}

/// `[config]` section: watch-mode behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// `"coalesce"` (default) or `"queue"`.
    #[serde(default)]
    pub triggered_while_running_behaviour: TriggerWhileRunningBehaviour,

    /// Maximum number of pending re-runs per task in `"queue"` mode.
    #[serde(default = "default_queue_length")]
    pub queue_length: usize,

    /// Only trigger a rebuild when the changed file's content hash differs
    /// from the last one seen.
    #[serde(default = "default_use_hash")]
    pub use_hash: bool,
}

fn default_queue_length() -> usize {
    1
}

fn default_use_hash() -> bool {
    true
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            triggered_while_running_behaviour: TriggerWhileRunningBehaviour::default(),
            queue_length: default_queue_length(),
            use_hash: default_use_hash(),
        }
    }
}

/// `[build]` section: output naming and CSS targets.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// Inserted before the final extension of every output file.
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Browserslist queries deciding which vendor prefixes are emitted.
    #[serde(default = "default_browsers")]
    pub browsers: Vec<String>,
}

fn default_suffix() -> String {
    ".min".to_string()
}

fn default_browsers() -> Vec<String> {
    vec!["defaults".to_string()]
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            browsers: default_browsers(),
        }
    }
}

/// `[style]` / `[script]` sections.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Globs selecting source files, relative to the project root.
    pub watch: Vec<String>,

    /// Globs removing files from `watch`.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl TaskConfig {
    pub fn default_style() -> Self {
        Self {
            watch: vec![DEFAULT_STYLE_WATCH.to_string()],
            exclude: Vec::new(),
        }
    }

    pub fn default_script() -> Self {
        Self {
            watch: vec![DEFAULT_SCRIPT_WATCH.to_string()],
            exclude: Vec::new(),
        }
    }

    /// Same task with the `*.min.js` exclusion appended (once).
    pub(crate) fn with_minified_exclude(mut self) -> Self {
        if !self.exclude.iter().any(|p| p == MINIFIED_SCRIPT_EXCLUDE) {
            self.exclude.push(MINIFIED_SCRIPT_EXCLUDE.to_string());
        }
        self
    }
}
