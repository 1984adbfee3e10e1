use build_tool::config::{ConfigFile, RawConfigFile, TaskConfig};
use build_tool::types::TriggerWhileRunningBehaviour;

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the same defaults as a missing `BuildTool.toml`.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    /// Replace the style task's watch list with a single pattern.
    pub fn style_watch(mut self, pattern: &str) -> Self {
        self.config.style = TaskConfig {
            watch: vec![pattern.to_string()],
            exclude: self.config.style.exclude,
        };
        self
    }

    pub fn style_exclude(mut self, pattern: &str) -> Self {
        self.config.style.exclude.push(pattern.to_string());
        self
    }

    /// Replace the script task's watch list with a single pattern.
    pub fn script_watch(mut self, pattern: &str) -> Self {
        self.config.script = TaskConfig {
            watch: vec![pattern.to_string()],
            exclude: self.config.script.exclude,
        };
        self
    }

    pub fn script_exclude(mut self, pattern: &str) -> Self {
        self.config.script.exclude.push(pattern.to_string());
        self
    }

    pub fn suffix(mut self, suffix: &str) -> Self {
        self.config.build.suffix = suffix.to_string();
        self
    }

    pub fn browsers(mut self, queries: &[&str]) -> Self {
        self.config.build.browsers = queries.iter().map(|q| q.to_string()).collect();
        self
    }

    pub fn behaviour(mut self, behaviour: TriggerWhileRunningBehaviour) -> Self {
        self.config.config.triggered_while_running_behaviour = behaviour;
        self
    }

    pub fn queue_length(mut self, len: usize) -> Self {
        self.config.config.queue_length = len;
        self
    }

    pub fn use_hash(mut self, val: bool) -> Self {
        self.config.config.use_hash = val;
        self
    }

    /// The raw config, for tests that exercise validation failures.
    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
