// src/config/validate.rs

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile, TaskConfig};
use crate::errors::{BuildError, Result};
use crate::pipeline::prefix::resolve_targets;
use crate::types::TaskKind;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = BuildError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        let script = raw.script.with_minified_exclude();
        Ok(ConfigFile::new_unchecked(raw.config, raw.build, raw.style, script))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_global_config(cfg)?;
    validate_build_section(cfg)?;
    validate_task(TaskKind::Style, &cfg.style)?;
    validate_task(TaskKind::Script, &cfg.script)?;
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.queue_length == 0 {
        return Err(BuildError::ConfigError(
            "[config].queue_length must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_build_section(cfg: &RawConfigFile) -> Result<()> {
    let suffix = &cfg.build.suffix;
    if suffix.is_empty() {
        return Err(BuildError::ConfigError(
            "[build].suffix must not be empty (scripts would overwrite their sources)".to_string(),
        ));
    }
    if suffix.contains('/') || suffix.contains('\\') {
        return Err(BuildError::ConfigError(format!(
            "[build].suffix must not contain path separators (got {suffix:?})"
        )));
    }

    resolve_targets(&cfg.build.browsers).map_err(|e| {
        BuildError::ConfigError(format!("[build].browsers is not a valid query: {e}"))
    })?;

    Ok(())
}

fn validate_task(kind: TaskKind, task: &TaskConfig) -> Result<()> {
    if task.watch.is_empty() {
        return Err(BuildError::ConfigError(format!(
            "[{kind}].watch must contain at least one glob pattern"
        )));
    }

    for pattern in task.watch.iter().chain(task.exclude.iter()) {
        Glob::new(pattern).map_err(|e| {
            BuildError::ConfigError(format!("[{kind}] has an invalid glob {pattern:?}: {e}"))
        })?;
    }

    Ok(())
}
