// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// The two build tasks this tool knows about.
///
/// Used as the key of the task dispatch table and as the task identity
/// inside the watch engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskKind {
    /// Sass → compressed, prefixed `.min.css`.
    Style,
    /// JavaScript → minified `.min.js`.
    Script,
}

impl TaskKind {
    pub const ALL: [TaskKind; 2] = [TaskKind::Style, TaskKind::Script];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Style => "style",
            TaskKind::Script => "script",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behaviour when a change arrives while the same task is still running.
///
/// - `Coalesce`: remember a single pending re-run, no matter how many
///   changes arrive (default).
/// - `Queue`: remember up to `queue_length` re-runs.
///
/// A running build is never interrupted in either mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TriggerWhileRunningBehaviour {
    Queue,
    #[default]
    Coalesce,
}

impl FromStr for TriggerWhileRunningBehaviour {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "queue" => Ok(TriggerWhileRunningBehaviour::Queue),
            "coalesce" => Ok(TriggerWhileRunningBehaviour::Coalesce),
            other => Err(format!(
                "invalid triggered_while_running_behaviour: {other} \
                 (expected \"queue\" or \"coalesce\")"
            )),
        }
    }
}
