// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `build-tool`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "build-tool",
    version,
    about = "Compile Sass and minify JavaScript beside their sources, optionally watching.",
    long_about = None
)]
pub struct CliArgs {
    /// Task to run. Without a task, `style` and `script` are built once.
    #[arg(value_enum, value_name = "TASK")]
    pub task: Option<TaskArg>,

    /// Path to the config file (TOML).
    ///
    /// The file is optional; when it does not exist the built-in
    /// `assets/css` / `assets/js` layout is used. Its directory is the
    /// project root all globs are relative to.
    #[arg(long, value_name = "PATH", default_value = "BuildTool.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BUILD_TOOL_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Named tasks accepted on the command line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum TaskArg {
    /// Compile, prefix and rename stylesheets once.
    #[value(alias = "sass")]
    Style,
    /// Minify and rename scripts once.
    #[value(alias = "js")]
    Script,
    /// Watch sources and rebuild on change until interrupted.
    #[value(alias = "watcher")]
    Watch,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
