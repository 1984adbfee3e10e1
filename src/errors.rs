// src/errors.rs

//! Crate-wide error type.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    /// Stylesheet could not be compiled (or post-processed into valid CSS).
    #[error("failed to compile {}: {message}", location(.path, .line))]
    Compile {
        path: PathBuf,
        line: Option<usize>,
        message: String,
    },

    /// Script could not be parsed by the minifier.
    #[error("failed to minify {}: {message}", .path.display())]
    Minify { path: PathBuf, message: String },

    #[error("I/O error on {}: {reason}", .path.display())]
    Io { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BuildError {
    /// Wrap a filesystem failure together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        BuildError::Io {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    /// Path of the source file this error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            BuildError::Compile { path, .. }
            | BuildError::Minify { path, .. }
            | BuildError::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}

fn location(path: &Path, line: &Option<usize>) -> String {
    match line {
        Some(line) => format!("{}:{line}", path.display()),
        None => path.display().to_string(),
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BuildError>;
