// src/pipeline/mod.rs

//! Per-file transform pipeline.
//!
//! A [`SourceFile`] is read from disk, handed through an ordered list of
//! [`Stage`]s (each a pure `SourceFile -> SourceFile` step) and finally
//! written next to its source by the owning build task.
//!
//! - [`sass`]: Sass → compressed CSS (`grass`).
//! - [`prefix`]: vendor prefixes for configured browsers (`lightningcss`).
//! - [`minify`]: JavaScript minification (`minify-js`).
//! - [`rename`]: output suffix insertion.
//! - [`paths`]: the pure path rules shared by the stages and tasks.

pub mod minify;
pub mod paths;
pub mod prefix;
pub mod rename;
pub mod sass;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::Result;

pub use minify::MinifyJs;
pub use paths::{destination, glob_base, normalize_pattern, with_suffix};
pub use prefix::Autoprefix;
pub use rename::Rename;
pub use sass::CompileScss;

/// A file flowing through a pipeline.
///
/// `path` is the file's *current* name and changes as stages run (the
/// compile stage swaps the extension, the rename stage adds the suffix).
/// `source` always points at the file that was read, and is what errors and
/// the output destination refer to.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub source: PathBuf,
    /// Literal directory prefix of the glob that matched this file.
    pub base: PathBuf,
    pub contents: Vec<u8>,
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("path", &self.path)
            .field("source", &self.source)
            .field("base", &self.base)
            .field("len", &self.contents.len())
            .finish()
    }
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, base: impl Into<PathBuf>, contents: Vec<u8>) -> Self {
        let path = path.into();
        Self {
            source: path.clone(),
            path,
            base: base.into(),
            contents,
        }
    }

    /// Path of the source relative to its glob base.
    pub fn relative(&self) -> Option<&Path> {
        self.source.strip_prefix(&self.base).ok()
    }

    /// Where the transformed file is written: the glob base plus the
    /// source's relative directory (i.e. the source's own directory), under
    /// the file's current name.
    pub fn output_path(&self) -> PathBuf {
        let dir = match self.relative() {
            Some(rel) => self.base.join(destination(rel)),
            None => destination(&self.source),
        };
        match self.path.file_name() {
            Some(name) => dir.join(name),
            None => dir,
        }
    }
}

/// One transform step.
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    /// Transform the file. Implementations must be deterministic: equal
    /// input yields byte-identical output.
    fn apply(&self, file: SourceFile) -> Result<SourceFile>;
}

/// Ordered list of stages applied to every file of a task.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.stage_names()).finish()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage.
    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run all stages in order, stopping at the first error.
    pub fn run(&self, mut file: SourceFile) -> Result<SourceFile> {
        for stage in &self.stages {
            debug!(stage = stage.name(), path = %file.path.display(), "applying stage");
            file = stage.apply(file)?;
        }
        Ok(file)
    }
}
