// src/tasks/style.rs

use std::path::Path;
use std::sync::Arc;

use crate::config::BuildSection;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::pipeline::sass::is_partial;
use crate::pipeline::{Autoprefix, CompileScss, Pipeline, Rename};

/// compile (compressed) → vendor prefixes → `.min` suffix.
pub fn pipeline(build: &BuildSection, fs: Arc<dyn FileSystem>) -> Result<Pipeline> {
    Ok(Pipeline::new()
        .stage(CompileScss::new(fs))
        .stage(Autoprefix::from_queries(&build.browsers)?)
        .stage(Rename::new(build.suffix.clone())))
}

/// Partials are watched (editing one rebuilds the task) but never produce
/// an output of their own.
pub fn is_entry_point(path: &Path) -> bool {
    !is_partial(path)
}
