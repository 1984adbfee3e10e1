// src/tasks/script.rs

use crate::config::BuildSection;
use crate::pipeline::{MinifyJs, Pipeline, Rename};

/// minify → `.min` suffix.
pub fn pipeline(build: &BuildSection) -> Pipeline {
    Pipeline::new()
        .stage(MinifyJs::new())
        .stage(Rename::new(build.suffix.clone()))
}
