// src/pipeline/minify.rs

use minify_js::{minify, Session, TopLevelMode};

use crate::errors::{BuildError, Result};
use crate::pipeline::{SourceFile, Stage};

/// Minifies JavaScript with `minify-js`.
///
/// Scripts are treated as classic (global) scripts, so top-level names stay
/// untouched and other files can keep referring to them.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinifyJs;

impl MinifyJs {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for MinifyJs {
    fn name(&self) -> &'static str {
        "minify-js"
    }

    fn apply(&self, mut file: SourceFile) -> Result<SourceFile> {
        let session = Session::new();
        let mut output = Vec::with_capacity(file.contents.len());

        minify(&session, TopLevelMode::Global, &file.contents, &mut output).map_err(|err| {
            BuildError::Minify {
                path: file.source.clone(),
                message: format!("{err:?}"),
            }
        })?;

        file.contents = output;
        Ok(file)
    }
}
