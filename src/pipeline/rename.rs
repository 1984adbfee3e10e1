// src/pipeline/rename.rs

use crate::errors::Result;
use crate::pipeline::{with_suffix, SourceFile, Stage};

/// Adds the configured suffix (`.min`) before the final extension.
#[derive(Debug, Clone)]
pub struct Rename {
    suffix: String,
}

impl Rename {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl Stage for Rename {
    fn name(&self) -> &'static str {
        "rename"
    }

    fn apply(&self, mut file: SourceFile) -> Result<SourceFile> {
        file.path = with_suffix(&file.path, &self.suffix);
        Ok(file)
    }
}
