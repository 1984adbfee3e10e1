// src/pipeline/sass.rs

//! Sass compilation using the `grass` crate.
//!
//! Imports are resolved relative to the importing stylesheet and read
//! through the crate's [`FileSystem`], so partials work the same against
//! the real disk and the in-memory mock.

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use grass::{Options, OutputStyle};
use regex::Regex;

use crate::errors::{BuildError, Result};
use crate::fs::FileSystem;
use crate::pipeline::{SourceFile, Stage};

/// `  input.scss 3:14  root stylesheet` → line 3.
static TRACE_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\S+\s+(\d+):(\d+)\s+root stylesheet\s*$").expect("static regex")
});

/// Gutter of the offending snippet line, e.g. `3 │   color: red`.
static GUTTER_LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(\d+)\s+│").expect("static regex"));

/// Compiles Sass to compressed CSS and switches the extension to `.css`.
#[derive(Clone)]
pub struct CompileScss {
    fs: Arc<dyn FileSystem>,
    style: OutputStyle,
}

impl fmt::Debug for CompileScss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileScss").finish_non_exhaustive()
    }
}

impl CompileScss {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            style: OutputStyle::Compressed,
        }
    }
}

impl Stage for CompileScss {
    fn name(&self) -> &'static str {
        "compile-scss"
    }

    fn apply(&self, mut file: SourceFile) -> Result<SourceFile> {
        let input = String::from_utf8(file.contents).map_err(|e| BuildError::Compile {
            path: file.source.clone(),
            line: None,
            message: format!("source is not valid UTF-8: {e}"),
        })?;

        let adapter = GrassFs {
            fs: self.fs.as_ref(),
        };
        let mut options = Options::default().fs(&adapter).style(self.style);
        if let Some(dir) = file.source.parent() {
            options = options.load_path(dir);
        }

        let css = grass::from_string(input, &options)
            .map_err(|e| compile_error(&file.source, &e.to_string()))?;

        file.contents = css.into_bytes();
        file.path = file.path.with_extension("css");
        Ok(file)
    }
}

/// Turn a rendered grass diagnostic into a `BuildError::Compile`, keeping the
/// headline as the message and the 1-based line number when present.
pub fn compile_error(path: &Path, diagnostic: &str) -> BuildError {
    let line = TRACE_LOCATION
        .captures(diagnostic)
        .or_else(|| GUTTER_LOCATION.captures(diagnostic))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<usize>().ok());

    let headline = diagnostic
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("unknown error");
    let message = headline
        .strip_prefix("Error: ")
        .unwrap_or(headline)
        .to_string();

    BuildError::Compile {
        path: path.to_path_buf(),
        line,
        message,
    }
}

/// Adapter that lets `grass` resolve imports through our [`FileSystem`].
struct GrassFs<'a> {
    fs: &'a dyn FileSystem,
}

impl fmt::Debug for GrassFs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrassFs").finish_non_exhaustive()
    }
}

impl grass::Fs for GrassFs<'_> {
    fn is_dir(&self, path: &Path) -> bool {
        self.fs.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.fs.is_file(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.fs
            .read(path)
            .map_err(|e| io::Error::new(io::ErrorKind::NotFound, format!("{e:#}")))
    }
}

/// Sass partials (`_name.scss`) are only ever imported, never compiled on
/// their own.
pub fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'))
}
