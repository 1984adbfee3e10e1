// src/pipeline/prefix.rs

//! Vendor prefixing via `lightningcss`.
//!
//! The stylesheet is parsed, minified against the configured browser
//! targets (which adds the prefixes those browsers need and drops the ones
//! none of them need) and printed back in minified form.

use anyhow::anyhow;
use lightningcss::printer::PrinterOptions;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};

use crate::errors::{BuildError, Result};
use crate::pipeline::{SourceFile, Stage};

/// Resolve browserslist queries (e.g. `["defaults"]`) into CSS targets.
pub fn resolve_targets(queries: &[String]) -> anyhow::Result<Targets> {
    if queries.is_empty() {
        return Ok(Targets::default());
    }

    let browsers = Browsers::from_browserslist(queries.iter().map(String::as_str))
        .map_err(|e| anyhow!("{e}"))?;

    Ok(browsers.map(Targets::from).unwrap_or_default())
}

#[derive(Debug, Clone)]
pub struct Autoprefix {
    targets: Targets,
}

impl Autoprefix {
    pub fn new(targets: Targets) -> Self {
        Self { targets }
    }

    pub fn from_queries(queries: &[String]) -> Result<Self> {
        Ok(Self::new(resolve_targets(queries)?))
    }
}

impl Stage for Autoprefix {
    fn name(&self) -> &'static str {
        "autoprefix"
    }

    fn apply(&self, mut file: SourceFile) -> Result<SourceFile> {
        let code = {
            let css = std::str::from_utf8(&file.contents).map_err(|e| BuildError::Compile {
                path: file.source.clone(),
                line: None,
                message: format!("compiled CSS is not valid UTF-8: {e}"),
            })?;

            let parser_options = ParserOptions {
                filename: file.source.display().to_string(),
                ..ParserOptions::default()
            };
            let mut sheet = StyleSheet::parse(css, parser_options).map_err(|e| {
                BuildError::Compile {
                    path: file.source.clone(),
                    line: e.loc.as_ref().map(|loc| loc.line as usize + 1),
                    message: e.to_string(),
                }
            })?;

            sheet
                .minify(MinifyOptions {
                    targets: self.targets.clone(),
                    ..MinifyOptions::default()
                })
                .map_err(|e| BuildError::Compile {
                    path: file.source.clone(),
                    line: e.loc.as_ref().map(|loc| loc.line as usize + 1),
                    message: e.to_string(),
                })?;

            let printed = sheet
                .to_css(PrinterOptions {
                    minify: true,
                    targets: self.targets.clone(),
                    ..PrinterOptions::default()
                })
                .map_err(|e| BuildError::Compile {
                    path: file.source.clone(),
                    line: e.loc.as_ref().map(|loc| loc.line as usize + 1),
                    message: e.to_string(),
                })?;

            printed.code
        };

        file.contents = code.into_bytes();
        Ok(file)
    }
}
