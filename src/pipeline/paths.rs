// src/pipeline/paths.rs

use std::path::{Path, PathBuf};

/// Output directory for a source file: the directory it was found in.
pub fn destination(source: &Path) -> PathBuf {
    source
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// Insert `suffix` before the final extension: `app.js` + `.min` →
/// `app.min.js`. Files without an extension get the suffix appended.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let Some(stem) = path.file_stem() else {
        return path.to_path_buf();
    };

    let mut name = stem.to_os_string();
    name.push(suffix);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

/// Drop leading `./` components. Candidate paths are matched relative to
/// the root without them, so `./assets/**/*.js` means `assets/**/*.js`.
pub fn normalize_pattern(pattern: &str) -> &str {
    let mut pattern = pattern;
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest.trim_start_matches('/');
    }
    pattern
}

/// Literal directory prefix of a glob pattern, i.e. every leading `/`
/// separated component without glob metacharacters.
///
/// `assets/css/**/*.scss` → `assets/css`, `**/*.js` → `` (the root).
pub fn glob_base(pattern: &str) -> PathBuf {
    let components: Vec<&str> = pattern.split('/').collect();
    let mut base = PathBuf::new();

    // The last component names files, never a directory.
    for component in &components[..components.len().saturating_sub(1)] {
        if component.contains(['*', '?', '[', '{']) {
            break;
        }
        if component.is_empty() || *component == "." {
            continue;
        }
        base.push(component);
    }

    base
}
