//! Relative specifier calculation.
//!
//! Given the directory of an importing file and the absolute path of the
//! imported file, produce the specifier the import statement should contain:
//! extension-stripped, `./`-prefixed, always forward-slash.

use std::path::Path;

use crate::resolve::SOURCE_EXTENSIONS;

/// Compute the normalized relative specifier from `from_dir` to `to_file`.
///
/// Deterministic: identical inputs yield an identical string regardless of
/// host path conventions (backslashes are converted on the way out).
pub fn calculate_relative_path(from_dir: &Path, to_file: &Path) -> String {
    let rel = pathdiff::diff_paths(to_file, from_dir)
        .unwrap_or_else(|| to_file.to_path_buf());

    let mut spec = rel.to_string_lossy().replace('\\', "/");

    // Imports are extensionless by convention; strip a recognized source
    // extension only (leave `.json`, `.css` and friends alone).
    for ext in SOURCE_EXTENSIONS {
        let suffix = format!(".{ext}");
        if spec.ends_with(&suffix) {
            spec.truncate(spec.len() - suffix.len());
            break;
        }
    }

    // A same-directory reference must read `./helpers`, not the bare package
    // name `helpers`.
    if !spec.starts_with('.') {
        spec = format!("./{spec}");
    }

    spec
}
