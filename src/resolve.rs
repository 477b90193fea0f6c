//! Module specifier resolution.
//!
//! Turns the string written in an import/export statement into a concrete file
//! path, applying the usual TypeScript/JavaScript inference rules:
//!  - an explicit recognized extension resolves directly;
//!  - otherwise each of `.ts, .tsx, .js, .jsx` is tried in that fixed order;
//!  - otherwise `<path>/index.ts` (directory-as-module convention).
//!
//! Resolution that finds nothing is not an error: callers still get the
//! normalized candidate path with `exists = false`, which downstream rewriting
//! may want anyway.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

/// Extensions recognized as source modules, in inference order.
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Result of resolving one module specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImport {
    /// Absolute, lexically normalized path of the best candidate.
    pub path: PathBuf,
    /// Whether that candidate denoted a real file at resolution time.
    pub exists: bool,
}

/// Whether `path` carries one of the recognized source extensions.
pub fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SOURCE_EXTENSIONS.contains(&e))
}

/// Absolute + lexically normalized form of `path` (no filesystem access, so
/// it works for paths that do not exist yet).
pub fn normalize_path(path: &Path) -> PathBuf {
    let abs = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|d| d.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    dunce::simplified(&abs.clean()).to_path_buf()
}

/// Two paths denote the same file iff their normalized absolute forms are
/// identical. Handles the same file spelled via different relative routes.
pub fn paths_match(a: &Path, b: &Path) -> bool {
    normalize_path(a) == normalize_path(b)
}

/// Append `.ext` to a path without disturbing any existing dots in the name
/// (`set_extension` would clobber `foo.config` -> `foo.ts`).
fn with_appended_extension(path: &Path, ext: &str) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_owned();
    os.push(".");
    os.push(ext);
    PathBuf::from(os)
}

/// Ordered candidate paths a specifier may denote, relative to `from_dir`.
///
/// The first element is always the bare normalized join; when the specifier
/// has no recognized extension the per-extension and `index.ts` candidates
/// follow in inference order. Shared by the filesystem resolver below and by
/// the in-memory project model, which checks candidates against its own file
/// set instead of the disk.
pub fn candidate_paths(specifier: &str, from_dir: &Path) -> Vec<PathBuf> {
    let base = normalize_path(&from_dir.join(specifier));

    if has_source_extension(&base) {
        return vec![base];
    }

    let mut candidates = Vec::with_capacity(SOURCE_EXTENSIONS.len() + 2);
    candidates.push(base.clone());
    for ext in SOURCE_EXTENSIONS {
        candidates.push(with_appended_extension(&base, ext));
    }
    candidates.push(base.join("index.ts"));
    candidates
}

/// Resolve a relative module specifier against the directory of the importing
/// file, checking the filesystem for each candidate.
pub fn resolve_relative_import(specifier: &str, from_dir: &Path) -> ResolvedImport {
    let candidates = candidate_paths(specifier, from_dir);

    // Explicit extension: exists reflects a direct check, no inference.
    if candidates.len() == 1 {
        let path = candidates.into_iter().next().expect("one candidate");
        let exists = path.is_file();
        return ResolvedImport { path, exists };
    }

    for candidate in candidates.iter().skip(1) {
        if candidate.is_file() {
            return ResolvedImport {
                path: candidate.clone(),
                exists: true,
            };
        }
    }

    // Nothing on disk: hand back the bare candidate so callers can still
    // compute the would-be path.
    ResolvedImport {
        path: candidates.into_iter().next().expect("bare candidate"),
        exists: false,
    }
}
