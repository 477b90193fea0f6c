//! tsconfig.json loading.
//!
//! The parser is intentionally minimal and tolerant: it strips JSONC comments,
//! then pulls `compilerOptions.baseUrl` and the first wildcard entry out of
//! `compilerOptions.paths` (e.g. `"@/*": ["src/*"]`). If no useful mapping is
//! found the loader returns None and alias rewriting simply stays off.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::resolve::normalize_path;

/// Path-mapping facts extracted from a tsconfig file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsconfigPaths {
    /// Alias prefix without the trailing `/*` (e.g. `@`).
    pub alias_prefix: String,
    /// Absolute directory the alias maps to.
    pub alias_root: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsconfigFile {
    #[serde(default)]
    compiler_options: CompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompilerOptions {
    base_url: Option<String>,
    /// Pattern -> target list, e.g. `"@/*": ["src/*"]`. BTreeMap keeps the
    /// entry choice deterministic across runs.
    paths: Option<BTreeMap<String, Vec<String>>>,
}

/// Remove `//` line comments and `/* */` block comments outside of strings,
/// so JSONC-flavored tsconfig files parse with a strict JSON parser.
fn strip_jsonc_comments(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    let mut in_string = false;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' && i + 1 < chars.len() {
                out.push(chars[i + 1]);
                i += 2;
                continue;
            }
            if c == '"' {
                in_string = false;
            }
            i += 1;
        } else if c == '"' {
            in_string = true;
            out.push(c);
            i += 1;
        } else if c == '/' && i + 1 < chars.len() && chars[i + 1] == '/' {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
        } else if c == '/' && i + 1 < chars.len() && chars[i + 1] == '*' {
            i += 2;
            while i + 1 < chars.len() && !(chars[i] == '*' && chars[i + 1] == '/') {
                i += 1;
            }
            i = (i + 2).min(chars.len());
        } else {
            out.push(c);
            i += 1;
        }
    }
    out
}

/// Load alias path mapping from a tsconfig file, if present and useful.
pub fn load_tsconfig(path: &Path) -> Option<TsconfigPaths> {
    let content = std::fs::read_to_string(path).ok()?;
    let parsed: TsconfigFile = serde_json::from_str(&strip_jsonc_comments(&content)).ok()?;

    let options = parsed.compiler_options;
    let base_url = options.base_url.as_deref().unwrap_or(".");
    let paths = options.paths?;

    let config_dir = path.parent().unwrap_or(Path::new("."));

    for (pattern, targets) in &paths {
        let Some(prefix) = pattern.strip_suffix("/*") else {
            continue;
        };
        let Some(target) = targets
            .first()
            .and_then(|t| t.strip_suffix("/*"))
        else {
            continue;
        };

        let alias_root = normalize_path(&config_dir.join(base_url).join(target));
        debug!(prefix, root = %alias_root.display(), "loaded tsconfig path mapping");
        return Some(TsconfigPaths {
            alias_prefix: prefix.to_string(),
            alias_root,
        });
    }
    None
}

/// Look for a tsconfig.json walking up from `start` to the filesystem root.
pub fn find_tsconfig(start: &Path) -> Option<PathBuf> {
    let mut dir = normalize_path(start);
    loop {
        let candidate = dir.join("tsconfig.json");
        if candidate.is_file() {
            return Some(candidate);
        }
        match dir.parent() {
            Some(parent) => dir = parent.to_path_buf(),
            None => return None,
        }
    }
}
