//! Project model: the module-graph port and its text-based implementation.
//!
//! The rewriting core talks to a `ModuleGraph` trait rather than a concrete
//! parser, so orchestration stays testable against an in-memory tree. The
//! shipped implementation, `SourceTree`, scans a project directory for source
//! modules and extracts import/export specifiers by quote-scanning, enough
//! for literal `import … from '…'`, `export … from '…'`, `require('…')` and
//! `import('…')` forms, which is all this tool rewrites.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::TsMoveError;
use crate::relative::calculate_relative_path;
use crate::resolve::{candidate_paths, normalize_path, paths_match, SOURCE_EXTENSIONS};

/// Directories never scanned for source modules.
pub const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".next",
    "dist",
    "build",
    "coverage",
    "out",
];

/// Alias mapping derived from tsconfig path mapping: specifiers starting with
/// `<prefix>/` resolve under `root`.
#[derive(Debug, Clone)]
pub struct AliasMap {
    pub prefix: String,
    pub root: PathBuf,
}

/// One import/export/require specifier found in a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRef {
    pub specifier: String,
    /// 1-based line number, for diagnostics only.
    pub line: usize,
}

impl ImportRef {
    pub fn is_relative(&self) -> bool {
        self.specifier.starts_with("./") || self.specifier.starts_with("../")
    }
}

/// The capability the rewriting core needs from a project representation.
pub trait ModuleGraph {
    fn contains(&self, path: &Path) -> bool;
    fn files(&self) -> Vec<PathBuf>;
    fn import_specifiers(&self, path: &Path) -> Result<Vec<ImportRef>>;
    /// Replace every occurrence of the exact quoted specifier `old` in the
    /// given module with `new`. Returns the number of replacements.
    fn set_import_specifier(&mut self, path: &Path, old: &str, new: &str) -> Result<usize>;
    /// Re-register a module at `new`, rewriting its own relative imports and
    /// every other module's specifiers that pointed at it. In-memory only;
    /// on-disk identity is the relocate-file collaborator's job. Returns the
    /// number of specifier edits made.
    fn relocate(&mut self, old: &Path, new: &Path, overwrite: bool) -> Result<usize>;
    fn add_file_if_exists(&mut self, path: &Path) -> bool;
    /// Whole-project dependency re-resolution; one pass after a batch.
    /// Returns the number of relative specifiers that no longer resolve.
    fn refresh_dependencies(&mut self) -> Result<usize>;
    /// Flush pending edits to disk.
    fn save(&mut self) -> Result<()>;
}

#[derive(Debug, Clone)]
struct Module {
    text: String,
    dirty: bool,
}

/// Text-backed module graph over one project root.
#[derive(Debug)]
pub struct SourceTree {
    root: PathBuf,
    extensions: Vec<String>,
    alias: Option<AliasMap>,
    prefer_alias: bool,
    modules: BTreeMap<PathBuf, Module>,
}

impl SourceTree {
    /// Scan `root` for source modules with the given extensions (no leading
    /// dots), loading their text into memory.
    pub fn scan(root: &Path, extensions: &[String]) -> Result<Self> {
        let root = normalize_path(root);
        let mut modules = BTreeMap::new();

        let walker = WalkDir::new(&root).into_iter().filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            !(e.file_type().is_dir() && IGNORED_DIRS.contains(&name.as_ref()))
        });

        for entry in walker.filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let matches_ext = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.iter().any(|x| x == e));
            if !matches_ext {
                continue;
            }
            let path = normalize_path(entry.path());
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read source file {}", path.display()))?;
            modules.insert(path, Module { text, dirty: false });
        }

        debug!(root = %root.display(), modules = modules.len(), "scanned project");

        Ok(Self {
            root,
            extensions: extensions.to_vec(),
            alias: None,
            prefer_alias: false,
            modules,
        })
    }

    /// Build a tree from literal `(path, text)` pairs. Test seam; nothing is
    /// read from or written to disk until `save`.
    pub fn from_files<I, P, S>(root: &Path, files: I) -> Self
    where
        I: IntoIterator<Item = (P, S)>,
        P: AsRef<Path>,
        S: Into<String>,
    {
        let modules = files
            .into_iter()
            .map(|(p, s)| {
                (
                    normalize_path(p.as_ref()),
                    Module {
                        text: s.into(),
                        dirty: false,
                    },
                )
            })
            .collect();
        Self {
            root: normalize_path(root),
            extensions: SOURCE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            alias: None,
            prefer_alias: false,
            modules,
        }
    }

    pub fn with_alias(mut self, alias: AliasMap, prefer_alias: bool) -> Self {
        self.alias = Some(AliasMap {
            prefix: alias.prefix,
            root: normalize_path(&alias.root),
        });
        self.prefer_alias = prefer_alias;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current text of a module, if tracked.
    pub fn module_text(&self, path: &Path) -> Option<&str> {
        self.modules
            .get(&normalize_path(path))
            .map(|m| m.text.as_str())
    }

    /// Candidate list for a specifier, honoring alias mappings. `None` for
    /// bare package imports, which never resolve inside the project.
    fn specifier_candidates(&self, specifier: &str, from_dir: &Path) -> Option<Vec<PathBuf>> {
        if specifier.starts_with("./") || specifier.starts_with("../") {
            return Some(candidate_paths(specifier, from_dir));
        }
        if let Some(alias) = &self.alias {
            let aliased = format!("{}/", alias.prefix);
            if let Some(rest) = specifier.strip_prefix(&aliased) {
                return Some(candidate_paths(rest, &alias.root));
            }
        }
        None
    }

    /// Resolve a specifier from the directory of an importing file to a
    /// concrete path: tracked modules win, then the filesystem, in fixed
    /// inference order.
    pub fn resolve_specifier_from(&self, specifier: &str, from_dir: &Path) -> Option<PathBuf> {
        let candidates = self.specifier_candidates(specifier, from_dir)?;
        candidates
            .into_iter()
            .find(|c| self.modules.contains_key(c) || c.is_file())
    }

    /// The specifier an import should use for `target`, written from
    /// `from_dir`. Alias form is used when requested and the target lives
    /// under the alias root; otherwise a relative specifier.
    fn display_specifier(&self, from_dir: &Path, target: &Path, want_alias: bool) -> String {
        if want_alias {
            if let Some(alias) = &self.alias {
                if let Ok(rel) = target.strip_prefix(&alias.root) {
                    let mut spec = rel.to_string_lossy().replace('\\', "/");
                    for ext in SOURCE_EXTENSIONS {
                        let suffix = format!(".{ext}");
                        if spec.ends_with(&suffix) {
                            spec.truncate(spec.len() - suffix.len());
                            break;
                        }
                    }
                    return format!("{}/{}", alias.prefix, spec);
                }
            }
        }
        calculate_relative_path(from_dir, target)
    }

    fn is_alias_specifier(&self, specifier: &str) -> bool {
        self.alias
            .as_ref()
            .is_some_and(|a| specifier.starts_with(&format!("{}/", a.prefix)))
    }

    /// Modules whose specifiers resolve to `target`, with the matching
    /// specifiers. Used for dry-run planning.
    pub fn importers_of(&self, target: &Path) -> Vec<(PathBuf, Vec<String>)> {
        let target = normalize_path(target);
        let mut importers = Vec::new();

        for (path, module) in &self.modules {
            if *path == target {
                continue;
            }
            let dir = parent_dir(path);
            let matching: Vec<String> = scan_specifiers(&module.text)
                .into_iter()
                .filter(|r| {
                    self.resolve_specifier_from(&r.specifier, &dir)
                        .is_some_and(|resolved| paths_match(&resolved, &target))
                })
                .map(|r| r.specifier)
                .collect();
            if !matching.is_empty() {
                importers.push((path.clone(), matching));
            }
        }
        importers
    }

    fn replace_specifier_in_text(text: &mut String, old: &str, new: &str) -> usize {
        let mut count = 0;
        for quote in ['\'', '"'] {
            let needle = format!("{quote}{old}{quote}");
            let replacement = format!("{quote}{new}{quote}");
            let n = text.matches(&needle).count();
            if n > 0 {
                *text = text.replace(&needle, &replacement);
                count += n;
            }
        }
        count
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"))
}

/// Extract the quoted string following `from`/`require(`/`import(` on one line.
fn quoted_after(line: &str, at: usize) -> Option<String> {
    let rest = &line[at..];
    let start = rest.find(['\'', '"'])?;
    let quote = rest[start..].chars().next()?;
    let body = &rest[start + 1..];
    let end = body.find(quote)?;
    Some(body[..end].to_string())
}

/// Pull the module specifier out of one line of source, if any.
pub(crate) fn extract_specifier(line: &str) -> Option<String> {
    let trimmed = line.trim_start();

    if trimmed.starts_with("import") || trimmed.starts_with("export") {
        if let Some(pos) = line.find("from") {
            return quoted_after(line, pos);
        }
        // Side-effect import: `import './polyfills';`
        if trimmed.starts_with("import") && !trimmed.contains('(') {
            return quoted_after(line, 0);
        }
    }
    if let Some(pos) = line.find("require(") {
        return quoted_after(line, pos);
    }
    if let Some(pos) = line.find("import(") {
        return quoted_after(line, pos);
    }
    None
}

/// All specifiers in a module body, with their line numbers.
pub(crate) fn scan_specifiers(text: &str) -> Vec<ImportRef> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            extract_specifier(line).map(|specifier| ImportRef {
                specifier,
                line: i + 1,
            })
        })
        .collect()
}

impl ModuleGraph for SourceTree {
    fn contains(&self, path: &Path) -> bool {
        self.modules.contains_key(&normalize_path(path))
    }

    fn files(&self) -> Vec<PathBuf> {
        self.modules.keys().cloned().collect()
    }

    fn import_specifiers(&self, path: &Path) -> Result<Vec<ImportRef>> {
        let key = normalize_path(path);
        let module = self
            .modules
            .get(&key)
            .ok_or(TsMoveError::SourceNotFound(key))?;
        Ok(scan_specifiers(&module.text))
    }

    fn set_import_specifier(&mut self, path: &Path, old: &str, new: &str) -> Result<usize> {
        let key = normalize_path(path);
        let module = self
            .modules
            .get_mut(&key)
            .ok_or(TsMoveError::SourceNotFound(key))?;
        let count = Self::replace_specifier_in_text(&mut module.text, old, new);
        if count > 0 {
            module.dirty = true;
        }
        Ok(count)
    }

    fn relocate(&mut self, old: &Path, new: &Path, overwrite: bool) -> Result<usize> {
        let old_key = normalize_path(old);
        let new_key = normalize_path(new);

        if !self.modules.contains_key(&old_key) {
            return Err(TsMoveError::SourceNotFound(old_key).into());
        }
        if old_key != new_key && !overwrite && self.modules.contains_key(&new_key) {
            return Err(TsMoveError::DestinationExists(new_key).into());
        }

        let old_dir = parent_dir(&old_key);
        let new_dir = parent_dir(&new_key);
        let mut edits = 0;

        // The moved file's own relative imports: resolve each against the old
        // directory, then recompute from the new one. Alias imports keep
        // working unchanged when the importer moves, so they are skipped here.
        let own_text = &self.modules[&old_key].text;
        let mut own_rewrites = Vec::new();
        for r in scan_specifiers(own_text) {
            if !r.is_relative() {
                continue;
            }
            if let Some(mut target) = self.resolve_specifier_from(&r.specifier, &old_dir) {
                if target == old_key {
                    // Self-import follows the file to its new identity.
                    target = new_key.clone();
                }
                let rewritten = self.display_specifier(&new_dir, &target, self.prefer_alias);
                if rewritten != r.specifier {
                    own_rewrites.push((r.specifier, rewritten));
                }
            }
        }

        // Every other module whose specifiers pointed at the old location.
        let mut ref_rewrites: Vec<(PathBuf, String, String)> = Vec::new();
        for (path, module) in &self.modules {
            if *path == old_key {
                continue;
            }
            let dir = parent_dir(path);
            for r in scan_specifiers(&module.text) {
                let resolved = self.resolve_specifier_from(&r.specifier, &dir);
                if resolved.is_some_and(|t| t == old_key) {
                    let want_alias = self.prefer_alias || self.is_alias_specifier(&r.specifier);
                    let rewritten = self.display_specifier(&dir, &new_key, want_alias);
                    if rewritten != r.specifier {
                        ref_rewrites.push((path.clone(), r.specifier, rewritten));
                    }
                }
            }
        }

        let mut moved = self
            .modules
            .remove(&old_key)
            .expect("presence checked above");
        for (old_spec, new_spec) in own_rewrites {
            let n = Self::replace_specifier_in_text(&mut moved.text, &old_spec, &new_spec);
            if n > 0 {
                moved.dirty = true;
                edits += n;
            }
        }
        // Always dirty: the module must be written at its new path on save.
        moved.dirty = true;
        self.modules.insert(new_key.clone(), moved);

        for (path, old_spec, new_spec) in ref_rewrites {
            edits += self.set_import_specifier(&path, &old_spec, &new_spec)?;
        }

        debug!(
            old = %old_key.display(),
            new = %new_key.display(),
            edits,
            "relocated module in graph"
        );
        Ok(edits)
    }

    fn add_file_if_exists(&mut self, path: &Path) -> bool {
        let key = normalize_path(path);
        if self.modules.contains_key(&key) {
            return true;
        }
        match std::fs::read_to_string(&key) {
            Ok(text) => {
                self.modules.insert(key, Module { text, dirty: false });
                true
            }
            Err(_) => false,
        }
    }

    fn refresh_dependencies(&mut self) -> Result<usize> {
        let mut unresolved = 0;
        for (path, module) in &self.modules {
            let dir = parent_dir(path);
            for r in scan_specifiers(&module.text) {
                if !r.is_relative() && !self.is_alias_specifier(&r.specifier) {
                    continue;
                }
                if self.resolve_specifier_from(&r.specifier, &dir).is_none() {
                    warn!(
                        file = %path.display(),
                        line = r.line,
                        specifier = %r.specifier,
                        "import does not resolve after batch"
                    );
                    unresolved += 1;
                }
            }
        }
        Ok(unresolved)
    }

    fn save(&mut self) -> Result<()> {
        for (path, module) in self.modules.iter_mut() {
            if !module.dirty {
                continue;
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create directory {}", parent.display())
                })?;
            }
            std::fs::write(path, &module.text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            module.dirty = false;
        }
        Ok(())
    }
}
