//! Move planning: expand an mv-like request into concrete per-file moves.
//!
//! Planning never mutates anything; it validates the request shape and
//! produces the ordered `(source -> destination)` list the rewriter works
//! through. Per-source planning failures are collected, not fatal; the rest
//! of the batch still runs, and the exit code reflects the failures.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::Config;
use crate::project::{ModuleGraph, SourceTree};
use crate::resolve::normalize_path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub dest: PathBuf,
}

#[derive(Debug, Default)]
pub struct MovePlan {
    /// Ordered per-file moves, caller-supplied order preserved.
    pub moves: Vec<PlannedMove>,
    /// Sources that could not be planned, with the reason.
    pub rejected: Vec<(PathBuf, anyhow::Error)>,
}

impl MovePlan {
    /// Batch view keyed by original path, for cycle detection.
    pub fn as_move_map(&self) -> BTreeMap<PathBuf, PathBuf> {
        self.moves
            .iter()
            .map(|m| (m.source.clone(), m.dest.clone()))
            .collect()
    }
}

/// Expand `sources` into per-file moves targeting `dest`.
///
/// mv semantics: with multiple sources (or an existing directory destination)
/// each source lands at `dest/<basename>`; a single file source may also be
/// renamed onto a non-directory destination path.
pub fn build_move_plan(sources: &[PathBuf], dest: &Path, cfg: &Config) -> Result<MovePlan> {
    let dest = normalize_path(dest);
    let dest_is_dir = dest.is_dir() || sources.len() > 1;

    if sources.len() > 1 && dest.exists() && !dest.is_dir() {
        bail!(
            "destination '{}' must be a directory when moving multiple sources",
            dest.display()
        );
    }

    let mut plan = MovePlan::default();

    for source in sources {
        let source = normalize_path(source);

        if !source.exists() {
            plan.rejected.push((
                source.clone(),
                anyhow!("source does not exist: {}", source.display()),
            ));
            continue;
        }

        if source.is_dir() {
            if !cfg.recursive {
                plan.rejected.push((
                    source.clone(),
                    anyhow!(
                        "omitting directory '{}' (pass --recursive to move it)",
                        source.display()
                    ),
                ));
                continue;
            }
            let dir_name = source
                .file_name()
                .ok_or_else(|| anyhow!("directory source has no name: {}", source.display()))?;
            let target_root = dest.join(dir_name);

            for entry in WalkDir::new(&source)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file())
            {
                let rel = entry
                    .path()
                    .strip_prefix(&source)
                    .expect("walked entries live under the source dir");
                plan.moves.push(PlannedMove {
                    source: normalize_path(entry.path()),
                    dest: normalize_path(&target_root.join(rel)),
                });
            }
            continue;
        }

        let target = if dest_is_dir {
            let name = source
                .file_name()
                .ok_or_else(|| anyhow!("source has no file name: {}", source.display()))?;
            dest.join(name)
        } else {
            dest.clone()
        };
        plan.moves.push(PlannedMove {
            source,
            dest: normalize_path(&target),
        });
    }

    debug!(
        planned = plan.moves.len(),
        rejected = plan.rejected.len(),
        "built move plan"
    );
    Ok(plan)
}

/// Specifiers in other project files that point at each requested source
/// (directories aggregate over the files inside them). Input to the dry-run
/// previewer.
pub fn affected_imports_for_request(
    tree: &SourceTree,
    sources: &[PathBuf],
) -> BTreeMap<PathBuf, Vec<String>> {
    let mut affected = BTreeMap::new();

    for source in sources {
        let source = normalize_path(source);
        let mut specs = Vec::new();

        if source.is_dir() {
            for file in tree.files() {
                if file.starts_with(&source) {
                    for (_, mut matching) in tree.importers_of(&file) {
                        specs.append(&mut matching);
                    }
                }
            }
        } else {
            for (_, mut matching) in tree.importers_of(&source) {
                specs.append(&mut matching);
            }
        }
        affected.insert(source, specs);
    }
    affected
}
