//! Import rewriting orchestration.
//!
//! Works through a planned batch one file at a time, in caller order: move the
//! on-disk identity, re-register the module in the graph (which rewrites its
//! own relative imports and every referencing module), record the move in the
//! tracker. Per-file failures abort only that file; the remaining batch still
//! runs. One project-wide dependency refresh and one cycle-detection pass
//! happen after the whole batch, not per file.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::cycles::{detect_cycles, CycleReport};
use crate::errors::TsMoveError;
use crate::fs_ops;
use crate::output;
use crate::plan::{MovePlan, PlannedMove};
use crate::project::{ModuleGraph, SourceTree};
use crate::resolve::normalize_path;
use crate::shutdown;
use crate::tracker::MoveTracker;

/// What happened to one batch.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Moves applied, in execution order.
    pub completed: Vec<PlannedMove>,
    /// Moves skipped by overwrite policy or a declined prompt.
    pub skipped: Vec<PathBuf>,
    /// Per-file failures; the batch continued past them.
    pub failures: Vec<(PathBuf, anyhow::Error)>,
    /// Total specifier edits across all files.
    pub import_edits: usize,
    /// Relative specifiers that no longer resolve after the batch.
    pub unresolved_after: usize,
    pub cycle: CycleReport,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Move one tracked module and rewrite every import affected by it.
/// Returns the number of specifier edits.
///
/// The module must already be known to the project model; the overwrite
/// decision has been made by the caller (`--force`, prompt, or policy).
pub fn update_imports(
    tree: &mut SourceTree,
    old: &Path,
    new: &Path,
    overwrite: bool,
) -> Result<usize> {
    let old = normalize_path(old);
    let new = normalize_path(new);

    if !tree.contains(&old) {
        return Err(TsMoveError::SourceNotFound(old).into());
    }

    fs_ops::relocate_file(&old, &new, overwrite)?;
    // The graph repeats the destination check; the filesystem already
    // enforced policy, so pass it through.
    let edits = tree.relocate(&old, &new, true)?;
    Ok(edits)
}

/// Decide overwrite for a destination that already exists.
/// `Some(true)` proceed overwriting, `Some(false)` skip, `Err` refuse.
fn overwrite_decision(cfg: &Config, dest: &Path) -> Result<bool> {
    match cfg.overwrite_policy() {
        Some(decision) => Ok(decision),
        None if cfg.interactive => {
            Ok(output::confirm(&format!("overwrite {}?", dest.display())))
        }
        None => Err(TsMoveError::DestinationExists(dest.to_path_buf()).into()),
    }
}

/// Run a whole planned batch against the project model.
pub fn update_imports_in_moved_files(
    tree: &mut SourceTree,
    plan: &MovePlan,
    tracker: &mut MoveTracker,
    cfg: &Config,
) -> Result<BatchOutcome> {
    let mut completed: Vec<PlannedMove> = Vec::new();
    let mut skipped: Vec<PathBuf> = Vec::new();
    let mut failures: Vec<(PathBuf, anyhow::Error)> = Vec::new();
    let mut import_edits = 0;

    for planned in &plan.moves {
        if shutdown::is_requested() {
            warn!("shutdown requested; leaving the rest of the batch untouched");
            break;
        }

        // A source moved earlier in this same batch is picked up at its
        // current location (chained moves).
        let old = tracker
            .find_new_location(&planned.source)
            .unwrap_or_else(|| planned.source.clone());
        let dest = planned.dest.clone();

        let mut overwrite = false;
        if dest != old && (dest.exists() || tree.contains(&dest)) {
            match overwrite_decision(cfg, &dest) {
                Ok(true) => overwrite = true,
                Ok(false) => {
                    info!(dest = %dest.display(), "destination exists; skipping");
                    skipped.push(planned.source.clone());
                    continue;
                }
                Err(e) => {
                    failures.push((planned.source.clone(), e));
                    continue;
                }
            }
        }

        let result = if tree.contains(&old) {
            update_imports(tree, &old, &dest, overwrite)
        } else {
            // Not a tracked module (asset in a directory move): plain
            // relocation, nothing to rewrite.
            debug!(path = %old.display(), "untracked file; moving without rewrite");
            fs_ops::relocate_file(&old, &dest, overwrite).map(|()| 0)
        };

        match result {
            Ok(edits) => {
                import_edits += edits;
                tracker.record_move(&old, &dest);
                if old != planned.source {
                    // Keep the originally requested path resolvable too.
                    tracker.record_move(&planned.source, &dest);
                }
                if cfg.verbose {
                    output::print_user(&format!(
                        "{} -> {} ({edits} import{} updated)",
                        old.display(),
                        dest.display(),
                        if edits == 1 { "" } else { "s" },
                    ));
                }
                info!(src = %old.display(), dest = %dest.display(), edits, "moved");
                completed.push(PlannedMove {
                    source: old,
                    dest,
                });
            }
            Err(e) => {
                failures.push((planned.source.clone(), e));
            }
        }
    }

    // Single whole-project pass; surfaced but never rolls anything back.
    let unresolved_after = tree.refresh_dependencies()?;
    if unresolved_after > 0 {
        warn!(unresolved_after, "imports left unresolved after batch");
    }

    let move_map = completed
        .iter()
        .map(|m| (m.source.clone(), m.dest.clone()))
        .collect();
    let cycle = detect_cycles(tree, &move_map);
    if cycle.has_cycle {
        let path = cycle
            .cycle_path
            .as_deref()
            .unwrap_or_default()
            .join(" -> ");
        warn!(cycle = %path, "circular dependency among moved files");
    }

    tree.save()?;

    Ok(BatchOutcome {
        completed,
        skipped,
        failures,
        import_edits,
        unresolved_after,
        cycle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::build_move_plan;
    use crate::project::SourceTree;
    use std::fs;
    use tempfile::tempdir;

    fn write(path: &Path, text: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn update_imports_moves_file_and_rewrites_importer() {
        let td = tempdir().unwrap();
        let root = td.path();
        let helpers = root.join("src/utils/helpers.ts");
        let button = root.join("src/components/Button.ts");
        write(&helpers, "export const toTitleCase = (s: string) => s;\n");
        write(
            &button,
            "import { toTitleCase } from '../utils/helpers';\n",
        );

        let exts: Vec<String> = vec!["ts".into(), "tsx".into()];
        let mut tree = SourceTree::scan(root, &exts).unwrap();

        let dest = root.join("src/shared/helpers.ts");
        let edits = update_imports(&mut tree, &helpers, &dest, false).unwrap();
        assert_eq!(edits, 1);
        tree.save().unwrap();

        assert!(!helpers.exists());
        assert!(dest.exists());
        let rewritten = fs::read_to_string(&button).unwrap();
        assert!(rewritten.contains("'../shared/helpers'"), "got: {rewritten}");
        assert!(!rewritten.contains("'../utils/helpers'"));
    }

    #[test]
    fn update_imports_requires_tracked_source() {
        let td = tempdir().unwrap();
        let mut tree = SourceTree::from_files(td.path(), [(td.path().join("a.ts"), "")]);
        let err = update_imports(
            &mut tree,
            &td.path().join("ghost.ts"),
            &td.path().join("b.ts"),
            false,
        )
        .unwrap_err();
        let kind = err
            .downcast_ref::<TsMoveError>()
            .map(TsMoveError::kind)
            .unwrap();
        assert_eq!(kind, "source_not_found");
    }

    #[test]
    fn batch_continues_past_per_file_failures() {
        let td = tempdir().unwrap();
        let root = td.path();
        let good = root.join("src/good.ts");
        let blocked = root.join("src/blocked.ts");
        let occupied = root.join("dst/blocked.ts");
        write(&good, "export const g = 1;\n");
        write(&blocked, "export const b = 1;\n");
        write(&occupied, "already here\n");

        let exts: Vec<String> = vec!["ts".into()];
        let mut tree = SourceTree::scan(root, &exts).unwrap();
        let mut tracker = MoveTracker::new();
        let cfg = Config::default();

        let plan = build_move_plan(
            &[blocked.clone(), good.clone()],
            &root.join("dst"),
            &cfg,
        )
        .unwrap();
        let outcome = update_imports_in_moved_files(&mut tree, &plan, &mut tracker, &cfg).unwrap();

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.completed.len(), 1);
        assert!(root.join("dst/good.ts").exists());
        assert!(blocked.exists(), "failed move must leave its source alone");
        assert_eq!(
            fs::read_to_string(&occupied).unwrap(),
            "already here\n",
            "existing destination must not be clobbered without --force"
        );
    }

    #[test]
    fn no_clobber_skips_quietly_and_force_overwrites() {
        let td = tempdir().unwrap();
        let root = td.path();
        let src = root.join("a.ts");
        let dst_dir = root.join("dst");
        write(&src, "fresh\n");
        write(&dst_dir.join("a.ts"), "stale\n");

        let exts: Vec<String> = vec!["ts".into()];
        let mut tracker = MoveTracker::new();

        let cfg = Config {
            no_clobber: true,
            ..Config::default()
        };
        let mut tree = SourceTree::scan(root, &exts).unwrap();
        let plan = build_move_plan(&[src.clone()], &dst_dir, &cfg).unwrap();
        let outcome = update_imports_in_moved_files(&mut tree, &plan, &mut tracker, &cfg).unwrap();
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.is_clean());
        assert!(src.exists());

        tracker.clear();
        let cfg = Config {
            force: true,
            ..Config::default()
        };
        let mut tree = SourceTree::scan(root, &exts).unwrap();
        let plan = build_move_plan(&[src.clone()], &dst_dir, &cfg).unwrap();
        let outcome = update_imports_in_moved_files(&mut tree, &plan, &mut tracker, &cfg).unwrap();
        assert!(outcome.is_clean());
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(dst_dir.join("a.ts")).unwrap(), "fresh\n");
    }

    #[test]
    fn chained_batch_keeps_cross_moved_imports_consistent() {
        let td = tempdir().unwrap();
        let root = td.path();
        let a = root.join("src/ComponentA/ComponentA.ts");
        let b = root.join("src/ComponentB/ComponentB.ts");
        write(&a, "export const A = 'a';\n");
        write(&b, "import { A } from '../ComponentA/ComponentA';\n");

        let exts: Vec<String> = vec!["ts".into()];
        let mut tree = SourceTree::scan(root, &exts).unwrap();
        let mut tracker = MoveTracker::new();
        let cfg = Config {
            recursive: true,
            ..Config::default()
        };

        let plan = build_move_plan(
            &[
                root.join("src/ComponentA"),
                root.join("src/ComponentB"),
            ],
            &root.join("src/features"),
            &cfg,
        )
        .unwrap();
        let outcome = update_imports_in_moved_files(&mut tree, &plan, &mut tracker, &cfg).unwrap();

        assert!(outcome.is_clean(), "failures: {:?}", outcome.failures);
        assert_eq!(outcome.unresolved_after, 0);

        let moved_b = root.join("src/features/ComponentB/ComponentB.ts");
        let text = fs::read_to_string(&moved_b).unwrap();
        assert!(
            text.contains("'../ComponentA/ComponentA'"),
            "B must point at A's final location, got: {text}"
        );
        assert_eq!(tracker.len(), 2);
    }
}
