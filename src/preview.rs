//! Dry-run preview.
//!
//! Pure presentation over the planned batch: classifies each operation,
//! aggregates import-update counts and the directory sets the move would
//! populate or drain. Intentionally optimistic: no existence checks, and by
//! contract never a mutating filesystem call.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::resolve::normalize_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOp {
    /// Source and computed destination are the same path.
    Rename,
    Move,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewEntry {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub op: MoveOp,
    pub import_updates: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunPreview {
    pub entries: Vec<PreviewEntry>,
    /// Directories the batch would newly populate.
    pub would_create_dirs: BTreeSet<PathBuf>,
    /// Source-side directories the batch would drain.
    pub would_remove_dirs: BTreeSet<PathBuf>,
    pub total_files: usize,
    pub total_import_updates: usize,
}

/// Build the preview for moving `source_files` into `destination`.
/// `affected_imports` maps each source to the specifiers that would be
/// rewritten in other files.
pub fn generate_dry_run_preview(
    source_files: &[PathBuf],
    destination: &Path,
    affected_imports: &BTreeMap<PathBuf, Vec<String>>,
) -> DryRunPreview {
    let mut entries = Vec::with_capacity(source_files.len());
    let mut would_create_dirs = BTreeSet::new();
    let mut would_remove_dirs = BTreeSet::new();
    let mut total_import_updates = 0;

    for source in source_files {
        let source = normalize_path(source);
        let dest = match source.file_name() {
            Some(name) => normalize_path(&destination.join(name)),
            None => normalize_path(destination),
        };

        let op = if source == dest {
            MoveOp::Rename
        } else {
            MoveOp::Move
        };

        if let Some(dir) = dest.parent() {
            would_create_dirs.insert(dir.to_path_buf());
        }
        if let Some(dir) = source.parent() {
            would_remove_dirs.insert(dir.to_path_buf());
        }

        let import_updates = affected_imports.get(&source).map_or(0, Vec::len);
        total_import_updates += import_updates;

        entries.push(PreviewEntry {
            source,
            destination: dest,
            op,
            import_updates,
        });
    }

    DryRunPreview {
        total_files: entries.len(),
        entries,
        would_create_dirs,
        would_remove_dirs,
        total_import_updates,
    }
}

/// Render the preview as a deterministic, ordered report.
pub fn format_preview(preview: &DryRunPreview) -> String {
    let mut out = String::new();
    out.push_str("Dry run: no files will be changed.\n\n");

    for entry in &preview.entries {
        let verb = match entry.op {
            MoveOp::Rename => "rename",
            MoveOp::Move => "move",
        };
        let _ = writeln!(
            out,
            "  {verb}: {} -> {} ({} import{} to update)",
            entry.source.display(),
            entry.destination.display(),
            entry.import_updates,
            if entry.import_updates == 1 { "" } else { "s" },
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Total files: {}", preview.total_files);
    let _ = writeln!(out, "Total import updates: {}", preview.total_import_updates);
    if !preview.would_create_dirs.is_empty() {
        let _ = writeln!(out, "Would populate:");
        for dir in &preview.would_create_dirs {
            let _ = writeln!(out, "  {}", dir.display());
        }
    }
    if !preview.would_remove_dirs.is_empty() {
        let _ = writeln!(out, "Would drain:");
        for dir in &preview.would_remove_dirs {
            let _ = writeln!(out, "  {}", dir.display());
        }
    }
    out
}
