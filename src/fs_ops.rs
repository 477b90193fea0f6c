//! The relocate-file collaborator.
//!
//! Moves a file's on-disk identity: parent directory creation, overwrite
//! policy enforcement, atomic rename with a copy+remove fallback for
//! cross-filesystem destinations.

use std::io;
use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::errors::TsMoveError;

fn relocate_failure(src: &Path, dest: &Path, reason: impl std::fmt::Display) -> TsMoveError {
    TsMoveError::RelocateFailure {
        src: src.to_path_buf(),
        dest: dest.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Move `src` to `dest`. Refuses an existing destination unless `overwrite`
/// is set; the interactive/no-clobber decision has already been made by the
/// caller when this runs.
pub fn relocate_file(src: &Path, dest: &Path, overwrite: bool) -> Result<()> {
    if !src.exists() {
        return Err(relocate_failure(src, dest, "source file does not exist").into());
    }
    if dest.exists() && !overwrite {
        return Err(TsMoveError::DestinationExists(dest.to_path_buf()).into());
    }
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| relocate_failure(src, dest, format!("cannot create {}: {e}", parent.display())))?;
    }

    match try_atomic_move(src, dest) {
        Ok(()) => {
            info!(src = %src.display(), dest = %dest.display(), "renamed file atomically");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "atomic rename failed, falling back to copy+remove");
            std::fs::copy(src, dest)
                .map_err(|e| relocate_failure(src, dest, format!("copy failed: {e}")))?;
            std::fs::remove_file(src)
                .map_err(|e| relocate_failure(src, dest, format!("cannot remove original: {e}")))?;
            Ok(())
        }
    }
}

fn try_atomic_move(src: &Path, dest: &Path) -> io::Result<()> {
    std::fs::rename(src, dest)
}
