//! Typed error definitions for tsmv.
//! A small set of well-known failure modes so logs and tests can match on kind.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TsMoveError {
    #[error("missing source or destination argument")]
    MissingArgument,

    #[error("source path is not part of the project: {0}")]
    SourceNotFound(PathBuf),

    #[error("destination already exists: {0} (pass --force to overwrite)")]
    DestinationExists(PathBuf),

    #[error("failed to relocate {src} -> {dest}: {reason}")]
    RelocateFailure {
        src: PathBuf,
        dest: PathBuf,
        reason: String,
    },

    /// Informational: reported to the user, never blocks the move.
    #[error("circular dependency among moved files: {0}")]
    CycleDetected(String),
}

impl TsMoveError {
    /// Stable machine-readable kind string used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            TsMoveError::MissingArgument => "missing_argument",
            TsMoveError::SourceNotFound(_) => "source_not_found",
            TsMoveError::DestinationExists(_) => "destination_exists",
            TsMoveError::RelocateFailure { .. } => "relocate_failure",
            TsMoveError::CycleDetected(_) => "cycle_detected",
        }
    }
}
