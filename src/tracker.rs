//! Move ledger for one invocation.
//!
//! Records every `(original -> new)` mapping performed in the current batch so
//! later operations can find a file's current location. The tracker is an
//! explicitly constructed session object passed by reference, never a
//! module-level singleton, so independent invocations and tests cannot leak
//! state into each other.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// One recorded relocation. Immutable once appended; a file moved twice gets
/// two entries, keeping the chain fully auditable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMoveMapping {
    pub original_path: PathBuf,
    pub new_path: PathBuf,
    pub moved_at: DateTime<Utc>,
}

/// Read-only snapshot of the ledger, for diagnostics and tests.
#[derive(Debug, Clone, Default)]
pub struct MoveTrackerState {
    pub move_history: Vec<FileMoveMapping>,
}

#[derive(Debug, Default)]
pub struct MoveTracker {
    history: Vec<FileMoveMapping>,
}

impl MoveTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mapping with the current timestamp. Never deduplicates or
    /// merges with prior entries for the same path.
    pub fn record_move(&mut self, original: impl Into<PathBuf>, new: impl Into<PathBuf>) {
        self.history.push(FileMoveMapping {
            original_path: original.into(),
            new_path: new.into(),
            moved_at: Utc::now(),
        });
    }

    /// Defensive copy of the full history; callers cannot mutate the ledger.
    pub fn history(&self) -> Vec<FileMoveMapping> {
        self.history.clone()
    }

    /// Current location of a file given its original path.
    ///
    /// Searches from the most recent entry backwards (last-write-wins). With
    /// chained moves in one batch the latest mapping is the only one that can
    /// be correct for a subsequent operation, so the oldest-match alternative
    /// is deliberately not offered.
    pub fn find_new_location(&self, original: &Path) -> Option<PathBuf> {
        self.history
            .iter()
            .rev()
            .find(|m| m.original_path == original)
            .map(|m| m.new_path.clone())
    }

    /// Reset to empty. Call between independent logical sessions.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn state(&self) -> MoveTrackerState {
        MoveTrackerState {
            move_history: self.history.clone(),
        }
    }
}
