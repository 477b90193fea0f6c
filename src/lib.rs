//! Core library for `tsmv`.
//!
//! Moves TypeScript/JavaScript files like `mv` does, then rewrites every
//! import/export specifier the move breaks so the project keeps compiling.
//! The pieces compose bottom-up: path resolution and relative-path math feed
//! the project model (`project::SourceTree`), planning expands an mv-shaped
//! request into per-file moves, and the rewriter applies them while a
//! `MoveTracker` keeps chained batches consistent.

pub mod app;
pub mod cli;
pub mod config;
pub mod cycles;
pub mod errors;
pub mod fs_ops;
pub mod logging;
pub mod output;
pub mod plan;
pub mod preview;
pub mod project;
pub mod relative;
pub mod resolve;
pub mod rewrite;
pub mod shutdown;
pub mod tracker;

pub use config::{Config, LogLevel};
pub use cycles::{detect_cycles, CycleReport};
pub use errors::TsMoveError;
pub use plan::{build_move_plan, MovePlan, PlannedMove};
pub use preview::{format_preview, generate_dry_run_preview, DryRunPreview};
pub use project::{AliasMap, ModuleGraph, SourceTree};
pub use relative::calculate_relative_path;
pub use resolve::{normalize_path, resolve_relative_import, SOURCE_EXTENSIONS};
pub use rewrite::{update_imports, update_imports_in_moved_files, BatchOutcome};
pub use tracker::{FileMoveMapping, MoveTracker};
