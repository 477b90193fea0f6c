//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - The positional list is mv-shaped: one or more SOURCES followed by DEST.
//! - --debug is a shorthand for --log-level debug.
//! - When -f/--force and -n/--no-clobber are both given, --force wins.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};
use crate::errors::TsMoveError;
use crate::resolve::normalize_path;

/// Move TypeScript/JavaScript files and keep their imports compiling.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Move TS/JS files and rewrite the imports that point at them"
)]
pub struct Args {
    /// One or more source paths followed by the destination, mv-style.
    #[arg(value_name = "PATHS", value_hint = ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Overwrite existing destination files without asking.
    #[arg(short = 'f', long, help = "Overwrite existing destinations")]
    pub force: bool,

    /// Never overwrite an existing destination; skip those moves.
    #[arg(
        short = 'n',
        long,
        help = "Skip moves whose destination already exists"
    )]
    pub no_clobber: bool,

    /// Ask before overwriting an existing destination.
    #[arg(short = 'i', long, help = "Prompt before overwriting")]
    pub interactive: bool,

    /// Move directories and their contents.
    #[arg(short = 'r', long, help = "Move directories recursively")]
    pub recursive: bool,

    /// Report the per-file import-update counts as moves complete.
    #[arg(short = 'v', long, help = "Report per-file import update counts")]
    pub verbose: bool,

    /// Show the full plan (moves, import updates, directory churn) and exit
    /// without touching anything.
    #[arg(long, help = "Show what would be done, but do not modify files")]
    pub dry_run: bool,

    /// Comma-separated source extensions to treat as modules.
    #[arg(
        long,
        value_name = "EXTS",
        help = "Source extensions to treat as modules (default: ts,tsx,js,jsx)"
    )]
    pub extensions: Option<String>,

    /// Alias prefix for path-mapped imports (normally read from tsconfig).
    #[arg(long, value_name = "PREFIX", help = "Alias prefix, e.g. @ or ~")]
    pub alias_prefix: Option<String>,

    /// Rewrite affected imports to alias form when the target sits under the
    /// alias root.
    #[arg(long, help = "Prefer alias-form imports over relative paths")]
    pub absolute_imports: bool,

    /// Explicit tsconfig.json to read path mappings from.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub tsconfig: Option<PathBuf>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Also write logs to this file.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Split the positional list into `(sources, destination)`.
    /// Fails with MissingArgument when fewer than two paths were given.
    pub fn split_request(&self) -> Result<(Vec<PathBuf>, PathBuf), TsMoveError> {
        if self.paths.len() < 2 {
            return Err(TsMoveError::MissingArgument);
        }
        let mut paths = self.paths.clone();
        let dest = paths.pop().expect("len checked above");
        Ok((paths, dest))
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Extensions list with leading dots and surrounding whitespace trimmed.
    pub fn parsed_extensions(&self) -> Option<Vec<String>> {
        let raw = self.extensions.as_deref()?;
        let exts: Vec<String> = raw
            .split(',')
            .map(|e| e.trim().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        if exts.is_empty() { None } else { Some(exts) }
    }

    /// Apply CLI overrides to a Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(exts) = self.parsed_extensions() {
            cfg.extensions = exts;
        }
        if let Some(prefix) = &self.alias_prefix {
            cfg.alias_prefix = prefix.clone();
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(path) = &self.log_file {
            cfg.log_file = Some(normalize_path(path));
        }
        if self.absolute_imports {
            cfg.absolute_imports = true;
        }
        if self.force {
            cfg.force = true;
        }
        if self.no_clobber && !self.force {
            cfg.no_clobber = true;
        }
        if self.interactive {
            cfg.interactive = true;
        }
        if self.recursive {
            cfg.recursive = true;
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if self.verbose {
            cfg.verbose = true;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
