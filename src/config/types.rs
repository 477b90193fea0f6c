//! Core configuration types.
//! - Config holds the normalized move request options with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::DEFAULT_ALIAS_PREFIX;
use crate::resolve::SOURCE_EXTENSIONS;

/// Program-defined verbosity levels exposed to users.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More detail (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration for one move invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory the project model scans from.
    pub project_root: PathBuf,
    /// Source extensions considered modules (no leading dots).
    pub extensions: Vec<String>,
    /// Alias prefix for path-mapped imports (e.g. `@` for `@/shared/x`).
    pub alias_prefix: String,
    /// Directory the alias prefix maps to, when a tsconfig mapping is known.
    pub alias_root: Option<PathBuf>,
    /// Rewrite imports to alias form whenever the target sits under the
    /// alias root.
    pub absolute_imports: bool,
    /// Overwrite existing destinations without asking.
    pub force: bool,
    /// Silently skip moves whose destination already exists.
    pub no_clobber: bool,
    /// Ask before overwriting an existing destination.
    pub interactive: bool,
    /// Expand directory sources into per-file moves.
    pub recursive: bool,
    /// Compute and report the plan, but mutate nothing.
    pub dry_run: bool,
    /// Per-file reporting of rewritten import counts.
    pub verbose: bool,
    /// Console verbosity.
    pub log_level: LogLevel,
    /// Optional path to a log file.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            extensions: SOURCE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            alias_prefix: DEFAULT_ALIAS_PREFIX.to_string(),
            alias_root: None,
            absolute_imports: false,
            force: false,
            no_clobber: false,
            interactive: false,
            recursive: false,
            dry_run: false,
            verbose: false,
            log_level: LogLevel::Normal,
            log_file: None,
        }
    }
}

impl Config {
    /// Effective overwrite decision for a destination that already exists,
    /// before any interactive prompt: `Some(true)` overwrite, `Some(false)`
    /// skip, `None` ask/err depending on the interactive flag.
    pub fn overwrite_policy(&self) -> Option<bool> {
        if self.force {
            Some(true)
        } else if self.no_clobber {
            Some(false)
        } else {
            None
        }
    }
}
