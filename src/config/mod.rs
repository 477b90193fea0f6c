//! Config module (modularized).
//! Provides configuration types and tsconfig path-mapping discovery.
//! Re-exports keep the public surface flat for external callers.

pub mod tsconfig;
pub mod types;

pub use tsconfig::{find_tsconfig, load_tsconfig, TsconfigPaths};
pub use types::{Config, LogLevel};

/// Default alias prefix when no tsconfig mapping overrides it.
pub const DEFAULT_ALIAS_PREFIX: &str = "@";
