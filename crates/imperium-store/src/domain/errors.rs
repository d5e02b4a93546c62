//! Storage error types and engine selection.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised by the storage engines.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure while reading or writing a world file.
    #[error("world file i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite failure.
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// The world file exists but could not be decoded.
    #[error("corrupt world file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// A migration script failed to apply.
    #[error("migration {version} failed: {source}")]
    Migration {
        version: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Engine name from configuration is not one of the known kinds.
    #[error("unknown engine kind: {0} (expected 'memory', 'file' or 'sqlite')")]
    UnknownEngine(String),
}

/// Which storage engine to instantiate. Selected via `IMPERIUM_ENGINE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineKind {
    #[default]
    Memory,
    File,
    Sqlite,
}

impl EngineKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Memory => "memory",
            EngineKind::File => "file",
            EngineKind::Sqlite => "sqlite",
        }
    }
}

impl FromStr for EngineKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(EngineKind::Memory),
            "file" => Ok(EngineKind::File),
            "sqlite" | "sql" => Ok(EngineKind::Sqlite),
            other => Err(StoreError::UnknownEngine(other.to_string())),
        }
    }
}
