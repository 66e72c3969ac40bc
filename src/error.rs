//! Error types. One enum per subsystem.

use std::path::PathBuf;

/// Failures while reading or validating a graph snapshot.
///
/// Loading is all-or-nothing: on any of these no graph is returned.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported snapshot version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("snapshot has no root symbol (id 1 with an empty name)")]
    MissingRoot,

    #[error("symbol ids must be contiguous from 1: expected {expected}, found {found}")]
    NonContiguousId { expected: u32, found: u32 },

    #[error("symbol name {name:?} is used by both {first} and {second}")]
    DuplicateName { name: String, first: u32, second: u32 },

    #[error("{context} refers to unknown symbol {id}")]
    UnknownSymbol { id: u32, context: &'static str },

    #[error("duplicate edge {from} -> {to}")]
    DuplicateEdge { from: u32, to: u32 },

    #[error("edge {from} -> {to} has a zero count")]
    ZeroEdgeCount { from: u32, to: u32 },

    #[error("edge {from} -> {to} is bound to {rep}, whose name is not the two names joined")]
    RepresentativeMismatch { from: u32, to: u32, rep: u32 },

    #[error("snapshot counts leave no room to keep counting")]
    CountOverflow,
}

/// Failures while loading engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
