//! Crate-wide error type.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the engine.
///
/// Most runtime conditions (missing entry files, unreadable sources, a single
/// failing patch) are encoded in result values instead. `Validation` is the
/// one variant callers are expected to see for malformed input.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fix action: {0}")]
    Validation(String),

    #[error("patch failed: {0}")]
    Patch(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
