//! Error taxonomy for the staleness pipeline
//!
//! Every variant is recoverable at the hook entry point; see `cli::notify`
//! for how each one degrades.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised inside the change-detection pipeline
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Version-control state is unreadable or absent
    #[error("repository error: {message}")]
    Repository {
        message: String,
        #[source]
        source: Option<git2::Error>,
    },

    /// An existence check or manifest write failed
    #[error("filesystem error at {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Monitored root, documentation root or another setting is unusable
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result alias for pipeline operations
pub type MirrorResult<T> = std::result::Result<T, MirrorError>;

/// Build a [`MirrorError::Repository`] wrapping a git2 failure
pub(crate) fn repo_err(message: impl Into<String>, source: git2::Error) -> MirrorError {
    MirrorError::Repository {
        message: message.into(),
        source: Some(source),
    }
}

/// Build a [`MirrorError::Filesystem`] annotated with the failing path
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> MirrorError {
    MirrorError::Filesystem {
        path: path.into(),
        source,
    }
}
