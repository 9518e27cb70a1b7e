//! Error types for cims.
//!
//! Library crates use [`CimsError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for every stage of a scrape run.
#[derive(Debug, thiserror::Error)]
pub enum CimsError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport failure or non-success HTTP status.
    #[error("network error: {0}")]
    Network(String),

    /// The bootstrap page did not carry the expected nonce.
    #[error("token not found: {message}")]
    TokenNotFound { message: String },

    /// Expected markup structure is missing or malformed.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Writing the output document failed.
    #[error("persistence error at {path:?}: {source}")]
    Persistence {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Filesystem I/O error outside of the output sink.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CimsError>;

impl CimsError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a token-not-found error from any displayable message.
    pub fn token_not_found(msg: impl Into<String>) -> Self {
        Self::TokenNotFound {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` raised while writing the output document.
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
