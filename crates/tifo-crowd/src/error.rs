//! Error types for crowd files.

use thiserror::Error;

/// Errors that can occur when reading or writing crowd files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] tifo_common::Error),
}

impl Error {
    /// Whether the file ended before the declared seats were read.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Common(e) if e.is_truncated())
    }

    /// Whether the file does not start with `CRWD`.
    pub fn is_malformed_header(&self) -> bool {
        matches!(self, Self::Common(e) if e.is_malformed_header())
    }
}

/// Result type for crowd file operations.
pub type Result<T> = std::result::Result<T, Error>;
