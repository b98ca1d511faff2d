//! Error types for RX3 sections.

use thiserror::Error;

/// Errors that can occur when reading or writing RX3 sections.
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
    /// Whether the section is shorter than its declared size.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Common(e) if e.is_truncated())
    }

    /// Whether the declared section size is impossible.
    pub fn is_malformed_header(&self) -> bool {
        matches!(self, Self::Common(e) if e.is_malformed_header())
    }
}

/// Result type for RX3 operations.
pub type Result<T> = std::result::Result<T, Error>;
