//! Error types for audio bin decoding.

use thiserror::Error;

/// Errors that can occur when decoding audio bin containers.
///
/// Only truncation and malformed headers are fatal for a document. Unknown
/// record variants and unresolved cross-references are not errors; they are
/// represented in the decoded types instead.
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
    /// Whether the document ended before a read or seek could complete.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Common(e) if e.is_truncated())
    }

    /// Whether the container tag or a header field was invalid.
    pub fn is_malformed_header(&self) -> bool {
        matches!(self, Self::Common(e) if e.is_malformed_header())
    }
}

/// Result type for audio bin operations.
pub type Result<T> = std::result::Result<T, Error>;
