//! Error types for tifo-common.

use thiserror::Error;

/// Common error type for Tifo decoding and encoding.
#[derive(Debug, Error)]
pub enum Error {
    /// A read or seek went past the bounds of the buffer.
    ///
    /// `offset` is where the failing access starts; it is signed because a
    /// relative offset can resolve before the start of the stream.
    #[error("truncated stream: access of {needed} bytes at {offset} exceeds buffer length {length}")]
    TruncatedStream {
        offset: i64,
        needed: usize,
        length: usize,
    },

    /// A tag, magic or header field did not hold the expected value.
    #[error("malformed header: expected {expected}, got {actual}")]
    MalformedHeader { expected: String, actual: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a [`Error::MalformedHeader`] from anything printable.
    pub fn malformed(expected: impl Into<String>, actual: impl ToString) -> Self {
        Self::MalformedHeader {
            expected: expected.into(),
            actual: actual.to_string(),
        }
    }

    /// Whether this error is a [`Error::TruncatedStream`].
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::TruncatedStream { .. })
    }

    /// Whether this error is a [`Error::MalformedHeader`].
    pub fn is_malformed_header(&self) -> bool {
        matches!(self, Self::MalformedHeader { .. })
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
