//! Error types for rosekit-common.

use thiserror::Error;

/// Common error type for rosekit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Input ended before a fully-specified primitive could be read.
    #[error("truncated input: needed {needed} bytes but only {available} available")]
    Truncated { needed: usize, available: usize },

    /// Seek target lies outside the buffer.
    #[error("seek to {position} is out of bounds (buffer size: {len})")]
    SeekOutOfBounds { position: i64, len: usize },

    /// Invalid magic bytes encountered.
    #[error("invalid magic: expected {expected:?}, got {actual:?}")]
    InvalidMagic {
        expected: Vec<u8>,
        actual: Vec<u8>,
    },

    /// An index field points outside the table it refers to.
    #[error("invalid {table} reference: index {index} out of range (table size: {len})")]
    InvalidReference {
        table: &'static str,
        index: usize,
        len: usize,
    },

    /// Missing null terminator in string.
    #[error("string missing null terminator")]
    MissingNullTerminator,

    /// String does not fit in its length prefix.
    #[error("string of {len} bytes exceeds the {max} byte limit of its length prefix")]
    StringTooLong { len: usize, max: usize },

    /// Stored bytes are not valid in the legacy code page.
    #[error("malformed legacy-encoded string: {0:02X?}")]
    MalformedText(Vec<u8>),

    /// String contains characters the legacy code page cannot represent.
    #[error("string {0:?} cannot be encoded in the legacy code page")]
    Unencodable(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check whether this error means the input ended early.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Error::Truncated { .. })
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
