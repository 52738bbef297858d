//! Error types for CHR parsing.

use thiserror::Error;

/// Errors that can occur when working with CHR files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] rosekit_common::Error),

    /// A table or list has more entries than its `u16` count can hold.
    #[error("{table} has {len} entries, more than a u16 count allows")]
    TooManyEntries { table: &'static str, len: usize },
}

/// Result type for CHR operations.
pub type Result<T> = std::result::Result<T, Error>;
