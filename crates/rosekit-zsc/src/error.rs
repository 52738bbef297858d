//! Error types for ZSC parsing.

use thiserror::Error;

/// Errors that can occur when working with ZSC files.
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

    /// A zero-based parent index has no 1-based encoding.
    #[error("parent index {0} cannot be stored")]
    ParentOutOfRange(u16),
}

/// Result type for ZSC operations.
pub type Result<T> = std::result::Result<T, Error>;
