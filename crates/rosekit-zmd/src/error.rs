//! Error types for ZMD parsing.

use thiserror::Error;

/// Errors that can occur when working with ZMD files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] rosekit_common::Error),

    /// The magic carries a revision digit this codec does not know.
    #[error("unsupported ZMD version: {0:?}")]
    UnsupportedVersion(char),

    /// A bone references a parent that does not precede it.
    #[error("bone {bone} references parent {parent}, which does not precede it")]
    ForwardReference { bone: usize, parent: u32 },
}

/// Result type for ZMD operations.
pub type Result<T> = std::result::Result<T, Error>;
