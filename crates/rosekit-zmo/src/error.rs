//! Error types for ZMO parsing.

use thiserror::Error;

/// Errors that can occur when working with ZMO files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] rosekit_common::Error),

    /// Channel type outside the known set; its sample size is unknown.
    #[error("unknown channel type {0:#x}")]
    UnknownChannelType(u32),

    /// A channel holds a different number of samples than the clip has frames.
    #[error("channel {channel} has {actual} samples, expected {expected}")]
    FrameCountMismatch {
        channel: usize,
        expected: usize,
        actual: usize,
    },

    /// Frame rate must be positive to place keys in time.
    #[error("invalid frame rate: {0}")]
    InvalidFrameRate(i32),
}

/// Result type for ZMO operations.
pub type Result<T> = std::result::Result<T, Error>;
