//! Error types for IFO parsing.

use thiserror::Error;

/// Errors that can occur when working with IFO files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] rosekit_common::Error),

    /// Directory entry with a type outside the known set.
    ///
    /// Loading skips such blocks; this is only surfaced by
    /// [`BlockType::try_from`](crate::BlockType).
    #[error("unknown block type {0}")]
    UnknownBlockType(i32),

    /// Directory entry whose offset is negative.
    #[error("block {block_type} has negative offset {offset}")]
    NegativeOffset { block_type: i32, offset: i32 },

    /// Written data grew past what an `i32` offset or count can address.
    #[error("{what} value {value} does not fit in an i32")]
    Overflow { what: &'static str, value: u64 },

    /// Water grid cell count does not match its dimensions.
    #[error("water grid is {width}x{height} but holds {cells} cells")]
    WaterGridSize {
        width: usize,
        height: usize,
        cells: usize,
    },
}

/// Result type for IFO operations.
pub type Result<T> = std::result::Result<T, Error>;
