//! Error types for the facade crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading or converting any supported asset.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file extension does not name a supported format.
    #[error("unrecognized asset type: {}", .0.display())]
    UnknownKind(PathBuf),

    #[error("skeleton: {0}")]
    Zmd(#[from] rosekit_zmd::Error),

    #[error("motion: {0}")]
    Zmo(#[from] rosekit_zmo::Error),

    #[error("scene objects: {0}")]
    Zsc(#[from] rosekit_zsc::Error),

    #[error("characters: {0}")]
    Chr(#[from] rosekit_chr::Error),

    #[error("map: {0}")]
    Ifo(#[from] rosekit_ifo::Error),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;
