//! Common utilities for rosekit.
//!
//! This crate provides the foundation shared by every format crate:
//!
//! - [`BinaryReader`] - Bounds-checked reading from byte slices
//! - [`BinaryWriter`] - Little-endian writing into seekable streams
//! - [`text`] - The legacy EUC-KR string encoding used by all formats
//! - [`coords`] - On-disk ↔ in-memory coordinate conversion

mod error;
mod reader;
mod writer;

pub mod coords;
pub mod text;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use writer::BinaryWriter;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Re-export the math types used across all decoded data.
pub use glam::{Mat4, Quat, Vec2, Vec3};

/// Look up `index` in `table`, reporting an out-of-range index as
/// [`Error::InvalidReference`].
pub fn lookup<'t, T>(table_name: &'static str, table: &'t [T], index: usize) -> Result<&'t T> {
    table.get(index).ok_or(Error::InvalidReference {
        table: table_name,
        index,
        len: table.len(),
    })
}
