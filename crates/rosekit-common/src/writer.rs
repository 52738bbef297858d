//! Binary writer for serializing into seekable streams.
//!
//! [`BinaryWriter`] is the inverse of [`BinaryReader`](crate::BinaryReader):
//! every `read_*` has a matching `write_*` producing the same layout. The
//! writer wraps any `Write + Seek` so formats with back-patched headers can
//! reserve space and return to it later.

use std::io::{Cursor, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use glam::{Quat, Vec2, Vec3};

use crate::{text, Error, Result};

/// A little-endian binary writer over a seekable stream.
///
/// The stream is borrowed from the caller and never closed by the writer.
#[derive(Debug)]
pub struct BinaryWriter<W> {
    inner: W,
}

impl BinaryWriter<Cursor<Vec<u8>>> {
    /// Create a writer over a fresh in-memory buffer.
    pub fn in_memory() -> Self {
        Self::new(Cursor::new(Vec::new()))
    }

    /// Consume the writer and return the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

impl<W: Write + Seek> BinaryWriter<W> {
    /// Wrap a stream.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Consume the writer and return the underlying stream.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Get the current stream position.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Seek within the underlying stream.
    pub fn seek(&mut self, target: SeekFrom) -> Result<u64> {
        Ok(self.inner.seek(target)?)
    }

    /// Write `count` zero bytes, returning the position they start at.
    pub fn reserve(&mut self, count: usize) -> Result<u64> {
        let start = self.position()?;
        self.inner.write_all(&vec![0u8; count])?;
        Ok(start)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.inner.write_u8(value)?;
        Ok(())
    }

    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.inner.write_i8(value)?;
        Ok(())
    }

    /// Write a boolean as a single byte (0 or 1).
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(u8::from(value))
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.inner.write_u16::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.inner.write_i16::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.inner.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.inner.write_i32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.inner.write_f32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_vec2(&mut self, value: Vec2) -> Result<()> {
        self.write_f32(value.x)?;
        self.write_f32(value.y)
    }

    pub fn write_vec3(&mut self, value: Vec3) -> Result<()> {
        self.write_f32(value.x)?;
        self.write_f32(value.y)?;
        self.write_f32(value.z)
    }

    /// Write a quaternion as w, x, y, z.
    pub fn write_quat_wxyz(&mut self, value: Quat) -> Result<()> {
        self.write_f32(value.w)?;
        self.write_f32(value.x)?;
        self.write_f32(value.y)?;
        self.write_f32(value.z)
    }

    /// Write a quaternion as x, y, z, w.
    pub fn write_quat_xyzw(&mut self, value: Quat) -> Result<()> {
        self.write_f32(value.x)?;
        self.write_f32(value.y)?;
        self.write_f32(value.z)?;
        self.write_f32(value.w)
    }

    /// Write a legacy-encoded string followed by a null terminator.
    pub fn write_cstring(&mut self, value: &str) -> Result<()> {
        let bytes = text::encode(value)?;
        self.write_bytes(&bytes)?;
        self.write_u8(0)
    }

    /// Write a legacy-encoded string without any prefix or terminator.
    ///
    /// Returns the number of bytes written.
    pub fn write_fixed_string(&mut self, value: &str) -> Result<usize> {
        let bytes = text::encode(value)?;
        self.write_bytes(&bytes)?;
        Ok(bytes.len())
    }

    /// Write a string prefixed by a one-byte length.
    pub fn write_u8_string(&mut self, value: &str) -> Result<()> {
        let bytes = text::encode(value)?;
        let len = u8::try_from(bytes.len()).map_err(|_| Error::StringTooLong {
            len: bytes.len(),
            max: u8::MAX as usize,
        })?;
        self.write_u8(len)?;
        self.write_bytes(&bytes)
    }

    /// Write a string prefixed by a little-endian u16 length.
    pub fn write_u16_string(&mut self, value: &str) -> Result<()> {
        let bytes = text::encode(value)?;
        let len = u16::try_from(bytes.len()).map_err(|_| Error::StringTooLong {
            len: bytes.len(),
            max: u16::MAX as usize,
        })?;
        self.write_u16(len)?;
        self.write_bytes(&bytes)
    }
}
