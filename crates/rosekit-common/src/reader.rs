//! Binary reader for parsing byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! little-endian primitives, vectors, quaternions and legacy strings from a
//! byte slice.

use std::io::SeekFrom;

use glam::{Quat, Vec2, Vec3};
use zerocopy::FromBytes;

use crate::{text, Error, Result};

/// A binary reader over a byte slice.
///
/// Every read is bounds-checked and fails with [`Error::Truncated`] instead
/// of panicking, so a corrupt file aborts the load cleanly.
///
/// # Example
///
/// ```
/// use rosekit_common::BinaryReader;
///
/// let data = b"ZMD0003\0\x02\x00\x00\x00";
/// let mut reader = BinaryReader::new(data);
///
/// assert_eq!(reader.read_cstring()?, "ZMD0003");
/// assert_eq!(reader.read_u32()?, 2);
/// assert!(reader.is_empty());
/// # Ok::<(), rosekit_common::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Seek relative to the start, the current position or the end.
    ///
    /// Seeking exactly to the end is allowed; anything past it is an error.
    pub fn seek_to(&mut self, target: SeekFrom) -> Result<usize> {
        let len = self.data.len() as i64;
        let position = match target {
            SeekFrom::Start(offset) => i64::try_from(offset).unwrap_or(i64::MAX),
            SeekFrom::Current(delta) => (self.position as i64).saturating_add(delta),
            SeekFrom::End(delta) => len.saturating_add(delta),
        };

        if !(0..=len).contains(&position) {
            return Err(Error::SeekOutOfBounds {
                position,
                len: self.data.len(),
            });
        }

        self.position = position as usize;
        Ok(self.position)
    }

    /// Skip a number of bytes, failing if they are not all present.
    #[inline]
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::Truncated {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a fixed-size byte array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a signed byte.
    #[inline]
    pub fn read_i8(&mut self) -> Result<i8> {
        self.read_u8().map(|b| b as i8)
    }

    /// Read a boolean (non-zero = true).
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_u8().map(|b| b != 0)
    }

    /// Read a little-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    /// Read a little-endian i16.
    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        self.read_array().map(i16::from_le_bytes)
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Read a little-endian i32.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    /// Read a little-endian f32.
    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_array().map(f32::from_le_bytes)
    }

    /// Read two consecutive f32 values.
    #[inline]
    pub fn read_vec2(&mut self) -> Result<Vec2> {
        Ok(Vec2::new(self.read_f32()?, self.read_f32()?))
    }

    /// Read three consecutive f32 values.
    #[inline]
    pub fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    /// Read a quaternion stored as w, x, y, z.
    #[inline]
    pub fn read_quat_wxyz(&mut self) -> Result<Quat> {
        let w = self.read_f32()?;
        let x = self.read_f32()?;
        let y = self.read_f32()?;
        let z = self.read_f32()?;
        Ok(Quat::from_xyzw(x, y, z, w))
    }

    /// Read a quaternion stored as x, y, z, w.
    #[inline]
    pub fn read_quat_xyzw(&mut self) -> Result<Quat> {
        let x = self.read_f32()?;
        let y = self.read_f32()?;
        let z = self.read_f32()?;
        let w = self.read_f32()?;
        Ok(Quat::from_xyzw(x, y, z, w))
    }

    /// Read a null-terminated legacy-encoded string.
    pub fn read_cstring(&mut self) -> Result<String> {
        let remaining = &self.data[self.position.min(self.data.len())..];
        let null_pos = memchr::memchr(0, remaining).ok_or(Error::MissingNullTerminator)?;

        let text = text::decode(&remaining[..null_pos])?;
        self.position += null_pos + 1; // Skip the null terminator
        Ok(text)
    }

    /// Read a legacy-encoded string of a specific length.
    pub fn read_fixed_string(&mut self, length: usize) -> Result<String> {
        let bytes = self.peek_bytes(length)?;
        let text = text::decode(bytes)?;
        self.position += length;
        Ok(text)
    }

    /// Read a string prefixed by a one-byte length.
    pub fn read_u8_string(&mut self) -> Result<String> {
        let length = self.read_u8()? as usize;
        self.read_fixed_string(length)
    }

    /// Read a string prefixed by a little-endian u16 length.
    pub fn read_u16_string(&mut self) -> Result<String> {
        let length = self.read_u16()? as usize;
        self.read_fixed_string(length)
    }

    /// Read a plain-old-data struct using zerocopy.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::Truncated {
            needed: size,
            available: bytes.len(),
        })
    }

    /// Expect specific magic bytes.
    pub fn expect_magic(&mut self, expected: &[u8]) -> Result<()> {
        let actual = self.read_bytes(expected.len())?;
        if actual != expected {
            return Err(Error::InvalidMagic {
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            });
        }
        Ok(())
    }
}
