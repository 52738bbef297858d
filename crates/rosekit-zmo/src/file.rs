//! ZMO file handling.

use std::io::{Read, Seek, Write};

use rosekit_common::{BinaryReader, BinaryWriter};

use crate::channel::{Channel, ChannelSamples, ChannelType};
use crate::{Error, Result};

/// Header written on save. Loads skip the 8 header bytes without checking them.
pub const MAGIC: &[u8; 8] = b"ZMO0002\0";

const MAGIC_PREFIX: &[u8; 3] = b"ZMO";

/// A motion: channels sampled at a fixed rate for a fixed number of frames.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZmoFile {
    /// Frames per second.
    pub fps: i32,
    /// Number of frames every channel is sampled at.
    pub frame_count: usize,
    /// Animated channels, in file order.
    pub channels: Vec<Channel>,
}

impl ZmoFile {
    /// Create an empty motion.
    pub fn new(fps: i32, frame_count: usize) -> Self {
        Self {
            fps,
            frame_count,
            channels: Vec::new(),
        }
    }

    /// Parse a ZMO file from bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        Self::read(&mut reader)
    }

    /// Read a ZMO file from a stream, consuming it to the end.
    pub fn read_from<R: Read>(mut stream: R) -> Result<Self> {
        let mut data = Vec::new();
        stream.read_to_end(&mut data)?;
        Self::parse(&data)
    }

    /// Read a ZMO file from a binary reader.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let header = reader.read_bytes(MAGIC.len())?;
        if !header.starts_with(MAGIC_PREFIX) {
            tracing::debug!(header = ?header, "unexpected motion header");
        }

        let fps = reader.read_i32()?;
        let frame_count = reader.read_u32()? as usize;
        let channel_count = reader.read_u32()? as usize;

        let mut channels = Vec::with_capacity(channel_count.min(reader.remaining() / 8));
        for _ in 0..channel_count {
            let channel_type = ChannelType::try_from(reader.read_u32()?)?;
            let bone = reader.read_u32()?;
            let capacity = frame_count.min(reader.remaining() / channel_type.sample_size());
            channels.push(Channel::new(
                bone,
                ChannelSamples::with_capacity(channel_type, capacity),
            ));
        }

        for _ in 0..frame_count {
            for channel in &mut channels {
                channel.samples.read_sample(reader)?;
            }
        }

        tracing::trace!(fps, frame_count, channels = channels.len(), "parsed motion");

        Ok(Self {
            fps,
            frame_count,
            channels,
        })
    }

    /// Convert to bytes for writing.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = BinaryWriter::in_memory();
        self.write(&mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Write to a caller-owned stream.
    pub fn write_to<W: Write + Seek>(&self, stream: &mut W) -> Result<()> {
        self.write(&mut BinaryWriter::new(stream))
    }

    /// Write to a binary writer.
    pub fn write<W: Write + Seek>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        self.validate()?;

        writer.write_bytes(MAGIC)?;
        writer.write_i32(self.fps)?;
        writer.write_u32(self.frame_count as u32)?;
        writer.write_u32(self.channels.len() as u32)?;

        for channel in &self.channels {
            writer.write_u32(channel.channel_type().bits())?;
            writer.write_u32(channel.bone)?;
        }

        for frame in 0..self.frame_count {
            for channel in &self.channels {
                channel.samples.write_sample(frame, writer)?;
            }
        }

        Ok(())
    }

    /// Check that every channel holds exactly `frame_count` samples.
    pub fn validate(&self) -> Result<()> {
        for (index, channel) in self.channels.iter().enumerate() {
            let actual = channel.samples.len();
            if actual != self.frame_count {
                return Err(Error::FrameCountMismatch {
                    channel: index,
                    expected: self.frame_count,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Find the first channel of a type animating a bone.
    pub fn find_channel(&self, bone: u32, channel_type: ChannelType) -> Option<&Channel> {
        self.channels
            .iter()
            .find(|c| c.bone == bone && c.channel_type() == channel_type)
    }

    /// Get the length in seconds, or `None` when the frame rate is not positive.
    pub fn duration(&self) -> Option<f32> {
        (self.fps > 0).then(|| self.frame_count.saturating_sub(1) as f32 / self.fps as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec2, Vec3};

    fn sample() -> ZmoFile {
        let mut zmo = ZmoFile::new(30, 3);
        zmo.channels.push(Channel::new(
            0,
            ChannelSamples::Position(vec![
                Vec3::ZERO,
                Vec3::new(1.0, 2.0, 3.0),
                Vec3::new(-1.5, 0.25, 8.0),
            ]),
        ));
        zmo.channels.push(Channel::new(
            0,
            ChannelSamples::Rotation(vec![
                Quat::IDENTITY,
                Quat::from_xyzw(0.5, 0.5, 0.5, 0.5),
                Quat::from_xyzw(0.0, 0.0, 1.0, 0.0),
            ]),
        ));
        zmo.channels.push(Channel::new(
            4,
            ChannelSamples::Uv1(vec![Vec2::ZERO, Vec2::new(0.5, 0.5), Vec2::ONE]),
        ));
        zmo.channels
            .push(Channel::new(4, ChannelSamples::Scale(vec![1.0, 1.5, 2.0])));
        zmo
    }

    #[test]
    fn test_roundtrip() {
        let zmo = sample();
        let bytes = zmo.to_bytes().unwrap();
        assert_eq!(&bytes[..8], MAGIC);

        // header + descriptors + frames × (12 + 16 + 8 + 4)
        assert_eq!(bytes.len(), 8 + 12 + 4 * 8 + 3 * 40);

        let mut reader = BinaryReader::new(&bytes);
        let parsed = ZmoFile::read(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(parsed, zmo);
        assert_eq!(parsed.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_samples_are_frame_major() {
        let mut zmo = ZmoFile::new(10, 2);
        zmo.channels
            .push(Channel::new(0, ChannelSamples::Alpha(vec![1.0, 2.0])));
        zmo.channels
            .push(Channel::new(1, ChannelSamples::Alpha(vec![3.0, 4.0])));
        let bytes = zmo.to_bytes().unwrap();

        let samples: Vec<f32> = bytes[36..]
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(samples, [1.0, 3.0, 2.0, 4.0]);
    }

    #[test]
    fn test_rotation_stored_wxyz() {
        let mut zmo = ZmoFile::new(10, 1);
        zmo.channels.push(Channel::new(
            0,
            ChannelSamples::Rotation(vec![Quat::from_xyzw(0.1, 0.2, 0.3, 0.4)]),
        ));
        let bytes = zmo.to_bytes().unwrap();
        assert_eq!(&bytes[28..32], &0.4f32.to_le_bytes());
        assert_eq!(&bytes[32..36], &0.1f32.to_le_bytes());
    }

    #[test]
    fn test_accepts_any_zmo_header() {
        let mut bytes = sample().to_bytes().unwrap();
        bytes[3..8].copy_from_slice(b"0003\0");
        assert_eq!(ZmoFile::parse(&bytes).unwrap(), sample());
    }

    #[test]
    fn test_header_bytes_are_skipped() {
        let mut bytes = sample().to_bytes().unwrap();
        bytes[..8].copy_from_slice(b"\xFFMOTION");
        assert_eq!(ZmoFile::parse(&bytes).unwrap(), sample());

        // The header is still required to be present.
        assert!(matches!(
            ZmoFile::parse(b"ZMO"),
            Err(Error::Common(e)) if e.is_truncated()
        ));
    }

    #[test]
    fn test_unknown_channel_type() {
        let mut writer = BinaryWriter::in_memory();
        writer.write_bytes(MAGIC).unwrap();
        writer.write_i32(30).unwrap();
        writer.write_u32(1).unwrap();
        writer.write_u32(1).unwrap();
        writer.write_u32(0x800).unwrap();
        writer.write_u32(0).unwrap();
        writer.write_f32(0.0).unwrap();

        assert!(matches!(
            ZmoFile::parse(&writer.into_bytes()),
            Err(Error::UnknownChannelType(0x800))
        ));
    }

    #[test]
    fn test_frame_count_mismatch_on_save() {
        let mut zmo = sample();
        zmo.channels
            .push(Channel::new(2, ChannelSamples::Alpha(vec![1.0])));
        assert!(matches!(
            zmo.to_bytes(),
            Err(Error::FrameCountMismatch {
                channel: 4,
                expected: 3,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_truncated_samples() {
        let bytes = sample().to_bytes().unwrap();
        let err = ZmoFile::parse(&bytes[..bytes.len() - 2]).unwrap_err();
        assert!(matches!(err, Error::Common(e) if e.is_truncated()));
    }

    #[test]
    fn test_find_channel_and_duration() {
        let zmo = sample();
        assert!(zmo.find_channel(4, ChannelType::Scale).is_some());
        assert!(zmo.find_channel(0, ChannelType::Scale).is_none());
        assert_eq!(zmo.duration(), Some(2.0 / 30.0));
        assert_eq!(ZmoFile::new(0, 3).duration(), None);
    }
}
