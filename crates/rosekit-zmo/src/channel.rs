//! Animation channels and their sample storage.

use std::io::{Seek, Write};

use glam::{Quat, Vec2, Vec3};
use rosekit_common::{BinaryReader, BinaryWriter};

use crate::{Error, Result};

/// What a channel animates.
///
/// The values are single bits of a flag set, but each channel in a file
/// carries exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum ChannelType {
    Position = 1 << 1,
    Rotation = 1 << 2,
    Normal = 1 << 3,
    Alpha = 1 << 4,
    Uv0 = 1 << 5,
    Uv1 = 1 << 6,
    Uv2 = 1 << 7,
    Uv3 = 1 << 8,
    TextureAnimation = 1 << 9,
    Scale = 1 << 10,
}

impl ChannelType {
    /// Get the on-disk value.
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Number of f32 components in one sample.
    pub const fn component_count(self) -> usize {
        match self {
            ChannelType::Position | ChannelType::Normal => 3,
            ChannelType::Rotation => 4,
            ChannelType::Uv0 | ChannelType::Uv1 | ChannelType::Uv2 | ChannelType::Uv3 => 2,
            ChannelType::Alpha | ChannelType::TextureAnimation | ChannelType::Scale => 1,
        }
    }

    /// Size in bytes of one sample.
    pub const fn sample_size(self) -> usize {
        self.component_count() * 4
    }

    /// Get the name of this channel type.
    pub const fn name(self) -> &'static str {
        match self {
            ChannelType::Position => "Position",
            ChannelType::Rotation => "Rotation",
            ChannelType::Normal => "Normal",
            ChannelType::Alpha => "Alpha",
            ChannelType::Uv0 => "Uv0",
            ChannelType::Uv1 => "Uv1",
            ChannelType::Uv2 => "Uv2",
            ChannelType::Uv3 => "Uv3",
            ChannelType::TextureAnimation => "TextureAnimation",
            ChannelType::Scale => "Scale",
        }
    }
}

impl TryFrom<u32> for ChannelType {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Ok(match value {
            0x002 => ChannelType::Position,
            0x004 => ChannelType::Rotation,
            0x008 => ChannelType::Normal,
            0x010 => ChannelType::Alpha,
            0x020 => ChannelType::Uv0,
            0x040 => ChannelType::Uv1,
            0x080 => ChannelType::Uv2,
            0x100 => ChannelType::Uv3,
            0x200 => ChannelType::TextureAnimation,
            0x400 => ChannelType::Scale,
            other => return Err(Error::UnknownChannelType(other)),
        })
    }
}

impl std::fmt::Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-frame samples of one channel, typed by the channel's kind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelSamples {
    Position(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Normal(Vec<Vec3>),
    Alpha(Vec<f32>),
    Uv0(Vec<Vec2>),
    Uv1(Vec<Vec2>),
    Uv2(Vec<Vec2>),
    Uv3(Vec<Vec2>),
    TextureAnimation(Vec<f32>),
    Scale(Vec<f32>),
}

impl ChannelSamples {
    /// Create empty storage for a channel type.
    pub fn with_capacity(channel_type: ChannelType, capacity: usize) -> Self {
        match channel_type {
            ChannelType::Position => ChannelSamples::Position(Vec::with_capacity(capacity)),
            ChannelType::Rotation => ChannelSamples::Rotation(Vec::with_capacity(capacity)),
            ChannelType::Normal => ChannelSamples::Normal(Vec::with_capacity(capacity)),
            ChannelType::Alpha => ChannelSamples::Alpha(Vec::with_capacity(capacity)),
            ChannelType::Uv0 => ChannelSamples::Uv0(Vec::with_capacity(capacity)),
            ChannelType::Uv1 => ChannelSamples::Uv1(Vec::with_capacity(capacity)),
            ChannelType::Uv2 => ChannelSamples::Uv2(Vec::with_capacity(capacity)),
            ChannelType::Uv3 => ChannelSamples::Uv3(Vec::with_capacity(capacity)),
            ChannelType::TextureAnimation => {
                ChannelSamples::TextureAnimation(Vec::with_capacity(capacity))
            }
            ChannelType::Scale => ChannelSamples::Scale(Vec::with_capacity(capacity)),
        }
    }

    /// Get the channel type these samples belong to.
    pub fn channel_type(&self) -> ChannelType {
        match self {
            ChannelSamples::Position(_) => ChannelType::Position,
            ChannelSamples::Rotation(_) => ChannelType::Rotation,
            ChannelSamples::Normal(_) => ChannelType::Normal,
            ChannelSamples::Alpha(_) => ChannelType::Alpha,
            ChannelSamples::Uv0(_) => ChannelType::Uv0,
            ChannelSamples::Uv1(_) => ChannelType::Uv1,
            ChannelSamples::Uv2(_) => ChannelType::Uv2,
            ChannelSamples::Uv3(_) => ChannelType::Uv3,
            ChannelSamples::TextureAnimation(_) => ChannelType::TextureAnimation,
            ChannelSamples::Scale(_) => ChannelType::Scale,
        }
    }

    /// Number of samples (frames) stored.
    pub fn len(&self) -> usize {
        match self {
            ChannelSamples::Position(v) | ChannelSamples::Normal(v) => v.len(),
            ChannelSamples::Rotation(v) => v.len(),
            ChannelSamples::Uv0(v)
            | ChannelSamples::Uv1(v)
            | ChannelSamples::Uv2(v)
            | ChannelSamples::Uv3(v) => v.len(),
            ChannelSamples::Alpha(v)
            | ChannelSamples::TextureAnimation(v)
            | ChannelSamples::Scale(v) => v.len(),
        }
    }

    /// Check if no samples are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read one sample and append it.
    pub(crate) fn read_sample(&mut self, reader: &mut BinaryReader<'_>) -> Result<()> {
        match self {
            ChannelSamples::Position(v) | ChannelSamples::Normal(v) => v.push(reader.read_vec3()?),
            ChannelSamples::Rotation(v) => v.push(reader.read_quat_wxyz()?),
            ChannelSamples::Uv0(v)
            | ChannelSamples::Uv1(v)
            | ChannelSamples::Uv2(v)
            | ChannelSamples::Uv3(v) => v.push(reader.read_vec2()?),
            ChannelSamples::Alpha(v)
            | ChannelSamples::TextureAnimation(v)
            | ChannelSamples::Scale(v) => v.push(reader.read_f32()?),
        }
        Ok(())
    }

    /// Write the sample of one frame.
    pub(crate) fn write_sample<W: Write + Seek>(
        &self,
        frame: usize,
        writer: &mut BinaryWriter<W>,
    ) -> Result<()> {
        match self {
            ChannelSamples::Position(v) | ChannelSamples::Normal(v) => writer.write_vec3(v[frame])?,
            ChannelSamples::Rotation(v) => writer.write_quat_wxyz(v[frame])?,
            ChannelSamples::Uv0(v)
            | ChannelSamples::Uv1(v)
            | ChannelSamples::Uv2(v)
            | ChannelSamples::Uv3(v) => writer.write_vec2(v[frame])?,
            ChannelSamples::Alpha(v)
            | ChannelSamples::TextureAnimation(v)
            | ChannelSamples::Scale(v) => writer.write_f32(v[frame])?,
        }
        Ok(())
    }
}

/// One animated property of one bone.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channel {
    /// Target bone index.
    pub bone: u32,
    /// Samples, one per frame.
    pub samples: ChannelSamples,
}

impl Channel {
    /// Create a channel.
    pub fn new(bone: u32, samples: ChannelSamples) -> Self {
        Self { bone, samples }
    }

    /// Get the channel type.
    pub fn channel_type(&self) -> ChannelType {
        self.samples.channel_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_type_bits() {
        for ty in [
            ChannelType::Position,
            ChannelType::Rotation,
            ChannelType::Normal,
            ChannelType::Alpha,
            ChannelType::Uv0,
            ChannelType::Uv1,
            ChannelType::Uv2,
            ChannelType::Uv3,
            ChannelType::TextureAnimation,
            ChannelType::Scale,
        ] {
            assert_eq!(ty.bits().count_ones(), 1);
            assert_eq!(ChannelType::try_from(ty.bits()).unwrap(), ty);
            assert_eq!(ChannelSamples::with_capacity(ty, 0).channel_type(), ty);
        }
    }

    #[test]
    fn test_sample_sizes() {
        assert_eq!(ChannelType::Position.sample_size(), 12);
        assert_eq!(ChannelType::Rotation.sample_size(), 16);
        assert_eq!(ChannelType::Uv2.sample_size(), 8);
        assert_eq!(ChannelType::Alpha.sample_size(), 4);
        assert_eq!(ChannelType::Scale.sample_size(), 4);
    }

    #[test]
    fn test_unknown_channel_type() {
        assert!(matches!(
            ChannelType::try_from(1),
            Err(Error::UnknownChannelType(1))
        ));
        assert!(ChannelType::try_from(0x6).is_err());
    }
}
