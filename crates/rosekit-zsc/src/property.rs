//! Tagged property streams attached to parts and effects.
//!
//! Each property is `u8 tag`, `u8 length`, then `length` payload bytes. A zero
//! tag ends the stream. Unrecognized tags are skipped by their declared
//! length so newer files still load.

use std::io::{Seek, Write};

use glam::{Quat, Vec3};
use rosekit_common::{coords, text, BinaryReader, BinaryWriter};

use crate::{Error, Result};

const TAG_END: u8 = 0;
const TAG_POSITION: u8 = 1;
const TAG_ROTATION: u8 = 2;
const TAG_SCALE: u8 = 3;
const TAG_AXIS_ROTATION: u8 = 4;
const TAG_BONE_INDEX: u8 = 5;
const TAG_DUMMY_INDEX: u8 = 6;
const TAG_PARENT: u8 = 7;
const TAG_COLLISION: u8 = 29;
const TAG_MOTION: u8 = 30;
const TAG_RANGE_SET: u8 = 31;
const TAG_LIGHTMAP: u8 = 32;

/// Bone a part is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoneRole {
    Pelvis,
    Head,
    Other(u16),
}

impl From<u16> for BoneRole {
    fn from(value: u16) -> Self {
        match value {
            0 => BoneRole::Pelvis,
            1 => BoneRole::Head,
            other => BoneRole::Other(other),
        }
    }
}

impl From<BoneRole> for u16 {
    fn from(role: BoneRole) -> Self {
        match role {
            BoneRole::Pelvis => 0,
            BoneRole::Head => 1,
            BoneRole::Other(value) => value,
        }
    }
}

/// Dummy attachment point a part is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DummyPoint {
    RightHand,
    LeftHand,
    LeftShield,
    Back,
    Feet,
    Face,
    Head,
    Other(u16),
}

impl From<u16> for DummyPoint {
    fn from(value: u16) -> Self {
        match value {
            0 => DummyPoint::RightHand,
            1 => DummyPoint::LeftHand,
            2 => DummyPoint::LeftShield,
            3 => DummyPoint::Back,
            4 => DummyPoint::Feet,
            5 => DummyPoint::Face,
            6 => DummyPoint::Head,
            other => DummyPoint::Other(other),
        }
    }
}

impl From<DummyPoint> for u16 {
    fn from(point: DummyPoint) -> Self {
        match point {
            DummyPoint::RightHand => 0,
            DummyPoint::LeftHand => 1,
            DummyPoint::LeftShield => 2,
            DummyPoint::Back => 3,
            DummyPoint::Feet => 4,
            DummyPoint::Face => 5,
            DummyPoint::Head => 6,
            DummyPoint::Other(value) => value,
        }
    }
}

/// Collision shape used for a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollisionLevel {
    None,
    Sphere,
    Aabb,
    Obb,
    Polygon,
    Other(u8),
}

/// How a part reacts to picking and movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PickMode {
    /// No pick flag set.
    Default,
    NotMoveable,
    NotPickable,
    HeightOnly,
    NotCameraCollision,
}

/// Raw collision word: level in the low 3 bits, pick flags above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionFlags(pub u16);

impl CollisionFlags {
    const LEVEL_MASK: u16 = 0x07;
    pub const NOT_MOVEABLE: u16 = 0x08;
    pub const NOT_PICKABLE: u16 = 0x10;
    pub const HEIGHT_ONLY: u16 = 0x20;
    pub const NOT_CAMERA_COLLISION: u16 = 0x40;

    /// Get the collision shape.
    pub fn level(self) -> CollisionLevel {
        match (self.0 & Self::LEVEL_MASK) as u8 {
            0 => CollisionLevel::None,
            1 => CollisionLevel::Sphere,
            2 => CollisionLevel::Aabb,
            3 => CollisionLevel::Obb,
            4 => CollisionLevel::Polygon,
            other => CollisionLevel::Other(other),
        }
    }

    /// Get the effective pick mode; the lowest set flag wins.
    pub fn pick_mode(self) -> PickMode {
        if self.0 & Self::NOT_MOVEABLE != 0 {
            PickMode::NotMoveable
        } else if self.0 & Self::NOT_PICKABLE != 0 {
            PickMode::NotPickable
        } else if self.0 & Self::HEIGHT_ONLY != 0 {
            PickMode::HeightOnly
        } else if self.0 & Self::NOT_CAMERA_COLLISION != 0 {
            PickMode::NotCameraCollision
        } else {
            PickMode::Default
        }
    }
}

/// One decoded entry of a part's property stream.
#[derive(Debug, Clone, PartialEq)]
pub enum PartProperty {
    Position(Vec3),
    Rotation(Quat),
    Scale(Vec3),
    AxisRotation(Quat),
    Bone(BoneRole),
    Dummy(DummyPoint),
    /// Zero-based parent part; `None` when the file stores 0.
    Parent(Option<u16>),
    Collision(CollisionFlags),
    Motion(String),
    RangeSet(u16),
    Lightmap(bool),
    Unknown { tag: u8, length: u8 },
}

/// One decoded entry of an effect's property stream.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectProperty {
    Position(Vec3),
    Rotation(Quat),
    Scale(Vec3),
    Parent(Option<u16>),
    Unknown { tag: u8, length: u8 },
}

/// Read the next raw property, or `None` at the end marker.
fn read_raw<'a>(reader: &mut BinaryReader<'a>) -> Result<Option<(u8, &'a [u8])>> {
    let tag = reader.read_u8()?;
    if tag == TAG_END {
        return Ok(None);
    }
    let length = reader.read_u8()? as usize;
    let payload = reader.read_bytes(length)?;
    Ok(Some((tag, payload)))
}

fn read_position(payload: &mut BinaryReader<'_>) -> Result<Vec3> {
    Ok(coords::position_from_disk(payload.read_vec3()?))
}

fn read_rotation(payload: &mut BinaryReader<'_>) -> Result<Quat> {
    Ok(coords::rotation_from_disk(payload.read_quat_wxyz()?))
}

fn read_scale(payload: &mut BinaryReader<'_>) -> Result<Vec3> {
    Ok(coords::scale_from_disk(payload.read_vec3()?))
}

fn read_parent(payload: &mut BinaryReader<'_>) -> Result<Option<u16>> {
    Ok(payload.read_u16()?.checked_sub(1))
}

fn skipped(tag: u8, payload: &[u8]) -> (u8, u8) {
    tracing::trace!(tag, length = payload.len(), "skipping unknown property");
    (tag, payload.len() as u8)
}

impl PartProperty {
    /// Read one property; `None` at the end of the stream.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Option<Self>> {
        let Some((tag, bytes)) = read_raw(reader)? else {
            return Ok(None);
        };
        let mut payload = BinaryReader::new(bytes);
        let property = match tag {
            TAG_POSITION => PartProperty::Position(read_position(&mut payload)?),
            TAG_ROTATION => PartProperty::Rotation(read_rotation(&mut payload)?),
            TAG_SCALE => PartProperty::Scale(read_scale(&mut payload)?),
            TAG_AXIS_ROTATION => PartProperty::AxisRotation(read_rotation(&mut payload)?),
            TAG_BONE_INDEX => PartProperty::Bone(payload.read_u16()?.into()),
            TAG_DUMMY_INDEX => PartProperty::Dummy(payload.read_u16()?.into()),
            TAG_PARENT => PartProperty::Parent(read_parent(&mut payload)?),
            TAG_COLLISION => PartProperty::Collision(CollisionFlags(payload.read_u16()?)),
            TAG_MOTION => PartProperty::Motion(text::decode(bytes)?),
            TAG_RANGE_SET => PartProperty::RangeSet(payload.read_u16()?),
            TAG_LIGHTMAP => PartProperty::Lightmap(payload.read_u16()? != 0),
            _ => {
                let (tag, length) = skipped(tag, bytes);
                PartProperty::Unknown { tag, length }
            }
        };
        Ok(Some(property))
    }

    /// Write this property with its tag and length.
    ///
    /// [`PartProperty::Unknown`] carries no payload and is not written.
    pub fn write<W: Write + Seek>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        match self {
            PartProperty::Position(v) => write_vec3(writer, TAG_POSITION, coords::position_to_disk(*v)),
            PartProperty::Rotation(q) => write_quat(writer, TAG_ROTATION, *q),
            PartProperty::Scale(v) => write_vec3(writer, TAG_SCALE, coords::scale_to_disk(*v)),
            PartProperty::AxisRotation(q) => write_quat(writer, TAG_AXIS_ROTATION, *q),
            PartProperty::Bone(role) => write_u16(writer, TAG_BONE_INDEX, (*role).into()),
            PartProperty::Dummy(point) => write_u16(writer, TAG_DUMMY_INDEX, (*point).into()),
            PartProperty::Parent(parent) => write_parent(writer, *parent),
            PartProperty::Collision(flags) => write_u16(writer, TAG_COLLISION, flags.0),
            PartProperty::Motion(path) => {
                writer.write_u8(TAG_MOTION)?;
                writer.write_u8_string(path)?;
                Ok(())
            }
            PartProperty::RangeSet(value) => write_u16(writer, TAG_RANGE_SET, *value),
            PartProperty::Lightmap(enabled) => write_u16(writer, TAG_LIGHTMAP, *enabled as u16),
            PartProperty::Unknown { .. } => Ok(()),
        }
    }
}

impl EffectProperty {
    /// Read one property; `None` at the end of the stream.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Option<Self>> {
        let Some((tag, bytes)) = read_raw(reader)? else {
            return Ok(None);
        };
        let mut payload = BinaryReader::new(bytes);
        let property = match tag {
            TAG_POSITION => EffectProperty::Position(read_position(&mut payload)?),
            TAG_ROTATION => EffectProperty::Rotation(read_rotation(&mut payload)?),
            TAG_SCALE => EffectProperty::Scale(read_scale(&mut payload)?),
            TAG_PARENT => EffectProperty::Parent(read_parent(&mut payload)?),
            _ => {
                let (tag, length) = skipped(tag, bytes);
                EffectProperty::Unknown { tag, length }
            }
        };
        Ok(Some(property))
    }

    /// Write this property with its tag and length.
    pub fn write<W: Write + Seek>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        match self {
            EffectProperty::Position(v) => {
                write_vec3(writer, TAG_POSITION, coords::position_to_disk(*v))
            }
            EffectProperty::Rotation(q) => write_quat(writer, TAG_ROTATION, *q),
            EffectProperty::Scale(v) => write_vec3(writer, TAG_SCALE, coords::scale_to_disk(*v)),
            EffectProperty::Parent(parent) => write_parent(writer, *parent),
            EffectProperty::Unknown { .. } => Ok(()),
        }
    }
}

/// Write the end-of-stream marker.
pub(crate) fn write_end<W: Write + Seek>(writer: &mut BinaryWriter<W>) -> Result<()> {
    writer.write_u8(TAG_END)?;
    Ok(())
}

fn write_vec3<W: Write + Seek>(writer: &mut BinaryWriter<W>, tag: u8, value: Vec3) -> Result<()> {
    writer.write_u8(tag)?;
    writer.write_u8(12)?;
    writer.write_vec3(value)?;
    Ok(())
}

fn write_quat<W: Write + Seek>(writer: &mut BinaryWriter<W>, tag: u8, value: Quat) -> Result<()> {
    writer.write_u8(tag)?;
    writer.write_u8(16)?;
    writer.write_quat_wxyz(coords::rotation_to_disk(value))?;
    Ok(())
}

fn write_u16<W: Write + Seek>(writer: &mut BinaryWriter<W>, tag: u8, value: u16) -> Result<()> {
    writer.write_u8(tag)?;
    writer.write_u8(2)?;
    writer.write_u16(value)?;
    Ok(())
}

fn write_parent<W: Write + Seek>(writer: &mut BinaryWriter<W>, parent: Option<u16>) -> Result<()> {
    let value = match parent {
        None => 0,
        Some(index) => index.checked_add(1).ok_or(Error::ParentOutOfRange(index))?,
    };
    write_u16(writer, TAG_PARENT, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(bytes: &[u8]) -> Vec<PartProperty> {
        let mut reader = BinaryReader::new(bytes);
        let mut properties = Vec::new();
        while let Some(property) = PartProperty::read(&mut reader).unwrap() {
            properties.push(property);
        }
        assert!(reader.is_empty());
        properties
    }

    #[test]
    fn test_collision_flags() {
        let flags = CollisionFlags(0x03 | CollisionFlags::NOT_PICKABLE | CollisionFlags::HEIGHT_ONLY);
        assert_eq!(flags.level(), CollisionLevel::Obb);
        assert_eq!(flags.pick_mode(), PickMode::NotPickable);

        assert_eq!(CollisionFlags(0x44).level(), CollisionLevel::Polygon);
        assert_eq!(CollisionFlags(0x44).pick_mode(), PickMode::NotCameraCollision);
        assert_eq!(CollisionFlags(0x7F).pick_mode(), PickMode::NotMoveable);
        assert_eq!(CollisionFlags(0).pick_mode(), PickMode::Default);
        assert_eq!(CollisionFlags(0x06).level(), CollisionLevel::Other(6));
    }

    #[test]
    fn test_property_stream() {
        let properties = vec![
            PartProperty::Position(Vec3::new(1.0, 2.0, 3.0)),
            PartProperty::Rotation(Quat::from_xyzw(0.5, 0.5, 0.5, 0.5)),
            PartProperty::Bone(BoneRole::Head),
            PartProperty::Dummy(DummyPoint::Back),
            PartProperty::Parent(Some(0)),
            PartProperty::Collision(CollisionFlags(0x12)),
            PartProperty::Motion("3ddata/motion/flag.zmo".into()),
            PartProperty::RangeSet(4),
            PartProperty::Lightmap(true),
        ];

        let mut writer = BinaryWriter::in_memory();
        for property in &properties {
            property.write(&mut writer).unwrap();
        }
        write_end(&mut writer).unwrap();

        assert_eq!(read_all(&writer.into_bytes()), properties);
    }

    #[test]
    fn test_parent_is_one_based() {
        let mut writer = BinaryWriter::in_memory();
        PartProperty::Parent(Some(2)).write(&mut writer).unwrap();
        assert_eq!(writer.into_bytes(), [TAG_PARENT, 2, 3, 0]);

        assert_eq!(
            read_all(&[TAG_PARENT, 2, 0, 0, TAG_END]),
            [PartProperty::Parent(None)]
        );
    }

    #[test]
    fn test_largest_parent_rejected_on_write() {
        let mut writer = BinaryWriter::in_memory();
        PartProperty::Parent(Some(u16::MAX - 1)).write(&mut writer).unwrap();
        assert_eq!(writer.into_bytes(), [TAG_PARENT, 2, 0xFF, 0xFF]);

        let mut writer = BinaryWriter::in_memory();
        assert!(matches!(
            EffectProperty::Parent(Some(u16::MAX)).write(&mut writer),
            Err(Error::ParentOutOfRange(u16::MAX))
        ));
    }

    #[test]
    fn test_unknown_tag_skipped_by_length() {
        let bytes = [99, 3, 0xAA, 0xBB, 0xCC, TAG_RANGE_SET, 2, 7, 0, TAG_END];
        assert_eq!(
            read_all(&bytes),
            [
                PartProperty::Unknown { tag: 99, length: 3 },
                PartProperty::RangeSet(7)
            ]
        );
    }

    #[test]
    fn test_effect_ignores_part_tags() {
        let bytes = [TAG_BONE_INDEX, 2, 1, 0, TAG_PARENT, 2, 1, 0, TAG_END];
        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(
            EffectProperty::read(&mut reader).unwrap(),
            Some(EffectProperty::Unknown {
                tag: TAG_BONE_INDEX,
                length: 2
            })
        );
        assert_eq!(
            EffectProperty::read(&mut reader).unwrap(),
            Some(EffectProperty::Parent(Some(0)))
        );
        assert_eq!(EffectProperty::read(&mut reader).unwrap(), None);
    }

    #[test]
    fn test_truncated_payload() {
        let bytes = [TAG_POSITION, 12, 0, 0, 0, 0];
        let mut reader = BinaryReader::new(&bytes);
        let err = PartProperty::read(&mut reader).unwrap_err();
        assert!(matches!(err, crate::Error::Common(e) if e.is_truncated()));
    }
}
