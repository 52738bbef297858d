//! Composite scene objects.

use std::io::{Seek, Write};

use glam::{Quat, Vec2, Vec3};
use rosekit_common::{coords, BinaryReader, BinaryWriter};

use crate::property::{
    write_end, BoneRole, CollisionFlags, DummyPoint, EffectProperty, PartProperty,
};
use crate::{Error, Result};

/// How an attached effect behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectType {
    Normal,
    DayNight,
    LightContainer,
    Other(u16),
}

impl From<u16> for EffectType {
    fn from(value: u16) -> Self {
        match value {
            0 => EffectType::Normal,
            1 => EffectType::DayNight,
            2 => EffectType::LightContainer,
            other => EffectType::Other(other),
        }
    }
}

impl From<EffectType> for u16 {
    fn from(effect_type: EffectType) -> Self {
        match effect_type {
            EffectType::Normal => 0,
            EffectType::DayNight => 1,
            EffectType::LightContainer => 2,
            EffectType::Other(value) => value,
        }
    }
}

/// A mesh/material pair placed inside an object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectPart {
    /// Index into the mesh table.
    pub mesh: u16,
    /// Index into the material table.
    pub material: u16,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub axis_rotation: Quat,
    pub bone: Option<BoneRole>,
    pub dummy: Option<DummyPoint>,
    /// Zero-based index of the parent part.
    pub parent: Option<u16>,
    pub collision: Option<CollisionFlags>,
    pub motion: Option<String>,
    pub range_set: Option<u16>,
    pub lightmap: Option<bool>,
}

impl ObjectPart {
    /// Create a part with an identity transform and no optional properties.
    pub fn new(mesh: u16, material: u16) -> Self {
        Self {
            mesh,
            material,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            axis_rotation: Quat::IDENTITY,
            bone: None,
            dummy: None,
            parent: None,
            collision: None,
            motion: None,
            range_set: None,
            lightmap: None,
        }
    }

    fn apply(&mut self, property: PartProperty) {
        match property {
            PartProperty::Position(v) => self.position = v,
            PartProperty::Rotation(q) => self.rotation = q,
            PartProperty::Scale(v) => self.scale = v,
            PartProperty::AxisRotation(q) => self.axis_rotation = q,
            PartProperty::Bone(role) => self.bone = Some(role),
            PartProperty::Dummy(point) => self.dummy = Some(point),
            PartProperty::Parent(parent) => self.parent = parent,
            PartProperty::Collision(flags) => self.collision = Some(flags),
            PartProperty::Motion(path) => self.motion = Some(path),
            PartProperty::RangeSet(value) => self.range_set = Some(value),
            PartProperty::Lightmap(enabled) => self.lightmap = Some(enabled),
            PartProperty::Unknown { .. } => {}
        }
    }

    /// List the properties written for this part, in file order.
    pub fn properties(&self) -> Vec<PartProperty> {
        let mut properties = vec![
            PartProperty::Position(self.position),
            PartProperty::Rotation(self.rotation),
            PartProperty::Scale(self.scale),
            PartProperty::AxisRotation(self.axis_rotation),
        ];
        properties.extend(self.bone.map(PartProperty::Bone));
        properties.extend(self.dummy.map(PartProperty::Dummy));
        if self.parent.is_some() {
            properties.push(PartProperty::Parent(self.parent));
        }
        properties.extend(self.collision.map(PartProperty::Collision));
        properties.extend(self.motion.clone().map(PartProperty::Motion));
        properties.extend(self.range_set.map(PartProperty::RangeSet));
        properties.extend(self.lightmap.map(PartProperty::Lightmap));
        properties
    }

    pub(crate) fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let mesh = reader.read_u16()?;
        let material = reader.read_u16()?;
        let mut part = Self::new(mesh, material);
        while let Some(property) = PartProperty::read(reader)? {
            part.apply(property);
        }
        Ok(part)
    }

    pub(crate) fn write<W: Write + Seek>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_u16(self.mesh)?;
        writer.write_u16(self.material)?;
        for property in self.properties() {
            property.write(writer)?;
        }
        write_end(writer)
    }
}

/// An effect attached to an object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectEffect {
    /// Index into the effect table.
    pub effect: u16,
    pub effect_type: EffectType,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Zero-based index of the part the effect follows.
    pub parent: Option<u16>,
}

impl ObjectEffect {
    /// Create an effect with an identity transform.
    pub fn new(effect: u16, effect_type: EffectType) -> Self {
        Self {
            effect,
            effect_type,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            parent: None,
        }
    }

    pub(crate) fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let effect = reader.read_u16()?;
        let effect_type = EffectType::from(reader.read_u16()?);
        let mut result = Self::new(effect, effect_type);
        while let Some(property) = EffectProperty::read(reader)? {
            match property {
                EffectProperty::Position(v) => result.position = v,
                EffectProperty::Rotation(q) => result.rotation = q,
                EffectProperty::Scale(v) => result.scale = v,
                EffectProperty::Parent(parent) => result.parent = parent,
                EffectProperty::Unknown { .. } => {}
            }
        }
        Ok(result)
    }

    pub(crate) fn write<W: Write + Seek>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_u16(self.effect)?;
        writer.write_u16(self.effect_type.into())?;
        EffectProperty::Position(self.position).write(writer)?;
        EffectProperty::Rotation(self.rotation).write(writer)?;
        EffectProperty::Scale(self.scale).write(writer)?;
        if self.parent.is_some() {
            EffectProperty::Parent(self.parent).write(writer)?;
        }
        write_end(writer)
    }
}

/// A composite object: parts, effects and stored bounds.
///
/// An object without parts is an empty slot; on disk it ends right after its
/// part count, so its effects and bounding box are not stored.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneObject {
    pub bounding_radius: f32,
    pub bounding_center: Vec2,
    pub parts: Vec<ObjectPart>,
    pub effects: Vec<ObjectEffect>,
    pub bounding_box_min: Vec3,
    pub bounding_box_max: Vec3,
}

impl SceneObject {
    /// Check if this is an empty slot.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub(crate) fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let bounding_radius = reader.read_i32()? as f32 / coords::POSITION_SCALE;
        let x = reader.read_i32()? as f32 / coords::POSITION_SCALE;
        let y = reader.read_i32()? as f32 / coords::POSITION_SCALE;
        let mut object = Self {
            bounding_radius,
            bounding_center: Vec2::new(x, y),
            ..Self::default()
        };

        let part_count = reader.read_u16()? as usize;
        if part_count == 0 {
            return Ok(object);
        }

        object.parts.reserve(part_count);
        for _ in 0..part_count {
            object.parts.push(ObjectPart::read(reader)?);
        }

        let effect_count = reader.read_u16()? as usize;
        object.effects.reserve(effect_count);
        for _ in 0..effect_count {
            object.effects.push(ObjectEffect::read(reader)?);
        }

        object.bounding_box_min = coords::position_from_disk(reader.read_vec3()?);
        object.bounding_box_max = coords::position_from_disk(reader.read_vec3()?);
        Ok(object)
    }

    pub(crate) fn write<W: Write + Seek>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_i32(to_fixed(self.bounding_radius))?;
        writer.write_i32(to_fixed(self.bounding_center.x))?;
        writer.write_i32(to_fixed(self.bounding_center.y))?;

        write_count(writer, "object parts", self.parts.len())?;
        if self.parts.is_empty() {
            return Ok(());
        }
        for part in &self.parts {
            part.write(writer)?;
        }

        write_count(writer, "object effects", self.effects.len())?;
        for effect in &self.effects {
            effect.write(writer)?;
        }

        writer.write_vec3(coords::position_to_disk(self.bounding_box_min))?;
        writer.write_vec3(coords::position_to_disk(self.bounding_box_max))?;
        Ok(())
    }
}

fn to_fixed(value: f32) -> i32 {
    (value * coords::POSITION_SCALE).round() as i32
}

/// Write a `u16` element count.
pub(crate) fn write_count<W: Write + Seek>(
    writer: &mut BinaryWriter<W>,
    table: &'static str,
    len: usize,
) -> Result<()> {
    let count = u16::try_from(len).map_err(|_| Error::TooManyEntries { table, len })?;
    writer.write_u16(count)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_only_part() {
        let mut writer = BinaryWriter::in_memory();
        writer.write_u16(0).unwrap();
        writer.write_u16(0).unwrap();
        writer.write_u8(3).unwrap();
        writer.write_u8(12).unwrap();
        writer.write_vec3(Vec3::new(2.0, 2.0, 2.0)).unwrap();
        writer.write_u8(0).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = BinaryReader::new(&bytes);
        let part = ObjectPart::read(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(part.scale, Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(part.position, Vec3::ZERO);
        assert_eq!(part.rotation, Quat::IDENTITY);
        assert_eq!(part.parent, None);
    }

    #[test]
    fn test_unknown_tag_does_not_change_part() {
        let mut plain = BinaryWriter::in_memory();
        let mut extra = BinaryWriter::in_memory();
        for writer in [&mut plain, &mut extra] {
            writer.write_u16(1).unwrap();
            writer.write_u16(2).unwrap();
            writer.write_u8(5).unwrap();
            writer.write_u8(2).unwrap();
            writer.write_u16(0).unwrap();
        }
        extra.write_bytes(&[77, 5, 1, 2, 3, 4, 5]).unwrap();
        plain.write_u8(0).unwrap();
        extra.write_u8(0).unwrap();

        let plain = ObjectPart::read(&mut BinaryReader::new(&plain.into_bytes())).unwrap();
        let extra = ObjectPart::read(&mut BinaryReader::new(&extra.into_bytes())).unwrap();
        assert_eq!(plain, extra);
        assert_eq!(plain.bone, Some(BoneRole::Pelvis));
    }

    #[test]
    fn test_empty_object_ends_after_part_count() {
        let object = SceneObject {
            bounding_radius: 1.5,
            bounding_center: Vec2::new(-2.0, 0.25),
            ..SceneObject::default()
        };
        let mut writer = BinaryWriter::in_memory();
        object.write(&mut writer).unwrap();
        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), 14);

        let mut reader = BinaryReader::new(&bytes);
        let parsed = SceneObject::read(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert!(parsed.is_empty());
        assert_eq!(parsed, object);
    }

    #[test]
    fn test_object_roundtrip() {
        let mut part = ObjectPart::new(3, 1);
        part.position = Vec3::new(0.5, -1.0, 2.25);
        part.rotation = Quat::from_xyzw(0.0, 0.0, 0.6, 0.8);
        part.scale = Vec3::new(1.0, 2.0, 3.0);
        part.dummy = Some(DummyPoint::RightHand);
        let mut child = ObjectPart::new(4, 1);
        child.parent = Some(0);
        child.motion = Some("3ddata/motion/door.zmo".into());
        child.collision = Some(CollisionFlags(0x0A));

        let mut effect = ObjectEffect::new(0, EffectType::DayNight);
        effect.position = Vec3::new(0.0, 1.0, 0.0);
        effect.parent = Some(1);

        let object = SceneObject {
            bounding_radius: 3.0,
            bounding_center: Vec2::new(1.0, -1.0),
            parts: vec![part, child],
            effects: vec![effect],
            bounding_box_min: Vec3::new(-1.0, -2.0, -3.0),
            bounding_box_max: Vec3::new(1.0, 2.0, 3.0),
        };

        let mut writer = BinaryWriter::in_memory();
        object.write(&mut writer).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(SceneObject::read(&mut reader).unwrap(), object);
        assert!(reader.is_empty());
    }
}
