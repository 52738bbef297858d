//! Records stored in list blocks.
//!
//! Every record starts with a [`PlacedObject`]; some block types append
//! extra fields after it.

use std::io::{Seek, Write};

use glam::{IVec2, Quat, Vec3};
use rosekit_common::{coords, BinaryReader, BinaryWriter};

use crate::{Error, Result};

/// A record that can appear in a list block.
pub trait Record: Sized {
    fn read(reader: &mut BinaryReader<'_>) -> Result<Self>;
    fn write<W: Write + Seek>(&self, writer: &mut BinaryWriter<W>) -> Result<()>;
}

/// Read an `i32`-counted list.
pub(crate) fn read_list<T: Record>(reader: &mut BinaryReader<'_>) -> Result<Vec<T>> {
    let count = reader.read_u32()? as usize;
    let mut items = Vec::with_capacity(count.min(reader.remaining()));
    for _ in 0..count {
        items.push(T::read(reader)?);
    }
    Ok(items)
}

/// Write an `i32`-counted list.
pub(crate) fn write_list<T: Record, W: Write + Seek>(
    writer: &mut BinaryWriter<W>,
    items: &[T],
) -> Result<()> {
    writer.write_i32(to_i32("list length", items.len() as u64)?)?;
    for item in items {
        item.write(writer)?;
    }
    Ok(())
}

pub(crate) fn to_i32(what: &'static str, value: u64) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::Overflow { what, value })
}

/// The placement shared by every map record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedObject {
    pub description: String,
    pub warp_id: u16,
    pub event_id: u16,
    pub object_type: i32,
    /// Index into the scene-object list the block draws from.
    pub object_id: i32,
    /// Map cell the object belongs to.
    pub map_position: IVec2,
    pub rotation: Quat,
    /// World position, including the map origin offset.
    pub position: Vec3,
    pub scale: Vec3,
}

impl Default for PlacedObject {
    fn default() -> Self {
        Self {
            description: String::new(),
            warp_id: 0,
            event_id: 0,
            object_type: 0,
            object_id: 0,
            map_position: IVec2::ZERO,
            rotation: Quat::IDENTITY,
            position: coords::MAP_ORIGIN_OFFSET,
            scale: Vec3::ONE,
        }
    }
}

impl Record for PlacedObject {
    fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let description = reader.read_u8_string()?;
        let warp_id = reader.read_u16()?;
        let event_id = reader.read_u16()?;
        let object_type = reader.read_i32()?;
        let object_id = reader.read_i32()?;
        let map_x = reader.read_i32()?;
        let map_y = reader.read_i32()?;
        let rotation = coords::rotation_from_disk(reader.read_quat_xyzw()?);
        let position = coords::map_position_from_disk(reader.read_vec3()?);
        let scale = coords::scale_from_disk(reader.read_vec3()?);

        Ok(Self {
            description,
            warp_id,
            event_id,
            object_type,
            object_id,
            map_position: IVec2::new(map_x, map_y),
            rotation,
            position,
            scale,
        })
    }

    fn write<W: Write + Seek>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_u8_string(&self.description)?;
        writer.write_u16(self.warp_id)?;
        writer.write_u16(self.event_id)?;
        writer.write_i32(self.object_type)?;
        writer.write_i32(self.object_id)?;
        writer.write_i32(self.map_position.x)?;
        writer.write_i32(self.map_position.y)?;
        writer.write_quat_xyzw(coords::rotation_to_disk(self.rotation))?;
        writer.write_vec3(coords::map_position_to_disk(self.position))?;
        writer.write_vec3(coords::scale_to_disk(self.scale))?;
        Ok(())
    }
}

/// A non-player character placement.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Npc {
    pub object: PlacedObject,
    pub ai_id: i32,
    pub quest_file: String,
}

impl Record for Npc {
    fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            object: PlacedObject::read(reader)?,
            ai_id: reader.read_i32()?,
            quest_file: reader.read_u8_string()?,
        })
    }

    fn write<W: Write + Seek>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        self.object.write(writer)?;
        writer.write_i32(self.ai_id)?;
        writer.write_u8_string(&self.quest_file)?;
        Ok(())
    }
}

/// An ambient sound emitter.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sound {
    pub object: PlacedObject,
    pub path: String,
    pub range: i32,
    pub interval: i32,
}

impl Record for Sound {
    fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            object: PlacedObject::read(reader)?,
            path: reader.read_u8_string()?,
            range: reader.read_i32()?,
            interval: reader.read_i32()?,
        })
    }

    fn write<W: Write + Seek>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        self.object.write(writer)?;
        writer.write_u8_string(&self.path)?;
        writer.write_i32(self.range)?;
        writer.write_i32(self.interval)?;
        Ok(())
    }
}

/// A placed particle effect.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub object: PlacedObject,
    pub path: String,
}

impl Record for Effect {
    fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            object: PlacedObject::read(reader)?,
            path: reader.read_u8_string()?,
        })
    }

    fn write<W: Write + Seek>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        self.object.write(writer)?;
        writer.write_u8_string(&self.path)?;
        Ok(())
    }
}

/// One monster kind inside a spawn point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnEntry {
    pub name: String,
    pub monster_id: i32,
    pub count: i32,
}

impl Record for SpawnEntry {
    fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            name: reader.read_u8_string()?,
            monster_id: reader.read_i32()?,
            count: reader.read_i32()?,
        })
    }

    fn write<W: Write + Seek>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_u8_string(&self.name)?;
        writer.write_i32(self.monster_id)?;
        writer.write_i32(self.count)?;
        Ok(())
    }
}

/// A monster spawn point.
///
/// Basic spawns are regular respawns; tactic spawns are drawn from once
/// the accumulated tactic points reach `tactic_points`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterSpawn {
    pub object: PlacedObject,
    pub name: String,
    pub basic_spawns: Vec<SpawnEntry>,
    pub tactic_spawns: Vec<SpawnEntry>,
    pub interval: i32,
    pub limit: i32,
    pub range: i32,
    pub tactic_points: i32,
}

impl Record for MonsterSpawn {
    fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            object: PlacedObject::read(reader)?,
            name: reader.read_u8_string()?,
            basic_spawns: read_list(reader)?,
            tactic_spawns: read_list(reader)?,
            interval: reader.read_i32()?,
            limit: reader.read_i32()?,
            range: reader.read_i32()?,
            tactic_points: reader.read_i32()?,
        })
    }

    fn write<W: Write + Seek>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        self.object.write(writer)?;
        writer.write_u8_string(&self.name)?;
        write_list(writer, &self.basic_spawns)?;
        write_list(writer, &self.tactic_spawns)?;
        writer.write_i32(self.interval)?;
        writer.write_i32(self.limit)?;
        writer.write_i32(self.range)?;
        writer.write_i32(self.tactic_points)?;
        Ok(())
    }
}

/// A scripted trigger volume.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventTrigger {
    pub object: PlacedObject,
    pub function: String,
    pub quest_file: String,
}

impl Record for EventTrigger {
    fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            object: PlacedObject::read(reader)?,
            function: reader.read_u8_string()?,
            quest_file: reader.read_u8_string()?,
        })
    }

    fn write<W: Write + Seek>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        self.object.write(writer)?;
        writer.write_u8_string(&self.function)?;
        writer.write_u8_string(&self.quest_file)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placed_object_conversion() {
        let mut writer = BinaryWriter::in_memory();
        writer.write_u8_string("tree").unwrap();
        writer.write_u16(0).unwrap();
        writer.write_u16(3).unwrap();
        writer.write_i32(1).unwrap();
        writer.write_i32(42).unwrap();
        writer.write_i32(31).unwrap();
        writer.write_i32(32).unwrap();
        writer.write_quat_xyzw(Quat::IDENTITY).unwrap();
        writer.write_vec3(Vec3::new(100.0, 200.0, 300.0)).unwrap();
        writer.write_vec3(Vec3::new(1.0, 2.0, 3.0)).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = BinaryReader::new(&bytes);
        let object = PlacedObject::read(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(object.description, "tree");
        assert_eq!(object.event_id, 3);
        assert_eq!(object.object_id, 42);
        assert_eq!(object.map_position, IVec2::new(31, 32));
        assert_eq!(object.rotation, Quat::IDENTITY);
        assert_eq!(object.position, Vec3::new(5201.0, 3.0, 5202.0));
        assert_eq!(object.scale, Vec3::new(1.0, 3.0, 2.0));

        let mut writer = BinaryWriter::in_memory();
        object.write(&mut writer).unwrap();
        assert_eq!(writer.into_bytes(), bytes);
    }

    #[test]
    fn test_monster_spawn_roundtrip() {
        let spawn = MonsterSpawn {
            object: PlacedObject {
                description: "camp".into(),
                position: Vec3::new(5250.5, 12.0, 5100.25),
                ..PlacedObject::default()
            },
            name: "Choropy Camp".into(),
            basic_spawns: vec![
                SpawnEntry {
                    name: "choropy".into(),
                    monster_id: 1,
                    count: 3,
                },
                SpawnEntry {
                    name: "hornet".into(),
                    monster_id: 7,
                    count: 1,
                },
            ],
            tactic_spawns: vec![SpawnEntry {
                name: "choropy leader".into(),
                monster_id: 2,
                count: 1,
            }],
            interval: 30,
            limit: 8,
            range: 15,
            tactic_points: 100,
        };

        let mut writer = BinaryWriter::in_memory();
        spawn.write(&mut writer).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(MonsterSpawn::read(&mut reader).unwrap(), spawn);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_description_too_long() {
        let object = PlacedObject {
            description: "x".repeat(300),
            ..PlacedObject::default()
        };
        let mut writer = BinaryWriter::in_memory();
        assert!(matches!(
            object.write(&mut writer),
            Err(Error::Common(rosekit_common::Error::StringTooLong { len: 300, max: 255 }))
        ));
    }
}
