//! IFO file handling.

use std::io::{Read, Seek, SeekFrom, Write};

use rosekit_common::{BinaryReader, BinaryWriter};

use crate::block::{BlockType, DirectoryEntry};
use crate::record::{
    read_list, to_i32, write_list, Effect, EventTrigger, MonsterSpawn, Npc, PlacedObject, Sound,
};
use crate::water::{WaterGrid, WaterPlanes};
use crate::{Error, Result};

/// Contents of one map block: object placements, spawns, triggers and water.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IfoFile {
    pub decorations: Vec<PlacedObject>,
    pub npcs: Vec<Npc>,
    pub constructions: Vec<PlacedObject>,
    pub sounds: Vec<Sound>,
    pub effects: Vec<Effect>,
    pub animated_objects: Vec<PlacedObject>,
    pub water_grid: Option<WaterGrid>,
    pub monster_spawns: Vec<MonsterSpawn>,
    pub water_planes: Option<WaterPlanes>,
    pub warp_gates: Vec<PlacedObject>,
    pub collision_objects: Vec<PlacedObject>,
    pub event_triggers: Vec<EventTrigger>,
}

impl IfoFile {
    /// Parse an IFO file from bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        Self::read(&mut reader)
    }

    /// Read an IFO file from a stream, consuming it to the end.
    pub fn read_from<R: Read>(mut stream: R) -> Result<Self> {
        let mut data = Vec::new();
        stream.read_to_end(&mut data)?;
        Self::parse(&data)
    }

    /// Read the block directory without decoding any block.
    pub fn read_directory(reader: &mut BinaryReader<'_>) -> Result<Vec<DirectoryEntry>> {
        let count = reader.read_u32()? as usize;
        let mut entries = Vec::with_capacity(count.min(reader.remaining() / 8));
        for _ in 0..count {
            let block_type = reader.read_i32()?;
            let offset = reader.read_i32()?;
            entries.push(DirectoryEntry { block_type, offset });
        }
        Ok(entries)
    }

    /// Read an IFO file from a binary reader.
    ///
    /// Offsets are relative to the start of the reader's buffer. Blocks with
    /// an unknown type are skipped.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let count = reader.read_u32()?;
        let mut file = Self::default();

        for _ in 0..count {
            let raw_type = reader.read_i32()?;
            let offset = reader.read_i32()?;
            let resume = reader.position();

            let block_type = match BlockType::try_from(raw_type) {
                Ok(block_type) => block_type,
                Err(err) => {
                    tracing::debug!(offset, "skipping block: {err}");
                    continue;
                }
            };

            let start = u64::try_from(offset).map_err(|_| Error::NegativeOffset {
                block_type: raw_type,
                offset,
            })?;
            reader.seek_to(SeekFrom::Start(start))?;
            file.read_block(block_type, reader)?;
            reader.seek_to(SeekFrom::Start(resume as u64))?;
        }

        tracing::trace!(
            decorations = file.decorations.len(),
            npcs = file.npcs.len(),
            monster_spawns = file.monster_spawns.len(),
            "parsed map block"
        );

        Ok(file)
    }

    fn read_block(&mut self, block_type: BlockType, reader: &mut BinaryReader<'_>) -> Result<()> {
        match block_type {
            BlockType::Decoration => self.decorations.extend(read_list(reader)?),
            BlockType::Npc => self.npcs.extend(read_list(reader)?),
            BlockType::Construction => self.constructions.extend(read_list(reader)?),
            BlockType::Sound => self.sounds.extend(read_list(reader)?),
            BlockType::Effect => self.effects.extend(read_list(reader)?),
            BlockType::Animation => self.animated_objects.extend(read_list(reader)?),
            BlockType::WaterGrid => self.water_grid = Some(WaterGrid::read(reader)?),
            BlockType::MonsterSpawn => self.monster_spawns.extend(read_list(reader)?),
            BlockType::WaterPlanes => self.water_planes = Some(WaterPlanes::read(reader)?),
            BlockType::WarpGate => self.warp_gates.extend(read_list(reader)?),
            BlockType::Collision => self.collision_objects.extend(read_list(reader)?),
            BlockType::EventTrigger => self.event_triggers.extend(read_list(reader)?),
        }
        Ok(())
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
    ///
    /// Only non-empty blocks are written. The directory is reserved up front
    /// and patched once every block offset is known; offsets are relative to
    /// where writing started.
    pub fn write<W: Write + Seek>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        let blocks: Vec<BlockType> = BlockType::ALL
            .into_iter()
            .filter(|&t| self.has_block(t))
            .collect();

        let base = writer.position()?;
        writer.write_i32(to_i32("block count", blocks.len() as u64)?)?;
        let directory = writer.reserve(blocks.len() * 8)?;

        let mut entries = Vec::with_capacity(blocks.len());
        for block_type in blocks {
            let offset = to_i32("block offset", writer.position()? - base)?;
            self.write_block(block_type, writer)?;
            entries.push((block_type, offset));
        }

        let end = writer.position()?;
        writer.seek(SeekFrom::Start(directory))?;
        for (block_type, offset) in entries {
            writer.write_i32(block_type.value())?;
            writer.write_i32(offset)?;
        }
        writer.seek(SeekFrom::Start(end))?;
        Ok(())
    }

    fn write_block<W: Write + Seek>(
        &self,
        block_type: BlockType,
        writer: &mut BinaryWriter<W>,
    ) -> Result<()> {
        match block_type {
            BlockType::Decoration => write_list(writer, &self.decorations),
            BlockType::Npc => write_list(writer, &self.npcs),
            BlockType::Construction => write_list(writer, &self.constructions),
            BlockType::Sound => write_list(writer, &self.sounds),
            BlockType::Effect => write_list(writer, &self.effects),
            BlockType::Animation => write_list(writer, &self.animated_objects),
            BlockType::WaterGrid => match &self.water_grid {
                Some(grid) => grid.write(writer),
                None => Ok(()),
            },
            BlockType::MonsterSpawn => write_list(writer, &self.monster_spawns),
            BlockType::WaterPlanes => match &self.water_planes {
                Some(planes) => planes.write(writer),
                None => Ok(()),
            },
            BlockType::WarpGate => write_list(writer, &self.warp_gates),
            BlockType::Collision => write_list(writer, &self.collision_objects),
            BlockType::EventTrigger => write_list(writer, &self.event_triggers),
        }
    }

    /// Check whether a block has content to write.
    pub fn has_block(&self, block_type: BlockType) -> bool {
        match block_type {
            BlockType::Decoration => !self.decorations.is_empty(),
            BlockType::Npc => !self.npcs.is_empty(),
            BlockType::Construction => !self.constructions.is_empty(),
            BlockType::Sound => !self.sounds.is_empty(),
            BlockType::Effect => !self.effects.is_empty(),
            BlockType::Animation => !self.animated_objects.is_empty(),
            BlockType::WaterGrid => self.water_grid.is_some(),
            BlockType::MonsterSpawn => !self.monster_spawns.is_empty(),
            BlockType::WaterPlanes => self.water_planes.is_some(),
            BlockType::WarpGate => !self.warp_gates.is_empty(),
            BlockType::Collision => !self.collision_objects.is_empty(),
            BlockType::EventTrigger => !self.event_triggers.is_empty(),
        }
    }

    /// Iterate over every placement in the file, whatever its block.
    pub fn placed_objects(&self) -> impl Iterator<Item = &PlacedObject> {
        self.decorations
            .iter()
            .chain(self.npcs.iter().map(|r| &r.object))
            .chain(&self.constructions)
            .chain(self.sounds.iter().map(|r| &r.object))
            .chain(self.effects.iter().map(|r| &r.object))
            .chain(&self.animated_objects)
            .chain(self.monster_spawns.iter().map(|r| &r.object))
            .chain(&self.warp_gates)
            .chain(&self.collision_objects)
            .chain(self.event_triggers.iter().map(|r| &r.object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, SpawnEntry};
    use crate::water::WaterPlane;
    use glam::{IVec2, Quat, Vec3};

    fn placed(description: &str, object_id: i32) -> PlacedObject {
        PlacedObject {
            description: description.into(),
            object_id,
            map_position: IVec2::new(32, 33),
            rotation: Quat::from_xyzw(0.0, 0.6, 0.0, 0.8),
            position: Vec3::new(5210.5, 1.25, 5190.0),
            scale: Vec3::new(1.0, 2.0, 1.0),
            ..PlacedObject::default()
        }
    }

    fn sample() -> IfoFile {
        let mut grid = WaterGrid::new(2, 2);
        grid.cells[3].has_water = true;
        grid.cells[3].height = 1800.0;

        IfoFile {
            decorations: vec![placed("tree", 1), placed("rock", 2)],
            npcs: vec![Npc {
                object: placed("judy", 1001),
                ai_id: 5,
                quest_file: "qsd/judy.qsd".into(),
            }],
            constructions: vec![placed("house", 12)],
            sounds: vec![Sound {
                object: placed("", 0),
                path: "sound/env/wind.wav".into(),
                range: 20,
                interval: 10,
            }],
            effects: vec![Effect {
                object: placed("torch", 3),
                path: "3ddata/effect/torch_fire.eft".into(),
            }],
            animated_objects: vec![placed("windmill", 4)],
            water_grid: Some(grid),
            monster_spawns: vec![MonsterSpawn {
                object: placed("camp", 0),
                name: "camp".into(),
                basic_spawns: vec![SpawnEntry {
                    name: "jelly".into(),
                    monster_id: 1,
                    count: 4,
                }],
                interval: 60,
                limit: 6,
                range: 10,
                ..MonsterSpawn::default()
            }],
            water_planes: Some(WaterPlanes {
                plane_size: 4000.0,
                planes: vec![WaterPlane {
                    start: Vec3::new(1.0, 0.5, 2.0),
                    end: Vec3::new(3.0, 0.5, 4.0),
                }],
            }),
            warp_gates: vec![PlacedObject {
                warp_id: 2,
                event_id: 9,
                ..placed("gate", 5)
            }],
            collision_objects: vec![placed("", 6)],
            event_triggers: vec![EventTrigger {
                object: placed("door", 7),
                function: "on_enter".into(),
                quest_file: "qsd/door.qsd".into(),
            }],
            ..IfoFile::default()
        }
    }

    #[test]
    fn test_roundtrip() {
        let ifo = sample();
        let bytes = ifo.to_bytes().unwrap();

        let parsed = IfoFile::parse(&bytes).unwrap();
        assert_eq!(parsed, ifo);
        assert_eq!(parsed.to_bytes().unwrap(), bytes);
        assert!(BlockType::ALL.into_iter().all(|t| parsed.has_block(t)));
        assert_eq!(parsed.effects[0].path, "3ddata/effect/torch_fire.eft");
        assert_eq!(parsed.warp_gates[0].warp_id, 2);
        assert_eq!(parsed.placed_objects().count(), 11);
    }

    #[test]
    fn test_directory_is_patched() {
        let ifo = sample();
        let bytes = ifo.to_bytes().unwrap();

        let mut reader = BinaryReader::new(&bytes);
        let directory = IfoFile::read_directory(&mut reader).unwrap();
        let types: Vec<i32> = directory.iter().map(|e| e.block_type).collect();
        assert_eq!(types, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);

        // First block starts right after the directory; offsets increase.
        assert_eq!(directory[0].offset, 4 + 12 * 8);
        assert!(directory.windows(2).all(|w| w[0].offset < w[1].offset));
    }

    #[test]
    fn test_write_at_stream_offset() {
        let ifo = sample();
        let mut cursor = std::io::Cursor::new(vec![0xEE; 16]);
        cursor.set_position(16);
        ifo.write_to(&mut cursor).unwrap();

        let data = cursor.into_inner();
        assert_eq!(&data[16..], ifo.to_bytes().unwrap().as_slice());
    }

    #[test]
    fn test_non_monotonic_offsets() {
        let decoration = placed("tree", 1);
        let npc = Npc {
            object: placed("judy", 1001),
            ai_id: 5,
            quest_file: String::new(),
        };

        // Directory lists the later block first.
        let mut writer = BinaryWriter::in_memory();
        writer.write_i32(2).unwrap();
        let directory = writer.reserve(16).unwrap();
        let decoration_offset = writer.position().unwrap();
        write_list(&mut writer, std::slice::from_ref(&decoration)).unwrap();
        let npc_offset = writer.position().unwrap();
        write_list(&mut writer, std::slice::from_ref(&npc)).unwrap();
        writer.seek(SeekFrom::Start(directory)).unwrap();
        writer.write_i32(BlockType::Npc.value()).unwrap();
        writer.write_i32(npc_offset as i32).unwrap();
        writer.write_i32(BlockType::Decoration.value()).unwrap();
        writer.write_i32(decoration_offset as i32).unwrap();

        let parsed = IfoFile::parse(&writer.into_bytes()).unwrap();
        assert_eq!(parsed.decorations, [decoration]);
        assert_eq!(parsed.npcs, [npc]);
    }

    #[test]
    fn test_unknown_block_skipped() {
        let decoration = placed("tree", 1);

        let mut writer = BinaryWriter::in_memory();
        writer.write_i32(3).unwrap();
        // Unknown types are skipped without seeking, so their offsets may be garbage.
        writer.write_i32(0).unwrap();
        writer.write_i32(-5).unwrap();
        writer.write_i32(99).unwrap();
        writer.write_i32(0x7FFF_FFFF).unwrap();
        writer.write_i32(BlockType::Decoration.value()).unwrap();
        writer.write_i32(28).unwrap();
        writer.write_i32(1).unwrap();
        decoration.write(&mut writer).unwrap();

        let parsed = IfoFile::parse(&writer.into_bytes()).unwrap();
        assert_eq!(parsed.decorations, [decoration]);
        assert_eq!(parsed.placed_objects().count(), 1);
    }

    #[test]
    fn test_offset_out_of_bounds() {
        let mut writer = BinaryWriter::in_memory();
        writer.write_i32(1).unwrap();
        writer.write_i32(BlockType::Decoration.value()).unwrap();
        writer.write_i32(500).unwrap();

        assert!(matches!(
            IfoFile::parse(&writer.into_bytes()),
            Err(Error::Common(rosekit_common::Error::SeekOutOfBounds { position: 500, .. }))
        ));
    }

    #[test]
    fn test_negative_offset() {
        let mut writer = BinaryWriter::in_memory();
        writer.write_i32(1).unwrap();
        writer.write_i32(BlockType::Sound.value()).unwrap();
        writer.write_i32(-4).unwrap();

        assert!(matches!(
            IfoFile::parse(&writer.into_bytes()),
            Err(Error::NegativeOffset {
                block_type: 4,
                offset: -4
            })
        ));
    }

    #[test]
    fn test_empty_file() {
        let bytes = IfoFile::default().to_bytes().unwrap();
        assert_eq!(bytes, 0i32.to_le_bytes());
        assert_eq!(IfoFile::parse(&bytes).unwrap(), IfoFile::default());
    }
}
