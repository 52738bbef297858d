//! CHR file handling.

use std::io::{Read, Seek, Write};

use rosekit_common::{lookup, BinaryReader, BinaryWriter};

use crate::character::{write_count, Character};
use crate::Result;

/// A character table with the skeleton, motion and effect path tables its
/// entries index into.
///
/// Slot positions are character ids, so disabled slots are kept as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChrFile {
    pub skeletons: Vec<String>,
    pub motions: Vec<String>,
    pub effects: Vec<String>,
    pub characters: Vec<Option<Character>>,
}

impl ChrFile {
    /// Parse a CHR file from bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        Self::read(&mut reader)
    }

    /// Read a CHR file from a stream, consuming it to the end.
    pub fn read_from<R: Read>(mut stream: R) -> Result<Self> {
        let mut data = Vec::new();
        stream.read_to_end(&mut data)?;
        Self::parse(&data)
    }

    /// Read a CHR file from a binary reader.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let skeletons = read_path_table(reader)?;
        let motions = read_path_table(reader)?;
        let effects = read_path_table(reader)?;

        let count = reader.read_u16()? as usize;
        let mut characters = Vec::with_capacity(count);
        for _ in 0..count {
            characters.push(Character::read_slot(reader)?);
        }

        tracing::trace!(
            skeletons = skeletons.len(),
            motions = motions.len(),
            effects = effects.len(),
            characters = characters.len(),
            "parsed character table"
        );

        Ok(Self {
            skeletons,
            motions,
            effects,
            characters,
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
        write_path_table(writer, "skeleton table", &self.skeletons)?;
        write_path_table(writer, "motion table", &self.motions)?;
        write_path_table(writer, "effect table", &self.effects)?;

        write_count(writer, "character table", self.characters.len())?;
        for slot in &self.characters {
            Character::write_slot(slot.as_ref(), writer)?;
        }
        Ok(())
    }

    /// Get a character by id, if the slot is enabled.
    pub fn character(&self, id: usize) -> Option<&Character> {
        self.characters.get(id).and_then(Option::as_ref)
    }

    /// Iterate over enabled characters with their ids.
    pub fn enabled_characters(&self) -> impl Iterator<Item = (usize, &Character)> {
        self.characters
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|c| (id, c)))
    }

    /// Group enabled character ids by shared model, in first-seen order.
    pub fn model_groups(&self) -> Vec<Vec<usize>> {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for (id, character) in self.enabled_characters() {
            let existing = groups.iter_mut().find(|group| {
                self.character(group[0])
                    .is_some_and(|first| first.shares_model(character))
            });
            match existing {
                Some(group) => group.push(id),
                None => groups.push(vec![id]),
            }
        }
        groups
    }

    /// Resolve a character's skeleton path.
    pub fn skeleton_path(&self, character: &Character) -> Result<&str> {
        Ok(lookup("skeleton", &self.skeletons, character.skeleton_id as usize)?.as_str())
    }

    /// Resolve a motion index.
    pub fn motion_path(&self, index: usize) -> Result<&str> {
        Ok(lookup("motion", &self.motions, index)?.as_str())
    }

    /// Resolve an effect index.
    pub fn effect_path(&self, index: usize) -> Result<&str> {
        Ok(lookup("effect", &self.effects, index)?.as_str())
    }
}

fn read_path_table(reader: &mut BinaryReader<'_>) -> Result<Vec<String>> {
    let count = reader.read_u16()? as usize;
    let mut paths = Vec::with_capacity(count);
    for _ in 0..count {
        paths.push(reader.read_cstring()?);
    }
    Ok(paths)
}

fn write_path_table<W: Write + Seek>(
    writer: &mut BinaryWriter<W>,
    table: &'static str,
    paths: &[String],
) -> Result<()> {
    write_count(writer, table, paths.len())?;
    for path in paths {
        writer.write_cstring(path)?;
    }
    Ok(())
}
