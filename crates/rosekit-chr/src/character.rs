//! Character entries.

use std::io::{Seek, Write};

use rosekit_common::{BinaryReader, BinaryWriter};

use crate::{Error, Result};

/// What a motion is played for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotionAction {
    Stop,
    Move,
    Attack,
    Hit,
    Die,
    Run,
    Cast1,
    SkillAction1,
    Cast2,
    SkillAction2,
    Etc,
    Other(u16),
}

impl From<u16> for MotionAction {
    fn from(value: u16) -> Self {
        match value {
            0 => MotionAction::Stop,
            1 => MotionAction::Move,
            2 => MotionAction::Attack,
            3 => MotionAction::Hit,
            4 => MotionAction::Die,
            5 => MotionAction::Run,
            6 => MotionAction::Cast1,
            7 => MotionAction::SkillAction1,
            8 => MotionAction::Cast2,
            9 => MotionAction::SkillAction2,
            10 => MotionAction::Etc,
            other => MotionAction::Other(other),
        }
    }
}

impl From<MotionAction> for u16 {
    fn from(action: MotionAction) -> Self {
        match action {
            MotionAction::Stop => 0,
            MotionAction::Move => 1,
            MotionAction::Attack => 2,
            MotionAction::Hit => 3,
            MotionAction::Die => 4,
            MotionAction::Run => 5,
            MotionAction::Cast1 => 6,
            MotionAction::SkillAction1 => 7,
            MotionAction::Cast2 => 8,
            MotionAction::SkillAction2 => 9,
            MotionAction::Etc => 10,
            MotionAction::Other(value) => value,
        }
    }
}

/// A character: a skeleton, the scene objects that make up its model, its
/// motions and attached effects.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    /// Index into the skeleton table.
    pub skeleton_id: u16,
    pub name: String,
    /// Scene object ids forming the model.
    pub objects: Vec<u16>,
    /// `(action, index into the motion table)` pairs.
    pub animations: Vec<(MotionAction, u16)>,
    /// `(bone, index into the effect table)` pairs.
    pub effects: Vec<(u16, u16)>,
}

impl Character {
    /// Create a character with no objects, motions or effects.
    pub fn new(skeleton_id: u16, name: impl Into<String>) -> Self {
        Self {
            skeleton_id,
            name: name.into(),
            objects: Vec::new(),
            animations: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Check whether two characters render the same model.
    ///
    /// Compares object, motion and effect lists; skeleton and name are
    /// ignored.
    pub fn shares_model(&self, other: &Character) -> bool {
        self.objects == other.objects
            && self.animations == other.animations
            && self.effects == other.effects
    }

    /// Find the motion index for an action.
    pub fn motion_for(&self, action: MotionAction) -> Option<u16> {
        self.animations
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, motion)| *motion)
    }

    /// Read a table slot; a zero enabled flag yields `None`.
    pub(crate) fn read_slot(reader: &mut BinaryReader<'_>) -> Result<Option<Self>> {
        if reader.read_u8()? == 0 {
            return Ok(None);
        }

        let skeleton_id = reader.read_u16()?;
        let name = reader.read_cstring()?;

        let count = reader.read_u16()? as usize;
        let mut objects = Vec::with_capacity(count);
        for _ in 0..count {
            objects.push(reader.read_u16()?);
        }

        let count = reader.read_u16()? as usize;
        let mut animations = Vec::with_capacity(count);
        for _ in 0..count {
            let action = MotionAction::from(reader.read_u16()?);
            animations.push((action, reader.read_u16()?));
        }

        let count = reader.read_u16()? as usize;
        let mut effects = Vec::with_capacity(count);
        for _ in 0..count {
            let bone = reader.read_u16()?;
            effects.push((bone, reader.read_u16()?));
        }

        Ok(Some(Self {
            skeleton_id,
            name,
            objects,
            animations,
            effects,
        }))
    }

    /// Write a table slot.
    pub(crate) fn write_slot<W: Write + Seek>(
        slot: Option<&Self>,
        writer: &mut BinaryWriter<W>,
    ) -> Result<()> {
        let Some(character) = slot else {
            writer.write_u8(0)?;
            return Ok(());
        };

        writer.write_u8(1)?;
        writer.write_u16(character.skeleton_id)?;
        writer.write_cstring(&character.name)?;

        write_count(writer, "character objects", character.objects.len())?;
        for object in &character.objects {
            writer.write_u16(*object)?;
        }

        write_count(writer, "character motions", character.animations.len())?;
        for (action, motion) in &character.animations {
            writer.write_u16((*action).into())?;
            writer.write_u16(*motion)?;
        }

        write_count(writer, "character effects", character.effects.len())?;
        for (bone, effect) in &character.effects {
            writer.write_u16(*bone)?;
            writer.write_u16(*effect)?;
        }

        Ok(())
    }
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
