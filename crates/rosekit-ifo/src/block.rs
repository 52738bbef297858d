//! Block directory types.

use crate::{Error, Result};

/// Kind of block referenced from the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum BlockType {
    Decoration = 1,
    Npc = 2,
    Construction = 3,
    Sound = 4,
    Effect = 5,
    Animation = 6,
    WaterGrid = 7,
    MonsterSpawn = 8,
    WaterPlanes = 9,
    WarpGate = 10,
    Collision = 11,
    EventTrigger = 12,
}

impl BlockType {
    /// All known block types, in the order they are written.
    pub const ALL: [BlockType; 12] = [
        BlockType::Decoration,
        BlockType::Npc,
        BlockType::Construction,
        BlockType::Sound,
        BlockType::Effect,
        BlockType::Animation,
        BlockType::WaterGrid,
        BlockType::MonsterSpawn,
        BlockType::WaterPlanes,
        BlockType::WarpGate,
        BlockType::Collision,
        BlockType::EventTrigger,
    ];

    /// Get the on-disk value.
    pub const fn value(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for BlockType {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        BlockType::ALL
            .into_iter()
            .find(|t| t.value() == value)
            .ok_or(Error::UnknownBlockType(value))
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// One directory entry as found in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub block_type: i32,
    pub offset: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_type_values() {
        for (index, block_type) in BlockType::ALL.into_iter().enumerate() {
            assert_eq!(block_type.value(), index as i32 + 1);
            assert_eq!(BlockType::try_from(block_type.value()).unwrap(), block_type);
        }
    }

    #[test]
    fn test_unknown_block_type() {
        for value in [0, 13, -1] {
            assert!(matches!(
                BlockType::try_from(value),
                Err(Error::UnknownBlockType(v)) if v == value
            ));
        }
    }
}
