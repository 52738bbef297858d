//! ZMD file handling.

use std::io::{Read, Seek, Write};

use glam::{Quat, Vec3};
use rosekit_common::{BinaryReader, BinaryWriter};

use crate::skeleton::Skeleton;
use crate::{Error, Result};

/// Magic prefix shared by every revision; the revision digit follows it.
pub const MAGIC_PREFIX: &[u8; 6] = b"ZMD000";

/// Name of the dummy bone appended after every load.
pub const SYNTHETIC_DUMMY_NAME: &str = "p_root";

/// ZMD format revision, resolved once from the magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZmdVersion {
    /// `ZMD0002`: dummy bones carry no rotation.
    V2,
    /// `ZMD0003`: dummy bones carry a rotation.
    V3,
}

impl ZmdVersion {
    /// The trailing magic digit for this revision.
    pub const fn digit(self) -> u8 {
        match self {
            ZmdVersion::V2 => b'2',
            ZmdVersion::V3 => b'3',
        }
    }

    /// Whether dummy bones store a rotation in this revision.
    pub const fn has_dummy_rotation(self) -> bool {
        matches!(self, ZmdVersion::V3)
    }
}

impl TryFrom<u8> for ZmdVersion {
    type Error = Error;

    fn try_from(digit: u8) -> Result<Self> {
        match digit {
            b'2' => Ok(ZmdVersion::V2),
            b'3' => Ok(ZmdVersion::V3),
            other => Err(Error::UnsupportedVersion(other as char)),
        }
    }
}

/// A bone or dummy bone.
///
/// For primary bones `parent` indexes the bone list and must be smaller than
/// the bone's own index (bone 0's parent is ignored). For dummies it indexes
/// the primary bone list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bone {
    pub name: String,
    pub parent: u32,
    pub position: Vec3,
    pub rotation: Quat,
}

impl Bone {
    /// Create a new bone.
    pub fn new(name: impl Into<String>, parent: u32, position: Vec3, rotation: Quat) -> Self {
        Self {
            name: name.into(),
            parent,
            position,
            rotation,
        }
    }

    fn synthetic_dummy() -> Self {
        Self::new(SYNTHETIC_DUMMY_NAME, 0, Vec3::ZERO, Quat::IDENTITY)
    }

    fn is_synthetic_dummy(&self) -> bool {
        self.name == SYNTHETIC_DUMMY_NAME
            && self.parent == 0
            && self.position == Vec3::ZERO
            && self.rotation == Quat::IDENTITY
    }
}

/// A skeleton file: primary bones plus dummy attachment points.
///
/// When there is at least one bone, the dummy list ends with a synthetic
/// dummy named [`SYNTHETIC_DUMMY_NAME`], parented to the root with an
/// identity transform. It is added on construction and on load, and is never
/// written. A skeleton without bones has no root to attach it to.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZmdFile {
    version: ZmdVersion,
    bones: Vec<Bone>,
    dummies: Vec<Bone>,
}

impl ZmdFile {
    /// Create a skeleton from bones and dummies.
    ///
    /// Fails if any bone references a parent that does not precede it.
    pub fn new(version: ZmdVersion, bones: Vec<Bone>, mut dummies: Vec<Bone>) -> Result<Self> {
        validate_hierarchy(&bones)?;
        if !bones.is_empty() {
            dummies.push(Bone::synthetic_dummy());
        }
        Ok(Self {
            version,
            bones,
            dummies,
        })
    }

    /// Parse a ZMD file from bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        Self::read(&mut reader)
    }

    /// Read a ZMD file from a stream, consuming it to the end.
    pub fn read_from<R: Read>(mut stream: R) -> Result<Self> {
        let mut data = Vec::new();
        stream.read_to_end(&mut data)?;
        Self::parse(&data)
    }

    /// Read a ZMD file from a binary reader.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        reader.expect_magic(MAGIC_PREFIX)?;
        let version = ZmdVersion::try_from(reader.read_u8()?)?;

        let bone_count = reader.read_u32()? as usize;
        let mut bones = Vec::with_capacity(bone_count.min(reader.remaining()));
        for _ in 0..bone_count {
            let parent = reader.read_u32()?;
            let name = reader.read_cstring()?;
            let position = reader.read_vec3()?;
            let rotation = reader.read_quat_wxyz()?;
            bones.push(Bone {
                name,
                parent,
                position,
                rotation,
            });
        }

        let dummy_count = reader.read_u32()? as usize;
        let mut dummies = Vec::with_capacity(dummy_count.min(reader.remaining()) + 1);
        for _ in 0..dummy_count {
            let name = reader.read_cstring()?;
            let parent = reader.read_u32()?;
            let position = reader.read_vec3()?;
            let rotation = if version.has_dummy_rotation() {
                reader.read_quat_wxyz()?
            } else {
                Quat::IDENTITY
            };
            dummies.push(Bone {
                name,
                parent,
                position,
                rotation,
            });
        }

        tracing::trace!(
            version = ?version,
            bones = bones.len(),
            dummies = dummies.len(),
            "parsed skeleton"
        );

        Self::new(version, bones, dummies)
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
        validate_hierarchy(&self.bones)?;

        writer.write_bytes(MAGIC_PREFIX)?;
        writer.write_u8(self.version.digit())?;

        writer.write_u32(self.bones.len() as u32)?;
        for bone in &self.bones {
            writer.write_u32(bone.parent)?;
            writer.write_cstring(&bone.name)?;
            writer.write_vec3(bone.position)?;
            writer.write_quat_wxyz(bone.rotation)?;
        }

        let dummies = self.file_dummies();
        writer.write_u32(dummies.len() as u32)?;
        for dummy in dummies {
            writer.write_cstring(&dummy.name)?;
            writer.write_u32(dummy.parent)?;
            writer.write_vec3(dummy.position)?;
            if self.version.has_dummy_rotation() {
                writer.write_quat_wxyz(dummy.rotation)?;
            }
        }

        Ok(())
    }

    /// Get the format revision.
    pub fn version(&self) -> ZmdVersion {
        self.version
    }

    /// Set the format revision used when writing.
    ///
    /// Switching to [`ZmdVersion::V2`] drops dummy rotations on the next save.
    pub fn set_version(&mut self, version: ZmdVersion) {
        self.version = version;
    }

    /// Get the primary bones.
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Get a bone by index.
    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    /// Find a bone index by name.
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    /// Get all dummies, including the trailing synthetic one if present.
    pub fn dummies(&self) -> &[Bone] {
        &self.dummies
    }

    /// Get the dummies that are stored in the file.
    pub fn file_dummies(&self) -> &[Bone] {
        match self.dummies.last() {
            Some(last) if last.is_synthetic_dummy() => &self.dummies[..self.dummies.len() - 1],
            _ => &self.dummies,
        }
    }

    /// Compute absolute transforms, inverse bind poses and paths.
    pub fn skeleton(&self) -> Result<Skeleton> {
        Skeleton::build(&self.bones, &self.dummies)
    }
}

/// Check that every non-root bone's parent precedes it.
pub(crate) fn validate_hierarchy(bones: &[Bone]) -> Result<()> {
    for (index, bone) in bones.iter().enumerate().skip(1) {
        if bone.parent as usize >= index {
            return Err(Error::ForwardReference {
                bone: index,
                parent: bone.parent,
            });
        }
    }
    Ok(())
}
