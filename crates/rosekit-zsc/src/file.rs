//! ZSC file handling.

use std::io::{Read, Seek, Write};

use rosekit_common::{lookup, BinaryReader, BinaryWriter};

use crate::material::Material;
use crate::object::{write_count, ObjectPart, SceneObject};
use crate::Result;

/// A scene-object list: shared mesh, material and effect tables plus the
/// objects that reference them by index.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZscFile {
    pub meshes: Vec<String>,
    pub materials: Vec<Material>,
    pub effects: Vec<String>,
    pub objects: Vec<SceneObject>,
}

impl ZscFile {
    /// Parse a ZSC file from bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        Self::read(&mut reader)
    }

    /// Read a ZSC file from a stream, consuming it to the end.
    pub fn read_from<R: Read>(mut stream: R) -> Result<Self> {
        let mut data = Vec::new();
        stream.read_to_end(&mut data)?;
        Self::parse(&data)
    }

    /// Read a ZSC file from a binary reader.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let mesh_count = reader.read_u16()? as usize;
        let mut meshes = Vec::with_capacity(mesh_count);
        for _ in 0..mesh_count {
            meshes.push(reader.read_cstring()?);
        }

        let material_count = reader.read_u16()? as usize;
        let mut materials = Vec::with_capacity(material_count);
        for _ in 0..material_count {
            materials.push(Material::read(reader)?);
        }

        let effect_count = reader.read_u16()? as usize;
        let mut effects = Vec::with_capacity(effect_count);
        for _ in 0..effect_count {
            effects.push(reader.read_cstring()?);
        }

        let object_count = reader.read_u16()? as usize;
        let mut objects = Vec::with_capacity(object_count);
        for _ in 0..object_count {
            objects.push(SceneObject::read(reader)?);
        }

        tracing::trace!(
            meshes = meshes.len(),
            materials = materials.len(),
            effects = effects.len(),
            objects = objects.len(),
            "parsed scene object list"
        );

        Ok(Self {
            meshes,
            materials,
            effects,
            objects,
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
        write_count(writer, "mesh table", self.meshes.len())?;
        for path in &self.meshes {
            writer.write_cstring(path)?;
        }

        write_count(writer, "material table", self.materials.len())?;
        for material in &self.materials {
            material.write(writer)?;
        }

        write_count(writer, "effect table", self.effects.len())?;
        for path in &self.effects {
            writer.write_cstring(path)?;
        }

        write_count(writer, "object table", self.objects.len())?;
        for object in &self.objects {
            object.write(writer)?;
        }

        Ok(())
    }

    /// Resolve a mesh index.
    pub fn mesh_path(&self, index: usize) -> Result<&str> {
        Ok(lookup("mesh", &self.meshes, index)?.as_str())
    }

    /// Resolve a material index.
    pub fn material(&self, index: usize) -> Result<&Material> {
        Ok(lookup("material", &self.materials, index)?)
    }

    /// Resolve an effect index.
    pub fn effect_path(&self, index: usize) -> Result<&str> {
        Ok(lookup("effect", &self.effects, index)?.as_str())
    }

    /// Get an object by index.
    pub fn object(&self, index: usize) -> Option<&SceneObject> {
        self.objects.get(index)
    }

    /// Resolve the mesh and material of a part.
    pub fn part_resources(&self, part: &ObjectPart) -> Result<(&str, &Material)> {
        Ok((
            self.mesh_path(part.mesh as usize)?,
            self.material(part.material as usize)?,
        ))
    }
}
