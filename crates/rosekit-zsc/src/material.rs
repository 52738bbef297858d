//! Material table entries.

use std::io::{Seek, Write};

use glam::Vec3;
use rosekit_common::{BinaryReader, BinaryWriter};

use crate::Result;

/// How a material is blended with the frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlendMode {
    None,
    Lighten,
    Normal,
    Custom,
    /// Value outside the known set, kept for round-tripping.
    Other(u16),
}

impl From<u16> for BlendMode {
    fn from(value: u16) -> Self {
        match value {
            0 => BlendMode::None,
            1 => BlendMode::Lighten,
            2 => BlendMode::Normal,
            3 => BlendMode::Custom,
            other => BlendMode::Other(other),
        }
    }
}

impl From<BlendMode> for u16 {
    fn from(mode: BlendMode) -> Self {
        match mode {
            BlendMode::None => 0,
            BlendMode::Lighten => 1,
            BlendMode::Normal => 2,
            BlendMode::Custom => 3,
            BlendMode::Other(value) => value,
        }
    }
}

/// Glow effect applied on top of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlowType {
    None,
    NotSet,
    Simple,
    Light,
    Texture,
    TextureLight,
    Alpha,
    /// Value outside the known set, kept for round-tripping.
    Other(u16),
}

impl From<u16> for GlowType {
    fn from(value: u16) -> Self {
        match value {
            0 => GlowType::None,
            1 => GlowType::NotSet,
            2 => GlowType::Simple,
            3 => GlowType::Light,
            4 => GlowType::Texture,
            5 => GlowType::TextureLight,
            6 => GlowType::Alpha,
            other => GlowType::Other(other),
        }
    }
}

impl From<GlowType> for u16 {
    fn from(glow: GlowType) -> Self {
        match glow {
            GlowType::None => 0,
            GlowType::NotSet => 1,
            GlowType::Simple => 2,
            GlowType::Light => 3,
            GlowType::Texture => 4,
            GlowType::TextureLight => 5,
            GlowType::Alpha => 6,
            GlowType::Other(value) => value,
        }
    }
}

/// A texture plus its render state.
///
/// `alpha_ref` and `specular` are stored as-is; the flag fields are `u16`
/// booleans on disk.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    pub path: String,
    pub is_skin: bool,
    pub alpha_enabled: bool,
    pub two_sided: bool,
    pub alpha_test: bool,
    pub alpha_ref: u16,
    pub z_test: bool,
    pub z_write: bool,
    pub blend_mode: BlendMode,
    pub specular: bool,
    pub alpha: f32,
    pub glow_type: GlowType,
    pub glow_color: Vec3,
}

impl Material {
    /// Create an opaque material with default render state.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_skin: false,
            alpha_enabled: false,
            two_sided: false,
            alpha_test: false,
            alpha_ref: 0,
            z_test: true,
            z_write: true,
            blend_mode: BlendMode::None,
            specular: false,
            alpha: 1.0,
            glow_type: GlowType::None,
            glow_color: Vec3::ONE,
        }
    }

    pub(crate) fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let path = reader.read_cstring()?;
        let is_skin = reader.read_u16()? != 0;
        let alpha_enabled = reader.read_u16()? != 0;
        let two_sided = reader.read_u16()? != 0;
        let alpha_test = reader.read_u16()? != 0;
        let alpha_ref = reader.read_u16()?;
        let z_test = reader.read_u16()? != 0;
        let z_write = reader.read_u16()? != 0;
        let blend_mode = BlendMode::from(reader.read_u16()?);
        let specular = reader.read_u16()? != 0;
        let alpha = reader.read_f32()?;
        let glow_type = GlowType::from(reader.read_u16()?);
        let glow_color = reader.read_vec3()?;

        Ok(Self {
            path,
            is_skin,
            alpha_enabled,
            two_sided,
            alpha_test,
            alpha_ref,
            z_test,
            z_write,
            blend_mode,
            specular,
            alpha,
            glow_type,
            glow_color,
        })
    }

    pub(crate) fn write<W: Write + Seek>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_cstring(&self.path)?;
        writer.write_u16(self.is_skin as u16)?;
        writer.write_u16(self.alpha_enabled as u16)?;
        writer.write_u16(self.two_sided as u16)?;
        writer.write_u16(self.alpha_test as u16)?;
        writer.write_u16(self.alpha_ref)?;
        writer.write_u16(self.z_test as u16)?;
        writer.write_u16(self.z_write as u16)?;
        writer.write_u16(self.blend_mode.into())?;
        writer.write_u16(self.specular as u16)?;
        writer.write_f32(self.alpha)?;
        writer.write_u16(self.glow_type.into())?;
        writer.write_vec3(self.glow_color)?;
        Ok(())
    }
}
