//! Water blocks.

use std::io::{Seek, Write};

use glam::Vec3;
use rosekit_common::{coords, BinaryReader, BinaryWriter};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::record::to_i32;
use crate::{Error, Result};

/// On-disk water grid cell.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
struct RawWaterCell {
    has_water: u8,
    height: f32,
    water_type: i32,
    id: i32,
    reserved: i32,
}

/// One cell of the water grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaterCell {
    pub has_water: bool,
    /// Surface height, in file units.
    pub height: f32,
    pub water_type: i32,
    pub id: i32,
    pub reserved: i32,
}

impl From<RawWaterCell> for WaterCell {
    fn from(raw: RawWaterCell) -> Self {
        Self {
            has_water: raw.has_water != 0,
            height: raw.height,
            water_type: raw.water_type,
            id: raw.id,
            reserved: raw.reserved,
        }
    }
}

impl From<&WaterCell> for RawWaterCell {
    fn from(cell: &WaterCell) -> Self {
        Self {
            has_water: cell.has_water as u8,
            height: cell.height,
            water_type: cell.water_type,
            id: cell.id,
            reserved: cell.reserved,
        }
    }
}

/// Row-major grid of water cells covering the map block.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaterGrid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<WaterCell>,
}

impl WaterGrid {
    /// Create a dry grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![WaterCell::default(); width * height],
        }
    }

    /// Get the cell at a column and row.
    pub fn cell(&self, x: usize, y: usize) -> Option<&WaterCell> {
        let index = self.index(x, y)?;
        self.cells.get(index)
    }

    /// Get the cell at a column and row, mutably.
    pub fn cell_mut(&mut self, x: usize, y: usize) -> Option<&mut WaterCell> {
        let index = self.index(x, y)?;
        self.cells.get_mut(index)
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width {
            return None;
        }
        y.checked_mul(self.width)?.checked_add(x)
    }

    pub(crate) fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let width = reader.read_u32()? as usize;
        let height = reader.read_u32()? as usize;
        let count = width.saturating_mul(height);

        let cell_size = std::mem::size_of::<RawWaterCell>();
        let mut cells = Vec::with_capacity(count.min(reader.remaining() / cell_size));
        for _ in 0..count {
            cells.push(WaterCell::from(reader.read_struct::<RawWaterCell>()?));
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub(crate) fn write<W: Write + Seek>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        if self.cells.len() != self.width.saturating_mul(self.height) {
            return Err(Error::WaterGridSize {
                width: self.width,
                height: self.height,
                cells: self.cells.len(),
            });
        }

        writer.write_i32(to_i32("water grid width", self.width as u64)?)?;
        writer.write_i32(to_i32("water grid height", self.height as u64)?)?;
        for cell in &self.cells {
            writer.write_bytes(RawWaterCell::from(cell).as_bytes())?;
        }
        Ok(())
    }
}

/// An axis-aligned water surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaterPlane {
    pub start: Vec3,
    pub end: Vec3,
}

/// Water surfaces of a map block.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaterPlanes {
    pub plane_size: f32,
    pub planes: Vec<WaterPlane>,
}

impl WaterPlanes {
    pub(crate) fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let plane_size = reader.read_f32()?;
        let count = reader.read_u32()? as usize;
        let mut planes = Vec::with_capacity(count.min(reader.remaining() / 24));
        for _ in 0..count {
            let start = coords::position_from_disk(reader.read_vec3()?);
            let end = coords::position_from_disk(reader.read_vec3()?);
            planes.push(WaterPlane { start, end });
        }
        Ok(Self { plane_size, planes })
    }

    pub(crate) fn write<W: Write + Seek>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_f32(self.plane_size)?;
        writer.write_i32(to_i32("water plane count", self.planes.len() as u64)?)?;
        for plane in &self.planes {
            writer.write_vec3(coords::position_to_disk(plane.start))?;
            writer.write_vec3(coords::position_to_disk(plane.end))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_cell_size() {
        assert_eq!(std::mem::size_of::<RawWaterCell>(), 17);
    }

    #[test]
    fn test_grid_roundtrip() {
        let mut grid = WaterGrid::new(3, 2);
        *grid.cell_mut(2, 1).unwrap() = WaterCell {
            has_water: true,
            height: 1250.5,
            water_type: 1,
            id: 6,
            reserved: -1,
        };

        let mut writer = BinaryWriter::in_memory();
        grid.write(&mut writer).unwrap();
        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), 8 + 6 * 17);
        // last cell is row 1, column 2
        assert_eq!(bytes[8 + 5 * 17], 1);

        let mut reader = BinaryReader::new(&bytes);
        let parsed = WaterGrid::read(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(parsed, grid);
        assert_eq!(parsed.cell(2, 1).unwrap().height, 1250.5);
        assert!(parsed.cell(3, 0).is_none());
    }

    #[test]
    fn test_cell_index_does_not_overflow() {
        let mut grid = WaterGrid::new(4, 1);
        assert!(grid.cell(0, usize::MAX).is_none());
        assert!(grid.cell(3, usize::MAX / 4).is_none());
        assert!(grid.cell_mut(1, usize::MAX).is_none());
        assert!(grid.cell(3, 0).is_some());
    }

    #[test]
    fn test_grid_size_mismatch() {
        let mut grid = WaterGrid::new(2, 2);
        grid.cells.pop();
        let mut writer = BinaryWriter::in_memory();
        assert!(matches!(
            grid.write(&mut writer),
            Err(Error::WaterGridSize {
                width: 2,
                height: 2,
                cells: 3
            })
        ));
    }

    #[test]
    fn test_planes_use_plain_position_conversion() {
        let mut writer = BinaryWriter::in_memory();
        writer.write_f32(4000.0).unwrap();
        writer.write_i32(1).unwrap();
        writer.write_vec3(Vec3::new(100.0, 200.0, 50.0)).unwrap();
        writer.write_vec3(Vec3::new(300.0, 400.0, 50.0)).unwrap();
        let bytes = writer.into_bytes();

        let planes = WaterPlanes::read(&mut BinaryReader::new(&bytes)).unwrap();
        assert_eq!(planes.plane_size, 4000.0);
        assert_eq!(planes.planes[0].start, Vec3::new(1.0, 0.5, 2.0));
        assert_eq!(planes.planes[0].end, Vec3::new(3.0, 0.5, 4.0));

        let mut writer = BinaryWriter::in_memory();
        planes.write(&mut writer).unwrap();
        assert_eq!(writer.into_bytes(), bytes);
    }
}
