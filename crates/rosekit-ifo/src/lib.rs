//! IFO map container codec.
//!
//! An IFO file describes everything placed on one map block. It starts with
//! a directory of `(block type, offset)` pairs; each offset points at a block
//! anywhere in the file, in no particular order.
//!
//! # File Format
//!
//! ```text
//! block_count  i32
//! directory    block_count × { type i32, offset i32 }
//! blocks       ...
//!
//! list block:  count i32, count × record
//! record:      description u8str, warp u16, event u16, object_type i32,
//!              object_id i32, map_x i32, map_y i32, rotation quat(xyzw),
//!              position vec3, scale vec3, then per-type trailing fields
//! water grid:  width i32, height i32, width × height × 17-byte cell
//! water planes: size f32, count i32, count × { start vec3, end vec3 }
//! ```
//!
//! Unknown block types are skipped. Placement positions include the map
//! origin offset; see [`rosekit_common::coords`].

mod block;
mod error;
mod file;
mod record;
mod water;

pub use block::{BlockType, DirectoryEntry};
pub use error::{Error, Result};
pub use file::IfoFile;
pub use record::{
    Effect, EventTrigger, MonsterSpawn, Npc, PlacedObject, Record, Sound, SpawnEntry,
};
pub use water::{WaterCell, WaterGrid, WaterPlane, WaterPlanes};
