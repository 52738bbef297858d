//! ZMD skeleton codec.
//!
//! ZMD files describe a bone hierarchy as a flat list with explicit parent
//! indices, followed by a list of dummy bones (attachment points for
//! weapons, effects and the like).
//!
//! # File Format
//!
//! ```text
//! magic        [u8; 7]   "ZMD0002" or "ZMD0003"
//! bone_count   u32
//! bones        bone_count × { parent u32, name cstr, position vec3, rotation quat(wxyz) }
//! dummy_count  u32
//! dummies      dummy_count × { name cstr, parent u32, position vec3, rotation quat(wxyz) (ZMD0003 only) }
//! ```
//!
//! Every bone after the first references a parent that precedes it, so
//! absolute transforms are computed in a single pass (see [`Skeleton`]).
//!
//! # Example
//!
//! ```no_run
//! use rosekit_zmd::ZmdFile;
//!
//! let zmd = ZmdFile::parse(&std::fs::read("male.zmd")?)?;
//! let skeleton = zmd.skeleton()?;
//! for node in skeleton.bones() {
//!     println!("{} at {}", node.path, node.absolute_position());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod file;
mod skeleton;

pub use error::{Error, Result};
pub use file::{Bone, ZmdFile, ZmdVersion, MAGIC_PREFIX, SYNTHETIC_DUMMY_NAME};
pub use skeleton::{Skeleton, SkeletonNode};
