//! CHR character definition codec.
//!
//! A CHR file lists skeleton, motion and effect paths, then a table of
//! characters that reference them by index. Table slots can be disabled, in
//! which case the slot is a single zero byte.
//!
//! # File Format
//!
//! ```text
//! skeleton_count  u16, cstr × skeleton_count
//! motion_count    u16, cstr × motion_count
//! effect_count    u16, cstr × effect_count
//! character_count u16, slot × character_count
//!
//! slot: enabled u8
//!       (enabled only) skeleton u16, name cstr,
//!       object_count u16 × object u16,
//!       motion_count u16 × { action u16, motion u16 },
//!       effect_count u16 × { bone u16, effect u16 }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use rosekit_chr::ChrFile;
//!
//! let chr = ChrFile::parse(&std::fs::read("list_npc.chr")?)?;
//! for (id, character) in chr.enabled_characters() {
//!     println!("{id}: {} ({})", character.name, chr.skeleton_path(character)?);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod character;
mod error;
mod file;

pub use character::{Character, MotionAction};
pub use error::{Error, Result};
pub use file::ChrFile;
