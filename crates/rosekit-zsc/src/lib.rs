//! ZSC scene-object list codec.
//!
//! A ZSC file holds shared tables of mesh paths, materials and effect paths,
//! followed by composite objects. Each object is a list of parts (mesh +
//! material + transform) and attached effects, with per-part attributes
//! stored as a tagged property stream.
//!
//! # File Format
//!
//! ```text
//! mesh_count      u16,  mesh_count × cstr
//! material_count  u16,  material_count × material
//! effect_count    u16,  effect_count × cstr
//! object_count    u16,  object_count × object
//!
//! object:  radius i32, x i32, y i32, part_count u16
//!          (ends here when part_count is 0)
//!          part_count × { mesh u16, material u16, properties }
//!          effect_count u16 × { effect u16, type u16, properties }
//!          bbox_min vec3, bbox_max vec3
//! ```
//!
//! Positions are stored in centimetres with Y and Z swapped; see
//! [`rosekit_common::coords`].

mod error;
mod file;
mod material;
mod object;
mod property;

pub use error::{Error, Result};
pub use file::ZscFile;
pub use material::{BlendMode, GlowType, Material};
pub use object::{EffectType, ObjectEffect, ObjectPart, SceneObject};
pub use property::{
    BoneRole, CollisionFlags, CollisionLevel, DummyPoint, EffectProperty, PartProperty, PickMode,
};
