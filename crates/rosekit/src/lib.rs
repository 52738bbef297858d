//! rosekit - codecs for legacy online game client assets.
//!
//! This crate provides a unified interface to the per-format crates.
//!
//! # Crates
//!
//! - [`rosekit_common`] - Binary reading/writing, legacy text, coordinate conversion
//! - [`rosekit_zmd`] - Skeletons (`.zmd`)
//! - [`rosekit_zmo`] - Motions (`.zmo`)
//! - [`rosekit_zsc`] - Scene-object lists (`.zsc`)
//! - [`rosekit_chr`] - Character definitions (`.chr`)
//! - [`rosekit_ifo`] - Map containers (`.ifo`)
//!
//! # Example
//!
//! ```no_run
//! use rosekit::prelude::*;
//!
//! let cache: AssetCache<Asset> = AssetCache::new(64);
//! let asset = cache.get_or_load("3DDATA/NPC/MALE.ZMD", |path| Asset::load(path))?;
//! if let Asset::Skeleton(zmd) = asset.as_ref() {
//!     println!("{} bones", zmd.bones().len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod asset;
mod cache;
mod error;

// Re-export all sub-crates
pub use rosekit_chr as chr;
pub use rosekit_common as common;
pub use rosekit_ifo as ifo;
pub use rosekit_zmd as zmd;
pub use rosekit_zmo as zmo;
pub use rosekit_zsc as zsc;

pub use asset::{Asset, AssetKind};
pub use cache::{normalize_path, AssetCache};
pub use error::{Error, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{Asset, AssetCache, AssetKind};
    pub use rosekit_chr::{Character, ChrFile, MotionAction};
    pub use rosekit_common::{BinaryReader, BinaryWriter};
    pub use rosekit_ifo::{BlockType, IfoFile, PlacedObject};
    pub use rosekit_zmd::{Skeleton, ZmdFile, ZmdVersion};
    pub use rosekit_zmo::{AnimationClip, ChannelType, ZmoFile};
    pub use rosekit_zsc::{SceneObject, ZscFile};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
