//! ZMO motion codec.
//!
//! A motion stores a fixed number of frames for a list of channels. Each
//! channel animates one property (position, rotation, UV offset, ...) of one
//! bone, and its type alone decides the shape of every sample.
//!
//! # File Format
//!
//! ```text
//! magic          [u8; 8]   "ZMO0002\0"
//! fps            i32
//! frame_count    i32
//! channel_count  i32
//! channels       channel_count × { type u32, bone u32 }
//! samples        frame_count × channel_count × sample
//! ```
//!
//! Samples are frame-major: all channels of frame 0, then frame 1, and so
//! on. Rotations are stored as `w, x, y, z`.
//!
//! # Example
//!
//! ```no_run
//! use rosekit_zmo::{ChannelType, Component, ZmoFile};
//!
//! let zmo = ZmoFile::parse(&std::fs::read("walk.zmo")?)?;
//! let clip = zmo.build_clip()?;
//! if let Some(curve) = clip.curve(0, ChannelType::Position, Component::Y) {
//!     println!("{} keys over {}s", curve.keys.len(), clip.duration);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod channel;
mod clip;
mod error;
mod file;

pub use channel::{Channel, ChannelSamples, ChannelType};
pub use clip::{make_continuous, AnimationClip, Component, Curve, Keyframe};
pub use error::{Error, Result};
pub use file::{ZmoFile, MAGIC};
