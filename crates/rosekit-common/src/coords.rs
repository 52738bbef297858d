//! Conversion between on-disk and in-memory coordinate spaces.
//!
//! The game data is authored Z-up in centimetres. In memory everything is
//! Y-up in metres with the opposite handedness, so loading swaps the Y and Z
//! axes and divides positions by [`POSITION_SCALE`]. Map placements are
//! additionally shifted by [`MAP_ORIGIN_OFFSET`].
//!
//! Codecs must route every position, scale and rotation through this module.
//! Each `*_from_disk` function has a `*_to_disk` counterpart that undoes it.

use glam::{Quat, Vec3};

/// Centimetres per in-memory unit.
pub const POSITION_SCALE: f32 = 100.0;

/// Origin shift applied to map object placements after scaling.
pub const MAP_ORIGIN_OFFSET: Vec3 = Vec3::new(5200.0, 0.0, 5200.0);

#[inline]
fn swap_yz(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, v.y)
}

/// Convert a position read from disk.
#[inline]
pub fn position_from_disk(v: Vec3) -> Vec3 {
    swap_yz(v) / POSITION_SCALE
}

/// Convert a position for writing to disk.
#[inline]
pub fn position_to_disk(v: Vec3) -> Vec3 {
    swap_yz(v) * POSITION_SCALE
}

/// Convert a map placement read from disk.
#[inline]
pub fn map_position_from_disk(v: Vec3) -> Vec3 {
    position_from_disk(v) + MAP_ORIGIN_OFFSET
}

/// Convert a map placement for writing to disk.
#[inline]
pub fn map_position_to_disk(v: Vec3) -> Vec3 {
    position_to_disk(v - MAP_ORIGIN_OFFSET)
}

/// Convert a scale read from disk. Scales are unitless, only the axes move.
#[inline]
pub fn scale_from_disk(v: Vec3) -> Vec3 {
    swap_yz(v)
}

/// Convert a scale for writing to disk.
#[inline]
pub fn scale_to_disk(v: Vec3) -> Vec3 {
    swap_yz(v)
}

/// Convert a rotation read from disk.
///
/// Swapping two axes mirrors the space, so the rotation axis is permuted and
/// negated while the angle is kept.
#[inline]
pub fn rotation_from_disk(q: Quat) -> Quat {
    Quat::from_xyzw(-q.x, -q.z, -q.y, q.w)
}

/// Convert a rotation for writing to disk.
#[inline]
pub fn rotation_to_disk(q: Quat) -> Quat {
    rotation_from_disk(q)
}
