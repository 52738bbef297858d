//! Conversion of frame samples into per-component keyframe curves.

use glam::{Quat, Vec2, Vec3};

use crate::channel::{ChannelSamples, ChannelType};
use crate::file::ZmoFile;
use crate::{Error, Result};

/// Vector component a curve animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Component {
    X,
    Y,
    Z,
    W,
}

impl Component {
    const ALL: [Component; 4] = [Component::X, Component::Y, Component::Z, Component::W];

    /// Get the lowercase component name.
    pub const fn name(self) -> &'static str {
        match self {
            Component::X => "x",
            Component::Y => "y",
            Component::Z => "z",
            Component::W => "w",
        }
    }
}

/// A single key.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keyframe {
    /// Time in seconds.
    pub time: f32,
    pub value: f32,
}

/// Keys for one component of one channel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Curve {
    pub bone: u32,
    pub channel: ChannelType,
    pub component: Component,
    pub keys: Vec<Keyframe>,
}

/// A motion expressed as independent scalar curves.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationClip {
    pub fps: i32,
    /// Time of the last key in seconds.
    pub duration: f32,
    pub curves: Vec<Curve>,
}

impl AnimationClip {
    /// Find the curve for a bone, channel type and component.
    pub fn curve(&self, bone: u32, channel: ChannelType, component: Component) -> Option<&Curve> {
        self.curves
            .iter()
            .find(|c| c.bone == bone && c.channel == channel && c.component == component)
    }
}

impl ZmoFile {
    /// Build keyframe curves, one per channel component.
    ///
    /// Rotation channels are made sign-continuous first so component-wise
    /// interpolation follows the short arc.
    pub fn build_clip(&self) -> Result<AnimationClip> {
        if self.fps <= 0 {
            return Err(Error::InvalidFrameRate(self.fps));
        }
        self.validate()?;

        let fps = self.fps as f32;
        let times: Vec<f32> = (0..self.frame_count).map(|f| f as f32 / fps).collect();

        let mut curves = Vec::new();
        for channel in &self.channels {
            let rows = component_rows(&channel.samples);
            let channel_type = channel.channel_type();
            for (component, values) in Component::ALL.into_iter().zip(rows) {
                let keys = times
                    .iter()
                    .zip(values)
                    .map(|(&time, value)| Keyframe { time, value })
                    .collect();
                curves.push(Curve {
                    bone: channel.bone,
                    channel: channel_type,
                    component,
                    keys,
                });
            }
        }

        tracing::debug!(fps = self.fps, curves = curves.len(), "built animation clip");

        Ok(AnimationClip {
            fps: self.fps,
            duration: times.last().copied().unwrap_or(0.0),
            curves,
        })
    }
}

/// Flip quaternion signs so consecutive samples never point into opposite
/// hemispheres.
///
/// Each sample is compared against the previous sample after that one was
/// already fixed.
pub fn make_continuous(samples: &[Quat]) -> Vec<Quat> {
    let mut fixed: Vec<Quat> = Vec::with_capacity(samples.len());
    for &q in samples {
        let q = match fixed.last() {
            Some(prev) if prev.dot(q) < 0.0 => -q,
            _ => q,
        };
        fixed.push(q);
    }
    fixed
}

/// Split samples into one value list per component.
fn component_rows(samples: &ChannelSamples) -> Vec<Vec<f32>> {
    fn vec3_rows(v: &[Vec3]) -> Vec<Vec<f32>> {
        vec![
            v.iter().map(|s| s.x).collect(),
            v.iter().map(|s| s.y).collect(),
            v.iter().map(|s| s.z).collect(),
        ]
    }

    fn vec2_rows(v: &[Vec2]) -> Vec<Vec<f32>> {
        vec![v.iter().map(|s| s.x).collect(), v.iter().map(|s| s.y).collect()]
    }

    match samples {
        ChannelSamples::Position(v) | ChannelSamples::Normal(v) => vec3_rows(v),
        ChannelSamples::Rotation(v) => {
            let v = make_continuous(v);
            vec![
                v.iter().map(|s| s.x).collect(),
                v.iter().map(|s| s.y).collect(),
                v.iter().map(|s| s.z).collect(),
                v.iter().map(|s| s.w).collect(),
            ]
        }
        ChannelSamples::Uv0(v)
        | ChannelSamples::Uv1(v)
        | ChannelSamples::Uv2(v)
        | ChannelSamples::Uv3(v) => vec2_rows(v),
        ChannelSamples::Alpha(v)
        | ChannelSamples::TextureAnimation(v)
        | ChannelSamples::Scale(v) => vec![v.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;

    #[test]
    fn test_position_curves() {
        let mut zmo = ZmoFile::new(30, 2);
        zmo.channels.push(Channel::new(
            0,
            ChannelSamples::Position(vec![Vec3::ZERO, Vec3::ONE]),
        ));

        let clip = zmo.build_clip().unwrap();
        assert_eq!(clip.curves.len(), 3);
        assert_eq!(clip.duration, 1.0 / 30.0);

        for component in [Component::X, Component::Y, Component::Z] {
            let curve = clip.curve(0, ChannelType::Position, component).unwrap();
            assert_eq!(
                curve.keys,
                [
                    Keyframe {
                        time: 0.0,
                        value: 0.0
                    },
                    Keyframe {
                        time: 1.0 / 30.0,
                        value: 1.0
                    },
                ]
            );
        }
    }

    #[test]
    fn test_component_counts() {
        let mut zmo = ZmoFile::new(24, 1);
        zmo.channels
            .push(Channel::new(0, ChannelSamples::Rotation(vec![Quat::IDENTITY])));
        zmo.channels
            .push(Channel::new(0, ChannelSamples::Uv0(vec![Vec2::ZERO])));
        zmo.channels
            .push(Channel::new(0, ChannelSamples::Alpha(vec![0.5])));

        let clip = zmo.build_clip().unwrap();
        assert_eq!(clip.curves.len(), 4 + 2 + 1);
        assert_eq!(clip.duration, 0.0);

        let w = clip.curve(0, ChannelType::Rotation, Component::W).unwrap();
        assert_eq!(w.keys[0].value, 1.0);
        assert!(clip.curve(0, ChannelType::Alpha, Component::Y).is_none());
    }

    #[test]
    fn test_make_continuous_flips_against_fixed_previous() {
        let a = Quat::from_xyzw(0.0, 0.0, 0.0, 1.0);
        let b = Quat::from_xyzw(0.0, 0.0, 0.6, -0.8);
        // Opposite of b's fixed form, so it must flip too.
        let c = Quat::from_xyzw(0.0, 0.0, 0.6, -0.8);

        let fixed = make_continuous(&[a, b, c]);
        assert_eq!(fixed[0], a);
        assert_eq!(fixed[1], -b);
        assert_eq!(fixed[2], -c);
        for pair in fixed.windows(2) {
            assert!(pair[0].dot(pair[1]) >= 0.0);
        }
    }

    #[test]
    fn test_rotation_curves_are_continuous() {
        let mut zmo = ZmoFile::new(10, 2);
        zmo.channels.push(Channel::new(
            3,
            ChannelSamples::Rotation(vec![Quat::IDENTITY, Quat::from_xyzw(0.0, 0.0, 0.0, -1.0)]),
        ));

        let clip = zmo.build_clip().unwrap();
        let w = clip.curve(3, ChannelType::Rotation, Component::W).unwrap();
        assert_eq!(w.keys[1].value, 1.0);
    }

    #[test]
    fn test_invalid_frame_rate() {
        for fps in [0, -30] {
            let zmo = ZmoFile::new(fps, 2);
            assert!(matches!(
                zmo.build_clip(),
                Err(Error::InvalidFrameRate(f)) if f == fps
            ));
        }
    }
}
