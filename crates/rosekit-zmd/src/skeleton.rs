//! Derived skeleton data.
//!
//! A [`Skeleton`] is computed from a [`ZmdFile`](crate::ZmdFile) in one
//! forward pass: because every bone's parent precedes it, the parent's
//! absolute transform is always ready when a child is visited.

use glam::{Mat4, Vec3};
use rosekit_common::lookup;

use crate::file::Bone;
use crate::{Error, Result};

/// A bone or dummy with its derived transforms.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonNode {
    /// Bone name.
    pub name: String,
    /// Index of the parent node, `None` for the root.
    pub parent: Option<usize>,
    /// Whether this node is a dummy attachment point.
    pub is_dummy: bool,
    /// Local translation/rotation relative to the parent.
    pub local: Mat4,
    /// Absolute rest transform.
    pub absolute: Mat4,
    /// Inverse of the absolute rest transform.
    pub inverse_bind: Mat4,
    /// Slash-separated path from the root, e.g. `b1_pelvis/b1_spine`.
    pub path: String,
}

impl SkeletonNode {
    /// Get the absolute rest position.
    pub fn absolute_position(&self) -> Vec3 {
        self.absolute.w_axis.truncate()
    }
}

/// Bones followed by dummies, each with derived transforms.
///
/// Dummy parents index the bone portion, so node indices for bones match
/// the source bone indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    nodes: Vec<SkeletonNode>,
    bone_count: usize,
}

impl Skeleton {
    /// Build a skeleton from bone and dummy lists.
    pub fn build(bones: &[Bone], dummies: &[Bone]) -> Result<Self> {
        let mut nodes: Vec<SkeletonNode> = Vec::with_capacity(bones.len() + dummies.len());

        for (index, bone) in bones.iter().enumerate() {
            let local = Mat4::from_rotation_translation(bone.rotation, bone.position);

            let node = if index == 0 {
                SkeletonNode {
                    name: bone.name.clone(),
                    parent: None,
                    is_dummy: false,
                    local,
                    absolute: local,
                    inverse_bind: local.inverse(),
                    path: bone.name.clone(),
                }
            } else {
                let parent_index = bone.parent as usize;
                if parent_index >= index {
                    return Err(Error::ForwardReference {
                        bone: index,
                        parent: bone.parent,
                    });
                }
                child_node(&nodes[parent_index], parent_index, bone, local, false)
            };

            nodes.push(node);
        }

        for dummy in dummies {
            let parent_index = dummy.parent as usize;
            let parent = lookup("bone", &nodes[..bones.len()], parent_index)?;
            let local = Mat4::from_rotation_translation(dummy.rotation, dummy.position);
            let node = child_node(parent, parent_index, dummy, local, true);
            nodes.push(node);
        }

        Ok(Self {
            nodes,
            bone_count: bones.len(),
        })
    }

    /// Get all nodes: bones first, then dummies.
    pub fn nodes(&self) -> &[SkeletonNode] {
        &self.nodes
    }

    /// Get the bone nodes.
    pub fn bones(&self) -> &[SkeletonNode] {
        &self.nodes[..self.bone_count]
    }

    /// Get the dummy nodes.
    pub fn dummies(&self) -> &[SkeletonNode] {
        &self.nodes[self.bone_count..]
    }

    /// Find a node by its full path.
    pub fn find_by_path(&self, path: &str) -> Option<&SkeletonNode> {
        self.nodes.iter().find(|n| n.path == path)
    }

    /// Collect the inverse bind matrices of the primary bones, in bone order.
    pub fn inverse_bind_matrices(&self) -> Vec<Mat4> {
        self.bones().iter().map(|n| n.inverse_bind).collect()
    }
}

fn child_node(
    parent: &SkeletonNode,
    parent_index: usize,
    bone: &Bone,
    local: Mat4,
    is_dummy: bool,
) -> SkeletonNode {
    let absolute = parent.absolute * local;
    SkeletonNode {
        name: bone.name.clone(),
        parent: Some(parent_index),
        is_dummy,
        local,
        absolute,
        inverse_bind: absolute.inverse(),
        path: format!("{}/{}", parent.path, bone.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_chain_transforms() {
        let quarter_turn = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let bones = vec![
            Bone::new("root", 0, Vec3::new(0.0, 0.0, 1.0), quarter_turn),
            Bone::new("arm", 0, Vec3::new(2.0, 0.0, 0.0), Quat::IDENTITY),
            Bone::new("hand", 1, Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY),
        ];
        let dummies = vec![Bone::new("p_00", 2, Vec3::new(0.5, 0.0, 0.0), Quat::IDENTITY)];

        let skeleton = Skeleton::build(&bones, &dummies).unwrap();
        assert_eq!(skeleton.bones().len(), 3);
        assert_eq!(skeleton.dummies().len(), 1);

        // The root's quarter turn maps local +X to world +Y.
        let hand = &skeleton.bones()[2];
        assert!(hand
            .absolute_position()
            .abs_diff_eq(Vec3::new(0.0, 3.0, 1.0), 1e-5));
        assert_eq!(hand.path, "root/arm/hand");
        assert_eq!(hand.parent, Some(1));

        let dummy = &skeleton.dummies()[0];
        assert!(dummy.is_dummy);
        assert_eq!(dummy.path, "root/arm/hand/p_00");
        assert!(dummy
            .absolute_position()
            .abs_diff_eq(Vec3::new(0.0, 3.5, 1.0), 1e-5));
    }

    #[test]
    fn test_inverse_bind_undoes_absolute() {
        let bones = vec![
            Bone::new(
                "root",
                0,
                Vec3::new(1.0, 2.0, 3.0),
                Quat::from_rotation_y(0.7),
            ),
            Bone::new(
                "child",
                0,
                Vec3::new(-4.0, 0.5, 0.0),
                Quat::from_rotation_x(-1.2),
            ),
        ];
        let skeleton = Skeleton::build(&bones, &[]).unwrap();

        for node in skeleton.nodes() {
            let product = node.absolute * node.inverse_bind;
            assert!(product.abs_diff_eq(Mat4::IDENTITY, 1e-5));
        }
        assert_eq!(skeleton.inverse_bind_matrices().len(), 2);
        assert!(skeleton.find_by_path("root/child").is_some());
    }

    #[test]
    fn test_dummy_parent_out_of_range() {
        let bones = vec![Bone::new("root", 0, Vec3::ZERO, Quat::IDENTITY)];
        let dummies = vec![Bone::new("p_00", 3, Vec3::ZERO, Quat::IDENTITY)];

        assert!(matches!(
            Skeleton::build(&bones, &dummies),
            Err(Error::Common(rosekit_common::Error::InvalidReference {
                table: "bone",
                index: 3,
                len: 1
            }))
        ));
    }

    #[test]
    fn test_unordered_bones_rejected() {
        let bones = vec![
            Bone::new("root", 0, Vec3::ZERO, Quat::IDENTITY),
            Bone::new("late", 1, Vec3::ZERO, Quat::IDENTITY),
        ];
        assert!(matches!(
            Skeleton::build(&bones, &[]),
            Err(Error::ForwardReference { bone: 1, parent: 1 })
        ));
    }
}
