//! In-memory humanoid skeleton.

use glam::Vec3;
use thiserror::Error;

use crate::core::{AvatarRig, HumanBone, Transform};

/// Errors building a rig.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RigError {
    /// A joint names a parent that was not added before it.
    #[error("joint {bone} has unknown parent {parent}")]
    UnknownParent {
        /// Child joint.
        bone: HumanBone,
        /// Missing parent.
        parent: HumanBone,
    },

    /// The same joint was added twice.
    #[error("joint {0} added twice")]
    DuplicateJoint(HumanBone),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Joint {
    parent: Option<HumanBone>,
    local: Transform,
    rest: Transform,
}

/// A humanoid skeleton with a parent hierarchy and a rest pose.
///
/// Joints hold local transforms relative to their parent (or to the root).
/// Detaching the animation controller snapshots the current pose and resets
/// every joint to rest; re-attaching restores the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct HumanoidRig {
    root: Transform,
    joints: [Option<Joint>; HumanBone::COUNT],
    animation_enabled: bool,
    animated_pose: Option<Vec<Option<Transform>>>,
}

impl HumanoidRig {
    /// Start building a rig.
    pub fn builder() -> HumanoidRigBuilder {
        HumanoidRigBuilder::default()
    }

    /// A 1.7 m humanoid in T-pose, facing +Z with its left side on -X.
    pub fn standard() -> Self {
        use HumanBone::*;

        let mut builder = Self::builder()
            .joint(Hips, None, Vec3::new(0.0, 0.95, 0.0))
            .joint(Spine, Some(Hips), Vec3::new(0.0, 0.1, 0.0))
            .joint(Chest, Some(Spine), Vec3::new(0.0, 0.12, 0.0))
            .joint(UpperChest, Some(Chest), Vec3::new(0.0, 0.12, 0.0))
            .joint(Neck, Some(UpperChest), Vec3::new(0.0, 0.15, 0.0))
            .joint(Head, Some(Neck), Vec3::new(0.0, 0.1, 0.0))
            .joint(Jaw, Some(Head), Vec3::new(0.0, -0.03, 0.06))
            .joint(LeftEye, Some(Head), Vec3::new(-0.03, 0.06, 0.08))
            .joint(RightEye, Some(Head), Vec3::new(0.03, 0.06, 0.08));

        for (side, x) in [(Side::Left, -1.0), (Side::Right, 1.0)] {
            let [shoulder, upper_arm, lower_arm, hand, upper_leg, lower_leg, foot, toes] =
                side.limbs();
            builder = builder
                .joint(shoulder, Some(UpperChest), Vec3::new(0.04 * x, 0.1, 0.0))
                .joint(upper_arm, Some(shoulder), Vec3::new(0.1 * x, 0.0, 0.0))
                .joint(lower_arm, Some(upper_arm), Vec3::new(0.27 * x, 0.0, 0.0))
                .joint(hand, Some(lower_arm), Vec3::new(0.25 * x, 0.0, 0.0))
                .joint(upper_leg, Some(Hips), Vec3::new(0.09 * x, -0.05, 0.0))
                .joint(lower_leg, Some(upper_leg), Vec3::new(0.0, -0.42, 0.0))
                .joint(foot, Some(lower_leg), Vec3::new(0.0, -0.4, 0.0))
                .joint(toes, Some(foot), Vec3::new(0.0, -0.06, 0.12));
        }

        builder.build().expect("standard rig lists parents before children")
    }

    /// Whether the rig has a joint in this slot.
    pub fn has_joint(&self, bone: HumanBone) -> bool {
        self.joints[bone.index()].is_some()
    }

    /// Number of joints present.
    pub fn joint_count(&self) -> usize {
        self.joints.iter().flatten().count()
    }

    /// Local transform of a joint.
    pub fn local_transform(&self, bone: HumanBone) -> Option<Transform> {
        self.joints[bone.index()].map(|joint| joint.local)
    }

    /// Reset every joint to its rest transform.
    pub fn reset_to_rest(&mut self) {
        for joint in self.joints.iter_mut().flatten() {
            joint.local = joint.rest;
        }
    }

    fn snapshot(&self) -> Vec<Option<Transform>> {
        self.joints.iter().map(|joint| joint.map(|j| j.local)).collect()
    }

    fn restore(&mut self, pose: &[Option<Transform>]) {
        for (joint, saved) in self.joints.iter_mut().zip(pose) {
            if let (Some(joint), Some(saved)) = (joint, saved) {
                joint.local = *saved;
            }
        }
    }
}

impl AvatarRig for HumanoidRig {
    fn root_mut(&mut self) -> &mut Transform {
        &mut self.root
    }

    fn joint_mut(&mut self, bone: HumanBone) -> Option<&mut Transform> {
        self.joints[bone.index()].as_mut().map(|joint| &mut joint.local)
    }

    fn world_transform(&self, bone: HumanBone) -> Option<Transform> {
        let joint = self.joints[bone.index()].as_ref()?;
        let parent = match joint.parent {
            Some(parent) => self.world_transform(parent)?,
            None => self.root,
        };
        Some(parent.then(&joint.local))
    }

    fn animation_enabled(&self) -> bool {
        self.animation_enabled
    }

    fn set_animation_enabled(&mut self, enabled: bool) {
        if enabled == self.animation_enabled {
            return;
        }
        if enabled {
            if let Some(pose) = self.animated_pose.take() {
                self.restore(&pose);
            }
        } else {
            self.animated_pose = Some(self.snapshot());
            self.reset_to_rest();
        }
        self.animation_enabled = enabled;
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

impl Side {
    /// Shoulder to toes, in hierarchy order.
    fn limbs(self) -> [HumanBone; 8] {
        use HumanBone::*;
        match self {
            Side::Left => [
                LeftShoulder,
                LeftUpperArm,
                LeftLowerArm,
                LeftHand,
                LeftUpperLeg,
                LeftLowerLeg,
                LeftFoot,
                LeftToes,
            ],
            Side::Right => [
                RightShoulder,
                RightUpperArm,
                RightLowerArm,
                RightHand,
                RightUpperLeg,
                RightLowerLeg,
                RightFoot,
                RightToes,
            ],
        }
    }
}

/// Builder for [`HumanoidRig`].
///
/// Each joint's offset is both its rest and its initial local position.
#[derive(Debug, Clone, Default)]
pub struct HumanoidRigBuilder {
    root: Transform,
    joints: Vec<(HumanBone, Option<HumanBone>, Transform)>,
}

impl HumanoidRigBuilder {
    /// Set the root's local transform.
    pub fn root(mut self, root: Transform) -> Self {
        self.root = root;
        self
    }

    /// Add a joint at `offset` from its parent (or from the root).
    pub fn joint(mut self, bone: HumanBone, parent: Option<HumanBone>, offset: Vec3) -> Self {
        self.joints.push((bone, parent, Transform::from_position(offset)));
        self
    }

    /// Add a joint with a full rest transform.
    pub fn joint_transform(mut self, bone: HumanBone, parent: Option<HumanBone>, rest: Transform) -> Self {
        self.joints.push((bone, parent, rest));
        self
    }

    /// Validate the hierarchy and build the rig.
    pub fn build(self) -> Result<HumanoidRig, RigError> {
        let mut joints = [None; HumanBone::COUNT];
        for (bone, parent, rest) in self.joints {
            if joints[bone.index()].is_some() {
                return Err(RigError::DuplicateJoint(bone));
            }
            if let Some(parent) = parent {
                if joints[parent.index()].is_none() {
                    return Err(RigError::UnknownParent { bone, parent });
                }
            }
            joints[bone.index()] = Some(Joint {
                parent,
                local: rest,
                rest,
            });
        }
        Ok(HumanoidRig {
            root: self.root,
            joints,
            animation_enabled: true,
            animated_pose: None,
        })
    }
}
