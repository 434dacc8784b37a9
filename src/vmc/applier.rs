//! Writes VMC poses onto an avatar rig.

use glam::{Quat, Vec3};

use crate::core::{AvatarRig, HumanBone, PoseHandler, Transform};

/// Applies root and bone poses to a borrowed rig.
///
/// Unknown bone names and joints missing from the rig are silent no-ops.
pub struct AvatarPoseApplier<'a, R: AvatarRig + ?Sized> {
    rig: &'a mut R,
}

impl<'a, R: AvatarRig + ?Sized> AvatarPoseApplier<'a, R> {
    /// Borrow a rig for the duration of a dispatch batch.
    pub fn new(rig: &'a mut R) -> Self {
        Self { rig }
    }

    /// Set the avatar root's local transform.
    pub fn apply_root(&mut self, position: Vec3, rotation: Quat) {
        *self.rig.root_mut() = Transform::new(position, rotation);
    }

    /// Set a bone's local transform by canonical name.
    ///
    /// Returns `true` if a joint was written.
    pub fn apply_bone(&mut self, name: &str, position: Vec3, rotation: Quat) -> bool {
        let Some(bone) = HumanBone::from_name(name) else {
            return false;
        };
        match self.rig.joint_mut(bone) {
            Some(joint) => {
                *joint = Transform::new(position, rotation);
                true
            }
            None => false,
        }
    }
}

impl<R: AvatarRig + ?Sized> PoseHandler for AvatarPoseApplier<'_, R> {
    fn root_pose(&mut self, _name: &str, position: Vec3, rotation: Quat) {
        self.apply_root(position, rotation);
    }

    fn bone_pose(&mut self, name: &str, position: Vec3, rotation: Quat) {
        self.apply_bone(name, position, rotation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::HumanoidRig;

    #[test]
    fn test_apply_left_hand() {
        let mut rig = HumanoidRig::standard();
        let position = Vec3::new(0.1, 1.2, -0.3);

        let applied = AvatarPoseApplier::new(&mut rig).apply_bone("LeftHand", position, Quat::IDENTITY);
        assert!(applied);

        let hand = rig.joint_mut(HumanBone::LeftHand).copied().unwrap();
        assert_eq!(hand.position, position);
        assert_eq!(hand.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_unknown_name_changes_nothing() {
        let mut rig = HumanoidRig::standard();
        let before = rig.clone();

        let applied =
            AvatarPoseApplier::new(&mut rig).apply_bone("NotABone", Vec3::ONE, Quat::IDENTITY);
        assert!(!applied);
        assert_eq!(rig, before);
    }

    #[test]
    fn test_missing_joint_is_noop() {
        let mut rig = HumanoidRig::builder()
            .joint(HumanBone::Hips, None, Vec3::new(0.0, 1.0, 0.0))
            .build()
            .unwrap();
        let before = rig.clone();

        let applied =
            AvatarPoseApplier::new(&mut rig).apply_bone("LeftThumbDistal", Vec3::ONE, Quat::IDENTITY);
        assert!(!applied);
        assert_eq!(rig, before);
    }

    #[test]
    fn test_apply_root() {
        let mut rig = HumanoidRig::standard();
        let rotation = Quat::from_rotation_y(1.0);

        AvatarPoseApplier::new(&mut rig).root_pose("root", Vec3::new(0.5, 0.0, 2.0), rotation);
        assert_eq!(*rig.root_mut(), Transform::new(Vec3::new(0.5, 0.0, 2.0), rotation));
    }

    #[test]
    fn test_case_sensitive_match() {
        let mut rig = HumanoidRig::standard();
        let before = rig.clone();
        AvatarPoseApplier::new(&mut rig).bone_pose("lefthand", Vec3::ONE, Quat::IDENTITY);
        assert_eq!(rig, before);
    }
}
