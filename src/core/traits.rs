//! Core traits for the bridge.
//!
//! These traits define the seams between the protocol layer and the avatar.

use glam::{Quat, Vec3};

use super::bones::HumanBone;
use super::pose::Transform;

/// Capability over an avatar skeleton.
///
/// The bridge never owns the rig's structure; it only resolves joints by
/// slot, writes local transforms and reads world transforms.
///
/// # Requirements
///
/// - `joint_mut` and `world_transform` MUST return `None` for joints the rig
///   does not have, never panic
/// - suspending animation MUST put the rig into its rest pose by the time
///   the next tick reads it
pub trait AvatarRig {
    /// Local transform of the avatar root.
    fn root_mut(&mut self) -> &mut Transform;

    /// Mutable local transform of a joint, if the rig has it.
    fn joint_mut(&mut self, bone: HumanBone) -> Option<&mut Transform>;

    /// World-space transform of a joint, if the rig has it.
    fn world_transform(&self, bone: HumanBone) -> Option<Transform>;

    /// Whether the animation controller currently drives the pose.
    fn animation_enabled(&self) -> bool;

    /// Attach or detach the animation controller.
    ///
    /// Detaching forces the rest (T) pose.
    fn set_animation_enabled(&mut self, enabled: bool);

    /// World-space position of a joint, if the rig has it.
    fn world_position(&self, bone: HumanBone) -> Option<Vec3> {
        self.world_transform(bone).map(|t| t.position)
    }
}

/// Receiver of parsed VMC pose messages.
pub trait PoseHandler {
    /// Root pose of the performer. `name` is the sender's root label.
    fn root_pose(&mut self, name: &str, position: Vec3, rotation: Quat);

    /// Local pose of a named bone.
    fn bone_pose(&mut self, name: &str, position: Vec3, rotation: Quat);
}
