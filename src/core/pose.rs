//! Rigid transforms for skeleton joints.

use glam::{Quat, Vec3};

/// Position and rotation of a joint, relative to its parent or to the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation.
    pub position: Vec3,
    /// Unit-quaternion rotation.
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No translation, no rotation.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Create a transform.
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pure translation.
    pub const fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Express a child-local transform in this transform's parent space.
    pub fn then(&self, child: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * child.position,
            rotation: self.rotation * child.rotation,
        }
    }
}
