//! Avatar rigs.
//!
//! [`HumanoidRig`] is a self-contained [`AvatarRig`](crate::core::AvatarRig)
//! with forward kinematics over a parent hierarchy. Host applications with
//! their own skeleton implement the trait directly instead.

mod humanoid;

pub use humanoid::{HumanoidRig, HumanoidRigBuilder, RigError};
