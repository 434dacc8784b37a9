//! Coordinate conversion from the rig's frame to the Mop consumer's frame.
//!
//! The rig is Y-up, left-handed, in metres. The consumer is Z-up with X
//! mirrored, in centimetres:
//!
//! ```text
//! position (x, y, z)    -> (-x·100, z·100, y·100)
//! rotation (x, y, z, w) -> (-x, z, y, w)
//! ```

use glam::{Quat, Vec3};

use crate::core::constants::POSITION_SCALE;

/// Convert a rig-space position to consumer space.
pub fn position(p: Vec3) -> [f32; 3] {
    [-p.x * POSITION_SCALE, p.z * POSITION_SCALE, p.y * POSITION_SCALE]
}

/// Convert a rig-space rotation to consumer space.
pub fn rotation(q: Quat) -> [f32; 4] {
    [-q.x, q.z, q.y, q.w]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_remap() {
        assert_eq!(position(Vec3::new(0.0, 1.0, 0.0)), [0.0, 0.0, 100.0]);
        assert_eq!(position(Vec3::new(1.0, 2.0, 3.0)), [-100.0, 300.0, 200.0]);
    }

    #[test]
    fn test_position_negates_zero_x() {
        let [x, _, _] = position(Vec3::ZERO);
        assert!(x.is_sign_negative());
    }

    #[test]
    fn test_rotation_remap() {
        assert_eq!(rotation(Quat::IDENTITY), [-0.0, 0.0, 0.0, 1.0]);
        assert_eq!(
            rotation(Quat::from_xyzw(0.1, 0.2, 0.3, 0.9)),
            [-0.1, 0.3, 0.2, 0.9]
        );
    }
}
