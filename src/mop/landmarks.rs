//! Landmark joints measured at calibration and streamed every tick.

use glam::Vec3;

use crate::core::constants::LANDMARK_COUNT;
use crate::core::{AvatarRig, HumanBone, Transform};

/// A named body point backed by one joint, or by a preference-ordered chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landmark {
    /// Name used in Mop addresses.
    pub name: &'static str,
    /// Candidate joints; the first one present on the rig is used.
    pub bones: &'static [HumanBone],
}

impl Landmark {
    /// World transform of the first candidate joint the rig has.
    pub fn resolve<R: AvatarRig + ?Sized>(&self, rig: &R) -> Option<Transform> {
        self.bones.iter().find_map(|&bone| rig.world_transform(bone))
    }
}

/// Fixed landmark table, in wire order.
pub static LANDMARKS: [Landmark; LANDMARK_COUNT] = [
    Landmark { name: "pelvis", bones: &[HumanBone::Hips] },
    Landmark {
        name: "spine",
        bones: &[HumanBone::UpperChest, HumanBone::Chest, HumanBone::Spine],
    },
    Landmark { name: "upperarm_l", bones: &[HumanBone::LeftUpperArm] },
    Landmark { name: "upperarm_r", bones: &[HumanBone::RightUpperArm] },
    Landmark { name: "lowerarm_l", bones: &[HumanBone::LeftLowerArm] },
    Landmark { name: "lowerarm_r", bones: &[HumanBone::RightLowerArm] },
    Landmark { name: "hand_l", bones: &[HumanBone::LeftHand] },
    Landmark { name: "hand_r", bones: &[HumanBone::RightHand] },
    Landmark { name: "neck", bones: &[HumanBone::Neck] },
    Landmark { name: "thigh_l", bones: &[HumanBone::LeftUpperLeg] },
    Landmark { name: "thigh_r", bones: &[HumanBone::RightUpperLeg] },
    Landmark { name: "calf_l", bones: &[HumanBone::LeftLowerLeg] },
    Landmark { name: "calf_r", bones: &[HumanBone::RightLowerLeg] },
    Landmark { name: "foot_l", bones: &[HumanBone::LeftFoot] },
    Landmark { name: "foot_r", bones: &[HumanBone::RightFoot] },
];

/// World positions of every landmark, taken once in rest pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkeletonMeasurement {
    positions: [Vec3; LANDMARK_COUNT],
}

impl SkeletonMeasurement {
    /// Measure a rig in its current pose.
    ///
    /// Landmarks with no joint on the rig sample as zero and are listed in
    /// the second return value.
    pub fn measure<R: AvatarRig + ?Sized>(rig: &R) -> (Self, Vec<&'static str>) {
        let mut positions = [Vec3::ZERO; LANDMARK_COUNT];
        let mut missing = Vec::new();
        for (slot, landmark) in positions.iter_mut().zip(&LANDMARKS) {
            match landmark.resolve(rig) {
                Some(transform) => *slot = transform.position,
                None => missing.push(landmark.name),
            }
        }
        (Self { positions }, missing)
    }

    /// Build from known positions, in landmark order.
    pub fn from_positions(positions: [Vec3; LANDMARK_COUNT]) -> Self {
        Self { positions }
    }

    /// Position of landmark `index`.
    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied()
    }

    /// Position of a landmark by name.
    pub fn by_name(&self, name: &str) -> Option<Vec3> {
        LANDMARKS
            .iter()
            .position(|landmark| landmark.name == name)
            .map(|index| self.positions[index])
    }

    /// Landmarks paired with their positions, in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static Landmark, Vec3)> + '_ {
        LANDMARKS.iter().zip(self.positions.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::HumanoidRig;

    #[test]
    fn test_landmark_names_unique() {
        let mut names: Vec<_> = LANDMARKS.iter().map(|l| l.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), LANDMARK_COUNT);
    }

    #[test]
    fn test_spine_prefers_upper_chest() {
        let rig = HumanoidRig::standard();
        let spine = LANDMARKS[1].resolve(&rig).unwrap();
        assert_eq!(Some(spine), rig.world_transform(HumanBone::UpperChest));
    }

    #[test]
    fn test_spine_falls_back_to_chest_then_spine() {
        let with_chest = HumanoidRig::builder()
            .joint(HumanBone::Hips, None, Vec3::new(0.0, 1.0, 0.0))
            .joint(HumanBone::Spine, Some(HumanBone::Hips), Vec3::new(0.0, 0.1, 0.0))
            .joint(HumanBone::Chest, Some(HumanBone::Spine), Vec3::new(0.0, 0.2, 0.0))
            .build()
            .unwrap();
        let spine = LANDMARKS[1].resolve(&with_chest).unwrap();
        assert_eq!(spine.position, with_chest.world_position(HumanBone::Chest).unwrap());

        let spine_only = HumanoidRig::builder()
            .joint(HumanBone::Hips, None, Vec3::new(0.0, 1.0, 0.0))
            .joint(HumanBone::Spine, Some(HumanBone::Hips), Vec3::new(0.0, 0.1, 0.0))
            .build()
            .unwrap();
        let spine = LANDMARKS[1].resolve(&spine_only).unwrap();
        assert!((spine.position - Vec3::new(0.0, 1.1, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_measure_standard_rig() {
        let rig = HumanoidRig::standard();
        let (measurement, missing) = SkeletonMeasurement::measure(&rig);
        assert!(missing.is_empty());
        assert_eq!(measurement.by_name("pelvis"), Some(Vec3::new(0.0, 0.95, 0.0)));
        assert_eq!(
            measurement.by_name("thigh_r"),
            rig.world_position(HumanBone::RightUpperLeg)
        );
        assert_eq!(measurement.iter().count(), LANDMARK_COUNT);
    }

    #[test]
    fn test_measure_missing_landmark_is_zero() {
        let rig = HumanoidRig::builder()
            .joint(HumanBone::Hips, None, Vec3::new(0.0, 1.0, 0.0))
            .build()
            .unwrap();
        let (measurement, missing) = SkeletonMeasurement::measure(&rig);
        assert_eq!(missing.len(), LANDMARK_COUNT - 1);
        assert!(missing.contains(&"neck"));
        assert_eq!(measurement.by_name("neck"), Some(Vec3::ZERO));
        assert_eq!(measurement.position(0), Some(Vec3::new(0.0, 1.0, 0.0)));
        assert_eq!(measurement.position(LANDMARK_COUNT), None);
    }
}
