//! Per-tick Mop motion bundle.

use glam::{Quat, Vec3};
use rosc::{OscMessage, OscPacket};

use super::axes;
use super::landmarks::{LANDMARKS, Landmark, SkeletonMeasurement};
use crate::codec;
use crate::core::constants::{LANDMARK_COUNT, MOP_BONE_CONTROL_PREFIX, MOP_SKELETON_PREFIX};
use crate::core::{AvatarRig, EncodeError};

/// Live world transform of one tracked bone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneSample {
    /// Landmark name used in the address.
    pub name: &'static str,
    /// World position, zero if the rig lacks the joint.
    pub position: Vec3,
    /// World rotation, identity if the rig lacks the joint.
    pub rotation: Quat,
}

impl BoneSample {
    /// Sample a landmark from the rig's current pose.
    pub fn sample<R: AvatarRig + ?Sized>(landmark: &Landmark, rig: &R) -> Self {
        let (position, rotation) = landmark
            .resolve(rig)
            .map_or((Vec3::ZERO, Quat::IDENTITY), |t| (t.position, t.rotation));
        Self {
            name: landmark.name,
            position,
            rotation,
        }
    }

    /// `/Mop/BoneControl/{name}` with `[x, y, z, qx, qy, qz, qw]` in consumer space.
    pub fn to_message(&self) -> OscMessage {
        let [x, y, z] = axes::position(self.position);
        let [qx, qy, qz, qw] = axes::rotation(self.rotation);
        codec::message(
            format!("{MOP_BONE_CONTROL_PREFIX}{}", self.name),
            codec::floats(&[x, y, z, qx, qy, qz, qw]),
        )
    }
}

/// Builds the outbound Mop bundle from the measured skeleton and live pose.
///
/// The bundle always holds 15 skeleton-size messages followed by 15 bone
/// control messages, in landmark order.
#[derive(Debug, Default)]
pub struct OutboundMotionEncoder {
    measurement: Option<SkeletonMeasurement>,
}

impl OutboundMotionEncoder {
    /// Create an encoder with no measurement yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the body measurement.
    ///
    /// The first measurement is kept for the rest of the run; later ones are
    /// refused and `false` is returned.
    pub fn record_measurement(&mut self, measurement: SkeletonMeasurement) -> bool {
        if self.measurement.is_some() {
            return false;
        }
        self.measurement = Some(measurement);
        true
    }

    /// The stored measurement.
    pub fn measurement(&self) -> Option<&SkeletonMeasurement> {
        self.measurement.as_ref()
    }

    /// Whether a measurement has been stored.
    pub fn is_calibrated(&self) -> bool {
        self.measurement.is_some()
    }

    /// Sample every tracked bone from the rig.
    pub fn sample_bones<R: AvatarRig + ?Sized>(rig: &R) -> [BoneSample; LANDMARK_COUNT] {
        std::array::from_fn(|i| BoneSample::sample(&LANDMARKS[i], rig))
    }

    /// Build this tick's bundle.
    pub fn encode<R: AvatarRig + ?Sized>(&self, rig: &R) -> Result<OscPacket, EncodeError> {
        let measurement = self.measurement.as_ref().ok_or(EncodeError::NotCalibrated)?;

        let skeleton = measurement.iter().map(|(landmark, position)| {
            codec::message(
                format!("{MOP_SKELETON_PREFIX}{}", landmark.name),
                codec::floats(&axes::position(position)),
            )
        });
        let bones = Self::sample_bones(rig).map(|sample| sample.to_message());

        Ok(codec::bundle(skeleton.chain(bones).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::MOTION_BUNDLE_LEN;
    use crate::core::{HumanBone, Transform};
    use crate::rig::HumanoidRig;
    use rosc::OscType;

    fn messages(packet: OscPacket) -> Vec<OscMessage> {
        match packet {
            OscPacket::Bundle(bundle) => bundle
                .content
                .into_iter()
                .map(|p| match p {
                    OscPacket::Message(m) => m,
                    OscPacket::Bundle(_) => panic!("nested bundle"),
                })
                .collect(),
            OscPacket::Message(_) => panic!("expected a bundle"),
        }
    }

    fn floats(message: &OscMessage) -> Vec<f32> {
        message
            .args
            .iter()
            .map(|arg| match arg {
                OscType::Float(f) => *f,
                other => panic!("unexpected argument {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_encode_requires_measurement() {
        let rig = HumanoidRig::standard();
        let encoder = OutboundMotionEncoder::new();
        assert_eq!(encoder.encode(&rig), Err(EncodeError::NotCalibrated));
    }

    #[test]
    fn test_measurement_written_once() {
        let mut encoder = OutboundMotionEncoder::new();
        let first = SkeletonMeasurement::from_positions([Vec3::ONE; LANDMARK_COUNT]);
        let second = SkeletonMeasurement::from_positions([Vec3::ZERO; LANDMARK_COUNT]);

        assert!(encoder.record_measurement(first));
        assert!(!encoder.record_measurement(second));
        assert_eq!(encoder.measurement(), Some(&first));
    }

    #[test]
    fn test_bundle_layout() {
        let rig = HumanoidRig::standard();
        let mut encoder = OutboundMotionEncoder::new();
        encoder.record_measurement(SkeletonMeasurement::measure(&rig).0);

        let messages = messages(encoder.encode(&rig).unwrap());
        assert_eq!(messages.len(), MOTION_BUNDLE_LEN);

        for (i, landmark) in LANDMARKS.iter().enumerate() {
            assert_eq!(messages[i].addr, format!("/Mop/Skeleton/{}", landmark.name));
            assert_eq!(messages[i].args.len(), 3);

            let bone = &messages[LANDMARK_COUNT + i];
            assert_eq!(bone.addr, format!("/Mop/BoneControl/{}", landmark.name));
            assert_eq!(bone.args.len(), 7);
        }
    }

    #[test]
    fn test_pelvis_skeleton_remap() {
        let rig = HumanoidRig::builder()
            .joint(HumanBone::Hips, None, Vec3::new(0.0, 1.0, 0.0))
            .build()
            .unwrap();
        let mut encoder = OutboundMotionEncoder::new();
        encoder.record_measurement(SkeletonMeasurement::measure(&rig).0);

        let messages = messages(encoder.encode(&rig).unwrap());
        assert_eq!(messages[0].addr, "/Mop/Skeleton/pelvis");
        assert_eq!(floats(&messages[0]), vec![0.0, 0.0, 100.0]);
    }

    #[test]
    fn test_bone_control_uses_live_pose() {
        let rotation = Quat::from_rotation_y(0.5);
        let mut rig = HumanoidRig::builder()
            .joint(HumanBone::Hips, None, Vec3::new(0.0, 1.0, 0.0))
            .build()
            .unwrap();
        let mut encoder = OutboundMotionEncoder::new();
        encoder.record_measurement(SkeletonMeasurement::measure(&rig).0);

        *rig.joint_mut(HumanBone::Hips).unwrap() = Transform::new(Vec3::new(0.25, 0.5, 2.0), rotation);
        let messages = messages(encoder.encode(&rig).unwrap());

        // Skeleton size keeps the calibrated value.
        assert_eq!(floats(&messages[0]), vec![0.0, 0.0, 100.0]);
        let pelvis = floats(&messages[LANDMARK_COUNT]);
        assert_eq!(
            pelvis,
            vec![-25.0, 200.0, 50.0, -rotation.x, rotation.z, rotation.y, rotation.w]
        );
    }

    #[test]
    fn test_absent_joints_emit_zero_and_identity() {
        let rig = HumanoidRig::builder()
            .joint(HumanBone::Hips, None, Vec3::new(0.0, 1.0, 0.0))
            .build()
            .unwrap();
        let mut encoder = OutboundMotionEncoder::new();
        encoder.record_measurement(SkeletonMeasurement::measure(&rig).0);

        let messages = messages(encoder.encode(&rig).unwrap());
        let neck = messages
            .iter()
            .find(|m| m.addr == "/Mop/BoneControl/neck")
            .unwrap();
        assert_eq!(floats(neck), vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_sample_bones_spine_fallback() {
        let rig = HumanoidRig::builder()
            .joint(HumanBone::Hips, None, Vec3::new(0.0, 1.0, 0.0))
            .joint(HumanBone::Spine, Some(HumanBone::Hips), Vec3::new(0.0, 0.5, 0.0))
            .build()
            .unwrap();
        let samples = OutboundMotionEncoder::sample_bones(&rig);
        assert_eq!(samples[1].name, "spine");
        assert_eq!(samples[1].position, Vec3::new(0.0, 1.5, 0.0));
    }
}
