//! One-shot body measurement before streaming.
//!
//! ```text
//! tick 1  Priming    suspend animation (rig drops into rest pose)
//! tick 2  Sampling   measure landmarks, resume animation
//! tick 3  Restoring  -> Streaming, first bundle
//! tick n  Streaming  one bundle per tick
//! ```

use log::{debug, info, warn};
use rosc::OscPacket;

use super::encoder::OutboundMotionEncoder;
use super::landmarks::SkeletonMeasurement;
use crate::core::AvatarRig;

/// Calibration phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationPhase {
    /// Waiting to suspend animation.
    #[default]
    Priming,
    /// Rig is in rest pose; measure on the next step.
    Sampling,
    /// Animation resumed; streaming starts on the next step.
    Restoring,
    /// Terminal. Every step produces a bundle.
    Streaming,
}

/// Drives calibration then streaming, one step per tick.
#[derive(Debug, Default)]
pub struct BodyMeasurementSequencer {
    phase: CalibrationPhase,
    resume_animation: bool,
}

impl BodyMeasurementSequencer {
    /// Create a sequencer in [`CalibrationPhase::Priming`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> CalibrationPhase {
        self.phase
    }

    /// Whether calibration is over.
    pub fn is_streaming(&self) -> bool {
        self.phase == CalibrationPhase::Streaming
    }

    /// Advance one tick. Returns the bundle to send, if any.
    pub fn step<R: AvatarRig + ?Sized>(
        &mut self,
        rig: &mut R,
        encoder: &mut OutboundMotionEncoder,
    ) -> Option<OscPacket> {
        match self.phase {
            CalibrationPhase::Priming => {
                self.resume_animation = rig.animation_enabled();
                rig.set_animation_enabled(false);
                self.phase = CalibrationPhase::Sampling;
                None
            }
            CalibrationPhase::Sampling => {
                let (measurement, missing) = SkeletonMeasurement::measure(rig);
                if !missing.is_empty() {
                    warn!("rig has no joint for {}; sampled as zero", missing.join(", "));
                }
                if encoder.record_measurement(measurement) {
                    info!("body measured");
                } else {
                    debug!("body already measured, keeping the first measurement");
                }
                if self.resume_animation {
                    rig.set_animation_enabled(true);
                }
                self.phase = CalibrationPhase::Restoring;
                None
            }
            CalibrationPhase::Restoring => {
                self.phase = CalibrationPhase::Streaming;
                Self::stream(rig, encoder)
            }
            CalibrationPhase::Streaming => Self::stream(rig, encoder),
        }
    }

    fn stream<R: AvatarRig + ?Sized>(rig: &R, encoder: &OutboundMotionEncoder) -> Option<OscPacket> {
        match encoder.encode(rig) {
            Ok(packet) => Some(packet),
            Err(e) => {
                warn!("skipping motion bundle: {e}");
                None
            }
        }
    }
}
