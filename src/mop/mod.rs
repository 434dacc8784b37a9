//! Mop output: body measurement and the per-tick motion bundle.
//!
//! The consumer first needs the avatar's proportions, so the
//! [`BodyMeasurementSequencer`] measures 15 landmark joints in rest pose
//! once, then hands off to the [`OutboundMotionEncoder`] which streams
//! skeleton size and live bone transforms every tick.

pub mod axes;
mod encoder;
mod landmarks;
mod sequencer;

pub use encoder::{BoneSample, OutboundMotionEncoder};
pub use landmarks::{LANDMARKS, Landmark, SkeletonMeasurement};
pub use sequencer::{BodyMeasurementSequencer, CalibrationPhase};
