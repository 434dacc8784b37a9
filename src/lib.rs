//! # VMC → Mop bridge
//!
//! Receives avatar poses over the **VMC** protocol (OSC over UDP), applies
//! them to a humanoid rig, and re-publishes the rig as **Mop** skeleton
//! messages for a downstream consumer:
//!
//! - **Input**: `/VMC/Ext/Root/Pos` and `/VMC/Ext/Bone/Pos`, applied to the rig by bone name
//! - **Calibration**: a one-shot rest-pose measurement of 15 landmark joints
//! - **Output**: one bundle per tick of skeleton sizes and live bone transforms,
//!   remapped into the consumer's Z-up, centimetre frame
//!
//! ## Feature Flags
//!
//! - `transport` (default): UDP pumps, the [`Bridge`] tick loop and the binary
//!
//! ## Modules
//!
//! - [`core`]: traits, bone table, transforms, constants and error types
//! - [`codec`]: OSC packet encode/decode
//! - [`vmc`]: inbound routing and pose application
//! - [`mop`]: body measurement and the outbound motion bundle
//! - [`rig`]: an in-memory humanoid rig
//! - [`config`]: settings, settings file and environment
//! - [`transport`]: UDP receive and send pumps (requires `transport`)
//! - [`bridge`]: the tick loop (requires `transport`)
//!
//! ## Example Usage
//!
//! Without sockets, the pieces compose directly:
//!
//! ```rust
//! use vmc_mop_bridge::prelude::*;
//!
//! let mut rig = HumanoidRig::standard();
//! let mut router = ProtocolRouter::new();
//! let mut sequencer = BodyMeasurementSequencer::new();
//! let mut encoder = OutboundMotionEncoder::new();
//!
//! let pose = vmc_mop_bridge::codec::message(
//!     "/VMC/Ext/Bone/Pos",
//!     vec![
//!         rosc::OscType::String("Head".into()),
//!         rosc::OscType::Float(0.0), rosc::OscType::Float(0.1), rosc::OscType::Float(0.0),
//!         rosc::OscType::Float(0.0), rosc::OscType::Float(0.0), rosc::OscType::Float(0.0),
//!         rosc::OscType::Float(1.0),
//!     ],
//! );
//!
//! let mut bundles = 0;
//! for _ in 0..4 {
//!     router.dispatch_all([&pose], &mut AvatarPoseApplier::new(&mut rig));
//!     if sequencer.step(&mut rig, &mut encoder).is_some() {
//!         bundles += 1;
//!     }
//! }
//! assert_eq!(bundles, 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod codec;
pub mod config;
pub mod core;
pub mod logging;
pub mod mop;
pub mod rig;
pub mod vmc;

// Transport layer (feature-gated)
#[cfg(feature = "transport")]
#[cfg_attr(docsrs, doc(cfg(feature = "transport")))]
pub mod transport;

// Tick loop (feature-gated)
#[cfg(feature = "transport")]
#[cfg_attr(docsrs, doc(cfg(feature = "transport")))]
pub mod bridge;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::*;

    pub use crate::config::{Reconfigure, Settings, SettingsField, SettingsStore};
    pub use crate::mop::{
        BodyMeasurementSequencer, CalibrationPhase, OutboundMotionEncoder, SkeletonMeasurement,
    };
    pub use crate::rig::HumanoidRig;
    pub use crate::vmc::{AvatarPoseApplier, DispatchStats, ProtocolRouter};

    #[cfg(feature = "transport")]
    pub use crate::bridge::{Bridge, BridgeError, ConfigHandle, TickReport};
    #[cfg(feature = "transport")]
    pub use crate::transport::{InboundTransport, OutboundTransport, TransportError};
}

// Re-export commonly used items at crate root
pub use crate::core::{AvatarRig, HumanBone, PoseHandler, Transform};

#[cfg(feature = "transport")]
pub use bridge::{Bridge, BridgeError};
