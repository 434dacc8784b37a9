//! Inbound VMC protocol handling.
//!
//! [`ProtocolRouter`] parses `/VMC/Ext/Root/Pos` and `/VMC/Ext/Bone/Pos`
//! messages and hands them to a [`PoseHandler`](crate::core::PoseHandler);
//! [`AvatarPoseApplier`] is the handler that writes them onto a rig.

mod applier;
mod router;

pub use applier::AvatarPoseApplier;
pub use router::{Dispatch, DispatchStats, PoseArgs, ProtocolRouter, VmcAddress};
