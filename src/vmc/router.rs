//! Address-based dispatch of inbound VMC messages.

use glam::{Quat, Vec3};
use log::warn;
use rosc::{OscMessage, OscType};

use crate::core::constants::{VMC_BONE_POS, VMC_POSE_ARG_COUNT, VMC_ROOT_POS};
use crate::core::{DispatchError, PoseHandler};

/// Inbound addresses the router understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmcAddress {
    /// `/VMC/Ext/Root/Pos`
    RootPos,
    /// `/VMC/Ext/Bone/Pos`
    BonePos,
}

impl VmcAddress {
    /// Match an OSC address exactly.
    pub fn parse(addr: &str) -> Option<Self> {
        match addr {
            VMC_ROOT_POS => Some(VmcAddress::RootPos),
            VMC_BONE_POS => Some(VmcAddress::BonePos),
            _ => None,
        }
    }

    /// Wire address.
    pub fn as_str(self) -> &'static str {
        match self {
            VmcAddress::RootPos => VMC_ROOT_POS,
            VmcAddress::BonePos => VMC_BONE_POS,
        }
    }
}

/// Arguments of a root or bone pose message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseArgs<'a> {
    /// Root label or bone name.
    pub name: &'a str,
    /// Position.
    pub position: Vec3,
    /// Rotation, as sent.
    pub rotation: Quat,
}

impl<'a> PoseArgs<'a> {
    /// Parse `[name, px, py, pz, qx, qy, qz, qw]`.
    ///
    /// Extra trailing arguments are ignored.
    pub fn parse(message: &'a OscMessage) -> Result<Self, DispatchError> {
        let args = &message.args;
        if args.len() < VMC_POSE_ARG_COUNT {
            return Err(DispatchError::MissingArguments {
                address: message.addr.clone(),
                expected: VMC_POSE_ARG_COUNT,
                actual: args.len(),
            });
        }

        let name = match &args[0] {
            OscType::String(name) => name.as_str(),
            _ => {
                return Err(DispatchError::ArgumentType {
                    address: message.addr.clone(),
                    index: 0,
                    expected: "string",
                });
            }
        };
        let f = |index: usize| match args[index] {
            OscType::Float(value) => Ok(value),
            _ => Err(DispatchError::ArgumentType {
                address: message.addr.clone(),
                index,
                expected: "float",
            }),
        };

        Ok(Self {
            name,
            position: Vec3::new(f(1)?, f(2)?, f(3)?),
            rotation: Quat::from_xyzw(f(4)?, f(5)?, f(6)?, f(7)?),
        })
    }
}

/// What happened to a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Parsed and handed to the handler.
    Applied,
    /// Address not recognized.
    Ignored,
    /// Recognized address with malformed arguments.
    Rejected,
}

/// Per-batch dispatch counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    /// Messages handed to the handler.
    pub applied: usize,
    /// Messages with unknown addresses.
    pub ignored: usize,
    /// Messages with malformed arguments.
    pub rejected: usize,
}

impl DispatchStats {
    fn record(&mut self, outcome: Dispatch) {
        match outcome {
            Dispatch::Applied => self.applied += 1,
            Dispatch::Ignored => self.ignored += 1,
            Dispatch::Rejected => self.rejected += 1,
        }
    }

    /// Total messages seen.
    pub fn total(&self) -> usize {
        self.applied + self.ignored + self.rejected
    }
}

/// Routes inbound messages to a [`PoseHandler`] by address.
///
/// A malformed message is logged and skipped; it never stops the batch.
#[derive(Debug, Default)]
pub struct ProtocolRouter {
    totals: DispatchStats,
}

impl ProtocolRouter {
    /// Create a router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch one message.
    pub fn dispatch<H: PoseHandler + ?Sized>(
        &mut self,
        message: &OscMessage,
        handler: &mut H,
    ) -> Dispatch {
        let outcome = match route(message, handler) {
            Ok(true) => Dispatch::Applied,
            Ok(false) => Dispatch::Ignored,
            Err(e) => {
                warn!("discarding message: {e}");
                Dispatch::Rejected
            }
        };
        self.totals.record(outcome);
        outcome
    }

    /// Dispatch a batch in order.
    pub fn dispatch_all<'m, H, I>(&mut self, messages: I, handler: &mut H) -> DispatchStats
    where
        H: PoseHandler + ?Sized,
        I: IntoIterator<Item = &'m OscMessage>,
    {
        let mut stats = DispatchStats::default();
        for message in messages {
            stats.record(self.dispatch(message, handler));
        }
        stats
    }

    /// Counters since the router was created.
    pub fn totals(&self) -> DispatchStats {
        self.totals
    }
}

fn route<H: PoseHandler + ?Sized>(
    message: &OscMessage,
    handler: &mut H,
) -> Result<bool, DispatchError> {
    let Some(address) = VmcAddress::parse(&message.addr) else {
        return Ok(false);
    };
    let pose = PoseArgs::parse(message)?;
    match address {
        VmcAddress::RootPos => handler.root_pose(pose.name, pose.position, pose.rotation),
        VmcAddress::BonePos => handler.bone_pose(pose.name, pose.position, pose.rotation),
    }
    Ok(true)
}
