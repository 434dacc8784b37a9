//! Protocol constants for the VMC and Mop conventions.
//!
//! These values are fixed by the external consumers and MUST NOT be changed.

use std::time::Duration;

// =============================================================================
// VMC (inbound)
// =============================================================================

/// Root transform of the performer.
pub const VMC_ROOT_POS: &str = "/VMC/Ext/Root/Pos";

/// Local transform of a single named bone.
pub const VMC_BONE_POS: &str = "/VMC/Ext/Bone/Pos";

/// Arguments in a root/bone pose message (name + 3 position + 4 rotation).
pub const VMC_POSE_ARG_COUNT: usize = 8;

/// Standard VMC receive port.
pub const DEFAULT_RECEIVE_PORT: u16 = 39539;

// =============================================================================
// MOP (outbound)
// =============================================================================

/// Address prefix for calibrated body-size messages.
pub const MOP_SKELETON_PREFIX: &str = "/Mop/Skeleton/";

/// Address prefix for live bone transform messages.
pub const MOP_BONE_CONTROL_PREFIX: &str = "/Mop/BoneControl/";

/// Number of landmark joints measured and streamed.
pub const LANDMARK_COUNT: usize = 15;

/// Messages in every outbound motion bundle (skeleton + bone control).
pub const MOTION_BUNDLE_LEN: usize = LANDMARK_COUNT * 2;

/// Internal metres to consumer centimetres.
pub const POSITION_SCALE: f32 = 100.0;

/// Default Mop consumer host.
pub const DEFAULT_SEND_HOST: &str = "127.0.0.1";

/// Default Mop consumer port.
pub const DEFAULT_SEND_PORT: u16 = 39540;

// =============================================================================
// TRANSPORT
// =============================================================================

/// Outbound queue capacity; older entries are evicted past this.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 100;

/// Receive buffer size (largest UDP payload).
pub const RECV_BUFFER_SIZE: usize = 65535;

/// Read timeout of the receive socket; bounds how long `stop` waits.
pub const RECV_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Quiet period before a settings change restarts a transport.
pub const RECONFIGURE_DEBOUNCE: Duration = Duration::from_secs(1);
