//! Core traits, types, and constants.

mod bones;
pub mod constants;
mod error;
mod pose;
mod traits;

pub use bones::HumanBone;
pub use error::*;
pub use pose::Transform;
pub use traits::{AvatarRig, PoseHandler};
