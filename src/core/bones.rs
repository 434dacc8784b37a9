//! Canonical humanoid bone names.
//!
//! VMC senders address bones by these exact, case-sensitive names. Lookup
//! goes through a map built once on first use.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

macro_rules! human_bones {
    ($($bone:ident),+ $(,)?) => {
        /// A joint slot of a standard humanoid rig.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum HumanBone {
            $(
                #[allow(missing_docs)]
                $bone,
            )+
        }

        impl HumanBone {
            /// Every bone, in canonical order.
            pub const ALL: &'static [HumanBone] = &[$(HumanBone::$bone),+];

            /// Canonical wire name.
            pub const fn name(self) -> &'static str {
                match self {
                    $(HumanBone::$bone => stringify!($bone),)+
                }
            }
        }
    };
}

human_bones! {
    Hips,
    LeftUpperLeg,
    RightUpperLeg,
    LeftLowerLeg,
    RightLowerLeg,
    LeftFoot,
    RightFoot,
    Spine,
    Chest,
    Neck,
    Head,
    LeftShoulder,
    RightShoulder,
    LeftUpperArm,
    RightUpperArm,
    LeftLowerArm,
    RightLowerArm,
    LeftHand,
    RightHand,
    LeftToes,
    RightToes,
    LeftEye,
    RightEye,
    Jaw,
    LeftThumbProximal,
    LeftThumbIntermediate,
    LeftThumbDistal,
    LeftIndexProximal,
    LeftIndexIntermediate,
    LeftIndexDistal,
    LeftMiddleProximal,
    LeftMiddleIntermediate,
    LeftMiddleDistal,
    LeftRingProximal,
    LeftRingIntermediate,
    LeftRingDistal,
    LeftLittleProximal,
    LeftLittleIntermediate,
    LeftLittleDistal,
    RightThumbProximal,
    RightThumbIntermediate,
    RightThumbDistal,
    RightIndexProximal,
    RightIndexIntermediate,
    RightIndexDistal,
    RightMiddleProximal,
    RightMiddleIntermediate,
    RightMiddleDistal,
    RightRingProximal,
    RightRingIntermediate,
    RightRingDistal,
    RightLittleProximal,
    RightLittleIntermediate,
    RightLittleDistal,
    UpperChest,
}

impl HumanBone {
    /// Number of bones in the canonical table.
    pub const COUNT: usize = Self::ALL.len();

    /// Resolve a wire name to a bone (exact match).
    pub fn from_name(name: &str) -> Option<Self> {
        static BY_NAME: OnceLock<HashMap<&'static str, HumanBone>> = OnceLock::new();
        BY_NAME
            .get_or_init(|| Self::ALL.iter().map(|&bone| (bone.name(), bone)).collect())
            .get(name)
            .copied()
    }

    /// Position of this bone in [`HumanBone::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for HumanBone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
