//! Strongly-typed identifiers.
//!
//! Particles, mesh faces and collidable objects are all addressed by `u32`
//! indices; the newtypes keep a face index from being passed where an
//! object index is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl $name {
            /// Raw index as `usize`, for slice indexing.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Index into the particle arrays.
    ParticleId,
    "p"
);

define_id!(
    /// Index into a mesh's face list.
    FaceId,
    "f"
);

define_id!(
    /// Index into the collidable object registry.
    ObjectId,
    "obj"
);
