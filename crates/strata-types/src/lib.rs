//! # strata-types
//!
//! Vocabulary shared by every Strata crate: the [`StrataError`] taxonomy
//! and its result alias, typed indices, the [`Scalar`] alias, and the
//! physical constants and simulation defaults in [`constants`].

pub mod constants;
pub mod error;
pub mod ids;
pub mod scalar;

pub use error::{StrataError, StrataResult};
pub use ids::{FaceId, ObjectId, ParticleId};
pub use scalar::Scalar;
