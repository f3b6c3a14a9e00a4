//! # strata-math
//!
//! Linear algebra primitives for the Strata MPM core.
//!
//! Provides:
//! - Re-exports of `glam` types (`Vec2`, `Vec3`, `Mat2`, `Mat3`)
//! - [`GridVector`] / [`GridMatrix`], which let the kernels, the grid and the
//!   driver be written once and instantiated in 2-D or 3-D

pub mod grid_vector;

pub use grid_vector::{GridMatrix, GridVector};

// Re-export glam types as the canonical math types for Strata.
pub use glam::{Mat2, Mat3, Vec2, Vec3};
