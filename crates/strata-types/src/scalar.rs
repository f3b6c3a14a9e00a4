//! Scalar type alias for the simulation.
//!
//! Grid and particle buffers are stored in `f32`; reductions that must not
//! lose precision (total mass, energy) accumulate in `f64`.

/// The floating-point type used throughout the simulation.
pub type Scalar = f32;
