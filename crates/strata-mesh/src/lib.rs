//! # strata-mesh
//!
//! Triangle surface mesh with Structure-of-Arrays (SoA) vertex layout.
//!
//! ## Key Types
//!
//! - [`TriangleMesh`]: positions and face indices, plus a topology
//!   generation counter that changes whenever faces are added or removed.
//! - Procedural generators for tests and demo scenes (quad grids, UV spheres,
//!   single triangles).

pub mod generators;
pub mod mesh;

pub use mesh::TriangleMesh;
