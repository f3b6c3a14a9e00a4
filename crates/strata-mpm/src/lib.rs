//! # strata-mpm
//!
//! Material Point Method driver.
//!
//! Particles carry mass, velocity and a deformation gradient; every step
//! they are scattered to a dense background [`Grid`] through the driver's
//! [`WeightFunction`](strata_kernel::WeightFunction), the grid is advanced
//! under internal forces, gravity, contact impulses and slip walls, and the
//! result is gathered back with a PIC/FLIP blend.
//!
//! ## Architecture
//!
//! ```text
//! MpmDriver (trait) ── run() frame loop, restart files per step
//!     └── ExplicitMpm<V>
//!           ├── MpmBase<V>      frame clock, plugins, owned kernel + factory
//!           ├── ParticleSet<V>  SoA particle buffers
//!           ├── Grid<V>         dense node arrays
//!           └── Constitutive    neo-Hookean solid / weakly compressible fluid
//! ```
//!
//! Drivers are generic over [`GridVector`](strata_math::GridVector), so the
//! same code runs in 2-D (`Vec2`) and 3-D (`Vec3`).

pub mod contact;
pub mod diagnostics;
pub mod driver;
pub mod grid;
pub mod material;
pub mod particles;
pub mod plugin;
pub mod transfer;

pub use contact::{impulses_from_contacts, ContactImpulse};
pub use diagnostics::Diagnostics;
pub use driver::{restart_path, run, DriverState, ExplicitMpm, MpmBase, MpmDriver};
pub use grid::Grid;
pub use material::Constitutive;
pub use particles::ParticleSet;
pub use plugin::{DriverPlugin, LogPlugin, RunInfo, StepInfo, TelemetryPlugin};

/// 2-D explicit driver.
pub type ExplicitMpm2 = ExplicitMpm<strata_math::Vec2>;

/// 3-D explicit driver.
pub type ExplicitMpm3 = ExplicitMpm<strata_math::Vec3>;
