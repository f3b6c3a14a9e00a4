//! Conserved-quantity snapshots.

use serde::{Deserialize, Serialize};
use strata_math::GridVector;

use crate::grid::Grid;
use crate::particles::ParticleSet;

/// Totals measured after a step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub total_mass: f64,
    /// Mass scattered to the grid during the step.
    pub grid_mass: f64,
    pub kinetic_energy: f64,
    /// Linear momentum, embedded in 3-D.
    pub momentum: [f64; 3],
}

impl Diagnostics {
    pub fn measure<V: GridVector>(particles: &ParticleSet<V>, grid: &Grid<V>) -> Self {
        Self {
            total_mass: particles.total_mass(),
            grid_mass: grid.total_mass(),
            kinetic_energy: particles.kinetic_energy(),
            momentum: particles.momentum(),
        }
    }
}
