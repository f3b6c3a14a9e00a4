//! Setup validation.
//!
//! Validates a [`SimulationSetup`] before any driver state is touched,
//! catching data-level errors early with clear diagnostics. `dim` is the
//! dimensionality of the driver that will consume the setup; components
//! beyond it are ignored.

use strata_types::{StrataError, StrataResult};

use crate::contract::SimulationSetup;

/// Smallest grid resolution that leaves interior cells inside the
/// boundary layer.
pub const MIN_GRID_RESOLUTION: u32 = 4;

/// Validates a complete setup.
///
/// Checks:
/// - Frame range is ordered, frame rate and step bounds are positive
/// - CFL number in `(0, 1]`, FLIP blend in `[0, 1]`
/// - Grid resolution and cell width are usable
/// - Material parameters are physical
/// - Seeding box is non-empty and inside the grid
pub fn validate_setup(setup: &SimulationSetup, dim: usize) -> StrataResult<()> {
    if !(2..=3).contains(&dim) {
        return Err(invalid(format!("Unsupported dimensionality {}", dim)));
    }
    validate_time(setup)?;
    validate_grid(setup, dim)?;
    validate_material(setup)?;
    validate_seeding(setup, dim)?;
    Ok(())
}

fn invalid(msg: String) -> StrataError {
    StrataError::Configuration(msg)
}

fn validate_time(setup: &SimulationSetup) -> StrataResult<()> {
    if setup.end_frame < setup.start_frame {
        return Err(invalid(format!(
            "End frame {} precedes start frame {}",
            setup.end_frame, setup.start_frame
        )));
    }
    if !(setup.frame_rate > 0.0 && setup.frame_rate.is_finite()) {
        return Err(invalid("Frame rate must be positive".into()));
    }
    if !(setup.max_dt > 0.0 && setup.max_dt.is_finite()) {
        return Err(invalid("Maximum time step must be positive".into()));
    }
    if !(setup.cfl > 0.0 && setup.cfl <= 1.0) {
        return Err(invalid(format!("CFL number must lie in (0, 1], got {}", setup.cfl)));
    }
    if !(0.0..=1.0).contains(&setup.flip_ratio) {
        return Err(invalid(format!(
            "FLIP ratio must lie in [0, 1], got {}",
            setup.flip_ratio
        )));
    }
    if setup.gravity.iter().any(|g| !g.is_finite()) {
        return Err(invalid("Gravity must be finite".into()));
    }
    if setup.write_to_file && setup.output_dir.trim().is_empty() {
        return Err(invalid("Output directory required when writing to file".into()));
    }
    Ok(())
}

fn validate_grid(setup: &SimulationSetup, dim: usize) -> StrataResult<()> {
    let grid = &setup.grid;
    if !(grid.cell_width > 0.0 && grid.cell_width.is_finite()) {
        return Err(invalid("Grid cell width must be positive".into()));
    }
    for (axis, &n) in grid.resolution.iter().take(dim).enumerate() {
        if n < MIN_GRID_RESOLUTION {
            return Err(invalid(format!(
                "Grid resolution along axis {} is {}, need at least {}",
                axis, n, MIN_GRID_RESOLUTION
            )));
        }
    }
    Ok(())
}

fn validate_material(setup: &SimulationSetup) -> StrataResult<()> {
    let m = &setup.material;
    if !(m.density > 0.0 && m.density.is_finite()) {
        return Err(invalid("Density must be positive".into()));
    }
    if !(m.youngs_modulus > 0.0 && m.youngs_modulus.is_finite()) {
        return Err(invalid("Young's modulus must be positive".into()));
    }
    if !(0.0..0.5).contains(&m.poisson_ratio) {
        return Err(invalid(format!(
            "Poisson's ratio must lie in [0, 0.5), got {}",
            m.poisson_ratio
        )));
    }
    Ok(())
}

fn validate_seeding(setup: &SimulationSetup, dim: usize) -> StrataResult<()> {
    let s = &setup.seeding;
    if s.count == 0 {
        return Err(invalid("Particle count must be at least 1".into()));
    }
    let extent = setup.grid.extent();
    for axis in 0..dim {
        let lo = setup.grid.origin[axis];
        let hi = lo + extent[axis];
        if !(s.min[axis] < s.max[axis]) {
            return Err(invalid(format!(
                "Seeding box is empty along axis {} ({} .. {})",
                axis, s.min[axis], s.max[axis]
            )));
        }
        if s.min[axis] < lo || s.max[axis] > hi {
            return Err(invalid(format!(
                "Seeding box along axis {} ({} .. {}) leaves the grid ({} .. {})",
                axis, s.min[axis], s.max[axis], lo, hi
            )));
        }
        if !s.velocity[axis].is_finite() {
            return Err(invalid("Seeding velocity must be finite".into()));
        }
    }
    Ok(())
}
